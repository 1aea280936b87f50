//! Property tests for formatting, expansion and time accounting.

use chrono::{DateTime, Local, TimeZone};
use proptest::prelude::*;
use rituals_core::format::{format_duration, parse_duration};
use rituals_core::ritual::{ActSpec, LeafAct, RitualTemplate};
use rituals_core::{expand, RitualCatalog, Session, SessionSettings, Swipe};

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Tick,
    TogglePause,
    Swipe(Swipe),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => Just(Op::Tick),
        1 => Just(Op::TogglePause),
        1 => Just(Op::Swipe(Swipe::Left)),
        1 => Just(Op::Swipe(Swipe::Right)),
        1 => Just(Op::Swipe(Swipe::Up)),
        1 => Just(Op::Swipe(Swipe::Down)),
    ]
}

fn catalog_of(durations: &[u64]) -> RitualCatalog {
    let mut catalog = RitualCatalog::new();
    catalog.insert_template(
        "r",
        RitualTemplate {
            name: "R".into(),
            acts: durations
                .iter()
                .enumerate()
                .map(|(i, d)| ActSpec::Leaf(LeafAct::new(format!("act{i}"), *d)))
                .collect(),
        },
    );
    catalog
}

/// Templates `t0..tn` where each may only reference lower-numbered ones.
fn layered_catalog(layers: &[(usize, Vec<usize>)]) -> RitualCatalog {
    let mut catalog = RitualCatalog::new();
    for (i, (leaves, refs)) in layers.iter().enumerate() {
        let mut acts: Vec<ActSpec> = (0..*leaves)
            .map(|n| ActSpec::Leaf(LeafAct::new(format!("t{i}-{n}"), n as u64)))
            .collect();
        for r in refs.iter().filter(|r| **r < i) {
            acts.push(ActSpec::Reference {
                next: format!("t{r}"),
            });
        }
        catalog.insert_template(
            format!("t{i}"),
            RitualTemplate {
                name: format!("T{i}"),
                acts,
            },
        );
    }
    catalog
}

fn leaf_count(layers: &[(usize, Vec<usize>)], i: usize) -> usize {
    let (leaves, refs) = &layers[i];
    leaves
        + refs
            .iter()
            .filter(|r| **r < i)
            .map(|r| leaf_count(layers, *r))
            .sum::<usize>()
}

proptest! {
    #[test]
    fn duration_text_round_trips(secs in 0u64..200_000) {
        let text = format_duration(secs as i64);
        prop_assert_eq!(parse_duration(&text).unwrap(), secs);
        prop_assert_eq!(format_duration(-(secs as i64)), text);
    }

    #[test]
    fn ritual_totals_track_act_sums(
        durations in prop::collection::vec(0u64..8, 1..6),
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let mut session = Session::new(catalog_of(&durations), SessionSettings::default());
        session.launch("r", now()).unwrap();
        let id = session.instance_id().unwrap().to_string();

        let mut last_total = 0;
        for op in ops {
            match op {
                Op::Tick => { session.tick(now()); }
                Op::TogglePause => { session.toggle_pause(now()); }
                Op::Swipe(s) => { session.swipe(s, now()); }
            }
            let instance = session.catalog().instance(&id).unwrap();
            let actual: u64 = instance.acts.iter().map(|a| a.time.actual).sum();
            let paused: u64 = instance.acts.iter().map(|a| a.time.paused).sum();
            prop_assert_eq!(instance.time.actual, actual);
            prop_assert_eq!(instance.time.paused, paused);
            prop_assert_eq!(instance.time.expected, durations.iter().sum::<u64>());

            let total = instance.time.actual + instance.time.paused;
            prop_assert!(total >= last_total);
            last_total = total;
        }
    }

    #[test]
    fn skip_moves_act_to_end(
        durations in prop::collection::vec(0u64..5, 1..8),
        skips in 1usize..10,
    ) {
        let mut session = Session::new(catalog_of(&durations), SessionSettings::default());
        session.launch("r", now()).unwrap();
        let id = session.instance_id().unwrap().to_string();

        for _ in 0..skips {
            let before: Vec<String> = session
                .catalog()
                .instance(&id)
                .unwrap()
                .acts
                .iter()
                .map(|a| a.name.clone())
                .collect();
            session.swipe(Swipe::Up, now());
            let after: Vec<String> = session
                .catalog()
                .instance(&id)
                .unwrap()
                .acts
                .iter()
                .map(|a| a.name.clone())
                .collect();

            let mut expected = before.clone();
            let skipped = expected.remove(0);
            expected.push(skipped);
            prop_assert_eq!(after, expected);
            prop_assert_eq!(session.index(), Some(0));
        }
    }

    #[test]
    fn expansion_yields_every_reachable_leaf(
        layers in prop::collection::vec(
            (0usize..4, prop::collection::vec(0usize..6, 0..3)),
            1..6,
        ),
    ) {
        let catalog = layered_catalog(&layers);
        for i in 0..layers.len() {
            let acts = expand(&format!("t{i}"), &catalog).unwrap();
            prop_assert_eq!(acts.len(), leaf_count(&layers, i));
        }
    }
}
