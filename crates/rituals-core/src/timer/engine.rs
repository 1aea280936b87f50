//! Per-second act timer.
//!
//! The timer holds only derived display state (pause flag, expiry flag,
//! countdown counter). All durable timing lives on the act and ritual it is
//! handed on every tick, so re-focusing an act always starts from its stored
//! fields.
//!
//! ## Per-act states
//!
//! ```text
//! not-started -> running <-> paused -> finished
//!                   \-- expired (sticky, orthogonal)
//! ```
//!
//! ## Counter sign
//!
//! Before expiry the counter is `actual - expected` (counting up to zero);
//! after expiry it is `expected - actual` (counting down past zero). Both
//! render through `format_duration`, which drops the sign.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::events::Event;
use crate::ritual::{ActRuntime, ActStatus, RitualInstance};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActTimer {
    paused: bool,
    expired: bool,
    counter: i64,
}

impl ActTimer {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Re-derive display state for a newly focused act.
    ///
    /// Clears the pause flag and recomputes expiry and counter from the
    /// act's own stored time; accumulated time is left alone.
    pub fn focus(&mut self, act: &ActRuntime) {
        self.paused = false;
        self.expired = act.is_expired();
        self.counter = counter_for(act, self.expired);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance the act at `index` by one second.
    ///
    /// Returns `ActStarted` on the first running tick and `ActExpired` on the
    /// tick where a timed act reaches its expected duration.
    pub fn tick(
        &mut self,
        instance: &mut RitualInstance,
        index: usize,
        now: DateTime<Local>,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        let totals = &mut instance.time;
        let Some(act) = instance.acts.get_mut(index) else {
            return events;
        };

        if self.paused {
            // Pause time only counts once the act has actually begun.
            if act.time.started.is_some() {
                act.time.paused += 1;
                totals.paused += 1;
            }
            return events;
        }

        if act.time.started.is_none() {
            act.time.started = Some(now.timestamp());
            act.status = Some(ActStatus::Active);
            debug!(index, act = %act.name, "act started");
            events.push(Event::ActStarted {
                index,
                name: act.name.clone(),
                at: now,
            });
        }
        act.time.actual += 1;
        totals.actual += 1;

        if self.expired {
            self.counter = counter_for(act, true);
        } else {
            self.counter = counter_for(act, false);
            if act.is_timed() && self.counter >= 0 {
                self.expired = true;
                info!(index, act = %act.name, expected = act.time.expected, "act expired");
                events.push(Event::ActExpired {
                    index,
                    name: act.name.clone(),
                    expected_secs: act.time.expected,
                    at: now,
                });
            }
        }
        events
    }
}

fn counter_for(act: &ActRuntime, expired: bool) -> i64 {
    let actual = act.time.actual as i64;
    let expected = act.time.expected as i64;
    if expired {
        expected - actual
    } else {
        actual - expected
    }
}
