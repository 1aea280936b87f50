//! End-to-end walk through a ritual on a simulated device.
//!
//! Drives a `Device` the way the watch would: menu selection, swipes and a
//! tick per second, then checks what was drawn, buzzed and persisted.

use std::sync::{Arc, Mutex};

use chrono::{Local, TimeZone};
use indoc::indoc;
use rituals_core::display::{Condition, Palette};
use rituals_core::ritual::{ActStatus, RitualStatus};
use rituals_core::{
    Command, Config, Device, Event, Frame, Haptics, JsonStore, ManualClock, MemoryStore, Menu,
    Renderer, RitualCatalog, RitualStore, Swipe,
};

const CATALOG: &str = indoc! {r#"
    {
      "wind-down": {
        "name": "Wind down",
        "acts": [
          { "name": "Lights low", "description": "Dim everything" },
          { "name": "Breathe", "duration": 10 }
        ]
      }
    }
"#};

#[derive(Clone, Default)]
struct Screen {
    frames: Arc<Mutex<Vec<Frame>>>,
    messages: Arc<Mutex<Vec<String>>>,
    menus: Arc<Mutex<Vec<Menu>>>,
}

impl Screen {
    fn last_frame(&self) -> Frame {
        self.frames.lock().unwrap().last().cloned().unwrap()
    }
}

impl Renderer for Screen {
    fn draw(&mut self, frame: &Frame) {
        self.frames.lock().unwrap().push(frame.clone());
    }
    fn clear(&mut self) {}
    fn message(&mut self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
    fn menu(&mut self, menu: &Menu) {
        self.menus.lock().unwrap().push(menu.clone());
    }
}

#[derive(Clone, Default)]
struct Motor(Arc<Mutex<u32>>);

impl Haptics for Motor {
    fn buzz(&mut self) {
        *self.0.lock().unwrap() += 1;
    }
}

fn catalog() -> RitualCatalog {
    serde_json::from_str(CATALOG).unwrap()
}

fn clock() -> ManualClock {
    ManualClock::new(Local.with_ymd_and_hms(2026, 3, 14, 21, 30, 0).unwrap())
}

#[test]
fn test_full_ritual_walkthrough() {
    let store = MemoryStore::new(catalog());
    let screen = Screen::default();
    let motor = Motor::default();
    let clock = clock();
    let mut device = Device::new(
        &Config::default(),
        store.clone(),
        screen.clone(),
        motor.clone(),
        clock.clone(),
    )
    .unwrap();

    device.show_menu();
    let menu = screen.menus.lock().unwrap()[0].clone();
    let choice = menu.select("1").unwrap().id.clone();
    device.dispatch(Command::Launch(choice)).unwrap();

    // Untimed first act: clock in the primary slot.
    assert_eq!(device.session().index(), Some(0));
    let frame = screen.last_frame();
    assert_eq!(frame.title.text, "Lights low");
    assert_eq!(frame.primary, "9:30 pm");
    assert_eq!(frame.secondary, "00:01");

    device.dispatch(Command::Swipe(Swipe::Left)).unwrap();
    assert_eq!(device.session().index(), Some(1));
    assert_eq!(screen.last_frame().primary, "00:10");

    for _ in 0..10 {
        clock.advance(1);
        device.on_tick();
    }
    assert!(device.session().timer().is_expired());
    assert_eq!(*motor.0.lock().unwrap(), 1);
    assert_eq!(screen.last_frame().primary, "00:00");

    clock.advance(1);
    device.on_tick();
    assert_eq!(device.session().timer().counter(), -1);
    let frame = screen.last_frame();
    assert_eq!(frame.condition, Condition::Overrun);
    assert_eq!(frame.primary, "00:01");
    assert_eq!(frame.primary_fg, Palette::default().overrun_fg);
    assert_eq!(*motor.0.lock().unwrap(), 1);

    device.dispatch(Command::Swipe(Swipe::Left)).unwrap();
    assert!(!device.session().is_ticking());
    assert_eq!(
        screen.messages.lock().unwrap().last().map(String::as_str),
        Some("COMPLETE! :)")
    );

    let events = device.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::RitualFinalized { actual_secs: 12, paused_secs: 0, .. })));

    let saved = store.last_saved().unwrap();
    let (_, instance) = saved.instances().next().unwrap();
    assert_eq!(instance.status, RitualStatus::Completed);
    assert_eq!(instance.time.expected, 10);
    assert_eq!(instance.time.actual, 12);
    assert_eq!(instance.acts[0].status, Some(ActStatus::Completed));
    assert_eq!(instance.acts[1].status, Some(ActStatus::Completed));
    assert_eq!(instance.acts[1].time.actual, 11);
}

#[test]
fn test_pause_accumulates_paused_time() {
    let store = MemoryStore::new(catalog());
    let mut device = Device::new(
        &Config::default(),
        store.clone(),
        Screen::default(),
        Motor::default(),
        clock(),
    )
    .unwrap();

    device.dispatch(Command::Launch("wind-down".into())).unwrap();
    device.dispatch(Command::TogglePause).unwrap();
    for _ in 0..3 {
        device.on_tick();
    }
    device.dispatch(Command::TogglePause).unwrap();
    device.on_tick();
    device.dispatch(Command::Button).unwrap();

    let saved = store.last_saved().unwrap();
    let (_, instance) = saved.instances().next().unwrap();
    assert_eq!(instance.status, RitualStatus::Suspended);
    assert_eq!(instance.time.paused, 3);
    assert_eq!(instance.time.actual, 2);
    assert_eq!(instance.acts[0].status, Some(ActStatus::Active));
}

#[test]
fn test_json_store_persists_across_devices() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    std::fs::write(dir.path().join("rituals.json"), CATALOG).unwrap();

    let store = JsonStore::in_dir(dir.path(), &config);
    let mut device = Device::new(&config, store.clone(), Screen::default(), Motor::default(), clock())
        .unwrap();
    device.dispatch(Command::Launch("wind-down".into())).unwrap();
    device.dispatch(Command::Swipe(Swipe::Up)).unwrap();
    device.dispatch(Command::Button).unwrap();

    let saved = store.load_saved().unwrap();
    assert_eq!(saved.templates().count(), 1);
    let (id, instance) = saved.instances().next().unwrap();
    assert!(id.starts_with("wind-down"));
    // Skipped act moved to the end.
    assert_eq!(instance.acts[0].name, "Breathe");
    assert_eq!(instance.acts[1].name, "Lights low");
    assert_eq!(instance.acts[1].status, Some(ActStatus::Skipped));

    // The template file is untouched; a fresh device starts clean.
    assert_eq!(store.load().unwrap().instances().count(), 0);
}
