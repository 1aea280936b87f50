//! The device loop.
//!
//! A [`Device`] is the single writer for a [`Session`]: one task owns it and
//! handles both the periodic tick and input commands, one at a time. The tick
//! comes from the one interval the loop owns, and it is only polled while the
//! session is ticking, so there is never a second tick source to leak.
//!
//! After every command or tick the device applies side effects in a fixed
//! order: buzz for expiry, save when the ritual ends or is left, then draw
//! the current frame (or the completion message / menu).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::display::{present, Frame, Menu, Palette};
use crate::error::Result;
use crate::events::Event;
use crate::input::{DragEvent, DragTracker, Swipe};
use crate::session::Session;
use crate::storage::{Config, RitualStore};
use crate::timer::Clock;

pub const COMPLETE_MESSAGE: &str = "COMPLETE! :)";

/// Rendering boundary.
pub trait Renderer: Send {
    fn draw(&mut self, frame: &Frame);
    fn clear(&mut self);
    fn message(&mut self, text: &str);
    fn menu(&mut self, menu: &Menu);
}

/// Vibration motor.
pub trait Haptics: Send {
    fn buzz(&mut self);
}

/// Everything the outside world can ask of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raw touchscreen sample.
    Drag(DragEvent),
    /// An already-classified swipe.
    Swipe(Swipe),
    /// The hardware button.
    Button,
    /// The on-screen pause/play control.
    TogglePause,
    /// Menu selection.
    Launch(String),
    Quit,
}

/// Whether the loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Device<S, R, H> {
    session: Session,
    store: S,
    renderer: R,
    haptics: H,
    clock: Box<dyn Clock>,
    palette: Palette,
    drag: DragTracker,
    tick_period: Duration,
    alerts: bool,
    events: Vec<Event>,
}

impl<S, R, H> Device<S, R, H>
where
    S: RitualStore,
    R: Renderer,
    H: Haptics,
{
    /// Load the catalog from `store` and build a device around it.
    pub fn new(
        config: &Config,
        store: S,
        renderer: R,
        haptics: H,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        let catalog = store.load()?;
        Ok(Self {
            session: Session::new(catalog, config.session_settings()),
            store,
            renderer,
            haptics,
            clock: Box::new(clock),
            palette: config.palette.clone(),
            drag: DragTracker::new(config.display.swipe_threshold),
            tick_period: Duration::from_millis(config.timer.tick_interval_ms.max(1)),
            alerts: config.timer.haptics,
            events: Vec::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Show the launch menu.
    pub fn show_menu(&mut self) {
        let menu = self.session.menu();
        self.renderer.menu(&menu);
    }

    /// Handle one command to completion.
    pub fn dispatch(&mut self, command: Command) -> Result<Flow> {
        let now = self.clock.now();
        debug!(?command, "dispatch");
        let events = match command {
            Command::Quit => return Ok(Flow::Stop),
            Command::Drag(event) => match self.drag.feed(event) {
                Some(swipe) => self.session.swipe(swipe, now),
                None => return Ok(Flow::Continue),
            },
            Command::Swipe(swipe) => self.session.swipe(swipe, now),
            Command::TogglePause => self.session.toggle_pause(now),
            Command::Launch(template_id) => {
                self.renderer.clear();
                self.renderer.message("Loading...");
                self.session.launch(&template_id, now)?
            }
            Command::Button => {
                let events = self.session.suspend(now);
                self.apply(&events);
                if events.is_empty() {
                    // Already in the menu or finished: still write back.
                    self.save();
                }
                self.events.extend(events);
                self.renderer.clear();
                self.show_menu();
                return Ok(Flow::Continue);
            }
        };
        self.settle(events);
        Ok(Flow::Continue)
    }

    /// One tick of the interval.
    pub fn on_tick(&mut self) {
        let now = self.clock.now();
        let events = self.session.tick(now);
        self.settle(events);
    }

    /// Apply side effects, then redraw.
    fn settle(&mut self, events: Vec<Event>) {
        let finished = self.apply(&events);
        self.events.extend(events);
        if finished {
            self.renderer.clear();
            self.renderer.message(COMPLETE_MESSAGE);
        } else {
            self.redraw();
        }
    }

    /// Returns whether a ritual was finalized.
    fn apply(&mut self, events: &[Event]) -> bool {
        let mut finished = false;
        for event in events {
            match event {
                Event::ActExpired { .. } if self.alerts => self.haptics.buzz(),
                Event::RitualFinalized { .. } => finished = true,
                _ => {}
            }
        }
        if events.iter().any(Event::needs_save) {
            self.save();
        }
        finished
    }

    fn save(&mut self) {
        if let Err(e) = self.store.save(self.session.catalog()) {
            warn!(error = %e, "failed to save rituals");
        }
    }

    fn redraw(&mut self) {
        let now = self.clock.now();
        if let Some(view) = self.session.view() {
            let frame = present(&view, &self.palette, &now);
            self.renderer.draw(&frame);
        }
    }

    /// Run until `Quit` or the sender side closes.
    ///
    /// The interval is reset whenever a ritual starts ticking so the first
    /// tick lands a full period after launch.
    ///
    /// A command that fails (an unknown ritual id, say) is reported on screen,
    /// then the device goes back to whatever it was showing.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Self {
        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.show_menu();

        loop {
            let was_ticking = self.session.is_ticking();
            tokio::select! {
                _ = interval.tick(), if was_ticking => self.on_tick(),
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    match self.dispatch(command) {
                        Ok(Flow::Stop) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => {
                            warn!(error = %e, "command failed");
                            self.renderer.message(&e.to_string());
                            if self.session.view().is_some() {
                                self.redraw();
                            } else {
                                self.show_menu();
                            }
                        }
                    }
                    if !was_ticking && self.session.is_ticking() {
                        interval.reset();
                    }
                }
            }
        }
        self
    }
}
