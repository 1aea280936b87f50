//! The running-ritual context.
//!
//! A [`Session`] owns the catalog, the focused instance and act index, and
//! the act timer. Every mutation goes through `&mut Session`, so a single
//! owner (the device runtime) serialises ticks, gestures and button presses.
//!
//! ## Lifecycle
//!
//! ```text
//! menu -> launch -> ticking (acts advance via swipes) -> finalized -> menu
//!                       \-- button --> suspended -> menu
//! ```

mod navigation;

use chrono::{DateTime, Local};
use tracing::info;

use crate::display::{fit_title, BitmapFonts, FittedTitle, Font, FontMetrics, Menu};
use crate::error::Result;
use crate::events::Event;
use crate::ritual::{expand, ActRuntime, RitualCatalog, RitualInstance, RitualStatus};
use crate::timer::ActTimer;

/// Display properties the session needs when it re-focuses an act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Screen width in pixels.
    pub width: u32,
    pub large_titles: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            width: 176,
            large_titles: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Focus {
    instance_id: String,
    index: usize,
    title: FittedTitle,
}

/// Read-only view of the focused act for presentation.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub instance_id: &'a str,
    pub instance: &'a RitualInstance,
    pub index: usize,
    pub act: &'a ActRuntime,
    pub timer: &'a ActTimer,
    pub title: &'a FittedTitle,
}

pub struct Session {
    catalog: RitualCatalog,
    focus: Option<Focus>,
    timer: ActTimer,
    ticking: bool,
    settings: SessionSettings,
    metrics: Box<dyn FontMetrics + Send + Sync>,
}

impl Session {
    pub fn new(catalog: RitualCatalog, settings: SessionSettings) -> Self {
        Self {
            catalog,
            focus: None,
            timer: ActTimer::new(),
            ticking: false,
            settings,
            metrics: Box::new(BitmapFonts),
        }
    }

    pub fn with_metrics(mut self, metrics: impl FontMetrics + Send + Sync + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn catalog(&self) -> &RitualCatalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> RitualCatalog {
        self.catalog
    }

    /// Whether the periodic tick should be delivered.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn timer(&self) -> &ActTimer {
        &self.timer
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.focus.as_ref().map(|f| f.instance_id.as_str())
    }

    pub fn index(&self) -> Option<usize> {
        self.focus.as_ref().map(|f| f.index)
    }

    pub fn view(&self) -> Option<SessionView<'_>> {
        let focus = self.focus.as_ref()?;
        let instance = self.catalog.instance(&focus.instance_id)?;
        let act = instance.acts.get(focus.index)?;
        Some(SessionView {
            instance_id: &focus.instance_id,
            instance,
            index: focus.index,
            act,
            timer: &self.timer,
            title: &focus.title,
        })
    }

    /// The launch menu: a title entry plus one entry per template.
    pub fn menu(&self) -> Menu {
        Menu::from_catalog(&self.catalog)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Launch a fresh instance of `template_id` and focus its first act.
    ///
    /// Any ritual still in focus is suspended first. The first second is
    /// counted immediately.
    ///
    /// # Errors
    /// Fails when the template is unknown or cannot be expanded. The focused
    /// ritual is left running in that case.
    pub fn launch(&mut self, template_id: &str, now: DateTime<Local>) -> Result<Vec<Event>> {
        expand(template_id, &self.catalog)?;
        let mut events = self.suspend(now);
        let instance_id = self.catalog.launch(template_id, now.timestamp())?;
        if let Some(instance) = self.catalog.instance(&instance_id) {
            info!(%instance_id, acts = instance.acts.len(), expected = instance.time.expected, "ritual launched");
            events.push(Event::RitualLaunched {
                instance_id: instance_id.clone(),
                template_id: template_id.to_string(),
                act_count: instance.acts.len(),
                expected_secs: instance.time.expected,
                at: now,
            });
        }
        self.focus = Some(Focus {
            instance_id,
            index: 0,
            title: FittedTitle {
                font: Font::Huge,
                text: String::new(),
            },
        });
        self.ticking = true;
        events.extend(self.refocus(now));
        events.extend(self.tick(now));
        Ok(events)
    }

    /// One second of wall-clock time for the focused act.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<Event> {
        if !self.ticking {
            return Vec::new();
        }
        let Some(focus) = self.focus.as_ref() else {
            return Vec::new();
        };
        let Some(instance) = self.catalog.instance_mut(&focus.instance_id) else {
            return Vec::new();
        };
        self.timer.tick(instance, focus.index, now)
    }

    /// Leave the focused ritual without finishing it.
    ///
    /// The instance keeps its accumulated time and is marked suspended; it is
    /// not re-entered afterwards.
    pub fn suspend(&mut self, now: DateTime<Local>) -> Vec<Event> {
        self.ticking = false;
        let Some(focus) = self.focus.take() else {
            return Vec::new();
        };
        if let Some(instance) = self.catalog.instance_mut(&focus.instance_id) {
            instance.status = RitualStatus::Suspended;
        }
        info!(instance_id = %focus.instance_id, index = focus.index, "ritual suspended");
        vec![Event::RitualSuspended {
            instance_id: focus.instance_id,
            at: now,
        }]
    }

    /// Re-derive per-act display state after focus moved, or finalize when
    /// focus ran off the end.
    fn refocus(&mut self, now: DateTime<Local>) -> Vec<Event> {
        let Some(focus) = self.focus.as_mut() else {
            return Vec::new();
        };
        let Some(instance) = self.catalog.instance_mut(&focus.instance_id) else {
            return Vec::new();
        };
        let finished = match instance.acts.get(focus.index) {
            Some(act) => {
                self.timer.focus(act);
                focus.title = fit_title(
                    self.metrics.as_ref(),
                    &act.name,
                    self.settings.width,
                    self.settings.large_titles,
                );
                instance.status = RitualStatus::Active;
                false
            }
            None => true,
        };
        if finished {
            self.finalize(now)
        } else {
            Vec::new()
        }
    }

    fn finalize(&mut self, now: DateTime<Local>) -> Vec<Event> {
        self.ticking = false;
        let Some(focus) = self.focus.take() else {
            return Vec::new();
        };
        let Some(instance) = self.catalog.instance_mut(&focus.instance_id) else {
            return Vec::new();
        };
        instance.status = RitualStatus::Completed;
        info!(
            instance_id = %focus.instance_id,
            actual = instance.time.actual,
            paused = instance.time.paused,
            "ritual complete"
        );
        vec![Event::RitualFinalized {
            instance_id: focus.instance_id,
            actual_secs: instance.time.actual,
            paused_secs: instance.time.paused,
            at: now,
        }]
    }
}
