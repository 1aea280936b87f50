use chrono::{DateTime, Local};
use tracing::debug;

use super::Session;
use crate::events::Event;
use crate::input::Swipe;
use crate::ritual::ActStatus;

impl Session {
    /// Apply a classified swipe to the focused ritual.
    ///
    /// - right: back to the previous act (no-op on the first act)
    /// - left: complete the act and move on, finalizing past the last one
    /// - up: skip, moving the act to the end of the list
    /// - down: describe the act without changing anything
    pub fn swipe(&mut self, swipe: Swipe, now: DateTime<Local>) -> Vec<Event> {
        let Some(focus) = self.focus.as_mut() else {
            debug!(?swipe, "swipe ignored: no ritual in focus");
            return Vec::new();
        };
        let Some(instance) = self.catalog.instance_mut(&focus.instance_id) else {
            return Vec::new();
        };
        let index = focus.index;
        let Some(act) = instance.acts.get_mut(index) else {
            return Vec::new();
        };
        debug!(?swipe, index, act = %act.name, "swipe");

        let status = match swipe {
            Swipe::Right if index == 0 => return Vec::new(),
            Swipe::Right => ActStatus::Incomplete,
            Swipe::Left => ActStatus::Completed,
            Swipe::Up => ActStatus::Skipped,
            Swipe::Down => {
                return vec![Event::ActDescribed {
                    index,
                    name: act.name.clone(),
                    description: act.description.clone(),
                }];
            }
        };
        act.status = Some(status);
        let mut events = vec![Event::ActMarked {
            index,
            name: act.name.clone(),
            status,
            at: now,
        }];

        match swipe {
            Swipe::Right => focus.index -= 1,
            Swipe::Left => focus.index += 1,
            Swipe::Up => {
                let skipped = instance.acts.remove(index);
                instance.acts.push(skipped);
            }
            Swipe::Down => {}
        }

        events.extend(self.refocus(now));
        events
    }

    /// The on-screen pause/play control.
    ///
    /// Pausing marks the act incomplete and resuming marks it active again;
    /// the tick keeps running either way so paused time accumulates.
    pub fn toggle_pause(&mut self, now: DateTime<Local>) -> Vec<Event> {
        let Some(focus) = self.focus.as_ref() else {
            return Vec::new();
        };
        let index = focus.index;
        let Some(act) = self
            .catalog
            .instance_mut(&focus.instance_id)
            .and_then(|instance| instance.acts.get_mut(index))
        else {
            return Vec::new();
        };

        if self.timer.is_paused() {
            self.timer.resume();
            act.status = Some(ActStatus::Active);
            debug!(index, "resumed");
            vec![Event::Resumed { index, at: now }]
        } else {
            self.timer.pause();
            act.status = Some(ActStatus::Incomplete);
            debug!(index, "paused");
            vec![Event::Paused { index, at: now }]
        }
    }
}
