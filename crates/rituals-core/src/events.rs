use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::ritual::ActStatus;

/// Every state change in a session produces an Event.
/// The device runtime turns them into side effects (buzz, save, menu).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RitualLaunched {
        instance_id: String,
        template_id: String,
        act_count: usize,
        expected_secs: u64,
        at: DateTime<Local>,
    },
    /// First running tick of an act.
    ActStarted {
        index: usize,
        name: String,
        at: DateTime<Local>,
    },
    /// Actual time just reached expected time. Fired once per act.
    ActExpired {
        index: usize,
        name: String,
        expected_secs: u64,
        at: DateTime<Local>,
    },
    /// The focused act was marked by a swipe and focus moved on (for skips,
    /// the next act slid into place).
    ActMarked {
        index: usize,
        name: String,
        status: ActStatus,
        at: DateTime<Local>,
    },
    ActDescribed {
        index: usize,
        name: String,
        description: Option<String>,
    },
    Paused {
        index: usize,
        at: DateTime<Local>,
    },
    Resumed {
        index: usize,
        at: DateTime<Local>,
    },
    /// Focus ran past the last act.
    RitualFinalized {
        instance_id: String,
        actual_secs: u64,
        paused_secs: u64,
        at: DateTime<Local>,
    },
    /// The hardware button returned to the menu mid-ritual.
    RitualSuspended {
        instance_id: String,
        at: DateTime<Local>,
    },
}

impl Event {
    /// Whether the catalog must be written back after this event.
    pub fn needs_save(&self) -> bool {
        matches!(
            self,
            Event::RitualFinalized { .. } | Event::RitualSuspended { .. }
        )
    }
}
