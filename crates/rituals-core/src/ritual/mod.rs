//! Ritual and act data model.
//!
//! Templates are what the user authors: a name plus an ordered list of
//! [`ActSpec`]s, where a spec is either a leaf act or a `next` reference to
//! another template. Launching a template produces a [`RitualInstance`] whose
//! acts are flattened [`ActRuntime`]s carrying their own timing fields.

mod catalog;
mod expand;

pub use catalog::RitualCatalog;
pub use expand::{expand, validate_catalog};

use serde::{Deserialize, Serialize};

/// One entry in a template's act list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActSpec {
    /// Splice in the acts of another template.
    Reference { next: String },
    Leaf(LeafAct),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafAct {
    pub name: String,
    /// Expected duration in seconds; 0 means untimed.
    #[serde(default)]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LeafAct {
    pub fn new(name: impl Into<String>, duration: u64) -> Self {
        Self {
            name: name.into(),
            duration,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitualTemplate {
    pub name: String,
    #[serde(default)]
    pub acts: Vec<ActSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActStatus {
    Active,
    Incomplete,
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RitualStatus {
    Active,
    Completed,
    /// Left via the hardware button; kept as-is, never resumed.
    Suspended,
}

/// Per-act timing, in whole seconds. Missing fields load as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActTime {
    #[serde(default)]
    pub actual: u64,
    #[serde(default)]
    pub expected: u64,
    #[serde(default)]
    pub paused: u64,
    /// Unix seconds of the first running tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActRuntime {
    pub name: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub time: ActTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActStatus>,
}

impl ActRuntime {
    pub fn from_leaf(leaf: &LeafAct) -> Self {
        Self {
            name: leaf.name.clone(),
            duration: leaf.duration,
            description: leaf.description.clone(),
            time: ActTime {
                expected: leaf.duration,
                ..ActTime::default()
            },
            status: None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.time.expected != 0
    }

    /// Whether accumulated time has reached the expected duration.
    pub fn is_expired(&self) -> bool {
        self.is_timed() && self.time.actual >= self.time.expected
    }
}

/// Ritual-level totals, maintained incrementally as acts tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitualTime {
    #[serde(default)]
    pub expected: u64,
    #[serde(default)]
    pub actual: u64,
    #[serde(default)]
    pub paused: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<i64>,
}

/// A live launch of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitualInstance {
    pub name: String,
    /// Id of the template this instance was launched from.
    pub template: String,
    pub acts: Vec<ActRuntime>,
    #[serde(default)]
    pub time: RitualTime,
    pub status: RitualStatus,
}

impl RitualInstance {
    /// Build an instance from an already-flattened act list.
    ///
    /// The ritual's expected total is fixed here and never recomputed.
    pub fn launch(
        template_id: &str,
        template: &RitualTemplate,
        acts: Vec<ActRuntime>,
        started: i64,
    ) -> Self {
        let expected = acts
            .iter()
            .filter(|act| act.duration > 0)
            .map(|act| act.time.expected)
            .sum();
        Self {
            name: template.name.clone(),
            template: template_id.to_string(),
            acts,
            time: RitualTime {
                expected,
                started: Some(started),
                ..RitualTime::default()
            },
            status: RitualStatus::Active,
        }
    }
}
