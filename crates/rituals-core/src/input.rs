//! Touchscreen drag handling.
//!
//! The device reports a stream of `{x, y, b}` samples while a finger is on the
//! screen. The first sample anchors the drag and the first sample with `b`
//! released ends it; only the net displacement between the two matters.

use serde::{Deserialize, Serialize};

/// Displacement a swipe needs over the cross axis before it registers.
pub const DEFAULT_SWIPE_THRESHOLD: i32 = 10;

/// One raw drag sample. Screen coordinates grow right and down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    pub x: i32,
    pub y: i32,
    /// Whether the finger is still down.
    pub b: bool,
}

impl DragEvent {
    pub fn new(x: i32, y: i32, b: bool) -> Self {
        Self { x, y, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Swipe {
    /// Finger moved left: next act.
    Left,
    /// Finger moved right: previous act.
    Right,
    /// Finger moved up: skip.
    Up,
    /// Finger moved down: describe.
    Down,
}

/// Classify a finished drag. Diagonal-ish drags return `None`.
pub fn classify(dx: i32, dy: i32, threshold: i32) -> Option<Swipe> {
    if dx.abs() > dy.abs() + threshold {
        Some(if dx > 0 { Swipe::Right } else { Swipe::Left })
    } else if dy.abs() > dx.abs() + threshold {
        Some(if dy > 0 { Swipe::Down } else { Swipe::Up })
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    start: Option<(i32, i32)>,
    threshold: i32,
}

impl DragTracker {
    pub fn new(threshold: i32) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    /// Feed one sample; returns a swipe when this sample ends a drag.
    pub fn feed(&mut self, event: DragEvent) -> Option<Swipe> {
        match self.start {
            None => {
                self.start = Some((event.x, event.y));
                None
            }
            Some(_) if event.b => None,
            Some((x0, y0)) => {
                self.start = None;
                classify(event.x - x0, event.y - y0, self.threshold)
            }
        }
    }
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}
