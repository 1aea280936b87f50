//! # Rituals Core Library
//!
//! Core logic for a wearable ritual timer. A ritual is an ordered list of
//! acts, each optionally timed; the user launches one from a menu and walks
//! through it with swipes while a once-per-second tick accumulates time.
//!
//! ## Architecture
//!
//! - **Ritual model**: templates, launched instances and reference expansion
//! - **Timer**: per-act countdown, pause and expiry accounting
//! - **Session**: focus, navigation and lifecycle of the running ritual
//! - **Display**: pure derivation of what the screen shows
//! - **Runtime**: the single-writer device loop that ties them together
//! - **Storage**: JSON catalog files and TOML configuration
//!
//! ## Key Components
//!
//! - [`Session`]: the running-ritual state machine
//! - [`Device`]: tick and input loop around a session
//! - [`RitualCatalog`]: templates and instances keyed by id
//! - [`Config`]: application configuration management

pub mod display;
pub mod error;
pub mod events;
pub mod format;
pub mod input;
pub mod ritual;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod timer;

pub use display::{present, Frame, Menu, Palette};
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use input::{DragEvent, DragTracker, Swipe};
pub use ritual::{expand, validate_catalog, RitualCatalog, RitualInstance, RitualTemplate};
pub use runtime::{Command, Device, Flow, Haptics, Renderer};
pub use session::{Session, SessionSettings, SessionView};
pub use storage::{Config, JsonStore, MemoryStore, RitualStore};
pub use timer::{ActTimer, Clock, ManualClock, SystemClock};
