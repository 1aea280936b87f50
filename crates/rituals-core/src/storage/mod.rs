//! Persistence of the ritual catalog and application config.
//!
//! The template catalog is read from `rituals.json`; the full document with
//! launched instances is written to `rituals_data.json`, replacing the
//! previous one.

mod config;

pub use config::{Config, DisplayConfig, StorageConfig, TimerConfig};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::ritual::RitualCatalog;

/// Returns `~/.config/rituals[-dev]/` based on RITUALS_ENV.
///
/// Set RITUALS_ENV=dev to use the development data directory, or
/// RITUALS_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var("RITUALS_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RITUALS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rituals-dev")
            } else {
                base_dir.join("rituals")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Load/save boundary for the catalog.
pub trait RitualStore: Send {
    /// The catalog to start a device with. Absent storage is an empty catalog.
    fn load(&self) -> Result<RitualCatalog>;

    /// Replace the persisted document with `catalog`.
    fn save(&mut self, catalog: &RitualCatalog) -> Result<()>;
}

/// JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonStore {
    rituals_path: PathBuf,
    data_path: PathBuf,
}

impl JsonStore {
    /// Open the store in the data directory using the configured file names.
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::in_dir(&data_dir()?, config))
    }

    pub fn in_dir(dir: &Path, config: &Config) -> Self {
        Self::with_paths(
            dir.join(&config.storage.rituals_file),
            dir.join(&config.storage.data_file),
        )
    }

    pub fn with_paths(rituals_path: PathBuf, data_path: PathBuf) -> Self {
        Self {
            rituals_path,
            data_path,
        }
    }

    pub fn rituals_path(&self) -> &Path {
        &self.rituals_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// The last document written by [`RitualStore::save`].
    pub fn load_saved(&self) -> Result<RitualCatalog> {
        read_catalog(&self.data_path)
    }

    /// Write the sample catalog unless a ritual file already exists.
    ///
    /// Returns whether anything was written.
    pub fn write_sample(&self, force: bool) -> Result<bool> {
        if self.rituals_path.exists() && !force {
            return Ok(false);
        }
        write_atomic(&self.rituals_path, SAMPLE_CATALOG)?;
        Ok(true)
    }
}

impl RitualStore for JsonStore {
    fn load(&self) -> Result<RitualCatalog> {
        read_catalog(&self.rituals_path)
    }

    fn save(&mut self, catalog: &RitualCatalog) -> Result<()> {
        let content = serde_json::to_string_pretty(catalog)?;
        write_atomic(&self.data_path, &content)?;
        debug!(path = %self.data_path.display(), "catalog saved");
        Ok(())
    }
}

fn read_catalog(path: &Path) -> Result<RitualCatalog> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(RitualCatalog::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RitualCatalog::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write through a sibling temp file and rename, so readers never see a
/// half-written document.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// In-memory store. Clones share the same saved history.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    initial: RitualCatalog,
    saves: Arc<Mutex<Vec<RitualCatalog>>>,
}

impl MemoryStore {
    pub fn new(initial: RitualCatalog) -> Self {
        Self {
            initial,
            saves: Arc::default(),
        }
    }

    /// Every catalog passed to `save`, oldest first.
    pub fn saves(&self) -> Vec<RitualCatalog> {
        match self.saves.lock() {
            Ok(saves) => saves.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last_saved(&self) -> Option<RitualCatalog> {
        self.saves().pop()
    }
}

impl RitualStore for MemoryStore {
    fn load(&self) -> Result<RitualCatalog> {
        Ok(self.initial.clone())
    }

    fn save(&mut self, catalog: &RitualCatalog) -> Result<()> {
        match self.saves.lock() {
            Ok(mut saves) => saves.push(catalog.clone()),
            Err(poisoned) => poisoned.into_inner().push(catalog.clone()),
        }
        Ok(())
    }
}

/// Starter catalog written by `ritual init`.
pub const SAMPLE_CATALOG: &str = indoc::indoc! {r#"
    {
      "tea": {
        "name": "Tea",
        "acts": [
          { "name": "Boil water", "duration": 180 },
          { "name": "Steep", "duration": 240, "description": "Lid on, no peeking" }
        ]
      },
      "morning": {
        "name": "Morning",
        "acts": [
          { "name": "Wake up", "description": "Feet on the floor" },
          { "name": "Stretch", "duration": 300 },
          { "next": "tea" },
          { "name": "Journal", "duration": 600 }
        ]
      },
      "evening": {
        "name": "Evening",
        "acts": [
          { "name": "Tidy desk", "duration": 300 },
          { "name": "Plan tomorrow", "duration": 600 },
          { "name": "Read", "duration": 1200 }
        ]
      }
    }
"#};
