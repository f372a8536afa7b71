//! Persisted application settings.
//!
//! Holds the one durable user preference the conversion pipeline needs: the
//! maximum number of concurrent encode jobs. The store handle is constructed
//! explicitly at startup (`SettingsStore::open`) and flushed explicitly at
//! shutdown; there is no lazily created global. An interior mutex serializes
//! overlapping reads and writes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_MAX_CONCURRENCY: usize = 2;

/// The worker pool's live concurrency setting, as seen by the settings layer.
/// Implementations must tolerate overlapping calls.
pub trait ConcurrencyBackend {
    fn max_concurrency(&self) -> usize;
    fn set_max_concurrency(&self, value: usize);
}

#[derive(Debug, Error)]
pub enum SettingsError {
    /// Rejected before any I/O is attempted.
    #[error("max concurrency must be a positive integer (got {0})")]
    InvalidConcurrency(i64),

    #[error("settings storage failed: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSettings {
    #[serde(default = "default_max_concurrency")]
    max_concurrency: u32,
}

fn default_max_concurrency() -> u32 {
    DEFAULT_MAX_CONCURRENCY as u32
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Durable key-value settings, persisted as TOML at a fixed path.
pub struct SettingsStore {
    path: PathBuf,
    state: Mutex<PersistedSettings>,
}

impl SettingsStore {
    /// Default settings file location under the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("ffnorm")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("ffnorm")
        };

        Ok(config_dir.join("settings.toml"))
    }

    /// Create a store handle for `path`. Does not touch the filesystem;
    /// hydration happens in [`load_initial_max_concurrency`].
    ///
    /// [`load_initial_max_concurrency`]: SettingsStore::load_initial_max_concurrency
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(PersistedSettings::default()),
        }
    }

    /// Read the persisted max-concurrency preference, push it to the backend,
    /// and return it.
    ///
    /// A missing file means first launch and yields the default. Any storage
    /// failure (unreadable file, parse error) is logged and masked by falling
    /// back to the backend's current value, which stays authoritative.
    pub fn load_initial_max_concurrency(&self, backend: &dyn ConcurrencyBackend) -> usize {
        match self.read_from_disk() {
            Ok(settings) => {
                let stored = settings.max_concurrency;
                if stored > 0 {
                    *self.state.lock().unwrap() = settings;
                    backend.set_max_concurrency(stored as usize);
                    return stored as usize;
                }
                backend.max_concurrency()
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %format!("{:#}", err),
                    "failed to hydrate stored max concurrency"
                );
                backend.max_concurrency()
            }
        }
    }

    /// Update the backend's concurrency setting and durably persist it.
    ///
    /// Non-positive values are rejected before the backend or the filesystem
    /// is touched.
    pub fn persist_max_concurrency(
        &self,
        backend: &dyn ConcurrencyBackend,
        value: i64,
    ) -> std::result::Result<(), SettingsError> {
        if value <= 0 {
            return Err(SettingsError::InvalidConcurrency(value));
        }

        backend.set_max_concurrency(value as usize);

        let mut state = self.state.lock().unwrap();
        state.max_concurrency = value as u32;
        write_settings(&self.path, &state)?;
        Ok(())
    }

    /// Write the current in-memory state back to disk. Call on shutdown.
    pub fn flush(&self) -> Result<()> {
        let state = self.state.lock().unwrap();
        write_settings(&self.path, &state)
    }

    fn read_from_disk(&self) -> Result<PersistedSettings> {
        if !self.path.exists() {
            return Ok(PersistedSettings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;

        let settings: PersistedSettings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", self.path.display()))?;

        Ok(settings)
    }
}

fn write_settings(path: &Path, settings: &PersistedSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory: {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, contents)
        .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

    Ok(())
}
