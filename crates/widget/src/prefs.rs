//! Persistent widget state.
//!
//! The balance-visibility flag is the only per-device preference the widget
//! keeps. It lives here, never in the product store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PREFS_PATH_ENV: &str = "STOCKWIDGET_PREFS_PATH";
pub const PREFS_FILE: &str = "widget_prefs.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    /// Balance starts masked until the user reveals it.
    #[serde(default)]
    pub balance_visible: bool,
}

impl WidgetState {
    pub fn toggled(self) -> Self {
        Self {
            balance_visible: !self.balance_visible,
        }
    }
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to access widget prefs at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("widget prefs at {path} are not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("widget prefs lock poisoned")]
    Poisoned,
}

/// Load/save seam for [`WidgetState`].
pub trait WidgetPrefs: Send + Sync {
    fn load(&self) -> Result<WidgetState, PrefsError>;
    fn save(&self, state: &WidgetState) -> Result<(), PrefsError>;
}

impl<P: WidgetPrefs + ?Sized> WidgetPrefs for std::sync::Arc<P> {
    fn load(&self) -> Result<WidgetState, PrefsError> {
        (**self).load()
    }

    fn save(&self, state: &WidgetState) -> Result<(), PrefsError> {
        (**self).save(state)
    }
}

/// Process-local prefs, for tests and hosts that persist state themselves.
#[derive(Debug, Default)]
pub struct InMemoryPrefs {
    state: Mutex<WidgetState>,
}

impl InMemoryPrefs {
    pub fn new(state: WidgetState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl WidgetPrefs for InMemoryPrefs {
    fn load(&self) -> Result<WidgetState, PrefsError> {
        self.state.lock().map(|s| *s).map_err(|_| PrefsError::Poisoned)
    }

    fn save(&self, state: &WidgetState) -> Result<(), PrefsError> {
        *self.state.lock().map_err(|_| PrefsError::Poisoned)? = *state;
        Ok(())
    }
}

/// Prefs stored as a small JSON document. A missing file reads as the
/// default (masked) state.
#[derive(Debug, Clone)]
pub struct JsonFilePrefs {
    path: PathBuf,
}

impl JsonFilePrefs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Prefs file beside the database, or in `data_dir` for in-memory stores.
    pub fn beside(data_dir: &Path) -> Self {
        Self::new(data_dir.join(PREFS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl WidgetPrefs for JsonFilePrefs {
    fn load(&self) -> Result<WidgetState, PrefsError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WidgetState::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&data).map_err(|source| PrefsError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, state: &WidgetState) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let data = serde_json::to_string_pretty(state).map_err(|source| PrefsError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, data).map_err(|e| self.io_error(e))
    }
}
