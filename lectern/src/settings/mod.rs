//! Per-user table settings stored as JSON.

mod model;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub(crate) use model::SettingsData;

/// Environment variable naming an alternative settings file.
pub(crate) const CONFIG_ENV: &str = "LECTERN_CONFIG";

const APP_DIR: &str = "lectern";
const FILE_NAME: &str = "settings.json";

/// Errors emitted while reading or writing the settings file.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write settings to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Settings file to use.
///
/// Resolution order: `explicit` (the `--config` flag), `$LECTERN_CONFIG`,
/// `$XDG_CONFIG_HOME/lectern/settings.json`, then
/// `~/.config/lectern/settings.json`.
pub(crate) fn settings_path(explicit: Option<&Path>) -> PathBuf {
    locate(explicit, |key| std::env::var_os(key))
}

fn locate(
    explicit: Option<&Path>,
    var: impl Fn(&str) -> Option<OsString>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let non_empty = |key: &str| var(key).filter(|value| !value.is_empty());
    if let Some(path) = non_empty(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    let config_dir = non_empty("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            non_empty("HOME").map(|home| PathBuf::from(home).join(".config"))
        })
        .unwrap_or_else(std::env::temp_dir);
    config_dir.join(APP_DIR).join(FILE_NAME)
}
