use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::SettingsError;

const DEFAULT_INDENT_WIDTH: usize = 2;
const MAX_INDENT_WIDTH: usize = 16;
const DEFAULT_EXPANDED_ICON: &str = "▾";
const DEFAULT_COLLAPSED_ICON: &str = "▸";

/// Typed settings payload used for persistence and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub(crate) struct SettingsData {
    table: TableSettingsData,
    tree: TreeSettingsData,
}

/// Table rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TableSettingsData {
    indent_width: usize,
    expanded_icon: String,
    collapsed_icon: String,
    show_ids: bool,
}

impl Default for TableSettingsData {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            expanded_icon: String::from(DEFAULT_EXPANDED_ICON),
            collapsed_icon: String::from(DEFAULT_COLLAPSED_ICON),
            show_ids: true,
        }
    }
}

/// Initial tree state settings.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub(crate) struct TreeSettingsData {
    expand_all: bool,
}

impl SettingsData {
    /// Spaces per tree level.
    pub(crate) fn indent_width(&self) -> usize {
        self.table.indent_width
    }

    pub(crate) fn set_indent_width(&mut self, value: usize) {
        self.table.indent_width = value.min(MAX_INDENT_WIDTH);
    }

    pub(crate) fn expanded_icon(&self) -> &str {
        &self.table.expanded_icon
    }

    pub(crate) fn collapsed_icon(&self) -> &str {
        &self.table.collapsed_icon
    }

    /// Whether rows end with their record id.
    pub(crate) fn show_ids(&self) -> bool {
        self.table.show_ids
    }

    /// Whether every branch starts expanded.
    pub(crate) fn expand_all(&self) -> bool {
        self.tree.expand_all
    }

    pub(crate) fn set_expand_all(&mut self, value: bool) {
        self.tree.expand_all = value;
    }

    /// Read settings field by field, keeping defaults for anything missing
    /// or malformed.
    pub(crate) fn from_json(value: &Value) -> Self {
        let mut settings = SettingsData::default();

        if let Some(table) = value.get("table") {
            if let Some(width) = read_usize_field(table, "indent_width") {
                settings.set_indent_width(width);
            }

            if let Some(icon) = read_icon_field(table, "expanded_icon") {
                settings.table.expanded_icon = icon;
            }

            if let Some(icon) = read_icon_field(table, "collapsed_icon") {
                settings.table.collapsed_icon = icon;
            }

            if let Some(show_ids) = read_bool_field(table, "show_ids") {
                settings.table.show_ids = show_ids;
            }
        }

        if let Some(tree) = value.get("tree") {
            if let Some(expand_all) = read_bool_field(tree, "expand_all") {
                settings.tree.expand_all = expand_all;
            }
        }

        settings
    }

    /// Read settings from `path`.
    ///
    /// A missing file gives the defaults. So does a file that is not JSON,
    /// after a warning.
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let payload = match fs::read_to_string(path) {
            Ok(payload) => payload,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                log::debug!(
                    "no settings at {}, using defaults",
                    path.display()
                );
                return Ok(Self::default());
            },
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            },
        };

        match serde_json::from_str::<Value>(&payload) {
            Ok(value) => {
                log::debug!("settings loaded from {}", path.display());
                Ok(Self::from_json(&value))
            },
            Err(err) => {
                log::warn!(
                    "ignoring invalid settings in {}: {err}",
                    path.display()
                );
                Ok(Self::default())
            },
        }
    }

    /// Write the settings as pretty JSON, creating missing directories.
    pub(crate) fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let payload = serde_json::to_string_pretty(self)?;
        path.parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::write(path, payload))
            .map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn read_usize_field(value: &Value, key: &str) -> Option<usize> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|number| usize::try_from(number).ok())
}

fn read_bool_field(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

fn read_icon_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|icon| !icon.trim().is_empty())
        .map(ToString::to_string)
}
