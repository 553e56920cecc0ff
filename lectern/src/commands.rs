use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lectern_access::{PermissionSet, menu_perms, visible_menus};
use lectern_tree::{MenuRecord, RecordId, TreeTable, validate};

use crate::records::load_records;
use crate::render::render_rows;
use crate::settings::SettingsData;

/// Options of the `show` command.
#[derive(Debug, Default)]
pub(crate) struct ShowOptions {
    pub(crate) expand: Vec<RecordId>,
    pub(crate) reveal: Vec<RecordId>,
    pub(crate) expand_all: bool,
    pub(crate) grants: Vec<String>,
    pub(crate) grants_file: Option<PathBuf>,
    pub(crate) json: bool,
}

/// Print the visible rows, or the nested tree as JSON.
///
/// Returns the number of integrity violations in the unfiltered records.
pub(crate) fn show(
    source: &Path,
    options: &ShowOptions,
    settings: &SettingsData,
    out: &mut impl Write,
) -> Result<usize> {
    let records = load_records(source)
        .with_context(|| format!("failed to load {}", source.display()))?;
    let violations = validate(&records);
    if !violations.is_empty() {
        let count = violations.len();
        log::info!("{count} integrity violation(s), run `check` for details");
    }

    let records = match load_grants(options)? {
        Some(grants) => apply_grants(records, &grants),
        None => records,
    };
    let table = build_table(records, options, settings);

    if options.json {
        let value = table.forest().to_json()?;
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(violations.len());
    }

    for line in render_rows(&table.rows(), settings) {
        writeln!(out, "{line}")?;
    }
    Ok(violations.len())
}

/// Report integrity problems; returns whether the records are clean.
pub(crate) fn check(source: &Path, out: &mut impl Write) -> Result<bool> {
    let records = load_records(source)
        .with_context(|| format!("failed to load {}", source.display()))?;
    let violations = validate(&records);

    if violations.is_empty() {
        writeln!(out, "{} records, hierarchy is consistent", records.len())?;
        return Ok(true);
    }

    for violation in &violations {
        writeln!(out, "{violation}")?;
    }
    writeln!(
        out,
        "{} records, {} violation(s)",
        records.len(),
        violations.len()
    )?;
    Ok(false)
}

/// Print effective settings, optionally writing them to the settings file.
pub(crate) fn config(
    target: &Path,
    settings: &SettingsData,
    write: bool,
    out: &mut impl Write,
) -> Result<()> {
    if write {
        settings.save(target)?;
        log::info!("settings written to {}", target.display());
    }

    writeln!(out, "# {}", target.display())?;
    writeln!(out, "{}", serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

fn load_grants(options: &ShowOptions) -> Result<Option<PermissionSet>> {
    let mut grants = options.grants.clone();
    if let Some(path) = &options.grants_file {
        let payload = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let from_file = PermissionSet::from_json(&payload)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        grants.extend(from_file.grants().iter().cloned());
    }

    if grants.is_empty() {
        return Ok(None);
    }
    Ok(Some(PermissionSet::new(grants)))
}

// Pruning goes through the tree so a denied menu hides its descendants.
fn apply_grants(
    records: Vec<MenuRecord>,
    grants: &PermissionSet,
) -> Vec<MenuRecord> {
    let forest = lectern_tree::build_tree(records);
    visible_menus(forest, grants, menu_perms).into_records()
}

fn build_table(
    records: Vec<MenuRecord>,
    options: &ShowOptions,
    settings: &SettingsData,
) -> TreeTable<MenuRecord> {
    let mut table = TreeTable::new(records);
    if options.expand_all || settings.expand_all() {
        table.expand_all();
    }
    for id in &options.reveal {
        if !table.reveal(*id) {
            log::warn!("cannot reveal unknown row {id}");
        }
    }
    for id in &options.expand {
        let state = table.toggle(*id);
        log::debug!("row {id} is now {state:?}");
    }
    table
}
