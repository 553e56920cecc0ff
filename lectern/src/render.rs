use lectern_tree::{ExpandState, FlatRow, MenuRecord};

use crate::settings::SettingsData;

const UNTITLED: &str = "(untitled)";

/// Render visible rows as indented text lines.
pub(crate) fn render_rows(
    rows: &[FlatRow<'_, MenuRecord>],
    settings: &SettingsData,
) -> Vec<String> {
    rows.iter().map(|row| render_row(row, settings)).collect()
}

fn render_row(
    row: &FlatRow<'_, MenuRecord>,
    settings: &SettingsData,
) -> String {
    let indent = " ".repeat(row.level * settings.indent_width());
    let icon = icon_for(row.state, settings);
    let title = row.record().title().unwrap_or(UNTITLED);

    let mut line = format!("{indent}{icon} {title}");
    if settings.show_ids() {
        line.push_str(&format!(" (#{})", row.id()));
    }
    line
}

// Non-expandable rows get blank padding of the icon's width so titles line
// up with their siblings.
fn icon_for(state: ExpandState, settings: &SettingsData) -> String {
    match state {
        ExpandState::Expanded => settings.expanded_icon().to_owned(),
        ExpandState::Collapsed => settings.collapsed_icon().to_owned(),
        ExpandState::NonExpandable => {
            let width = settings
                .expanded_icon()
                .chars()
                .count()
                .max(settings.collapsed_icon().chars().count());
            " ".repeat(width)
        },
    }
}
