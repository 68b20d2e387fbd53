//! Sample-output table for logs

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::flatten::FlatTable;
use crate::schema;

/// Rows shown in the preview
pub const PREVIEW_ROWS: usize = 10;

/// Max characters per text cell before truncation
pub const PREVIEW_COL_WIDTH: usize = 20;

/// Cut to `max` characters, appending `...` when something was dropped
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn opt_cell(value: Option<i64>) -> Cell {
    Cell::new(value.map_or_else(String::new, |v| v.to_string()))
}

/// Render the first `max_rows` rows with text cells cut to `max_width` chars
pub fn format_preview(table: &FlatTable, max_rows: usize, max_width: usize) -> String {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(
            schema::flat()
                .fields()
                .iter()
                .map(|f| Cell::new(f.name()).fg(Color::Cyan)),
        );

    for record in table.records.iter().take(max_rows) {
        let mut row = vec![
            opt_cell(record.id),
            Cell::new(truncate(record.name.as_deref().unwrap_or_default(), max_width)),
            Cell::new(truncate(&record.description, max_width)),
        ];
        row.extend(record.counts.iter().copied().map(opt_cell));
        out.add_row(row);
    }
    out.to_string()
}
