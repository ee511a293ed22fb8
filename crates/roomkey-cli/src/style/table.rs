//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::colors::SemanticStyle;

fn base_table() -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table
}

fn header_cell(text: &str) -> Cell {
    if super::no_color() {
        Cell::new(text)
    } else {
        Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
    }
}

/// Creates a styled table with a bold header row.
pub fn result_table(columns: &[&str], rows: &[Vec<String>]) -> Table {
    let mut table = base_table();
    table.set_header(columns.iter().map(|col| header_cell(col)).collect::<Vec<_>>());

    for row in rows {
        table.add_row(row);
    }

    table
}

/// Prints rows as a formatted table with a count footer.
pub fn print_result_table(columns: &[&str], rows: &[Vec<String>], noun: &str) {
    if rows.is_empty() {
        println!("{}", format!("(no {noun}s)").muted());
        return;
    }

    println!("{}", result_table(columns, rows));

    let count = rows.len();
    let word = if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    };
    println!("{}", format!("({count} {word})").muted());
}

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = base_table();

    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }

    table
}

/// Prints a key-value info table.
pub fn print_info_table(entries: &[(&str, String)]) {
    println!("{}", info_table(entries));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_table_contains_cells() {
        let rendered = result_table(
            &["#", "Rule"],
            &[vec!["1".to_string(), "admin-full-access".to_string()]],
        )
        .to_string();
        assert!(rendered.contains("Rule"));
        assert!(rendered.contains("admin-full-access"));
    }

    #[test]
    fn test_info_table_contains_pairs() {
        let rendered = info_table(&[("Log level", "warn".to_string())]).to_string();
        assert!(rendered.contains("Log level"));
        assert!(rendered.contains("warn"));
    }
}
