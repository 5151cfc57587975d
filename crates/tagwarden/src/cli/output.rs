//! Output formatting utilities for CLI commands
//!
//! Provides consistent formatting for:
//! - Tables with column alignment
//! - Costs, tag maps and compliance cells
//! - JSON output

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use rust_decimal::Decimal;
use serde::Serialize;
use tagwarden_protocol::{Tags, COVERAGE_DISPLAY_CAP};

/// Format a monthly cost, e.g. `$892.30`
pub fn format_cost(cost: Decimal) -> String {
    format!("${:.2}", cost)
}

/// Format a tag map as `Key=Value` pairs in taxonomy order
pub fn format_tags(tags: &Tags) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    tags.iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coverage as `n/5`, colored by how close it is to full
pub fn coverage_cell(coverage: usize) -> (String, Option<Color>) {
    let color = if coverage >= COVERAGE_DISPLAY_CAP {
        Color::Green
    } else if coverage >= 3 {
        Color::Yellow
    } else {
        Color::Red
    };
    (format!("{}/{}", coverage, COVERAGE_DISPLAY_CAP), Some(color))
}

pub fn compliance_cell(is_compliant: bool) -> (String, Option<Color>) {
    if is_compliant {
        ("yes".to_string(), Some(Color::Green))
    } else {
        ("no".to_string(), Some(Color::Red))
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{}", table);
}

/// Print a table with custom column colors
pub fn print_table_colored(headers: &[&str], rows: Vec<Vec<(String, Option<Color>)>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let cells: Vec<Cell> = row
            .into_iter()
            .map(|(text, color)| {
                let cell = Cell::new(text);
                if let Some(c) = color {
                    cell.fg(c)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    println!("{}", table);
}
