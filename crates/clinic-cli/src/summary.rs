use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::Value;

use clinic_export::ExportReceipt;
use clinic_model::{ExportFormat, Fidelity, display_text};
use clinic_report::{Grid, ViewSummary};

#[derive(Debug)]
pub struct ReportOutcome {
    pub title: String,
    pub summary: ViewSummary,
    pub grid: Grid,
    pub limit: usize,
    pub export: Option<ExportReceipt>,
}

pub fn print_report(outcome: &ReportOutcome) {
    println!("Report: {}", outcome.title);
    println!("{}", grid_table(&outcome.grid, outcome.limit));
    let shown = outcome.grid.len().min(outcome.limit);
    if shown < outcome.grid.len() {
        println!("(showing {shown} of {} rows)", outcome.grid.len());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Visible"), header_cell("Filters")]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(outcome.summary.total_rows),
        Cell::new(outcome.summary.visible_rows).add_attribute(Attribute::Bold),
        Cell::new(outcome.summary.active_filters),
    ]);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    println!("{table}");

    match &outcome.export {
        Some(receipt) => {
            println!("Export: {}", receipt.path.display());
            if receipt.via_fallback {
                println!("  (download directory unavailable; written to the scratch directory)");
            }
            if receipt.fidelity == Fidelity::Relabeled {
                println!(
                    "  note: {} export contains delimited text, not a native {} file",
                    receipt.format, receipt.format
                );
            }
        }
        None => println!("Export: skipped"),
    }
}

pub fn grid_table(grid: &Grid, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(grid.headers.iter().map(|header| header_cell(header)));
    apply_table_style(&mut table);
    for row in grid.rows.iter().take(limit) {
        table.add_row(row.iter().map(|cell| {
            if cell.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(cell)
            }
        }));
    }
    table
}

pub fn values_table(values: &[Value]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Value")]);
    apply_table_style(&mut table);
    for value in values {
        table.add_row(vec![Cell::new(display_text(value))]);
    }
    table
}

pub fn formats_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Format"),
        header_cell("Extension"),
        header_cell("MIME type"),
        header_cell("Content"),
    ]);
    apply_table_style(&mut table);
    for format in ExportFormat::ALL {
        let content = match (format, format.fidelity()) {
            (_, Fidelity::Native) => Cell::new("native"),
            (ExportFormat::Pdf, Fidelity::Relabeled) => {
                Cell::new("tab-separated text").fg(Color::Yellow)
            }
            (_, Fidelity::Relabeled) => Cell::new("CSV text").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(format.as_str()),
            Cell::new(format.extension()),
            Cell::new(format.mime_type()),
            content,
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
