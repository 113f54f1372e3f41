use chrono::NaiveDate;
use clinic_export::{DirectorySink, FixedClock};
use clinic_filter::{FilterError, FilterTable};
use clinic_ingest::ReportDefinition;
use clinic_model::{ColumnDef, ExportFormat, FilterDescriptor, FilterPrefix, Row, ValueFormat};
use clinic_report::{ReportError, ReportView};
use insta::assert_snapshot;
use serde_json::{Value, json};

fn rows(values: Value) -> Vec<Row> {
    serde_json::from_value(values).expect("rows")
}

fn grn_rows() -> Vec<Row> {
    rows(json!([
        { "grnNo": "GRN-001", "branch": "A", "amount": 100, "vendor": { "name": "Medisource" }, "receivedOn": "2025-01-05" },
        { "grnNo": "GRN-002", "branch": "B", "amount": 50, "vendor": { "name": "PharmaLink" }, "receivedOn": "2025-01-18" },
        { "grnNo": "GRN-003", "branch": "A", "amount": 30, "vendor": { "name": "Medisource" }, "receivedOn": "2025-02-02" }
    ]))
}

fn grn_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("grnNo", "GRN No"),
        ColumnDef::new("vendor", "Vendor"),
        ColumnDef::new("amount", "Amount").with_format(ValueFormat::Currency),
    ]
}

fn grn_view() -> ReportView {
    let table = FilterTable::builder()
        .choice("branch")
        .field("vendor", "vendor.name", clinic_filter::FieldKind::Choice)
        .numeric("amount")
        .date("receivedOn")
        .build()
        .expect("table");
    ReportView::new(grn_rows(), grn_columns()).with_filter_table(table)
}

fn clock() -> FixedClock {
    let at = NaiveDate::from_ymd_opt(2025, 1, 27)
        .and_then(|date| date.and_hms_opt(14, 30, 0))
        .expect("valid instant");
    FixedClock(at)
}

#[test]
fn visible_rows_follow_filter_changes() {
    let mut view = grn_view();
    view.set_filter(FilterDescriptor::one_of("branch", ["A"]));
    assert_eq!(view.visible_rows().len(), 2);

    view.set_filter(FilterDescriptor::compare("amount", FilterPrefix::GreaterThan, 40));
    assert_eq!(view.visible_rows().len(), 1);

    view.remove_filter("amount");
    assert_eq!(view.visible_rows().len(), 2);

    view.clear_filters();
    assert_eq!(view.visible_rows(), grn_rows());
}

#[test]
fn declared_kinds_supply_default_prefixes() {
    let mut view = grn_view();
    view.set_filter(FilterDescriptor {
        field: "vendor".to_string(),
        prefix: None,
        value: clinic_model::FilterValue::List(vec![json!("PharmaLink")]),
    });
    let summary = view.summary();
    assert_eq!(summary.visible_rows, 1);
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.active_filters, 1);
}

#[test]
fn options_come_from_fetched_rows() {
    let mut view = grn_view();
    view.set_filter(FilterDescriptor::one_of("branch", ["B"]));
    assert_eq!(view.filter_options("branch"), vec![json!("A"), json!("B")]);
    assert_eq!(view.filter_options("vendor"), vec![json!("Medisource"), json!("PharmaLink")]);
    let all = view.all_filter_options();
    assert_eq!(all.keys().map(String::as_str).collect::<Vec<_>>(), vec!["branch", "vendor"]);
}

#[test]
fn selection_maps_visible_index_to_row() {
    let mut view = grn_view();
    view.set_filter(FilterDescriptor::one_of("branch", ["A"]));
    let picked = view.select(1).map(|row| row["grnNo"].clone());
    assert_eq!(picked, Some(json!("GRN-003")));
    assert!(view.select(5).is_none());
    assert!(view.selected().is_none());

    view.select(0);
    view.set_filter(FilterDescriptor::like("grnNo", "002"));
    assert!(view.selected().is_none());
}

#[test]
fn grid_uses_display_rules() {
    let mut view = grn_view();
    view.set_filter(FilterDescriptor::one_of("branch", ["A"]));
    let grid = view.grid();
    assert_eq!(grid.headers, vec!["GRN No", "Vendor", "Amount"]);
    let rendered: Vec<String> = grid.rows.iter().map(|row| row.join(" | ")).collect();
    assert_snapshot!(rendered.join("\n"), @r"
    GRN-001 | Medisource | 100.00
    GRN-003 | Medisource | 30.00
    ");
    assert_eq!(grid.truncated(1).len(), 1);
}

#[test]
fn strict_table_blocks_export_of_bad_operand() {
    let table = FilterTable::builder()
        .numeric("amount")
        .strict_numeric(true)
        .build()
        .expect("table");
    let mut view = ReportView::new(grn_rows(), grn_columns()).with_filter_table(table);
    view.set_filter(FilterDescriptor::compare("amount", FilterPrefix::GreaterThan, "abc"));
    assert_eq!(view.visible_rows().len(), 3);

    let dir = tempfile::tempdir().expect("tempdir");
    let error = view
        .export(
            &view.export_options(ExportFormat::Csv),
            &clock(),
            &DirectorySink::new(dir.path()),
            None,
        )
        .expect_err("strict export");
    assert!(matches!(error, ReportError::Filter(FilterError::NotNumeric { .. })));
}

const DEFINITION: &str = r#"
name = "GRN Report"
branch = "Andheri West"
date_field = "receivedOn"

[[columns]]
field = "grnNo"
header_name = "GRN No"

[[fields]]
key = "receivedOn"
kind = "date"

[filters.receivedOn]
start = "2025-01-01"
end = "2025-01-31"
"#;

#[test]
fn definition_drives_filters_and_file_name() {
    let definition = ReportDefinition::from_toml_str(DEFINITION).expect("definition");
    let view = ReportView::from_definition(grn_rows(), &definition, false).expect("view");
    assert_eq!(view.visible_rows().len(), 2);

    let dir = tempfile::tempdir().expect("tempdir");
    let options = view.export_options(ExportFormat::Xlsx).with_timestamp(true);
    let receipt = view
        .export(&options, &clock(), &DirectorySink::new(dir.path()), None)
        .expect("export");
    assert_eq!(
        receipt.file_name,
        "GRN_Report_Andheri_West_2025-01-01_to_2025-01-31_1430.xlsx"
    );
    assert_eq!(receipt.rows, 2);
    assert!(receipt.path.exists());
}
