use std::fs;
use std::path::PathBuf;

use clinic_filter::FieldKind;
use clinic_ingest::{IngestError, load_report_definition, load_rows};
use clinic_model::{FilterPrefix, FilterValue, ValueFormat};
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn loads_json_envelope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        &dir,
        "grn.json",
        r#"{ "total": 2, "data": [ { "grnNo": "GRN-001", "amount": 100 }, 7, { "grnNo": "GRN-002" } ] }"#,
    );
    let rows = load_rows(&path).expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["amount"], json!(100));
}

#[test]
fn loads_csv_with_bom_and_blank_cells() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(
        &dir,
        "vendors.CSV",
        "\u{feff}Vendor Name , City,Phone\nMedisource,Pune,\n,,\n\"Pharma, Link\", Mumbai ,022\n",
    );
    let rows = load_rows(&path).expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Vendor Name"], json!("Medisource"));
    assert!(!rows[0].contains_key("Phone"));
    assert_eq!(rows[1]["Vendor Name"], json!("Pharma, Link"));
    assert_eq!(rows[1]["City"], json!("Mumbai"));
    assert_eq!(rows[1]["Phone"], json!("022"));
}

#[test]
fn rejects_scalar_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "bad.json", "42");
    assert!(matches!(load_rows(&path), Err(IngestError::NotRows { found: "a number", .. })));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let error = load_rows(&path).expect_err("missing");
    assert!(error.to_string().contains("absent.json"));
}

const GRN_DEFINITION: &str = r#"
name = "GRN Report"
report_type = "grn"
branch = "Andheri West"
date_field = "receivedOn"

[[columns]]
field = "grnNo"
header_name = "GRN No"

[[columns]]
field = "amount"
headerName = "Amount"
format = "currency"

[[fields]]
key = "vendor"
path = "vendor.name"
kind = "choice"

[[fields]]
key = "amount"
kind = "numeric"

[[fields]]
key = "receivedOn"
kind = "date"

[filters.vendor]
value = ["Medisource"]

[filters.amount]
prefix = ">"
value = 40

[filters.receivedOn]
start = "2025-01-01"
end = "2025-01-31"
"#;

#[test]
fn loads_report_definition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "grn.toml", GRN_DEFINITION);
    let definition = load_report_definition(&path).expect("definition");

    assert_eq!(definition.name.as_deref(), Some("GRN Report"));
    assert_eq!(definition.columns.len(), 2);
    assert_eq!(definition.columns[1].header_name, "Amount");
    assert_eq!(definition.columns[1].format, ValueFormat::Currency);

    let table = definition.filter_table(false).expect("table");
    let vendor = table.field("vendor").expect("vendor field");
    assert_eq!(vendor.kind, FieldKind::Choice);
    assert_eq!(vendor.path.as_str(), "vendor.name");
    assert_eq!(table.field("amount").map(|spec| spec.path.as_str()), Some("amount"));

    let model = definition.filter_model().expect("model");
    assert_eq!(model.len(), 3);
    let amount = model.get("amount").expect("amount filter");
    assert_eq!(amount.prefix, Some(FilterPrefix::GreaterThan));
    assert_eq!(amount.value, FilterValue::Scalar(json!(40)));
    assert!(matches!(
        model.get("receivedOn").map(|d| &d.value),
        Some(FilterValue::Range(bounds)) if bounds.end.as_deref() == Some("2025-01-31")
    ));
}

#[test]
fn unknown_definition_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(&dir, "typo.toml", "nmae = \"GRN\"\n");
    assert!(matches!(load_report_definition(&path), Err(IngestError::Toml { .. })));
}
