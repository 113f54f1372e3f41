//! Integration tests for filter evaluation and option resolution.

use clinic_filter::{filter_rows, filter_slice, unique_values};
use clinic_model::{FilterDescriptor, FilterModel, FilterPrefix, FilterValue, Row};
use proptest::prelude::*;
use serde_json::{Value, json};

fn rows(values: Value) -> Vec<Row> {
    serde_json::from_value(values).expect("rows")
}

fn grn_rows() -> Vec<Row> {
    rows(json!([
        { "grnNo": "GRN-001", "branch": "A", "amount": 100, "vendor": { "name": "Medisource" }, "receivedOn": "2025-01-05" },
        { "grnNo": "GRN-002", "branch": "B", "amount": 50, "vendor": { "name": "PharmaLink" }, "receivedOn": "2025-01-18" },
        { "grnNo": "GRN-003", "branch": "A", "amount": 30, "vendor": { "name": "medisource pvt" }, "receivedOn": "2025-02-02" }
    ]))
}

#[test]
fn none_rows_yield_empty() {
    let model = FilterModel::new().with(FilterDescriptor::like("branch", "A"));
    assert!(filter_rows(None, &model).is_empty());
    let empty: Vec<Row> = Vec::new();
    assert!(filter_rows(Some(empty.as_slice()), &FilterModel::new()).is_empty());
}

#[test]
fn inert_descriptors_do_not_filter() {
    let model = FilterModel::new()
        .with(FilterDescriptor::like("branch", ""))
        .with(FilterDescriptor::new("vendor.name", FilterPrefix::In, FilterValue::List(vec![])))
        .with(FilterDescriptor::date_range("receivedOn", None, None));
    assert_eq!(filter_slice(&grn_rows(), &model), grn_rows());
}

#[test]
fn filters_combine_with_and() {
    let model = FilterModel::new()
        .with(FilterDescriptor::one_of("branch", ["A"]))
        .with(FilterDescriptor::like("vendor.name", "MEDISOURCE"))
        .with(FilterDescriptor::compare("amount", FilterPrefix::GreaterThan, 40));
    let kept = filter_slice(&grn_rows(), &model);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0]["grnNo"], json!("GRN-001"));
}

#[test]
fn branch_in_keeps_matching_rows_in_order() {
    let model = FilterModel::new().with(FilterDescriptor::one_of("branch", ["A"]));
    let base = grn_rows();
    let kept = filter_rows(Some(base.as_slice()), &model);
    let numbers: Vec<&Value> = kept.iter().map(|row| &row["grnNo"]).collect();
    assert_eq!(numbers, vec![&json!("GRN-001"), &json!("GRN-003")]);
}

#[test]
fn date_range_selects_january() {
    let model = FilterModel::new().with(FilterDescriptor::date_range(
        "receivedOn",
        Some("2025-01-01"),
        Some("2025-01-31"),
    ));
    assert_eq!(filter_slice(&grn_rows(), &model).len(), 2);
}

/// Current behavior, kept on purpose: a non-numeric operand disables the filter.
#[test]
fn non_numeric_operand_returns_all_rows() {
    let model = FilterModel::new().with(FilterDescriptor::compare(
        "amount",
        FilterPrefix::GreaterThan,
        "abc",
    ));
    assert_eq!(filter_slice(&grn_rows(), &model), grn_rows());
}

#[test]
fn options_ignore_active_filters() {
    let base = grn_rows();
    let model = FilterModel::new().with(FilterDescriptor::one_of("branch", ["B"]));
    let visible = filter_slice(&base, &model);
    assert_eq!(visible.len(), 1);
    assert_eq!(unique_values(&base, "branch"), vec![json!("A"), json!("B")]);
}

fn arb_row() -> impl Strategy<Value = Row> {
    ("[a-dA-D ]{0,6}", 0i64..200).prop_map(|(name, amount)| {
        let mut row = Row::new();
        row.insert("name".to_string(), json!(name));
        row.insert("amount".to_string(), json!(amount));
        row
    })
}

fn arb_descriptor() -> impl Strategy<Value = FilterDescriptor> {
    prop_oneof![
        "[a-d]{0,2}".prop_map(|needle| FilterDescriptor::like("name", needle)),
        "[a-d]{0,2}".prop_map(|needle| FilterDescriptor::not_like("name", needle)),
        (0i64..200).prop_map(|n| FilterDescriptor::compare("amount", FilterPrefix::LessThan, n)),
        (0i64..200).prop_map(|n| FilterDescriptor::compare("amount", FilterPrefix::EqualTo, n)),
        prop::collection::vec("[a-d]{1,2}", 0..3)
            .prop_map(|values| FilterDescriptor::one_of("name", values)),
    ]
}

proptest! {
    #[test]
    fn empty_model_is_identity(rows in prop::collection::vec(arb_row(), 0..20)) {
        prop_assert_eq!(filter_slice(&rows, &FilterModel::new()), rows);
    }

    #[test]
    fn filtering_never_grows(
        rows in prop::collection::vec(arb_row(), 0..20),
        descriptors in prop::collection::vec(arb_descriptor(), 1..4),
    ) {
        let model: FilterModel = descriptors.into_iter().collect();
        prop_assert!(filter_slice(&rows, &model).len() <= rows.len());
    }

    #[test]
    fn like_and_not_like_partition_rows(
        rows in prop::collection::vec(arb_row(), 0..20),
        needle in "[a-dA-D]{1,2}",
    ) {
        let like = FilterModel::new().with(FilterDescriptor::like("name", needle.clone()));
        let not_like = FilterModel::new().with(FilterDescriptor::not_like("name", needle));
        let matched = filter_slice(&rows, &like);
        let unmatched = filter_slice(&rows, &not_like);
        prop_assert_eq!(matched.len() + unmatched.len(), rows.len());
        for row in &matched {
            prop_assert!(!unmatched.contains(row));
        }
    }
}
