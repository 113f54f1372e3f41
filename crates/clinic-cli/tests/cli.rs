use clinic_cli::filter_arg::parse_filter_arg;
use clinic_cli::logging::{REDACTED_VALUE, default_directives, log_data_enabled, redact_value};
use clinic_model::FilterModel;
use insta::assert_json_snapshot;
use tracing::level_filters::LevelFilter;

#[test]
fn filter_args_build_a_model() {
    let model: FilterModel = ["branch:IN:A|B", "amount:GREATER_THAN:40", "branch:NOT IN:C"]
        .into_iter()
        .map(|raw| parse_filter_arg(raw).expect("valid filter"))
        .collect();
    assert_json_snapshot!(model, @r#"
    {
      "amount": {
        "field": "amount",
        "prefix": "GREATER_THAN",
        "value": "40"
      },
      "branch": {
        "field": "branch",
        "prefix": "NOT IN",
        "value": [
          "C"
        ]
      }
    }
    "#);
}

#[test]
fn row_values_are_redacted_by_default() {
    assert!(!log_data_enabled());
    assert_eq!(redact_value("Asha Rao"), REDACTED_VALUE);
}

#[test]
fn default_directives_keep_dependencies_quiet() {
    let directives = default_directives(LevelFilter::TRACE);
    assert!(directives.starts_with("warn,"));
    assert!(directives.contains("clinic_export=trace"));
}
