//! Export file names.
//!
//! Names follow `<Report>[_<Branch>]_<YYYY-MM-DD>[_to_<YYYY-MM-DD>][_<HHmm>][_<ID>].<ext>`
//! and only ever contain `[A-Za-z0-9._-]`.

use chrono::{Local, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use clinic_model::ExportOptions;

const DEFAULT_REPORT_NAME: &str = "Report";
const UNIQUE_ID_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of the current local time for dates and timestamps in file names.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Reduces `input` to `[A-Za-z0-9._-]`, joining everything else into single
/// underscores and trimming underscores from both ends.
pub fn sanitize_file_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-') {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Builds the download file name for an export.
///
/// Deterministic for a given clock unless `include_unique_id` is set.
pub fn generate_file_name(options: &ExportOptions, clock: &dyn Clock) -> String {
    let now = clock.now();
    let today = now.date();
    let mut parts = Vec::with_capacity(5);

    let sanitized = |value: Option<&str>| value.map(sanitize_file_name).filter(|s| !s.is_empty());
    parts.push(
        sanitized(options.report_name.as_deref())
            .or_else(|| sanitized(options.report_type.as_deref()))
            .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string()),
    );
    if let Some(branch) = sanitized(options.branch_name.as_deref()) {
        parts.push(branch);
    }
    match options.filters.date_range {
        Some(range) if !range.is_empty() => parts.push(format!(
            "{}_to_{}",
            iso_date(range.start.unwrap_or(today)),
            iso_date(range.end.unwrap_or(today))
        )),
        _ => parts.push(iso_date(today)),
    }
    if options.include_timestamp {
        parts.push(now.format("%H%M").to_string());
    }
    if options.include_unique_id {
        parts.push(unique_suffix());
    }
    format!("{}{}", parts.join("_"), options.format.extension())
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Six random uppercase base36 characters.
pub fn unique_suffix() -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(UNIQUE_ID_LEN);
    for _ in 0..UNIQUE_ID_LEN {
        out.push(char::from(BASE36[(value % 36) as usize]));
        value /= 36;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_model::{DateRange, ExportFormat};

    fn clock() -> FixedClock {
        let at = NaiveDate::from_ymd_opt(2025, 1, 27)
            .and_then(|date| date.and_hms_opt(14, 30, 5))
            .expect("valid instant");
        FixedClock(at)
    }

    #[test]
    fn sanitizes_whitespace_and_symbols() {
        assert_eq!(sanitize_file_name("  GRN  Report  "), "GRN_Report");
        assert_eq!(sanitize_file_name("Expense/Vendor: Q1"), "Expense_Vendor_Q1");
        assert_eq!(sanitize_file_name("__a__b__"), "a_b");
        assert_eq!(sanitize_file_name("IVF-cycle.v2"), "IVF-cycle.v2");
        assert_eq!(sanitize_file_name("Embryologie né"), "Embryologie_n");
        assert_eq!(sanitize_file_name("   "), "");
    }

    #[test]
    fn minimal_name_uses_report_and_date() {
        let options = ExportOptions::new("Patient List");
        assert_eq!(
            generate_file_name(&options, &clock()),
            "Patient_List_2025-01-27.csv"
        );
    }

    #[test]
    fn full_name_orders_every_part() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1),
            NaiveDate::from_ymd_opt(2025, 1, 31),
        );
        let options = ExportOptions::new("GRN Report")
            .with_branch("Andheri West")
            .with_date_range(range)
            .with_timestamp(true)
            .with_format(ExportFormat::Xlsx);
        assert_eq!(
            generate_file_name(&options, &clock()),
            "GRN_Report_Andheri_West_2025-01-01_to_2025-01-31_1430.xlsx"
        );
    }

    #[test]
    fn open_range_bound_uses_today() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2025, 1, 1), None);
        let options = ExportOptions::new("Expenses").with_date_range(range);
        assert_eq!(
            generate_file_name(&options, &clock()),
            "Expenses_2025-01-01_to_2025-01-27.csv"
        );
    }

    #[test]
    fn falls_back_to_type_then_default() {
        let mut options = ExportOptions::default().with_report_type("pharmacy-indent");
        assert_eq!(
            generate_file_name(&options, &clock()),
            "pharmacy-indent_2025-01-27.csv"
        );
        options.report_type = Some("***".to_string());
        assert_eq!(generate_file_name(&options, &clock()), "Report_2025-01-27.csv");
    }

    #[test]
    fn unique_suffix_is_six_base36_chars() {
        let suffix = unique_suffix();
        assert_eq!(suffix.len(), UNIQUE_ID_LEN);
        assert!(suffix.chars().all(|ch| ch.is_ascii_digit() || ch.is_ascii_uppercase()));

        let options = ExportOptions::new("Incidents").with_unique_id(true);
        let name = generate_file_name(&options, &clock());
        assert!(name.starts_with("Incidents_2025-01-27_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "Incidents_2025-01-27_".len() + UNIQUE_ID_LEN + 4);
    }
}
