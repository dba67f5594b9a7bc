//! Number and cell formatting shared by every page.
//!
//! All of it is presentation: values are shown as exported, rounded for
//! display, never re-derived.

use serde_json::Value;

use crate::domain::{FeatureImportanceOptions, HeadRow};

use super::view::Table;

/// p-values strictly below this are shown as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Shown wherever an optional number is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed-point formatting with half-away-from-zero rounding.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let mut rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        // Avoid "-0.0".
        rounded = 0.0;
    }
    format!("{rounded:.decimals$}")
}

/// `value × 100` to `decimals` places, with a `%` suffix.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{}%", format_fixed(value * 100.0, decimals))
}

/// p-values always show four decimals.
pub fn format_p_value(p: f64) -> String {
    format_fixed(p, 4)
}

pub fn is_significant(p: f64) -> bool {
    p < SIGNIFICANCE_LEVEL
}

pub fn format_optional_percent(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format_percent(v, decimals))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_optional_p_value(value: Option<f64>) -> String {
    value
        .map(format_p_value)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// A JSON cell as text: `null` stays `null`, integral numbers drop `.0`.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Table from row records: headers are the first record's keys, in order;
/// each row lists its own values positionally. No records, no header.
pub fn record_table(rows: &[HeadRow]) -> Table {
    let headers = rows
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();
    let rows = rows
        .iter()
        .map(|row| row.values().map(format_cell).collect())
        .collect();
    Table { headers, rows }
}

/// Apply the configured ordering and truncation to feature importances.
///
/// Sorting is descending by value and stable, so ties keep file order.
pub fn feature_importance(
    entries: &[(String, f64)],
    options: FeatureImportanceOptions,
) -> Vec<(String, f64)> {
    let mut out = entries.to_vec();
    if options.sort_by_importance {
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    }
    if let Some(limit) = options.limit {
        out.truncate(limit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn percent_matches_rounded_value() {
        assert_eq!(format_percent(0.5234, 1), "52.3%");
        assert_eq!(format_percent(0.5234, 2), "52.34%");
        assert_eq!(format_percent(0.51256, 2), "51.26%");
        assert_eq!(format_percent(1.0, 1), "100.0%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
        assert_eq!(format_percent(-0.00001, 2), "0.00%");
        assert_eq!(format_percent(-0.0123, 2), "-1.23%");
    }

    #[test]
    fn p_values_use_four_decimals_and_strict_threshold() {
        assert_eq!(format_p_value(0.03456), "0.0346");
        assert_eq!(format_p_value(0.0), "0.0000");
        assert!(is_significant(0.0499));
        assert!(!is_significant(0.05));
        assert!(!is_significant(0.2));
    }

    #[test]
    fn optional_values_fall_back_to_na() {
        assert_eq!(format_optional_percent(None, 2), "N/A");
        assert_eq!(format_optional_percent(Some(0.7), 2), "70.00%");
        assert_eq!(format_optional_p_value(None), "N/A");
    }

    #[test]
    fn cells_format_like_the_source_data() {
        assert_eq!(format_cell(&json!(null)), "null");
        assert_eq!(format_cell(&json!("bot")), "bot");
        assert_eq!(format_cell(&json!(1)), "1");
        assert_eq!(format_cell(&json!(1.0)), "1");
        assert_eq!(format_cell(&json!(0.25)), "0.25");
        assert_eq!(format_cell(&json!(true)), "true");
    }

    #[test]
    fn table_headers_follow_first_record() {
        let rows: Vec<HeadRow> = serde_json::from_value(json!([
            {"gameid": "G1", "result": 1, "lii_diff": null},
            {"gameid": "G2", "result": 0, "lii_diff": -0.5}
        ]))
        .unwrap();
        let table = record_table(&rows);
        assert_eq!(table.headers, ["gameid", "result", "lii_diff"]);
        assert_eq!(table.rows[0], ["G1", "1", "null"]);
        assert_eq!(table.rows[1], ["G2", "0", "-0.5"]);

        let empty = record_table(&[]);
        assert!(empty.headers.is_empty());
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn feature_importance_sorted_or_insertion_order() {
        let entries = vec![
            ("a".to_string(), 0.1),
            ("b".to_string(), 0.5),
            ("c".to_string(), 0.3),
        ];
        let names = |v: Vec<(String, f64)>| v.into_iter().map(|(n, _)| n).collect::<Vec<_>>();

        let sorted = feature_importance(
            &entries,
            FeatureImportanceOptions { sort_by_importance: true, limit: None },
        );
        assert_eq!(names(sorted), ["b", "c", "a"]);

        let unsorted = feature_importance(
            &entries,
            FeatureImportanceOptions { sort_by_importance: false, limit: None },
        );
        assert_eq!(names(unsorted), ["a", "b", "c"]);

        let top = feature_importance(
            &entries,
            FeatureImportanceOptions { sort_by_importance: true, limit: Some(2) },
        );
        assert_eq!(names(top), ["b", "c"]);
    }
}
