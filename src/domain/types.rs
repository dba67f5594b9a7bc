//! Shared domain types.
//!
//! The document structs mirror the JSON artifacts produced by the offline
//! analysis. They are decoded once, at fetch time, and never mutated; a
//! document that does not fit its struct counts as a failed fetch.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Counters from `summary_stats.json`.
///
/// The three counters are required. Everything else the analysis exported
/// (win rates, objective rates) is kept in `extra` in file order; the EDA page
/// shows the rates it knows by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_trade_games: u64,
    pub bot_focus_count: u64,
    pub top_focus_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SummaryStats {
    /// A numeric field from `extra`, e.g. `bot_focus_winrate`.
    pub fn rate(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }
}

/// One record of `head_data.json`: column name → value, in file order.
pub type HeadRow = Map<String, Value>;

/// One row of `pivot_table.json` (mean win rate per side and gank focus).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub side: String,
    pub gank_focus: String,
    pub result: f64,
}

/// `hypothesis_tests.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTests {
    pub test1: ObjectiveTest,
    pub test2: WinRateTest,
}

/// Permutation test on objective conversion rate (bot mean − top mean).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTest {
    pub bot_mean: f64,
    pub top_mean: f64,
    pub observed_stat: f64,
    pub p_value: f64,
    pub interpretation: String,
}

/// Permutation test on win rate (bot win rate − top win rate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateTest {
    pub bot_winrate: f64,
    pub top_winrate: f64,
    pub observed_stat: f64,
    pub p_value: f64,
    pub interpretation: String,
}

/// `missingness_results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingnessResults {
    pub missing_col: String,
    pub missing_count: u64,
    pub test1: DependencyTest,
    pub test2: DependencyTest,
}

/// Does the missingness of `missing_col` depend on `dependent_col`?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyTest {
    pub dependent_col: String,
    pub p_value: f64,
    pub interpretation: String,
}

/// `model_results.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResults {
    pub baseline: ModelMetrics,
    #[serde(rename = "final")]
    pub final_model: ModelMetrics,
    pub feature_importance: FeatureImportance,
    #[serde(default)]
    pub fairness: Fairness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    #[serde(default)]
    pub model_name: Option<String>,
    pub auc: f64,
    pub accuracy: f64,
}

/// Fairness permutation test between bot-focus and top-focus games.
///
/// Every field may be absent; the page renders `N/A` for what is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fairness {
    pub bot_accuracy: Option<f64>,
    pub top_accuracy: Option<f64>,
    pub accuracy_difference: Option<f64>,
    pub p_value: Option<f64>,
    pub is_fair: Option<bool>,
}

impl Fairness {
    /// `is_fair` when exported, else derived from the p-value the same way
    /// the analysis does (`p > 0.05`).
    pub fn verdict(&self) -> Option<bool> {
        self.is_fair
            .or_else(|| self.p_value.map(|p| p > crate::report::SIGNIFICANCE_LEVEL))
    }
}

/// Feature → importance, in the order the file lists them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct FeatureImportance(pub Vec<(String, f64)>);

impl TryFrom<Map<String, Value>> for FeatureImportance {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut out = Vec::with_capacity(map.len());
        for (name, value) in map {
            let importance = value
                .as_f64()
                .ok_or_else(|| format!("feature '{name}' has a non-numeric importance"))?;
            out.push((name, importance));
        }
        Ok(Self(out))
    }
}

impl From<FeatureImportance> for Map<String, Value> {
    fn from(value: FeatureImportance) -> Self {
        value
            .0
            .into_iter()
            .map(|(name, importance)| (name, Value::from(importance)))
            .collect()
    }
}

/// How the feature-importance list is presented.
///
/// Earlier snapshots of the report disagreed (one sorted and kept the top 5,
/// another showed the file order untruncated), so both are options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureImportanceOptions {
    pub sort_by_importance: bool,
    pub limit: Option<usize>,
}

impl Default for FeatureImportanceOptions {
    fn default() -> Self {
        Self {
            sort_by_importance: true,
            limit: Some(5),
        }
    }
}

/// Where the JSON artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// Base URL, always ending in `/`.
    Http(String),
    Dir(PathBuf),
}

impl DataLocation {
    /// `http://`/`https://` prefixes select HTTP; anything else is a directory.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let mut base = trimmed.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            Self::Http(base)
        } else {
            Self::Dir(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(base) => base.clone(),
            Self::Dir(dir) => dir.display().to_string(),
        }
    }
}

/// Settings shared by every front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub data: DataLocation,
    pub importance: FeatureImportanceOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_results_keep_feature_order_and_tolerate_empty_fairness() {
        let raw = r#"{
            "baseline": {"model_name": "Baseline", "auc": 0.61, "accuracy": 0.58},
            "final": {"auc": 0.74, "accuracy": 0.69},
            "feature_importance": {"xp_diff": 0.1, "gold_diff": 0.5, "lii_diff": 0.3},
            "fairness": {}
        }"#;
        let results: ModelResults = serde_json::from_str(raw).unwrap();

        let names: Vec<&str> = results
            .feature_importance
            .0
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, ["xp_diff", "gold_diff", "lii_diff"]);
        assert_eq!(results.fairness, Fairness::default());
        assert_eq!(results.fairness.verdict(), None);
        assert_eq!(results.final_model.model_name, None);
    }

    #[test]
    fn non_numeric_importance_is_rejected() {
        let raw = r#"{"a": "high"}"#;
        assert!(serde_json::from_str::<FeatureImportance>(raw).is_err());
    }

    #[test]
    fn fairness_verdict_falls_back_to_p_value() {
        let fairness = Fairness {
            p_value: Some(0.05),
            ..Fairness::default()
        };
        assert_eq!(fairness.verdict(), Some(false));

        let fairness = Fairness {
            p_value: Some(0.2),
            is_fair: Some(false),
            ..Fairness::default()
        };
        assert_eq!(fairness.verdict(), Some(false));
    }

    #[test]
    fn summary_stats_keep_extra_counters() {
        let raw = r#"{"total_trade_games": 888, "bot_focus_count": 900,
                      "top_focus_count": 876, "bot_focus_winrate": 0.51}"#;
        let stats: SummaryStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.total_trade_games, 888);
        assert_eq!(stats.extra.len(), 1);
    }

    #[test]
    fn data_location_detects_http() {
        assert_eq!(
            DataLocation::parse("https://example.org/leagueresearch/data"),
            DataLocation::Http("https://example.org/leagueresearch/data/".to_string())
        );
        assert_eq!(
            DataLocation::parse("public/data"),
            DataLocation::Dir(PathBuf::from("public/data"))
        );
    }
}
