//! Modeling & Fairness Analysis.

use crate::data::{PageData, Resource};
use crate::domain::{Fairness, FeatureImportanceOptions, ModelMetrics};
use crate::report::{
    Bar, Block, Card, PageView, Section, Tone, feature_importance, format_fixed,
    format_optional_p_value, format_optional_percent, format_percent,
};

pub const TITLE: &str = "Modeling & Fairness Analysis";

pub const RESOURCES: &[Resource] = &[Resource::ModelResults];

pub fn build(data: &PageData, importance: FeatureImportanceOptions) -> PageView {
    let Some(results) = data.model_results() else {
        return PageView::loading(TITLE);
    };

    let framing = Section::new("Framing a Prediction Problem").push(Block::Definitions(vec![
        (
            "Prediction Problem".to_string(),
            "Predict the outcome of a match (Win/Loss) based on early game lane dynamics and \
             jungle pathing decisions."
                .to_string(),
        ),
        ("Type".to_string(), "Binary Classification.".to_string()),
        (
            "Response Variable".to_string(),
            "`result` (1 for Win, 0 for Loss). The goal of any gank strategy is to win the game."
                .to_string(),
        ),
        (
            "Evaluation Metric".to_string(),
            "AUC (Area Under ROC Curve) and Accuracy. AUC is prioritized since it measures class \
             separation independent of the decision threshold."
                .to_string(),
        ),
        (
            "Time of Prediction".to_string(),
            "10 minutes (features available in the early game).".to_string(),
        ),
    ]));

    let improvement = (results.final_model.auc - results.baseline.auc) * 100.0;
    let models = Section::new("Baseline & Final Model")
        .push(metrics_panel(
            "Baseline Model",
            &results.baseline,
            vec![
                "Algorithm: Logistic Regression".to_string(),
                "Features: `gank_focus` (encoded), `obj_conversion`".to_string(),
                "Encoding: OneHotEncoding for nominal `gank_focus`".to_string(),
            ],
            Tone::Plain,
        ))
        .push(metrics_panel(
            "Final Model",
            &results.final_model,
            vec![
                "Algorithm: Random Forest Classifier".to_string(),
                "New Features: `lii_diff`, `xp_diff`, `gold_diff` at 10 (StandardScaled)"
                    .to_string(),
                "Tuning: GridSearchCV for `max_depth` and `n_estimators`".to_string(),
            ],
            Tone::Accent,
        ))
        .push(Block::Callout {
            tone: Tone::Success,
            text: format!(
                "Improvement Analysis: the Final Model achieved a {}% improvement in AUC. Granular \
                 lane state features (`lii_diff`, `xp_diff`) let the Random Forest capture \
                 non-linear interactions the baseline misses.",
                format_fixed(improvement, 2)
            ),
        });

    let bars = feature_importance(&results.feature_importance.0, importance)
        .into_iter()
        .enumerate()
        .map(|(i, (name, value))| Bar {
            label: format!("{}. {name}", i + 1),
            value: format_percent(value, 2),
            fraction: if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 },
        })
        .collect();
    let features = Section::new("Feature Importance")
        .paragraph("The Random Forest model identified these features as most predictive of winning:")
        .push(Block::Bars(bars));

    let fairness = fairness_section(&results.fairness);

    PageView::sections(TITLE, vec![framing, models, features, fairness])
}

/// The exported model name is a row of its own; it often repeats the title.
fn metrics_panel(title: &str, metrics: &ModelMetrics, notes: Vec<String>, tone: Tone) -> Block {
    let mut rows = Vec::with_capacity(3);
    if let Some(name) = &metrics.model_name {
        rows.push(("Model".to_string(), name.clone()));
    }
    rows.push(("AUC".to_string(), format_fixed(metrics.auc, 4)));
    rows.push(("Accuracy".to_string(), format_percent(metrics.accuracy, 2)));
    Block::Panel {
        title: title.to_string(),
        notes,
        rows,
        tone,
    }
}

fn fairness_section(fairness: &Fairness) -> Section {
    let verdict = fairness.verdict();
    let verdict_tone = match verdict {
        Some(true) => Tone::Success,
        Some(false) => Tone::Danger,
        None => Tone::Muted,
    };
    let conclusion = match verdict {
        Some(true) => {
            "Conclusion: The model is FAIR - we failed to reject the null hypothesis (p > 0.05)."
        }
        Some(false) => {
            "Conclusion: The model shows UNFAIRNESS - we reject the null hypothesis (p < 0.05)."
        }
        None => "Conclusion: Fairness result unavailable.",
    };

    Section::new("Fairness Analysis")
        .push(Block::Definitions(vec![
            (
                "Groups".to_string(),
                "X: bot-focus games. Y: top-focus games.".to_string(),
            ),
            ("Evaluation Metric".to_string(), "Accuracy.".to_string()),
            (
                "Null Hypothesis".to_string(),
                "The model is fair; accuracy is the same for both groups.".to_string(),
            ),
            (
                "Alternative Hypothesis".to_string(),
                "The model is unfair; accuracies differ significantly.".to_string(),
            ),
        ]))
        .push(Block::Cards(vec![
            Card::new(
                "Bot-Focus Accuracy",
                format_optional_percent(fairness.bot_accuracy, 2),
                Tone::Success,
            ),
            Card::new(
                "Top-Focus Accuracy",
                format_optional_percent(fairness.top_accuracy, 2),
                Tone::Warning,
            ),
            Card::new(
                "Accuracy Difference",
                format_optional_percent(fairness.accuracy_difference.map(f64::abs), 2),
                Tone::Info,
            ),
            Card::new(
                "Fairness P-Value",
                format_optional_p_value(fairness.p_value),
                verdict_tone,
            ),
        ]))
        .push(Block::Callout {
            tone: verdict_tone,
            text: conclusion.to_string(),
        })
}
