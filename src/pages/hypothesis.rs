//! Hypothesis Testing: two permutation tests, bot focus vs top focus.

use crate::data::{PageData, Resource};
use crate::report::{
    Block, Card, PageView, Section, Tone, format_p_value, format_percent, is_significant,
};

use super::chart_block;

pub const TITLE: &str = "Hypothesis Testing";

pub const RESOURCES: &[Resource] = &[
    Resource::HypothesisTests,
    Resource::Test1Objectives,
    Resource::Test2WinRate,
];

const SIGNIFICANT: &str = "Significant";

pub fn build(data: &PageData) -> PageView {
    let Some(tests) = data.hypothesis_tests() else {
        return PageView::loading(TITLE);
    };

    let intro = Section::untitled().paragraph(
        "We ran two permutation tests comparing bot-focus and top-focus games. Each test shuffles \
         the gank focus labels to build the distribution of the difference in means under the \
         null hypothesis.",
    );

    let t1 = &tests.test1;
    let test1 = Section::new("Test 1: Objective Conversion Rate")
        .paragraph(
            "Null Hypothesis (H₀): bot-focus and top-focus games have the same objective \
             conversion rate.",
        )
        .paragraph(
            "Alternative Hypothesis (H₁): bot-focus and top-focus games have different objective \
             conversion rates.",
        )
        .push(Block::Cards(vec![
            Card::new("Bot Mean", format_percent(t1.bot_mean, 1), Tone::Success),
            Card::new("Top Mean", format_percent(t1.top_mean, 1), Tone::Warning),
            Card::new("Observed Difference", format_percent(t1.observed_stat, 2), Tone::Info),
            p_value_card(t1.p_value),
        ]))
        .push(result_callout(
            &t1.interpretation,
            t1.p_value,
            "There is evidence that bot-focus games have different objective conversion rates.",
            "No significant difference in objective conversion rates.",
        ))
        .push_opt(chart_block(data, Resource::Test1Objectives, None));

    let t2 = &tests.test2;
    let test2 = Section::new("Test 2: Win Rate")
        .paragraph("Null Hypothesis (H₀): bot-focus and top-focus games have the same win rate.")
        .paragraph(
            "Alternative Hypothesis (H₁): bot-focus and top-focus games have different win rates.",
        )
        .push(Block::Cards(vec![
            Card::new("Bot Win Rate", format_percent(t2.bot_winrate, 1), Tone::Success),
            Card::new("Top Win Rate", format_percent(t2.top_winrate, 1), Tone::Warning),
            Card::new("Observed Difference", format_percent(t2.observed_stat, 2), Tone::Info),
            p_value_card(t2.p_value),
        ]))
        .push(result_callout(
            &t2.interpretation,
            t2.p_value,
            "There is evidence that gank focus impacts win rate.",
            "No significant difference in win rates.",
        ))
        .push_opt(chart_block(data, Resource::Test2WinRate, None));

    PageView::sections(TITLE, vec![intro, test1, test2])
}

fn p_value_card(p: f64) -> Card {
    let tone = if is_significant(p) { Tone::Danger } else { Tone::Muted };
    Card::new("P-Value", format_p_value(p), tone)
}

/// Tone follows the exported interpretation; wording follows the p-value.
fn result_callout(interpretation: &str, p: f64, rejected: &str, retained: &str) -> Block {
    let tone = if interpretation == SIGNIFICANT {
        Tone::Success
    } else {
        Tone::Warning
    };
    let text = if is_significant(p) {
        format!("Result: {interpretation} - We reject the null hypothesis. {rejected}")
    } else {
        format!("Result: {interpretation} - We fail to reject the null hypothesis. {retained}")
    };
    Block::Callout { tone, text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tests_doc(p1: f64, p2: f64) -> PageData {
        let json = format!(
            r#"{{
                "test1": {{"bot_mean": 0.6123, "top_mean": 0.5567, "observed_stat": 0.0556,
                           "p_value": {p1}, "interpretation": "Significant"}},
                "test2": {{"bot_winrate": 0.5234, "top_winrate": 0.4766, "observed_stat": 0.0468,
                           "p_value": {p2}, "interpretation": "Not Significant"}}
            }}"#
        );
        let doc = Resource::HypothesisTests.decode(json.as_bytes()).unwrap();
        PageData::loaded([(Resource::HypothesisTests, doc)])
    }

    fn callouts(view: &PageView) -> Vec<(Tone, &str)> {
        view.blocks()
            .filter_map(|b| match b {
                Block::Callout { tone, text } => Some((*tone, text.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cards_use_percent_and_p_value_formats() {
        let view = build(&tests_doc(0.0123, 0.2));
        assert_eq!(view.card("Bot Mean").unwrap().value, "61.2%");
        assert_eq!(view.card("Top Mean").unwrap().value, "55.7%");
        assert_eq!(view.card("Bot Win Rate").unwrap().value, "52.3%");
        assert_eq!(view.card("Top Win Rate").unwrap().tone, Tone::Warning);

        let diffs: Vec<&str> = view
            .cards()
            .into_iter()
            .filter(|c| c.label == "Observed Difference")
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(diffs, ["5.56%", "4.68%"]);
    }

    #[test]
    fn p_value_at_threshold_is_not_significant() {
        let view = build(&tests_doc(0.0499, 0.05));
        let p: Vec<(&str, Tone)> = view
            .cards()
            .into_iter()
            .filter(|c| c.label == "P-Value")
            .map(|c| (c.value.as_str(), c.tone))
            .collect();
        assert_eq!(p, [("0.0499", Tone::Danger), ("0.0500", Tone::Muted)]);
    }

    #[test]
    fn callouts_follow_interpretation() {
        let view = build(&tests_doc(0.01, 0.3));
        let found = callouts(&view);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, Tone::Success);
        assert!(found[0].1.starts_with("Result: Significant - We reject"));
        assert_eq!(found[1].0, Tone::Warning);
        assert!(found[1].1.contains("No significant difference in win rates."));

        // A "Not Significant" label with a small p-value keeps its orange tone.
        let view = build(&tests_doc(0.01, 0.001));
        let found = callouts(&view);
        assert_eq!(found[1].0, Tone::Warning);
        assert!(found[1].1.contains("We reject the null hypothesis."));
    }

    #[test]
    fn charts_are_optional() {
        let view = build(&tests_doc(0.01, 0.3));
        assert!(!view.blocks().any(|b| matches!(b, Block::Chart { .. })));
        assert!(build(&PageData::new()).is_loading());
    }
}
