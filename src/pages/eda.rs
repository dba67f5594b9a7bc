//! Cleaning & Exploratory Data Analysis.

use crate::data::{PageData, Resource};
use crate::report::{Block, Card, PageView, Section, Table, Tone, format_percent, record_table};

use super::chart_block;

pub const TITLE: &str = "Cleaning & Exploratory Data Analysis";

pub const RESOURCES: &[Resource] = &[
    Resource::SummaryStats,
    Resource::HeadData,
    Resource::PivotTable,
    Resource::PlotObjConversion,
    Resource::PlotWinRate,
    Resource::PlotLiiScatter,
    Resource::PlotUnivariate,
];

/// Optional `summary_stats.json` rates, in display order.
const SUMMARY_RATES: &[(&str, &str, Tone)] = &[
    ("bot_focus_winrate", "Bot Focus Win Rate", Tone::Success),
    ("top_focus_winrate", "Top Focus Win Rate", Tone::Warning),
    ("bot_focus_obj_rate", "Bot Focus Objective Rate", Tone::Success),
    ("top_focus_obj_rate", "Top Focus Objective Rate", Tone::Warning),
];

pub fn build(data: &PageData) -> PageView {
    let Some(stats) = data.summary_stats() else {
        return PageView::loading(TITLE);
    };

    let cleaning = Section::new("Data Cleaning")
        .paragraph("We performed the following cleaning steps on the Oracle's Elixir dataset:")
        .push(Block::Bullets(vec![
            "Standardized position names (e.g., converted 'top', 'TOP' to 'TOP', 'bot', 'adc' to 'ADC')."
                .to_string(),
            "Filtered dataset to relevant rows (player-level vs team-level) depending on analysis needs."
                .to_string(),
            "Handled missing values for objective columns (dragons, heralds) by aggregating max values \
             from team-level rows."
                .to_string(),
            "Engineered the `gank_focus` feature by analyzing jungle proximity kills/assists and \
             identifying symmetric cross-map trade games."
                .to_string(),
        ]))
        .push_opt(data.head_rows().map(|rows| Block::Table {
            caption: Some("Cleaned Data (First 5 Rows)".to_string()),
            table: record_table(rows),
        }));

    let univariate = Section::new("Univariate Analysis")
        .paragraph(
            "Distribution of the Lane Impact Index Difference (Bot - Top). Most games cluster near \
             zero, indicating generally balanced lane states, but outliers exist where one lane \
             dominated significantly.",
        )
        .push_opt(chart_block(data, Resource::PlotUnivariate, None));

    let bivariate = Section::new("Bivariate Analysis")
        .push_opt(chart_block(
            data,
            Resource::PlotObjConversion,
            Some(
                "Average objective conversion rate for Bot vs Top focused ganks, grouped by whether \
                 the team won or lost.",
            ),
        ))
        .push_opt(chart_block(
            data,
            Resource::PlotWinRate,
            Some("Win rate by gank focus with 95% confidence intervals."),
        ))
        .push_opt(chart_block(
            data,
            Resource::PlotLiiScatter,
            Some(
                "Relationship between lane advantage (LII Difference) and win probability (binned).",
            ),
        ));

    let aggregates = Section::new("Interesting Aggregates")
        .paragraph("Pivot Table: Win Rate grouped by Side (Blue/Red) and Gank Focus.")
        .push_opt(data.pivot_rows().map(|rows| Block::Table {
            caption: None,
            table: Table {
                headers: vec![
                    "Side".to_string(),
                    "Gank Focus".to_string(),
                    "Win Rate".to_string(),
                ],
                rows: rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.side.clone(),
                            r.gank_focus.clone(),
                            format_percent(r.result, 1),
                        ]
                    })
                    .collect(),
            },
        }));

    let mut counts = vec![
        Card::new("Total Trade Games", stats.total_trade_games.to_string(), Tone::Plain),
        Card::new("Bot Focus Count", stats.bot_focus_count.to_string(), Tone::Plain),
        Card::new("Top Focus Count", stats.top_focus_count.to_string(), Tone::Plain),
    ];
    counts.extend(SUMMARY_RATES.iter().filter_map(|&(key, label, tone)| {
        stats
            .rate(key)
            .map(|v| Card::new(label, format_percent(v, 1), tone))
    }));
    let overall = Section::new("Overall Dataset Stats").push(Block::Cards(counts));

    PageView::sections(
        TITLE,
        vec![cleaning, univariate, bivariate, aggregates, overall],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Document;

    fn stats_doc() -> (Resource, Document) {
        (
            Resource::SummaryStats,
            Resource::SummaryStats
                .decode(br#"{"total_trade_games": 888, "bot_focus_count": 900, "top_focus_count": 876}"#)
                .unwrap(),
        )
    }

    #[test]
    fn loading_until_summary_stats_arrive() {
        let data = PageData::loaded([(
            Resource::PivotTable,
            Resource::PivotTable.decode(b"[]").unwrap(),
        )]);
        assert!(build(&data).is_loading());
    }

    #[test]
    fn sections_appear_as_their_resources_arrive() {
        let view = build(&PageData::loaded([stats_doc()]));
        assert!(!view.is_loading());
        assert_eq!(view.card("Total Trade Games").unwrap().value, "888");
        assert!(!view.blocks().any(|b| matches!(b, Block::Table { .. } | Block::Chart { .. })));

        let pivot = Resource::PivotTable
            .decode(br#"[{"side": "Blue", "gank_focus": "bot", "result": 0.5234},
                         {"side": "Red", "gank_focus": "top", "result": 0.4766}]"#)
            .unwrap();
        let view = build(&PageData::loaded([stats_doc(), (Resource::PivotTable, pivot)]));
        let table = view
            .blocks()
            .find_map(|b| match b {
                Block::Table { table, .. } => Some(table),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.headers, ["Side", "Gank Focus", "Win Rate"]);
        assert_eq!(table.rows[0], ["Blue", "bot", "52.3%"]);
        assert_eq!(table.rows[1][2], "47.7%");
    }

    #[test]
    fn exported_rates_become_cards() {
        let doc = Resource::SummaryStats
            .decode(
                br#"{"total_trade_games": 888, "bot_focus_count": 900, "top_focus_count": 876,
                     "bot_focus_winrate": 0.5234, "top_focus_winrate": 0.4766,
                     "bot_focus_obj_rate": null}"#,
            )
            .unwrap();
        let view = build(&PageData::loaded([(Resource::SummaryStats, doc)]));
        assert_eq!(view.card("Bot Focus Win Rate").unwrap().value, "52.3%");
        assert_eq!(view.card("Top Focus Win Rate").unwrap().tone, Tone::Warning);
        assert!(view.card("Bot Focus Objective Rate").is_none());
        assert!(build(&PageData::loaded([stats_doc()])).card("Bot Focus Win Rate").is_none());
    }

    #[test]
    fn empty_head_data_renders_no_rows() {
        let head = Resource::HeadData.decode(b"[]").unwrap();
        let view = build(&PageData::loaded([stats_doc(), (Resource::HeadData, head)]));
        let table = view
            .blocks()
            .find_map(|b| match b {
                Block::Table { table, .. } => Some(table),
                _ => None,
            })
            .unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
