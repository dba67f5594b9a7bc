//! Introduction: research question, dataset, and approach. No fetches.

use crate::report::{Block, Card, PageView, Section, Tone};

pub const TITLE: &str = "Introduction";

pub fn build() -> PageView {
    let question = Section::new("Research Question").push(Block::Quote(
        "Given early cross-map ganks, is it better to invest jungle pressure bot or top?".to_string(),
    ));

    let cross_map = Section::new("What are Cross-Map Trades?").paragraph(
        "In professional League of Legends, \"cross-map trades\" occur when both junglers apply \
         pressure on opposite sides of the map simultaneously. For example, one jungler ganks bot \
         lane while the enemy jungler ganks top lane. This creates a strategic dilemma: which lane \
         focus provides more value?",
    );

    let why = Section::new("Why This Matters").push(Block::Bullets(vec![
        "For Teams & Analysts: Helps quantify the value of bot-centric vs top-centric early-game plans"
            .to_string(),
        "For Fans: Answers the classic debate: \"Was that cross-map trade worth?\"".to_string(),
        "For Organizations: Informs jungle pathing priorities and resource allocation strategies"
            .to_string(),
    ]));

    let dataset = Section::new("Dataset").paragraph(
        "We analyzed 888 cross-map trade games (1,776 team-game observations) from Oracle's \
         Elixir's professional League of Legends dataset, spanning multiple regions and years. \
         Each game was identified by detecting early jungler involvement in opposing lanes during \
         the first 10 minutes.",
    );

    let columns = Section::new("Relevant Columns")
        .paragraph("The key features used in our analysis include:")
        .push(Block::Definitions(vec![
            (
                "result".to_string(),
                "Binary indicator of game outcome (1 = Win, 0 = Loss).".to_string(),
            ),
            (
                "gank_focus".to_string(),
                "The primary lane (Bot or Top) targeted by the jungler in the early game.".to_string(),
            ),
            (
                "obj_conversion".to_string(),
                "Whether the team secured a Drag or Herald shortly after the gank phase.".to_string(),
            ),
            (
                "lii_diff".to_string(),
                "Lane Impact Index Difference: the relative performance gap between bot and top lanes."
                    .to_string(),
            ),
            (
                "xp_diff, gold_diff".to_string(),
                "Experience and Gold differences at 10 and 15 minutes.".to_string(),
            ),
        ]));

    let approach = Section::new("Our Approach").push(Block::Cards(vec![
        Card::new(
            "1. Data Processing",
            "Identified cross-map trades using early-game stats",
            Tone::Plain,
        ),
        Card::new(
            "2. EDA",
            "Explored objective conversion and win rates by lane focus",
            Tone::Plain,
        ),
        Card::new(
            "3. Hypothesis Tests",
            "Compared bot vs top gank value statistically",
            Tone::Plain,
        ),
        Card::new(
            "4. Prediction Models",
            "Built models to predict wins from early gank patterns",
            Tone::Plain,
        ),
    ]));

    PageView::sections(
        TITLE,
        vec![question, cross_map, why, dataset, columns, approach],
    )
}
