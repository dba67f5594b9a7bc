//! Assessment of Missingness.

use crate::data::{PageData, Resource};
use crate::domain::DependencyTest;
use crate::report::{
    Block, Card, PageView, Section, Tone, format_p_value, is_significant,
};

use super::chart_block;

pub const TITLE: &str = "Assessment of Missingness";

pub const RESOURCES: &[Resource] = &[
    Resource::MissingnessResults,
    Resource::MissingnessTest1,
    Resource::MissingnessTest2,
];

pub fn build(data: &PageData) -> PageView {
    let Some(results) = data.missingness() else {
        return PageView::loading(TITLE);
    };

    let nmar = Section::new("NMAR Analysis")
        .paragraph(
            "Time-based statistics and draft columns are not recorded for every game. Whether a \
             value is missing can depend on the value itself (NMAR), on other observed columns \
             (MAR), or on nothing at all (MCAR).",
        )
        .paragraph(
            "We use permutation tests to see whether the missingness of a column depends on game \
             length or on the side a team played.",
        );

    let overview = Section::new("Missingness Dependency").push(Block::Cards(vec![
        Card::new("Analyzed Column", results.missing_col.clone(), Tone::Accent),
        Card::new("Missing Values", results.missing_count.to_string(), Tone::Info),
    ]));

    let test1 = test_section(1, &results.missing_col, &results.test1)
        .push_opt(chart_block(data, Resource::MissingnessTest1, None));
    let test2 = test_section(2, &results.missing_col, &results.test2)
        .push_opt(chart_block(data, Resource::MissingnessTest2, None));

    PageView::sections(TITLE, vec![nmar, overview, test1, test2])
}

fn test_section(n: usize, missing_col: &str, test: &DependencyTest) -> Section {
    let significant = is_significant(test.p_value);
    let (tone, verdict) = if significant {
        (Tone::Warning, "depends on")
    } else {
        (Tone::Success, "does not appear to depend on")
    };

    Section::new(format!("Test {n}: {missing_col} vs {}", test.dependent_col))
        .paragraph(format!(
            "Null Hypothesis (H₀): the distribution of {} is the same whether {missing_col} is \
             missing or not.",
            test.dependent_col
        ))
        .push(Block::Cards(vec![
            Card::new("Dependent Column", test.dependent_col.clone(), Tone::Info),
            Card::new(
                "P-Value",
                format_p_value(test.p_value),
                if significant { Tone::Danger } else { Tone::Muted },
            ),
        ]))
        .push(Block::Callout {
            tone,
            text: format!(
                "{}: missingness of {missing_col} {verdict} {}.",
                test.interpretation, test.dependent_col
            ),
        })
}
