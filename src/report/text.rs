//! Plain-text (Markdown) rendition of a page, used by `render` and `export`.

use crate::chart::ascii;

use super::view::{Block, PageBody, PageView, Table};

/// Width of text charts and importance bars.
const BAR_WIDTH: usize = 30;

pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Render a page as Markdown. `chart_width` sets the text chart width.
pub fn render_page(view: &PageView, chart_width: usize) -> String {
    let mut out = format!("## {}\n\n", view.title);

    let sections = match &view.body {
        PageBody::Loading => {
            out.push_str(LOADING_PLACEHOLDER);
            out.push('\n');
            return out;
        }
        PageBody::Sections(sections) => sections,
    };

    for section in sections {
        if let Some(heading) = &section.heading {
            out.push_str(&format!("### {heading}\n\n"));
        }
        for block in &section.blocks {
            render_block(&mut out, block, chart_width);
            out.push('\n');
        }
    }
    out
}

fn render_block(out: &mut String, block: &Block, chart_width: usize) {
    match block {
        Block::Paragraph(text) => {
            out.push_str(text);
            out.push('\n');
        }
        Block::Quote(text) => out.push_str(&format!("> {text}\n")),
        Block::Bullets(items) => {
            for item in items {
                out.push_str(&format!("- {item}\n"));
            }
        }
        Block::Definitions(rows) => {
            for (term, description) in rows {
                out.push_str(&format!("- **{term}**: {description}\n"));
            }
        }
        Block::Cards(cards) => {
            for card in cards {
                out.push_str(&format!("- {}: **{}**\n", card.label, card.value));
            }
        }
        Block::Panel { title, notes, rows, .. } => {
            out.push_str(&format!("**{title}**\n\n"));
            for note in notes {
                out.push_str(&format!("{note}  \n"));
            }
            if !notes.is_empty() {
                out.push('\n');
            }
            for (label, value) in rows {
                out.push_str(&format!("- {label}: {value}\n"));
            }
        }
        Block::Callout { text, .. } => out.push_str(&format!("> {text}\n")),
        Block::Table { caption, table } => {
            if let Some(caption) = caption {
                out.push_str(&format!("*{caption}*\n\n"));
            }
            out.push_str(&markdown_table(table));
        }
        Block::Bars(bars) => {
            let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
            for bar in bars {
                let filled = (bar.fraction * BAR_WIDTH as f64).round() as usize;
                out.push_str(&format!(
                    "    {:<label_width$}  {:>8}  {}\n",
                    bar.label,
                    bar.value,
                    "#".repeat(filled.min(BAR_WIDTH)),
                ));
            }
        }
        Block::Chart { caption, figure } => {
            out.push_str("```text\n");
            out.push_str(&ascii::render_figure(figure, chart_width, 12));
            out.push_str("```\n");
            if let Some(caption) = caption {
                out.push_str(&format!("\n{caption}\n"));
            }
        }
    }
}

/// GitHub-style table. A table with no headers renders only its rows.
pub fn markdown_table(table: &Table) -> String {
    let mut out = String::new();
    if !table.headers.is_empty() {
        out.push_str(&markdown_row(&table.headers));
        out.push_str(&format!(
            "|{}\n",
            table.headers.iter().map(|_| " --- |").collect::<String>()
        ));
    }
    for row in &table.rows {
        out.push_str(&markdown_row(row));
    }
    out
}

fn markdown_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Pipes would split the cell and newlines would end the row.
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::view::{Bar, Card, Section, Tone};

    #[test]
    fn loading_page_is_only_the_placeholder() {
        let txt = render_page(&PageView::loading("Hypothesis Testing"), 40);
        assert_eq!(txt, "## Hypothesis Testing\n\nLoading...\n");
    }

    #[test]
    fn sections_render_in_order() {
        let view = PageView::sections(
            "Cleaning & Exploratory Data Analysis",
            vec![
                Section::new("Overall Dataset Stats").push(Block::Cards(vec![Card::new(
                    "Total Trade Games",
                    "888",
                    Tone::Plain,
                )])),
                Section::untitled().push(Block::Bars(vec![Bar {
                    label: "1. gold_diff".to_string(),
                    value: "50.00%".to_string(),
                    fraction: 0.5,
                }])),
            ],
        );
        let txt = render_page(&view, 40);
        let expected = concat!(
            "## Cleaning & Exploratory Data Analysis\n\n",
            "### Overall Dataset Stats\n\n",
            "- Total Trade Games: **888**\n\n",
            "    1. gold_diff    50.00%  ###############\n\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn markdown_table_with_and_without_headers() {
        let table = Table {
            headers: vec!["Side".to_string(), "Win Rate".to_string()],
            rows: vec![vec!["Blue".to_string(), "52.1%".to_string()]],
        };
        assert_eq!(
            markdown_table(&table),
            "| Side | Win Rate |\n| --- | --- |\n| Blue | 52.1% |\n"
        );
        assert_eq!(markdown_table(&Table::default()), "");
    }

    #[test]
    fn markdown_table_escapes_pipes_in_cells() {
        let table = Table {
            headers: vec!["champion".to_string()],
            rows: vec![vec!["Nunu | Willump".to_string()], vec!["two\nlines".to_string()]],
        };
        assert_eq!(
            markdown_table(&table),
            "| champion |\n| --- |\n| Nunu \\| Willump |\n| two lines |\n"
        );
    }
}
