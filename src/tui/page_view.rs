//! Draws a [`PageView`] into a terminal area.
//!
//! Scrolling is by item (a section heading or one block), which keeps charts
//! and tables whole instead of cutting them mid-row.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block as Frame, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};

use crate::chart::ChartRenderer;
use crate::report::text::LOADING_PLACEHOLDER;
use crate::report::{Bar, Block, Card, PageBody, PageView, Tone};

const CARD_HEIGHT: u16 = 4;
const CARD_MIN_WIDTH: u16 = 22;
const CHART_HEIGHT: u16 = 18;
const BAR_LABEL_WIDTH: usize = 24;

/// One scroll step.
#[derive(Debug, Clone, Copy)]
enum Item<'a> {
    Heading(&'a str),
    Block(&'a Block),
}

fn items(view: &PageView) -> Vec<Item<'_>> {
    let PageBody::Sections(sections) = &view.body else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for section in sections {
        if let Some(heading) = &section.heading {
            out.push(Item::Heading(heading));
        }
        out.extend(section.blocks.iter().map(Item::Block));
    }
    out
}

/// Number of scroll positions on the page.
pub fn item_count(view: &PageView) -> usize {
    items(view).len()
}

pub struct PageWidget<'a> {
    pub view: &'a PageView,
    pub scroll: usize,
    pub renderer: &'a dyn ChartRenderer,
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let title = Line::from(Span::styled(
            self.view.title.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        buf.set_line(area.x, area.y, &title, area.width);

        let mut y = area.y + 2;
        let bottom = area.y + area.height;

        if self.view.is_loading() {
            if y < bottom {
                buf.set_string(area.x, y, LOADING_PLACEHOLDER, Style::default().fg(Color::Yellow));
            }
            return;
        }

        for item in items(self.view).into_iter().skip(self.scroll) {
            if y >= bottom {
                break;
            }
            let wanted = item_height(item, area.width);
            let rect = Rect {
                x: area.x,
                y,
                width: area.width,
                height: wanted.min(bottom - y),
            };
            render_item(item, rect, buf, self.renderer);
            y = y.saturating_add(wanted);
        }
    }
}

fn tone_color(tone: Tone) -> Color {
    tone.rgb().into()
}

/// Wrapped line count of `text` at `width` columns.
fn wrapped_lines(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.lines()
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum::<usize>()
        .max(1) as u16
}

fn cards_per_row(width: u16) -> usize {
    (width / CARD_MIN_WIDTH).max(1) as usize
}

fn item_height(item: Item<'_>, width: u16) -> u16 {
    let inner = width.saturating_sub(2);
    let h = match item {
        Item::Heading(_) => 1,
        Item::Block(block) => match block {
            Block::Paragraph(text) => wrapped_lines(text, width),
            Block::Quote(text) => wrapped_lines(text, width.saturating_sub(2)),
            Block::Bullets(items) => items
                .iter()
                .map(|i| wrapped_lines(i, width.saturating_sub(2)))
                .sum(),
            Block::Definitions(defs) => defs
                .iter()
                .map(|(term, text)| wrapped_lines(&format!("{term}: {text}"), width))
                .sum(),
            Block::Cards(cards) => {
                let rows = cards.len().div_ceil(cards_per_row(width)).max(1);
                rows as u16 * CARD_HEIGHT
            }
            Block::Panel { notes, rows, .. } => (notes.len() + rows.len()) as u16 + 2,
            Block::Callout { text, .. } => wrapped_lines(text, inner) + 2,
            Block::Table { table, .. } => {
                let header = u16::from(!table.headers.is_empty());
                table.rows.len() as u16 + header + 2
            }
            Block::Bars(bars) => bars.len().max(1) as u16,
            Block::Chart { .. } => CHART_HEIGHT,
        },
    };
    // One blank line after every item.
    h + 1
}

fn render_item(item: Item<'_>, area: Rect, buf: &mut Buffer, renderer: &dyn ChartRenderer) {
    match item {
        Item::Heading(text) => {
            let line = Line::from(Span::styled(
                text,
                Style::default()
                    .fg(tone_color(Tone::Accent))
                    .add_modifier(Modifier::BOLD),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
        }
        Item::Block(block) => render_block(block, area, buf, renderer),
    }
}

fn render_block(block: &Block, area: Rect, buf: &mut Buffer, renderer: &dyn ChartRenderer) {
    match block {
        Block::Paragraph(text) => {
            Paragraph::new(text.as_str())
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
        Block::Quote(text) => {
            Paragraph::new(Line::from(vec![
                Span::styled("│ ", Style::default().fg(tone_color(Tone::Accent))),
                Span::styled(text.as_str(), Style::default().add_modifier(Modifier::ITALIC)),
            ]))
            .wrap(Wrap { trim: true })
            .render(area, buf);
        }
        Block::Bullets(items) => {
            let lines: Vec<Line> = items
                .iter()
                .map(|i| Line::from(format!("• {i}")))
                .collect();
            Paragraph::new(Text::from(lines))
                .wrap(Wrap { trim: false })
                .render(area, buf);
        }
        Block::Definitions(defs) => {
            let lines: Vec<Line> = defs
                .iter()
                .map(|(term, text)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{term}: "),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(text.as_str()),
                    ])
                })
                .collect();
            Paragraph::new(Text::from(lines))
                .wrap(Wrap { trim: false })
                .render(area, buf);
        }
        Block::Cards(cards) => render_cards(cards, area, buf),
        Block::Panel {
            title,
            notes,
            rows,
            tone,
        } => {
            let mut lines: Vec<Line> = notes
                .iter()
                .map(|n| Line::styled(n.as_str(), Style::default().fg(Color::Gray)))
                .collect();
            lines.extend(rows.iter().map(|(label, value)| {
                Line::from(vec![
                    Span::raw(format!("{label}: ")),
                    Span::styled(value.as_str(), Style::default().add_modifier(Modifier::BOLD)),
                ])
            }));
            Paragraph::new(Text::from(lines))
                .block(
                    Frame::default()
                        .title(title.as_str())
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(tone_color(*tone))),
                )
                .render(area, buf);
        }
        Block::Callout { tone, text } => {
            Paragraph::new(text.as_str())
                .wrap(Wrap { trim: true })
                .block(
                    Frame::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(tone_color(*tone))),
                )
                .render(area, buf);
        }
        Block::Table { caption, table } => {
            let widths = vec![Constraint::Fill(1); table.headers.len().max(1)];
            let rows = table
                .rows
                .iter()
                .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));
            let mut widget = Table::new(rows, widths).block(
                Frame::default()
                    .title(caption.as_deref().unwrap_or_default())
                    .borders(Borders::ALL),
            );
            if !table.headers.is_empty() {
                widget = widget.header(
                    Row::new(table.headers.iter().map(|h| Cell::from(h.as_str())))
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                );
            }
            Widget::render(widget, area, buf);
        }
        Block::Bars(bars) => render_bars(bars, area, buf),
        Block::Chart { caption, figure } => {
            let title = caption
                .as_deref()
                .or(figure.title.as_deref())
                .unwrap_or_default();
            let frame = Frame::default().title(title).borders(Borders::ALL);
            let inner = frame.inner(area);
            frame.render(area, buf);
            renderer.render_chart(figure, inner, buf);
        }
    }
}

fn render_cards(cards: &[Card], area: Rect, buf: &mut Buffer) {
    let per_row = cards_per_row(area.width);
    for (row_index, row) in cards.chunks(per_row).enumerate() {
        let y = area.y + row_index as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > area.y + area.height {
            break;
        }
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: CARD_HEIGHT,
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, per_row as u32); per_row])
            .split(row_area);
        for (card, cell) in row.iter().zip(cells.iter()) {
            let color = tone_color(card.tone);
            Paragraph::new(Text::from(vec![
                Line::styled(card.label.as_str(), Style::default().fg(Color::Gray)),
                Line::styled(
                    card.value.as_str(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
            .block(
                Frame::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .render(*cell, buf);
        }
    }
}

fn render_bars(bars: &[Bar], area: Rect, buf: &mut Buffer) {
    let value_width = 8usize;
    let track = (area.width as usize).saturating_sub(BAR_LABEL_WIDTH + value_width + 2);
    for (i, bar) in bars.iter().enumerate().take(area.height as usize) {
        let filled = (bar.fraction * track as f64).round() as usize;
        let label: String = bar.label.chars().take(BAR_LABEL_WIDTH).collect();
        let line = Line::from(vec![
            Span::raw(format!("{label:<BAR_LABEL_WIDTH$} ")),
            Span::styled("█".repeat(filled), Style::default().fg(tone_color(Tone::Accent))),
            Span::styled(
                "░".repeat(track.saturating_sub(filled)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!(" {:>width$}", bar.value, width = value_width),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        buf.set_line(area.x, area.y + i as u16, &line, area.width);
    }
}
