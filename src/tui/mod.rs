//! Ratatui-based terminal UI.
//!
//! The TUI shows one report page at a time with a navigation bar across the
//! top. Switching pages starts that page's fetches in the background; the
//! event loop applies responses between input polls so sections appear as
//! their data arrives.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::chart::{ChartRenderer, TextGridRenderer};
use crate::data::{Fetcher, PageLoader, PageData};
use crate::domain::{DataLocation, FeatureImportanceOptions};
use crate::error::AppError;
use crate::pages::{Route, SITE_SUBTITLE, SITE_TITLE};
use crate::report::PageView;

mod page_view;
mod plotters_chart;

use page_view::{PageWidget, item_count};
use plotters_chart::PlottersRenderer;

const PAGE_STEP: usize = 5;

/// TUI start-up options.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub route: Route,
    pub data: DataLocation,
    pub importance: FeatureImportanceOptions,
    pub ascii_charts: bool,
}

/// Start the TUI.
pub fn run(fetcher: Fetcher, options: TuiOptions) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(fetcher, options);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    route: Route,
    fetcher: Fetcher,
    /// `None` for pages without fetches.
    loader: Option<PageLoader>,
    view: PageView,
    scroll: usize,
    importance: FeatureImportanceOptions,
    renderer: Box<dyn ChartRenderer>,
    data_label: String,
    status: String,
}

impl App {
    fn new(fetcher: Fetcher, options: TuiOptions) -> Self {
        let renderer: Box<dyn ChartRenderer> = if options.ascii_charts {
            Box::new(TextGridRenderer)
        } else {
            Box::new(PlottersRenderer)
        };
        let mut app = Self {
            route: options.route,
            fetcher,
            loader: None,
            view: PageView::loading(""),
            scroll: 0,
            importance: options.importance,
            renderer,
            data_label: options.data.describe(),
            status: String::new(),
        };
        app.navigate(options.route);
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.apply_responses() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.navigate(self.route.next()),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
                self.navigate(self.route.prev())
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                if let Some(&route) = Route::ALL.get(index) {
                    if route != self.route {
                        self.navigate(route);
                    }
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll_by(PAGE_STEP),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_STEP),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        false
    }

    fn scroll_by(&mut self, step: usize) {
        let max = item_count(&self.view).saturating_sub(1);
        self.scroll = (self.scroll + step).min(max);
    }

    /// Show `route`, dropping (and so cancelling) the previous page's loads.
    fn navigate(&mut self, route: Route) {
        tracing::info!(%route, "navigate");
        self.route = route;
        self.scroll = 0;
        self.loader = None;

        let resources = route.resources();
        if resources.is_empty() {
            self.status = String::new();
        } else {
            match self.fetcher.load(resources) {
                Ok(loader) => {
                    self.loader = Some(loader);
                    self.status = format!("Loading {} resources...", resources.len());
                }
                Err(error) => {
                    tracing::error!(%route, %error, "could not start page load");
                    self.status = error.to_string();
                }
            }
        }
        self.rebuild();
    }

    /// Drain arrived responses into the current page. Returns whether the
    /// view changed.
    fn apply_responses(&mut self) -> bool {
        let Some(loader) = self.loader.as_mut() else {
            return false;
        };
        if !loader.poll() {
            return false;
        }
        if loader.is_settled() {
            let failed = loader.data().failed();
            self.status = if failed.is_empty() {
                "All data loaded.".to_string()
            } else {
                let names: Vec<String> = failed.iter().map(|r| r.to_string()).collect();
                format!("Failed to load: {} (see log)", names.join(", "))
            };
        }
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let empty = PageData::new();
        let data = self.loader.as_ref().map(|l| l.data()).unwrap_or(&empty);
        self.view = self.route.build(data, self.importance);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_nav(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    SITE_TITLE,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(SITE_SUBTITLE),
            ]),
            Line::from(Span::styled(
                format!("data: {} | page: {}", self.data_label, self.route),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_nav(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles = Route::ALL
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{} {}", i + 1, r.nav_label()));
        let tabs = Tabs::new(titles)
            .select(self.route.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            PageWidget {
                view: &self.view,
                scroll: self.scroll,
                renderer: self.renderer.as_ref(),
            },
            inner,
        );
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ page  1-5 jump  ↑/↓ PgUp/PgDn scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
