//! Ratatui-based terminal UI.
//!
//! The TUI provides start/end date inputs and an apply action, then renders
//! the merged observed/forecast series as a chart. Each apply kicks off a
//! fetch-and-merge cycle on a background thread; cycles are tagged with a
//! generation counter and the event loop discards results from any cycle
//! that is no longer the latest, so a slow stale response can never
//! overwrite a newer one.

use std::io;
use std::sync::mpsc::{Receiver, Sender, channel};
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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{CycleOutput, run_cycle};
use crate::cli::FetchArgs;
use crate::data::DemandClient;
use crate::domain::{DateRange, FetchConfig};
use crate::error::AppError;
use crate::series::format::format_magnitude;

mod plotters_chart;

use plotters_chart::DemandChart;

/// Start the TUI.
pub fn run(args: FetchArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::upstream(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::upstream(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::upstream(format!("Failed to enter alternate screen: {e}")));
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

/// Which input row the cursor is on.
const FIELD_START: usize = 0;
const FIELD_END: usize = 1;
const FIELD_COUNT: usize = 2;

type CycleMessage = (u64, Result<CycleOutput, AppError>);

struct App {
    client: DemandClient,
    args: FetchArgs,
    start_input: String,
    end_input: String,
    selected_field: usize,
    editing: bool,
    status: String,
    /// The currently applied (validated) filter; survives failed edits.
    applied: Option<FetchConfig>,
    run: Option<CycleOutput>,
    loading: bool,
    generation: u64,
    tx: Sender<CycleMessage>,
    rx: Receiver<CycleMessage>,
}

impl App {
    fn new(args: FetchArgs) -> Result<Self, AppError> {
        let client = crate::app::client_from_args(&args);
        let (default_start, default_end) = crate::app::default_window();
        let start_input = args.start.clone().unwrap_or(default_start);
        let end_input = args.end.clone().unwrap_or(default_end);

        let (tx, rx) = channel();

        let mut app = Self {
            client,
            args,
            start_input,
            end_input,
            selected_field: FIELD_START,
            editing: false,
            status: String::new(),
            applied: None,
            run: None,
            loading: false,
            generation: 0,
            tx,
            rx,
        };
        app.apply_filter();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::upstream(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if self.drain_cycle_results() {
                needs_redraw = true;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::upstream(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::upstream(format!("Event read error: {e}")))? {
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

    /// Pull any finished cycles off the channel, keeping only the latest
    /// generation. Returns true when the display changed.
    fn drain_cycle_results(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, result)) = self.rx.try_recv() {
            if generation != self.generation {
                // Superseded by a newer apply; discard.
                continue;
            }
            self.loading = false;
            changed = true;
            match result {
                Ok(out) => {
                    self.status = if out.points.is_empty() {
                        "No demand data for the selected range.".to_string()
                    } else {
                        format!(
                            "{} points (peak {})",
                            out.points.len(),
                            format_magnitude(peak_value(&out)),
                        )
                    };
                    self.run = Some(out);
                }
                Err(err) => {
                    // Clear the stale series so a failed fetch is never
                    // displayed under a misleading new filter.
                    self.run = None;
                    self.status = format!("Error: {err}");
                }
            }
        }
        changed
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_field_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Enter => {
                self.editing = true;
                self.status = "Editing date (YYYY-MM-DD). Enter to confirm, Esc to cancel.".to_string();
            }
            KeyCode::Char('a') => self.apply_filter(),
            KeyCode::Char('r') => {
                if self.args.offline {
                    self.args.seed = self.args.seed.wrapping_add(1);
                }
                self.apply_filter();
            }
            _ => {}
        }

        false
    }

    fn handle_field_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.status = "Press 'a' to apply the filter.".to_string();
            }
            KeyCode::Backspace => {
                self.field_mut().pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.field_mut().push(c);
                }
            }
            _ => {}
        }
    }

    fn field_mut(&mut self) -> &mut String {
        if self.selected_field == FIELD_END {
            &mut self.end_input
        } else {
            &mut self.start_input
        }
    }

    /// Validate the inputs and start a new fetch cycle.
    ///
    /// A validation failure leaves the previously applied range (and the
    /// displayed series) untouched.
    fn apply_filter(&mut self) {
        let range = match DateRange::parse(&self.start_input, &self.end_input) {
            Ok(range) => range,
            Err(err) => {
                self.status = format!("Error: {err}");
                return;
            }
        };

        let config = FetchConfig {
            range,
            forecast_limit: self.args.limit,
            offline: self.args.offline,
            sample_seed: self.args.seed,
            export: None,
        };
        self.applied = Some(config.clone());

        self.generation += 1;
        let generation = self.generation;
        let client = self.client.clone();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = run_cycle(&client, &config);
            let _ = tx.send((generation, result));
        });

        self.loading = true;
        self.status = "Fetching demand data...".to_string();
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("kwh", Style::default().fg(Color::Cyan)),
            Span::raw(" — demand: observed vs. forecast"),
        ]));

        let applied = self
            .applied
            .as_ref()
            .map(|c| format!("{} .. {}", c.range.start(), c.range.end()))
            .unwrap_or_else(|| "-".to_string());
        let counts = self
            .run
            .as_ref()
            .map(|r| {
                format!(
                    "points={} observed={} forecast={}",
                    r.stats.points_out,
                    r.stats.observed_in - r.stats.observed_dropped,
                    r.stats.forecast_in - r.stats.forecast_dropped,
                )
            })
            .unwrap_or_else(|| "no data".to_string());
        let source = if self.args.offline {
            "offline".to_string()
        } else {
            self.client.base_url().to_string()
        };

        lines.push(Line::from(Span::styled(
            format!("window: {applied} | {counts} | source: {source}"),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_filter(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Demand (kWh)").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.loading {
            let msg = Paragraph::new("Fetching demand data...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data. Edit the window and press 'a' to apply.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        if run.points.is_empty() {
            let msg = Paragraph::new("No demand data for the selected range.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        frame.render_widget(DemandChart { display: &run.display }, inner);
    }

    fn draw_filter(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!("Start: {}", self.start_input)),
            ListItem::new(format!("End:   {}", self.end_input)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filter").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing {
            let hint = Paragraph::new("Editing…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter edit  a apply  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn peak_value(out: &CycleOutput) -> f64 {
    out.points
        .iter()
        .flat_map(|p| [p.observed, p.forecast])
        .flatten()
        .fold(0.0_f64, f64::max)
}
