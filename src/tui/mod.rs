//! Ratatui-based terminal dashboard.
//!
//! Four pages: "About Dataset" (KPIs and feature catalogue), "Univariate"
//! (histogram or value counts), "Bivariate" (scatter by loan status or box
//! plots per category) and "Model Prediction" (applicant form + scoring).

use std::collections::HashMap;
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
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::analytics::{Aggregator, BoxSummary, HistogramBin, Kpis, ScatterPoint, sorted_counts};
use crate::app::Session;
use crate::data::Dataset;
use crate::domain::{ApplicantForm, CategoricalColumn, Category, Decision, NumericColumn, ScoredApplicant};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::report::{FEATURE_CATALOGUE, fmt_count, format_kpis};

mod form;
mod plotters_chart;

use form::FormField;
use plotters_chart::{Bar, ChartSeries, RiskPlottersChart, compact_number};

/// Histogram resolution on the Univariate page.
const HISTOGRAM_BINS: usize = 40;

/// Start the dashboard.
pub fn run(session: &Session) -> Result<(), AppError> {
    // Load before switching screens so a fetch failure prints normally.
    let dataset = session.dataset()?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session, dataset);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_RUNTIME,
                format!("Failed to enter alternate screen: {e}"),
            ));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    About,
    Univariate,
    Bivariate,
    Prediction,
}

impl Page {
    const ALL: [Page; 4] = [Page::About, Page::Univariate, Page::Bivariate, Page::Prediction];

    fn title(self) -> &'static str {
        match self {
            Page::About => "About Dataset",
            Page::Univariate => "Univariate Analysis",
            Page::Bivariate => "Bivariate Analysis",
            Page::Prediction => "Model Prediction",
        }
    }

    fn index(self) -> usize {
        Page::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    fn prev(self) -> Self {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

/// Position of the "Predict Risk" row below the form fields.
const PREDICT_ROW: usize = FormField::ALL.len();

struct App<'s> {
    session: &'s Session,
    dataset: &'s Dataset,
    kpis: Kpis,
    page: Page,
    status: String,
    about_scroll: u16,

    uni_numeric: bool,
    uni_num_col: NumericColumn,
    uni_cat_col: CategoricalColumn,
    uni_field: usize,

    bi_scatter: bool,
    scatter_x: NumericColumn,
    scatter_y: NumericColumn,
    box_cat: CategoricalColumn,
    box_num: NumericColumn,
    bi_field: usize,

    chart: Option<ChartData>,

    form: ApplicantForm,
    form_row: usize,
    editing: bool,
    edit_buffer: String,
    result: Option<Result<ScoredApplicant, String>>,
}

impl<'s> App<'s> {
    fn new(session: &'s Session, dataset: &'s Dataset) -> Self {
        let kpis = Aggregator::new(dataset.records()).kpis();
        let status = match session.engine() {
            Ok(_) => format!("Loaded {} borrowers.", fmt_count(dataset.len())),
            Err(e) => format!("Scoring unavailable: {e}"),
        };
        let mut app = Self {
            session,
            dataset,
            kpis,
            page: Page::About,
            status,
            about_scroll: 0,
            uni_numeric: true,
            uni_num_col: NumericColumn::PersonAge,
            uni_cat_col: CategoricalColumn::PersonHomeOwnership,
            uni_field: 0,
            bi_scatter: true,
            scatter_x: NumericColumn::PersonAge,
            scatter_y: NumericColumn::PersonIncome,
            box_cat: CategoricalColumn::PersonHomeOwnership,
            box_num: NumericColumn::PersonAge,
            bi_field: 0,
            chart: None,
            form: ApplicantForm::default(),
            form_row: 0,
            editing: false,
            edit_buffer: String::new(),
            result: None,
        };
        app.refresh_chart();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
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

    /// Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.switch_page(self.page.next()),
            KeyCode::BackTab => self.switch_page(self.page.prev()),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.switch_page(Page::ALL[idx]);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Enter if self.page == Page::Prediction => self.activate_form_row(),
            KeyCode::Char('p') if self.page == Page::Prediction => self.predict(),
            _ => {}
        }
        false
    }

    fn switch_page(&mut self, page: Page) {
        self.page = page;
        self.status = page.title().to_string();
        self.refresh_chart();
    }

    fn move_selection(&mut self, delta: i32) {
        let (slot, rows) = match self.page {
            Page::About => {
                self.about_scroll = if delta < 0 {
                    self.about_scroll.saturating_sub(1)
                } else {
                    self.about_scroll.saturating_add(1)
                };
                return;
            }
            Page::Univariate => (&mut self.uni_field, 2),
            Page::Bivariate => (&mut self.bi_field, 3),
            Page::Prediction => (&mut self.form_row, PREDICT_ROW + 1),
        };
        *slot = (*slot as i32 + delta).clamp(0, rows as i32 - 1) as usize;
    }

    fn adjust(&mut self, delta: i32) {
        let forward = delta >= 0;
        match self.page {
            Page::About => return,
            Page::Univariate => match (self.uni_field, self.uni_numeric) {
                (0, _) => self.uni_numeric = !self.uni_numeric,
                (_, true) => self.uni_num_col = step_numeric(self.uni_num_col, forward),
                (_, false) => self.uni_cat_col = step_categorical(self.uni_cat_col, forward),
            },
            Page::Bivariate => match (self.bi_field, self.bi_scatter) {
                (0, _) => self.bi_scatter = !self.bi_scatter,
                (1, true) => self.scatter_x = step_numeric(self.scatter_x, forward),
                (_, true) => self.scatter_y = step_numeric(self.scatter_y, forward),
                (1, false) => self.box_cat = step_categorical(self.box_cat, forward),
                (_, false) => self.box_num = step_numeric(self.box_num, forward),
            },
            Page::Prediction => {
                if let Some(field) = FormField::ALL.get(self.form_row) {
                    field.step(&mut self.form, delta);
                    self.status = format!("{}: {}", field.label(), field.display(&self.form));
                }
                return;
            }
        }
        self.refresh_chart();
    }

    fn activate_form_row(&mut self) {
        match FormField::ALL.get(self.form_row) {
            Some(field) if field.is_numeric() => {
                self.editing = true;
                self.edit_buffer = field
                    .numeric(&self.form)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
            }
            Some(_) => self.status = "Use ←/→ to choose a category.".to_string(),
            None => self.predict(),
        }
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.apply_edit();
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.edit_buffer.push(c);
            }
            _ => {}
        }
    }

    fn apply_edit(&mut self) {
        let Some(field) = FormField::ALL.get(self.form_row).copied() else {
            return;
        };
        let raw = self.edit_buffer.trim();
        match raw.parse::<f64>() {
            Ok(value) => {
                field.set_numeric(&mut self.form, value);
                self.status = format!("{}: {}", field.label(), field.display(&self.form));
            }
            Err(e) => self.status = format!("Invalid number '{raw}': {e}"),
        }
    }

    fn predict(&mut self) {
        let outcome = self.session.score(&self.form).map_err(|e| e.to_string());
        self.status = match &outcome {
            Ok(s) => format!("{} ({:.2}%)", s.decision.headline(), s.probability * 100.0),
            Err(_) => "Prediction failed.".to_string(),
        };
        self.result = Some(outcome);
    }

    fn refresh_chart(&mut self) {
        let agg = Aggregator::new(self.dataset.records());
        self.chart = match self.page {
            Page::Univariate if self.uni_numeric => {
                ChartData::histogram(self.uni_num_col, &agg.histogram(self.uni_num_col, HISTOGRAM_BINS))
            }
            Page::Univariate => ChartData::counts(self.uni_cat_col, &agg.value_counts(self.uni_cat_col)),
            Page::Bivariate if self.bi_scatter => ChartData::scatter(
                self.scatter_x,
                self.scatter_y,
                &agg.scatter_pairs(self.scatter_x, self.scatter_y),
            ),
            Page::Bivariate => ChartData::boxes(
                self.box_cat,
                self.box_num,
                agg.grouped_distribution(self.box_cat, self.box_num).box_summaries(),
            ),
            Page::About | Page::Prediction => None,
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.page {
            Page::About => self.draw_about(frame, chunks[1]),
            Page::Univariate | Page::Bivariate => self.draw_analysis(frame, chunks[1]),
            Page::Prediction => self.draw_prediction(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut tabs = Vec::new();
        for (i, page) in Page::ALL.iter().enumerate() {
            let style = if *page == self.page {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            tabs.push(Span::styled(format!(" {} {} ", i + 1, page.title()), style));
            tabs.push(Span::raw(" "));
        }

        let lines = vec![
            Line::from(vec![
                Span::styled("crisk", Style::default().fg(Color::Cyan)),
                Span::raw(" - Credit Risk Analytics Dashboard | "),
                Span::styled(self.session.source_description(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(tabs),
            Line::from(Span::styled(format_kpis(&self.kpis), Style::default().fg(Color::Gray))),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_about(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(Text::from(about_lines(self.dataset, &self.kpis)))
            .block(Block::default().title(Page::About.title()).borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((self.about_scroll, 0));
        frame.render_widget(p, area);
    }

    fn draw_analysis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_selectors(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .chart
            .as_ref()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| self.page.title().to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(data) = &self.chart else {
            let msg = Paragraph::new("No data for this selection.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = RiskPlottersChart {
            series: data.series(),
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: &data.x_label,
            y_label: &data.y_label,
            categories: &data.categories,
            fmt_y: compact_number,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, data);
        }
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (items, selected) = match self.page {
            Page::Univariate => {
                let kind = if self.uni_numeric { "Numeric" } else { "Categorical" };
                let column = if self.uni_numeric {
                    self.uni_num_col.name()
                } else {
                    self.uni_cat_col.name()
                };
                (
                    vec![format!("Feature Type: {kind}"), format!("Feature: {column}")],
                    self.uni_field,
                )
            }
            _ if self.bi_scatter => (
                vec![
                    "Chart: Scatter".to_string(),
                    format!("X Axis: {}", self.scatter_x.name()),
                    format!("Y Axis: {}", self.scatter_y.name()),
                ],
                self.bi_field,
            ),
            _ => (
                vec![
                    "Chart: Box".to_string(),
                    format!("Categorical: {}", self.box_cat.name()),
                    format!("Numeric: {}", self.box_num.name()),
                ],
                self.bi_field,
            ),
        };

        let list = List::new(items.into_iter().map(ListItem::new).collect::<Vec<_>>())
            .block(Block::default().title("Selection").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_prediction(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let mut items: Vec<ListItem> = FormField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = if self.editing && i == self.form_row {
                    format!("{}_", self.edit_buffer)
                } else {
                    field.display(&self.form)
                };
                ListItem::new(format!("{:<22} {value}", field.label()))
            })
            .collect();
        items.push(ListItem::new(Line::from(Span::styled(
            "[ Predict Risk ]",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))));

        let list = List::new(items)
            .block(Block::default().title("Credit Default Prediction").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.form_row));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let result = Paragraph::new(Text::from(result_lines(self.result.as_ref())))
            .block(Block::default().title("Result").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(result, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.page {
            Page::About => "Tab/1-4 page  ↑/↓ scroll  q quit",
            Page::Univariate | Page::Bivariate => "Tab/1-4 page  ↑/↓ select  ←/→ change  q quit",
            Page::Prediction if self.editing => "type a number  Enter apply  Esc cancel",
            Page::Prediction => "Tab/1-4 page  ↑/↓ field  ←/→ adjust  Enter edit/predict  p predict  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn step_numeric(col: NumericColumn, forward: bool) -> NumericColumn {
    if forward { col.next() } else { col.prev() }
}

fn step_categorical(col: CategoricalColumn, forward: bool) -> CategoricalColumn {
    if forward { col.next() } else { col.prev() }
}

fn about_lines(dataset: &Dataset, kpis: &Kpis) -> Vec<Line<'static>> {
    let heading = |s: &str| {
        Line::from(Span::styled(
            s.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    };
    let summary = dataset.summary();
    let mut lines = vec![
        heading("Project Overview"),
        Line::from("Borrower financial profiles analysed to assess credit risk and predict the likelihood of loan default."),
        Line::from(""),
        heading("Dataset Summary"),
        Line::from(format!(
            "Total Records: {}   Total Features: {}   Target Variable: loan_status",
            fmt_count(dataset.len()),
            summary.columns.len()
        )),
        Line::from(format!("Source: {}", summary.origin)),
        Line::from(""),
        heading("Feature Categories"),
    ];

    for (group, columns) in FEATURE_CATALOGUE {
        lines.push(Line::from(Span::styled(
            group.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (name, description) in columns {
            lines.push(Line::from(format!("  {name:<28} {description}")));
        }
    }

    lines.push(Line::from(""));
    lines.push(heading("Target Variable: Loan Status"));
    lines.push(Line::from("  0 -> No Default"));
    lines.push(Line::from("  1 -> Default"));
    if let Some(rate) = kpis.default_rate {
        lines.push(Line::from(Span::styled(
            format!("Current Default Rate in Dataset: {:.2}%", rate * 100.0),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::from(""));
    lines.push(heading("Business Objective"));
    for goal in [
        "Reduce loan default risk",
        "Improve credit approval strategies",
        "Enable risk-based pricing",
        "Support automated underwriting systems",
        "Enhance portfolio risk monitoring",
    ] {
        lines.push(Line::from(format!("  - {goal}")));
    }

    lines.push(Line::from(""));
    lines.push(heading("Data Preparation & Quality"));
    if summary.dropped_columns.is_empty() {
        lines.push(Line::from("  - No index columns to remove"));
    } else {
        lines.push(Line::from(format!(
            "  - Removed {} unnamed index column(s)",
            summary.dropped_columns.len()
        )));
    }
    lines.push(Line::from(format!(
        "  - Kept {} of {} rows ({} skipped)",
        fmt_count(summary.rows_used),
        fmt_count(summary.rows_read),
        summary.row_errors.len()
    )));
    lines.push(Line::from("  - Engineered columns missing from the file are derived with the scoring code"));

    lines
}

fn result_lines(result: Option<&Result<ScoredApplicant, String>>) -> Vec<Line<'static>> {
    match result {
        None => vec![Line::from("Select [ Predict Risk ] and press Enter (or p) to score.")],
        Some(Err(msg)) => vec![Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Red)))],
        Some(Ok(s)) => {
            let color = match s.decision {
                Decision::Default => Color::Red,
                Decision::NoDefault => Color::Green,
            };
            let f = &s.features;
            vec![
                Line::from(Span::styled(
                    s.decision.headline(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Default Probability: {:.2}%", s.probability * 100.0)),
                Line::from(format!("Decision threshold : {:.2}%", s.threshold * 100.0)),
                Line::from(""),
                Line::from("Engineered features:"),
                Line::from(format!("  loan_percent_income  {:.4}", f.loan_percent_income)),
                Line::from(format!("  dti_band             {}", f.dti_band.code())),
                Line::from(format!("  emp_length_missing   {}", f.emp_length_missing)),
                Line::from(format!("  income_stability     {:.2}", f.income_stability)),
            ]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartKind {
    Bars,
    Scatter,
    Boxes,
}

/// Series and bounds for one chart, computed when the selection changes.
#[derive(Debug, Clone)]
struct ChartData {
    kind: ChartKind,
    title: String,
    bars: Vec<Bar>,
    repaid: Vec<(f64, f64)>,
    defaulted: Vec<(f64, f64)>,
    boxes: Vec<BoxSummary>,
    categories: Vec<String>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: String,
    y_label: String,
}

impl ChartData {
    fn empty(kind: ChartKind, title: String, x_label: &str, y_label: &str) -> Self {
        Self {
            kind,
            title,
            bars: Vec::new(),
            repaid: Vec::new(),
            defaulted: Vec::new(),
            boxes: Vec::new(),
            categories: Vec::new(),
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }

    fn histogram(column: NumericColumn, bins: &[HistogramBin]) -> Option<Self> {
        let (first, last) = (bins.first()?, bins.last()?);
        let mut data = Self::empty(
            ChartKind::Bars,
            format!("Histogram of {}", column.name()),
            column.name(),
            "count",
        );
        data.bars = bins
            .iter()
            .map(|b| Bar {
                x0: b.lower,
                x1: b.upper,
                height: b.count as f64,
            })
            .collect();
        data.x_bounds = padded(first.lower, last.upper, 0.0);
        if first.lower >= last.upper {
            // A single value: give the lone bar some width.
            data.bars = vec![Bar {
                x0: data.x_bounds[0] + 0.25,
                x1: data.x_bounds[1] - 0.25,
                height: first.count as f64,
            }];
        }
        data.y_bounds = count_bounds(&data.bars);
        Some(data)
    }

    fn counts(column: CategoricalColumn, counts: &HashMap<String, usize>) -> Option<Self> {
        let rows = sorted_counts(counts);
        if rows.is_empty() {
            return None;
        }
        let mut data = Self::empty(
            ChartKind::Bars,
            format!("Value counts of {}", column.name()),
            column.name(),
            "count",
        );
        data.bars = rows
            .iter()
            .enumerate()
            .map(|(i, (_, n))| Bar {
                x0: i as f64 - 0.4,
                x1: i as f64 + 0.4,
                height: *n as f64,
            })
            .collect();
        data.categories = rows.into_iter().map(|(name, _)| name).collect();
        data.x_bounds = [-0.5, data.categories.len() as f64 - 0.5];
        data.y_bounds = count_bounds(&data.bars);
        Some(data)
    }

    fn scatter(x: NumericColumn, y: NumericColumn, points: &[ScatterPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut data = Self::empty(
            ChartKind::Scatter,
            format!("{} vs {} (green repaid, red default)", y.name(), x.name()),
            x.name(),
            y.name(),
        );
        let (mut x_min, mut x_max, mut y_min, mut y_max) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
            if p.label == 1 {
                data.defaulted.push((p.x, p.y));
            } else {
                data.repaid.push((p.x, p.y));
            }
        }
        data.x_bounds = padded(x_min, x_max, 0.02);
        data.y_bounds = padded(y_min, y_max, 0.05);
        Some(data)
    }

    fn boxes(category: CategoricalColumn, numeric: NumericColumn, summaries: Vec<(String, BoxSummary)>) -> Option<Self> {
        if summaries.is_empty() {
            return None;
        }
        let mut data = Self::empty(
            ChartKind::Boxes,
            format!("{} by {}", numeric.name(), category.name()),
            category.name(),
            numeric.name(),
        );
        let y_min = summaries.iter().map(|(_, s)| s.min).fold(f64::INFINITY, f64::min);
        let y_max = summaries.iter().map(|(_, s)| s.max).fold(f64::NEG_INFINITY, f64::max);
        for (name, s) in summaries {
            data.categories.push(name);
            data.boxes.push(s);
        }
        data.x_bounds = [-0.5, data.categories.len() as f64 - 0.5];
        data.y_bounds = padded(y_min, y_max, 0.05);
        Some(data)
    }

    fn series(&self) -> ChartSeries<'_> {
        match self.kind {
            ChartKind::Bars => ChartSeries::Bars(&self.bars),
            ChartKind::Scatter => ChartSeries::Scatter {
                repaid: &self.repaid,
                defaulted: &self.defaulted,
            },
            ChartKind::Boxes => ChartSeries::Boxes(&self.boxes),
        }
    }
}

/// `[min, max]` widened by `frac` of the span; a zero span gets a unit window.
fn padded(min: f64, max: f64, frac: f64) -> [f64; 2] {
    let span = max - min;
    if !(span > 1e-12) {
        return [min - 0.5, max + 0.5];
    }
    let pad = span * frac;
    [min - pad, max + pad]
}

fn count_bounds(bars: &[Bar]) -> [f64; 2] {
    let max = bars.iter().map(|b| b.height).fold(0.0, f64::max);
    [0.0, (max * 1.05).max(1.0)]
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Tick positions along x as `(fraction of width, label)`.
fn x_ticks(data: &ChartData) -> Vec<(f64, String)> {
    let [x0, x1] = data.x_bounds;
    if data.categories.is_empty() {
        let ticks = 5usize;
        return (0..ticks)
            .map(|i| {
                let u = i as f64 / (ticks as f64 - 1.0);
                (u, compact_number(x0 + u * (x1 - x0)))
            })
            .collect();
    }
    data.categories
        .iter()
        .enumerate()
        .map(|(i, name)| ((i as f64 - x0) / (x1 - x0), name.clone()))
        .collect()
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    data: &ChartData,
) {
    let style = Style::default().fg(Color::Gray);

    for (u, label) in x_ticks(data) {
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label_len = label.chars().count() as u16;
        let start = x.saturating_sub(label_len / 2).max(inner.x);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        let width = label_len.min((inner.x + inner.width).saturating_sub(start));
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width,
                height: 1,
            },
        );
    }

    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = data.y_bounds[0] + u * (data.y_bounds[1] - data.y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = compact_number(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(data.x_label.clone())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(data.y_label.clone())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(data.y_label.chars().count() as u16),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
