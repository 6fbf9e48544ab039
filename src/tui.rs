use crate::chart::{allocation_slices, roi_bounds, roi_series, tick_label, PALETTE};
use crate::error::{StoreError, SubmitError};
use crate::events::ClickListeners;
use crate::form::{Field, InvestmentForm};
use crate::portfolio::{format_fixed, group_by_fund, Portfolio};
use crate::record::InvestmentRecord;
use crate::report::{render_report, write_pdf};
use crate::store::{Persisted, Store, INVESTMENTS_KEY};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, List, ListItem,
        Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tui_big_text::{BigText, PixelSize};

fn format_with_commas(value: f64) -> String {
    if !value.is_finite() {
        return format_fixed(value);
    }
    let formatted = format_fixed(value.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{decimal_part}")
}

fn palette_color(index: usize) -> Color {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Color::Rgb(r, g, b)
}

fn signed_color(value: f64) -> Color {
    if value >= 0.0 {
        Color::Green
    } else {
        Color::Red
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Overview,
    Records,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMode {
    Normal,
    Form,
    ConfirmReset,
}

impl Tab {
    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Dashboard",
            Tab::Records => "Investments",
        }
    }

    fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Records]
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "overview" | "dashboard" => Some(Tab::Overview),
            "records" | "investments" => Some(Tab::Records),
            _ => None,
        }
    }
}

pub struct App {
    pub current_tab: Tab,
    pub should_quit: bool,
    pub mode: AppMode,
    pub investments: Persisted<Vec<InvestmentRecord>>,
    pub form: Option<InvestmentForm>,
    pub listeners: ClickListeners,
    pub fund_names: Vec<String>,
    pub report_file: PathBuf,
    pub selected_record: usize,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub fn new(store: Store, fund_names: Vec<String>, report_file: PathBuf) -> App {
        App {
            current_tab: Tab::Overview,
            should_quit: false,
            mode: AppMode::Normal,
            investments: Persisted::new(store, INVESTMENTS_KEY, Vec::new()),
            form: None,
            listeners: ClickListeners::new(),
            fund_names,
            report_file,
            selected_record: 0,
            status_message: None,
            error_message: None,
        }
    }

    pub fn records(&self) -> &[InvestmentRecord] {
        self.investments.get()
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_index = tabs
            .iter()
            .position(|&t| t == self.current_tab)
            .unwrap_or(0);
        self.current_tab = tabs[(current_index + 1) % tabs.len()];
    }

    pub fn previous_tab(&mut self) {
        let tabs = Tab::all();
        let current_index = tabs
            .iter()
            .position(|&t| t == self.current_tab)
            .unwrap_or(0);
        self.current_tab = tabs[(current_index + tabs.len() - 1) % tabs.len()];
    }

    pub fn select_next(&mut self) {
        if self.selected_record < self.records().len().saturating_sub(1) {
            self.selected_record += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_record = self.selected_record.saturating_sub(1);
    }

    pub fn open_form(&mut self) {
        self.form = Some(InvestmentForm::new(&self.listeners));
        self.mode = AppMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = AppMode::Normal;
    }

    /// Submit the open form and persist the new record. The form is only
    /// cleared once the record is saved.
    pub fn submit_form(&mut self) {
        let Some(form) = &mut self.form else {
            return;
        };
        let investments = &mut self.investments;
        match form.submit(|record| investments.update(|list| list.push(record.clone()))) {
            Ok(record) => {
                tracing::info!("Added SIP for {}", record.get_name());
                self.status_message = Some(format!("Added investment in {}", record.get_name()));
            }
            Err(SubmitError::Store(e)) => {
                tracing::error!("Failed to persist investment: {e}");
                self.error_message = Some(e.to_string());
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    pub fn download_report(&mut self) {
        let document = render_report(&group_by_fund(self.records()));
        match write_pdf(&document, &self.report_file) {
            Ok(()) => {
                self.status_message =
                    Some(format!("Report saved to {}", self.report_file.display()));
            }
            Err(e) => {
                tracing::error!("Report failed: {e}");
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Wipe every persisted value and start the screen over.
    pub fn reset_data(&mut self) {
        let outcome = self.investments.reset();
        self.finish_reset(outcome);
    }

    fn finish_reset(&mut self, outcome: Result<(), StoreError>) {
        self.mode = AppMode::Normal;
        self.status_message = None;
        if let Err(e) = outcome {
            tracing::error!("Reset failed: {e}");
            self.error_message = Some(e.to_string());
            return;
        }
        self.form = None;
        self.current_tab = Tab::Overview;
        self.selected_record = 0;
        self.status_message = Some("All data cleared".to_string());
    }

    pub fn on_click(&mut self, column: u16, row: u16) {
        self.listeners.dispatch(column, row);
        if let Some(form) = &mut self.form {
            if let Some(index) = form.name.candidate_at(column, row) {
                form.name.select(index);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.error_message.take().is_some() {
            return;
        }
        match self.mode {
            AppMode::Normal => self.on_normal_key(key.code),
            AppMode::Form => self.on_form_key(key.code),
            AppMode::ConfirmReset => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.reset_data(),
                _ => self.mode = AppMode::Normal,
            },
        }
    }

    fn on_normal_key(&mut self, code: KeyCode) {
        self.status_message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Vim navigation - hjkl
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                self.previous_tab();
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                self.next_tab();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.current_tab == Tab::Records {
                    self.select_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.current_tab == Tab::Records {
                    self.select_previous();
                }
            }
            KeyCode::Char('a') => self.open_form(),
            KeyCode::Char('d') => {
                if !self.records().is_empty() {
                    self.download_report();
                }
            }
            KeyCode::Char('r') => self.mode = AppMode::ConfirmReset,
            KeyCode::Char('1') => self.current_tab = Tab::Overview,
            KeyCode::Char('2') => self.current_tab = Tab::Records,
            _ => {}
        }
    }

    fn on_form_key(&mut self, code: KeyCode) {
        let names = &self.fund_names;
        let Some(form) = &mut self.form else {
            self.mode = AppMode::Normal;
            return;
        };
        let on_open_list = form.focus() == Field::Name && form.name.is_open();

        match code {
            KeyCode::Esc if on_open_list => form.name.close(),
            KeyCode::Esc => {
                self.close_form();
            }
            KeyCode::Down if on_open_list => form.name.highlight_next(),
            KeyCode::Up if on_open_list => form.name.highlight_previous(),
            KeyCode::Enter if on_open_list => {
                form.name.select_highlighted();
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.focus() == Field::Type => {
                form.cycle_type();
            }
            KeyCode::Backspace => form.backspace(names),
            KeyCode::Char(c) => form.input_char(c, names),
            _ => {}
        }
    }
}

pub fn run_tui(
    store: Store,
    fund_names: Vec<String>,
    report_file: PathBuf,
    tab: Option<Tab>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, fund_names, report_file);
    if let Some(tab) = tab {
        app.current_tab = tab;
    }

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("Dashboard stopped: {err}");
    }
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()>
where
    io::Error: From<B::Error>,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(_) = mouse.kind {
                    app.on_click(mouse.column, mouse.row);
                }
            }
            _ => {}
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let tab_titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(t.title(), style))
        })
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Investment Tracker"),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow))
        .select(
            Tab::all()
                .iter()
                .position(|&t| t == app.current_tab)
                .unwrap_or(0),
        );

    f.render_widget(tabs, chunks[0]);

    if app.records().is_empty() {
        render_empty(f, chunks[1]);
    } else {
        match app.current_tab {
            Tab::Overview => render_overview(f, chunks[1], app),
            Tab::Records => render_records(f, chunks[1], app),
        }
    }

    render_help(f, chunks[2], app);

    match app.mode {
        AppMode::Form => {
            if let Some(form) = &app.form {
                render_form_dialog(f, form, &app.fund_names);
            }
        }
        AppMode::ConfirmReset => render_confirm_reset(f),
        AppMode::Normal => {}
    }

    if let Some(error) = &app.error_message {
        render_error_popup(f, error);
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let text = Paragraph::new("No investments yet. Press 'a' to add your first SIP.")
        .block(Block::default().borders(Borders::ALL).title("Welcome"))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(text, area);
}

fn render_help(f: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match (&app.status_message, app.mode) {
        (Some(status), AppMode::Normal) => (status.clone(), Color::Green),
        (_, AppMode::Form) => (
            "Tab/Shift-Tab (field) | Space (type) | Up/Down (suggestions) | Enter (add) | Esc (close)"
                .to_string(),
            Color::Gray,
        ),
        _ => (
            "h/l (tabs) | j/k (select) | a (add) | d (download report) | r (reset data) | q (quit)"
                .to_string(),
            Color::Gray,
        ),
    };
    let help = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    f.render_widget(help, area);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let portfolio = Portfolio::new(app.records().to_vec());
    let groups = portfolio.group_by_fund();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    // Total current value
    let total_value = portfolio.get_total_value();
    let big_text_value = format_with_commas(total_value);
    let big_text = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .lines(vec![big_text_value.clone().into()])
        .build();

    let big_text_widget = Block::default()
        .borders(Borders::ALL)
        .title("Total Current Value")
        .title_alignment(Alignment::Center);
    f.render_widget(big_text_widget, main_chunks[0]);

    let inner = main_chunks[0].inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });
    let big_text_width = big_text_value.len() as u16 * 4;
    let centered_area = if big_text_width < inner.width {
        let margin = (inner.width - big_text_width) / 2;
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(margin),
                Constraint::Min(0),
                Constraint::Length(margin),
            ])
            .split(inner)[1]
    } else {
        inner
    };
    f.render_widget(big_text, centered_area);

    // ROI chart on the left, allocation on the right
    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);
    render_roi_chart(f, chart_chunks[0], &groups);

    let allocation_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chart_chunks[1]);
    render_allocation(f, allocation_chunks[0], &portfolio);
    render_detailed_allocation(f, allocation_chunks[1], &portfolio);

    // Overall metrics
    let m = portfolio.metrics();
    let summary = Line::from(vec![
        Span::raw(format!(
            "Invested {}  Value {}  ",
            format_with_commas(m.initial_investment),
            format_with_commas(m.current_market_value)
        )),
        Span::styled(
            format!("ROI {}%  ", format_fixed(m.roi)),
            Style::default().fg(signed_color(m.roi)),
        ),
        Span::styled(
            format!("Annualized {}%", format_fixed(m.annualized_return)),
            Style::default().fg(signed_color(m.annualized_return)),
        ),
    ]);
    let summary = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Overall Portfolio"),
        )
        .alignment(Alignment::Center);
    f.render_widget(summary, main_chunks[2]);
}

fn render_roi_chart(f: &mut Frame, area: Rect, groups: &[crate::portfolio::FundGroup]) {
    let series = roi_series(groups);
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .enumerate()
        .map(|(i, p)| vec![(i as f64, p.roi)])
        .collect();
    let line: Vec<(f64, f64)> = points.iter().flatten().copied().collect();
    let labels: Vec<String> = series.iter().map(|p| tick_label(p.fund)).collect();

    let mut datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Rgb(0x88, 0x84, 0xD8)))
        .data(&line)];
    for (i, data) in points.iter().enumerate() {
        datasets.push(
            Dataset::default()
                .name(labels[i].clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(palette_color(i)))
                .data(data),
        );
    }

    let [y_min, y_max] = roi_bounds(&series);
    let x_max = (series.len().saturating_sub(1) as f64).max(1.0);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("ROI by Fund (%)"))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([-0.5, x_max + 0.5])
                .labels(labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    format!("{y_min:.1}"),
                    format!("{:.1}", (y_min + y_max) / 2.0),
                    format!("{y_max:.1}"),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_allocation(f: &mut Frame, area: Rect, portfolio: &Portfolio) {
    let allocation = portfolio.get_allocation();
    let labels: Vec<String> = allocation.iter().map(|(name, _)| tick_label(name)).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(allocation.iter())
        .map(|(label, (_, percentage))| (label.as_str(), percentage.round() as u64))
        .collect();

    let barchart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Allocation (%)"))
        .data(&data)
        .bar_width(9)
        .bar_style(Style::default().fg(palette_color(0)))
        .value_style(Style::default().fg(Color::Black).bg(palette_color(0)));

    f.render_widget(barchart, area);
}

fn render_detailed_allocation(f: &mut Frame, area: Rect, portfolio: &Portfolio) {
    let groups = portfolio.group_by_fund();
    let total = portfolio.get_total_value();

    let items: Vec<ListItem> = allocation_slices(&groups)
        .iter()
        .map(|slice| {
            let color = palette_color(slice.color_index);
            let percentage = if total > 0.0 {
                slice.value / total * 100.0
            } else {
                0.0
            };
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(format!("{:<28}", slice.name)),
                Span::styled(
                    format!("{:>8}%", format_fixed(percentage)),
                    Style::default().fg(color),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Current Value Split"))
        .style(Style::default().fg(Color::White));

    f.render_widget(list, area);
}

fn render_records(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["#", "Fund", "Start", "SIP Amount", "Months", "Invested", "Current"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = app.records().iter().enumerate().map(|(i, record)| {
        let row_style = if i == app.selected_record {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(record.get_name()),
            Cell::from(record.get_start_date()),
            Cell::from(record.get_sip_amount()),
            Cell::from(record.get_sip_duration()),
            Cell::from(format_with_commas(record.invested())),
            Cell::from(record.get_current_amount()),
        ])
        .height(1)
        .style(row_style)
    });

    let metrics = crate::portfolio::compute_metrics(app.records());
    let total_row = Row::new(vec![
        Cell::from("TOTAL").style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::from(""),
        Cell::from(""),
        Cell::from(""),
        Cell::from(""),
        Cell::from(format_with_commas(metrics.initial_investment)),
        Cell::from(format_with_commas(metrics.current_market_value)).style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let constraints = [
        Constraint::Length(4),
        Constraint::Percentage(34),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(rows.chain(std::iter::once(total_row)), constraints)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Investments"))
        .style(Style::default().fg(Color::White));

    f.render_widget(table, area);
}

fn render_form_dialog(f: &mut Frame, form: &InvestmentForm, fund_names: &[String]) {
    let popup_area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, popup_area);

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Add Investment ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));
    f.render_widget(main_block, popup_area);

    let fields = form.visible_fields();
    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(popup_area);

    let mut name_area = None;
    for (i, field) in fields.iter().enumerate() {
        let focused = *field == form.focus();
        let border = if focused { Color::Yellow } else { Color::Gray };
        let mut value = form.value(*field).to_string();
        if focused && *field != Field::Type {
            value.push('▌');
        }
        if *field == Field::Type {
            value = format!("◀ {value} ▶");
        }
        let input = Paragraph::new(value)
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(format!(" {} ", field.label())),
            );
        f.render_widget(input, layout[i]);
        if *field == Field::Name {
            name_area = Some(layout[i]);
        }
    }

    if form.kind().is_none() {
        let hint = Paragraph::new("Choose an investment type with Space to continue")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(hint, layout[fields.len()]);
    } else if fund_names.is_empty() {
        let hint = Paragraph::new("No fund list loaded; type the fund name")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(hint, layout[fields.len()]);
    }

    // Suggestions drop down below the name input
    if let Some(input_area) = name_area {
        let candidates = form.name.visible_candidates();
        let height = (candidates.len() as u16 + 2).min(8);
        let list_area = Rect {
            x: input_area.x,
            y: input_area.y + input_area.height,
            width: input_area.width,
            height: height.min(f.area().height.saturating_sub(input_area.y + input_area.height)),
        };
        let component_area = if form.name.is_open() {
            input_area.union(list_area)
        } else {
            input_area
        };
        form.name.set_areas(component_area, list_area);

        if form.name.is_open() {
            let items: Vec<ListItem> = candidates
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let style = if i == form.name.highlighted() {
                        Style::default().fg(Color::Black).bg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Span::styled(name.as_str(), style))
                })
                .collect();
            f.render_widget(Clear, list_area);
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .style(Style::default().bg(Color::Black)),
            );
            f.render_widget(list, list_area);
        }
    }
}

fn render_confirm_reset(f: &mut Frame) {
    let popup_area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new("Delete all saved investments? (y/n)")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Reset Data")
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn render_error_popup(f: &mut Frame, error: &str) {
    let popup_area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, popup_area);

    let error_paragraph = Paragraph::new(error)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
