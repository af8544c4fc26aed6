use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::{Path, PathBuf};

use crate::loader;
use crate::models::Job;
use crate::query::{Criteria, FilterChoices, SortKey, SortOrder};

struct AppState {
    path: PathBuf,
    jobs: Vec<Job>,
    choices: FilterChoices,
    // Cycle position per filter: 0 is All, i selects the (i-1)th choice.
    level: usize,
    job_type: usize,
    skill: usize,
    search: String,
    sort: SortKey,
    order: SortOrder,
    filtered: Vec<Job>,
    selected: usize,
    searching: bool,
    detail_open: bool,
    detail_scroll: u16,
    notice: Option<String>,
}

impl AppState {
    fn new(path: PathBuf, jobs: Vec<Job>) -> Self {
        let choices = FilterChoices::derive(&jobs);
        let mut state = Self {
            path,
            jobs,
            choices,
            level: 0,
            job_type: 0,
            skill: 0,
            search: String::new(),
            sort: SortKey::default(),
            order: SortOrder::default(),
            filtered: Vec::new(),
            selected: 0,
            searching: false,
            detail_open: false,
            detail_scroll: 0,
            notice: None,
        };
        state.refresh();
        state
    }

    fn criteria(&self) -> Criteria {
        Criteria {
            level: pick(&self.choices.levels, self.level),
            job_type: pick(&self.choices.types, self.job_type),
            skill: pick(&self.choices.skills, self.skill),
            search: self.search.clone(),
            sort: self.sort,
            order: self.order,
        }
    }

    /// Re-run the query and keep the selection in bounds.
    fn refresh(&mut self) {
        self.filtered = self.criteria().apply(&self.jobs);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }

    fn current_job(&self) -> Option<&Job> {
        self.filtered.get(self.selected)
    }

    fn next(&mut self) {
        if !self.filtered.is_empty() && self.selected < self.filtered.len() - 1 {
            self.selected += 1;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn cycle_level(&mut self) {
        self.level = (self.level + 1) % (self.choices.levels.len() + 1);
        self.refresh();
    }

    fn cycle_type(&mut self) {
        self.job_type = (self.job_type + 1) % (self.choices.types.len() + 1);
        self.refresh();
    }

    fn cycle_skill(&mut self) {
        self.skill = (self.skill + 1) % (self.choices.skills.len() + 1);
        self.refresh();
    }

    fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.refresh();
    }

    fn flip_order(&mut self) {
        self.order = self.order.flip();
        self.refresh();
    }

    fn clear_filters(&mut self) {
        self.level = 0;
        self.job_type = 0;
        self.skill = 0;
        self.search.clear();
        self.refresh();
    }

    /// Replace everything with a fresh load of the same file. A failed read
    /// or parse keeps the current records and selections untouched.
    fn reload(&mut self) {
        match loader::read_jobs(&self.path) {
            Ok(jobs) => {
                self.jobs = jobs;
                self.choices = FilterChoices::derive(&self.jobs);
                // Rebuilding the choices resets the level/type/skill cycles
                // to All; search text and sort selections carry over.
                self.level = 0;
                self.job_type = 0;
                self.skill = 0;
                self.notice = Some(format!("Loaded {} jobs", self.jobs.len()));
                self.refresh();
            }
            Err(err) => {
                self.notice = Some(format!("Reload failed: {err}"));
            }
        }
    }

    fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(3);
    }
}

/// Map a cycle position to a concrete filter value; position 0 is All.
fn pick(values: &[String], index: usize) -> Option<String> {
    if index == 0 {
        None
    } else {
        values.get(index - 1).cloned()
    }
}

fn choice_label(values: &[String], index: usize) -> &str {
    if index == 0 {
        "All"
    } else {
        values.get(index - 1).map(String::as_str).unwrap_or("All")
    }
}

pub fn run_browse(path: &Path) -> Result<()> {
    let jobs = loader::read_jobs(path)?;
    if jobs.is_empty() {
        println!("No jobs in file.");
        return Ok(());
    }

    let mut state = AppState::new(path.to_path_buf(), jobs);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        if state.filtered.is_empty() {
            list_state.select(None);
        } else {
            list_state.select(Some(state.selected));
        }

        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if state.searching {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => state.searching = false,
                    KeyCode::Backspace => {
                        state.search.pop();
                        state.refresh();
                    }
                    KeyCode::Char(c) => {
                        state.search.push(c);
                        state.refresh();
                    }
                    _ => {}
                }
                continue;
            }

            if state.detail_open {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                        state.detail_open = false;
                        state.detail_scroll = 0;
                    }
                    KeyCode::Down | KeyCode::Char('j') => state.scroll_down(),
                    KeyCode::Up | KeyCode::Char('k') => state.scroll_up(),
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Enter => {
                    if state.current_job().is_some() {
                        state.detail_open = true;
                        state.detail_scroll = 0;
                    }
                }
                KeyCode::Char('/') => state.searching = true,
                KeyCode::Char('l') => state.cycle_level(),
                KeyCode::Char('t') => state.cycle_type(),
                KeyCode::Char('s') => state.cycle_skill(),
                KeyCode::Char('o') => state.cycle_sort(),
                KeyCode::Char('d') => state.flip_order(),
                KeyCode::Char('c') => state.clear_filters(),
                KeyCode::Char('r') => state.reload(),
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_controls(frame, state, chunks[0]);

    // Middle panel: one summary line per matching job
    let items: Vec<ListItem> = state
        .filtered
        .iter()
        .map(|job| ListItem::new(job.summary()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Jobs ({}/{}) ",
            state.filtered.len(),
            state.jobs.len()
        )))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], list_state);

    let help = Paragraph::new(
        " j/k:navigate  Enter:detail  /:search  l/t/s:filters  o:sort  d:order  c:clear  r:reload  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);

    if state.detail_open {
        draw_detail_popup(frame, state);
    }
}

fn draw_controls(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(format!(
        " Level: {}  Type: {}  Skill: {}  Sort: {} ({})",
        choice_label(&state.choices.levels, state.level),
        choice_label(&state.choices.types, state.job_type),
        choice_label(&state.choices.skills, state.skill),
        state.sort.label(),
        state.order.label(),
    )));

    let search = if state.searching {
        format!(" Search: {}_", state.search)
    } else if state.search.is_empty() {
        " Search: (press / to type)".to_string()
    } else {
        format!(" Search: {}", state.search)
    };
    let mut spans = vec![Span::raw(search)];
    if let Some(notice) = &state.notice {
        spans.push(Span::styled(
            format!("   {}", notice),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::from(spans));

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn draw_detail_popup(frame: &mut Frame, state: &AppState) {
    let Some(job) = state.current_job() else {
        return;
    };

    let area = centered_rect(frame.area(), 80, 80);
    frame.render_widget(Clear, area);

    let detail = build_detail(job, area.width.saturating_sub(4));
    let widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Job Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0));
    frame.render_widget(widget, area);
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

fn build_detail(job: &Job, width: u16) -> Text<'_> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        job.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Job No: {}", job.job_no)));
    lines.push(Line::from(format!("Posted: {}", job.posted)));
    lines.push(Line::from(format!("Type: {}", job.job_type)));
    lines.push(Line::from(format!("Level: {}", job.level)));
    lines.push(Line::from(format!("Estimated Time: {}", job.estimated_time)));
    lines.push(Line::from(format!("Skill: {}", job.skill)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Detail",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for line in textwrap::fill(&job.detail, width.max(20) as usize).lines() {
        lines.push(Line::from(line.to_string()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Link: {}", job.link)));

    Text::from(lines)
}
