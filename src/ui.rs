pub mod chat;
pub mod dashboard;
pub mod format;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Widget, Wrap},
};

use crate::app::Tab;
use crate::candidate::CandidateStatus;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 1;
const MODAL_WIDTH: u16 = 60;
const MODAL_HEIGHT: u16 = 9;

/// Rect of at most `width` x `height` centered in `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let counts = format!(
        " {} completed · {} in progress ",
        app.store.count_with_status(CandidateStatus::Completed),
        app.store.count_with_status(CandidateStatus::InProgress),
    );
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    Tabs::new(Tab::ALL.iter().map(|t| t.to_string()))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Interview Assistant ")
                .title(Line::from(counts).alignment(Alignment::Right)),
        )
        .render(area, buf);
}

fn help_line(app: &App) -> &'static str {
    if app.show_welcome_back {
        return "c continue · s start over · esc quit";
    }
    match app.tab {
        Tab::Interviewee => "enter submit · tab dashboard · esc quit",
        Tab::Interviewer if app.dashboard.viewing_detail => "← back · tab chat · esc quit",
        Tab::Interviewer => "type to search · ↑↓ select · enter details · F2 sort · tab chat · esc quit",
    }
}

fn render_welcome_back(app: &App, area: Rect, buf: &mut Buffer) {
    let modal = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
    Clear.render(modal, buf);

    let who = app
        .session
        .candidate_id()
        .and_then(|id| app.store.get(id))
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    Paragraph::new(vec![
        Line::from(Span::styled(format!("Welcome back {who}!"), bold)),
        Line::default(),
        Line::raw(format!(
            "You have an unfinished interview at question {} of {}.",
            app.session.question_index() + 1,
            crate::questions::QUESTIONS_PER_INTERVIEW
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("c", bold.fg(Color::Green)),
            Span::raw(" continue    "),
            Span::styled("s", bold.fg(Color::Red)),
            Span::raw(" start over"),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Welcome back "),
    )
    .render(modal, buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(self, chunks[0], buf);
        match self.tab {
            Tab::Interviewee => chat::render_chat(self, chunks[1], buf),
            Tab::Interviewer => dashboard::render_dashboard(self, chunks[1], buf),
        }
        Paragraph::new(Span::styled(
            help_line(self),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        if self.show_welcome_back {
            render_welcome_back(self, area, buf);
        }
    }
}
