use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::questions::QUESTIONS_PER_INTERVIEW;
use crate::session::{Author, ChatMessage, InterviewSession, Phase};
use crate::App;

use super::format::{clock, timer_color};

const INDENT: &str = "  ";

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;

        for word in raw.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(!line.is_empty());

            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if line_width + w > width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }
        out.push(line);
    }
    out
}

fn message_lines(msg: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let (who, color) = match msg.author {
        Author::Bot => ("Interviewer", Color::Magenta),
        Author::Candidate => ("You", Color::Cyan),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            who,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", msg.at.with_timezone(&Local).format("%H:%M")),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ])];

    let body_width = width.saturating_sub(INDENT.len());
    lines.extend(
        wrap_text(&msg.text, body_width)
            .into_iter()
            .map(|l| Line::raw(format!("{INDENT}{l}"))),
    );
    lines.push(Line::default());
    lines
}

fn render_transcript(session: &InterviewSession, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title(" Chat ");
    let inner = block.inner(area);
    block.render(area, buf);

    let mut lines: Vec<Line> = session
        .transcript()
        .iter()
        .flat_map(|m| message_lines(m, inner.width as usize))
        .collect();

    // keep the newest messages in view
    let overflow = lines.len().saturating_sub(inner.height as usize);
    lines.drain(..overflow);
    Paragraph::new(lines).render(inner, buf);
}

fn render_progress(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let answered = session.question_index();
    let label = match app.session.current_question(&app.store) {
        Some(q) => format!(
            "Question {}/{} · {}",
            answered + 1,
            QUESTIONS_PER_INTERVIEW,
            q.difficulty.to_string().to_uppercase()
        ),
        None => format!("Question {}/{}", answered + 1, QUESTIONS_PER_INTERVIEW),
    };
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(answered as f64 / QUESTIONS_PER_INTERVIEW as f64)
        .label(label)
        .render(chunks[0], buf);

    if let Some(countdown) = session.countdown() {
        let fraction = countdown.fraction_remaining().clamp(0.0, 1.0);
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Time left "))
            .gauge_style(
                Style::default()
                    .fg(timer_color(fraction))
                    .add_modifier(Modifier::BOLD),
            )
            .ratio(fraction)
            .label(clock(countdown.remaining_secs()))
            .render(chunks[1], buf);
    }
}

fn input_title(session: &InterviewSession) -> String {
    match session.phase() {
        Phase::Idle => " Resume path (.pdf, .docx, .txt, .md) ".to_string(),
        Phase::CollectingInfo => match session.missing_fields().first() {
            Some(field) => format!(" Your {field} "),
            None => " Your details ".to_string(),
        },
        Phase::Active => " Your answer (Enter to submit) ".to_string(),
        Phase::Completed => " Another resume path to start a new interview ".to_string(),
    }
}

fn render_input(session: &InterviewSession, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(input_title(session))
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    block.render(area, buf);

    // show the tail of long drafts so the cursor stays visible
    let room = (inner.width as usize).saturating_sub(1);
    let mut shown = String::new();
    let mut used = 0;
    for c in session.draft.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        used += w;
        shown.insert(0, c);
    }

    Paragraph::new(Line::from(vec![
        Span::raw(shown),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .render(inner, buf);
}

pub fn render_chat(app: &App, area: Rect, buf: &mut Buffer) {
    let progress_rows = if app.session.is_active() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(progress_rows),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    if app.session.is_active() {
        render_progress(app, chunks[0], buf);
    }
    render_transcript(&app.session, chunks[1], buf);
    render_input(&app.session, chunks[2], buf);
}
