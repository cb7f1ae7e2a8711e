use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};

use crate::candidate::{Candidate, CandidateStatus};
use crate::App;

use super::format::{format_score, local_timestamp, score_color};

/// Score cell: final score once completed, a running average marked `~` while in progress
fn score_cell(candidate: &Candidate) -> Cell<'static> {
    match candidate.status {
        CandidateStatus::Completed => Cell::from(format_score(candidate.final_score)).style(
            Style::default()
                .fg(score_color(candidate.final_score))
                .add_modifier(Modifier::BOLD),
        ),
        _ => match candidate.running_average() {
            Some(avg) => Cell::from(format!("~{}", format_score(avg)))
                .style(Style::default().add_modifier(Modifier::DIM)),
            None => Cell::from("—"),
        },
    }
}

fn status_style(status: CandidateStatus) -> Style {
    match status {
        CandidateStatus::Completed => Style::default().fg(Color::Green),
        CandidateStatus::InProgress => Style::default().fg(Color::Yellow),
        CandidateStatus::Pending => Style::default().add_modifier(Modifier::DIM),
    }
}

pub fn present_row(candidate: &Candidate) -> Row<'static> {
    let name = if candidate.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        candidate.name.clone()
    };
    Row::new(vec![
        Cell::from(name).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(candidate.email.clone()),
        Cell::from(candidate.status.to_string()).style(status_style(candidate.status)),
        score_cell(candidate),
        Cell::from(format!(
            "{}/{}",
            candidate.answered_count(),
            candidate.questions.len()
        )),
        Cell::from(local_timestamp(&candidate.created_at)),
    ])
}

fn render_list(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::raw(app.dashboard.search.clone()),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search name or email "),
    )
    .render(chunks[0], buf);

    let candidates = app.visible_candidates();
    let title = format!(
        " Candidates ({}) · sorted by {} ",
        candidates.len(),
        app.dashboard.sort_by.to_string().to_lowercase()
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if candidates.is_empty() {
        let message = if app.store.is_empty() {
            "No interviews yet. Candidates appear here once they upload a resume."
        } else {
            "No candidates match the search."
        };
        Paragraph::new(Span::styled(
            message,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .block(block)
        .render(chunks[1], buf);
        return;
    }

    // header row plus borders
    let visible_rows = (chunks[1].height as usize).saturating_sub(3).max(1);
    let selected = app.dashboard.selected.min(candidates.len() - 1);
    let offset = (selected + 1).saturating_sub(visible_rows);

    let rows: Vec<Row> = candidates
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(idx, c)| {
            let row = present_row(c);
            if idx == selected {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["Name", "Email", "Status", "Score", "Answered", "Started"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(28),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(17),
        ],
    )
    .header(header)
    .block(block)
    .render(chunks[1], buf);
}

pub fn detail_lines(candidate: &Candidate) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let field = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{label:<10}"), dim), Span::raw(value)])
    };

    let mut lines = vec![
        Line::from(Span::styled(candidate.name.clone(), bold)),
        field("Email", candidate.email.clone()),
        field("Phone", candidate.phone.clone()),
        field("Status", candidate.status.to_string()),
        field("Started", local_timestamp(&candidate.created_at)),
    ];
    if let Some(done) = &candidate.completed_at {
        lines.push(field("Finished", local_timestamp(done)));
    }
    if candidate.is_completed() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", "Score"), dim),
            Span::styled(
                format!("{}/10", format_score(candidate.final_score)),
                bold.fg(score_color(candidate.final_score)),
            ),
        ]));
        lines.push(Line::default());
        lines.extend(
            candidate
                .summary
                .lines()
                .map(|l| Line::raw(l.to_string())),
        );
    }

    for (idx, q) in candidate.questions.iter().enumerate() {
        lines.push(Line::default());
        let mut heading = vec![Span::styled(
            format!(
                "Q{} [{}] ",
                idx + 1,
                q.difficulty.to_string().to_uppercase()
            ),
            bold,
        )];
        if let Some(score) = q.score {
            heading.push(Span::styled(
                format!("{}/10", format_score(score)),
                Style::default().fg(score_color(score)),
            ));
        }
        if let Some(secs) = q.elapsed_secs {
            heading.push(Span::styled(
                format!("  {secs}s of {}s", q.time_limit_secs),
                dim,
            ));
        }
        lines.push(Line::from(heading));
        lines.push(Line::raw(q.prompt.clone()));
        lines.push(Line::from(Span::styled(
            format!(
                "› {}",
                q.answer.as_deref().unwrap_or("(not answered yet)")
            ),
            Style::default().fg(Color::Cyan),
        )));
    }
    lines
}

fn render_detail(candidate: &Candidate, area: Rect, buf: &mut Buffer) {
    Paragraph::new(detail_lines(candidate))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Candidate detail (← back) "),
        )
        .render(area, buf);
}

pub fn render_dashboard(app: &App, area: Rect, buf: &mut Buffer) {
    match app.selected_candidate() {
        Some(candidate) if app.dashboard.viewing_detail => render_detail(candidate, area, buf),
        _ => render_list(app, area, buf),
    }
}
