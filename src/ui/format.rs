use chrono::{DateTime, Local, Utc};
use ratatui::style::Color;

use crate::summary::PerformanceBand;

pub const AMBER: Color = Color::Rgb(255, 165, 0);

/// Score label without a trailing `.0`
pub fn format_score(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}

pub fn score_color(score: f64) -> Color {
    match PerformanceBand::from_average(score) {
        PerformanceBand::Excellent => Color::Green,
        PerformanceBand::Good => Color::Cyan,
        PerformanceBand::Fair => Color::Yellow,
        PerformanceBand::NeedsImprovement => Color::Red,
    }
}

/// `m:ss`
pub fn clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn timer_color(fraction_remaining: f64) -> Color {
    if fraction_remaining <= 0.10 {
        Color::Red
    } else if fraction_remaining <= 0.25 {
        AMBER
    } else {
        Color::Green
    }
}

pub fn local_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
