use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::candidate::{Candidate, CandidateStore};
use crate::error::ExportError;

#[derive(Debug, Serialize)]
struct CandidateRow<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    status: String,
    final_score: Option<f64>,
    answered: String,
    created_at: String,
    completed_at: String,
}

impl<'a> From<&'a Candidate> for CandidateRow<'a> {
    fn from(c: &'a Candidate) -> Self {
        Self {
            name: &c.name,
            email: &c.email,
            phone: &c.phone,
            status: c.status.to_string(),
            final_score: c.is_completed().then_some(c.final_score),
            answered: format!("{}/{}", c.answered_count(), c.questions.len()),
            created_at: c.created_at.to_rfc3339(),
            completed_at: c.completed_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        }
    }
}

/// Writes one CSV row per candidate, in insertion order
pub fn write_csv<W: Write>(store: &CandidateStore, writer: W) -> Result<usize, ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for candidate in store.all() {
        wtr.serialize(CandidateRow::from(candidate))?;
    }
    wtr.flush()?;
    Ok(store.len())
}

pub fn export_to_path(store: &CandidateStore, path: &Path) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    let rows = write_csv(store, file)?;
    tracing::info!(path = %path.display(), rows, "candidates exported");
    Ok(rows)
}
