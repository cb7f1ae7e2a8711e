use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::questions::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    #[strum(serialize = "pending")]
    Pending,
    #[strum(serialize = "in progress")]
    InProgress,
    #[strum(serialize = "completed")]
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_text: String,
    pub questions: Vec<Question>,
    pub final_score: f64,
    pub summary: String,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        resume_text: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            resume_text: resume_text.into(),
            questions,
            final_score: 0.0,
            summary: String::new(),
            status: CandidateStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    /// Mean of the scores recorded so far, for candidates still in progress
    pub fn running_average(&self) -> Option<f64> {
        let scores: Vec<f64> = self.questions.iter().filter_map(|q| q.score).collect();
        crate::util::mean(&scores)
    }

    pub fn is_completed(&self) -> bool {
        self.status == CandidateStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum SortBy {
    #[default]
    Score,
    Date,
    Name,
}

impl SortBy {
    pub fn next(self) -> Self {
        match self {
            SortBy::Score => SortBy::Date,
            SortBy::Date => SortBy::Name,
            SortBy::Name => SortBy::Score,
        }
    }

    fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
        match self {
            SortBy::Score => b
                .final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal),
            SortBy::Date => b.created_at.cmp(&a.created_at),
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// Every candidate seen so far, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateStore {
    candidates: Vec<Candidate>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, candidate: Candidate) -> Uuid {
        let id = candidate.id;
        self.candidates.push(candidate);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Applies `f` to the candidate with `id`; returns false when there is none
    pub fn update<F: FnOnce(&mut Candidate)>(&mut self, id: Uuid, f: F) -> bool {
        match self.candidates.iter_mut().find(|c| c.id == id) {
            Some(candidate) => {
                f(candidate);
                true
            }
            None => false,
        }
    }

    pub fn record_answer(
        &mut self,
        id: Uuid,
        index: usize,
        answer: String,
        score: f64,
        elapsed_secs: u32,
    ) -> bool {
        self.update(id, |candidate| {
            if let Some(question) = candidate.questions.get_mut(index) {
                question.answer = Some(answer);
                question.score = Some(score);
                question.elapsed_secs = Some(elapsed_secs);
            }
        })
    }

    pub fn complete(
        &mut self,
        id: Uuid,
        final_score: f64,
        summary: String,
        at: DateTime<Utc>,
    ) -> bool {
        self.update(id, |candidate| {
            candidate.final_score = final_score;
            candidate.summary = summary;
            candidate.status = CandidateStatus::Completed;
            candidate.completed_at = Some(at);
        })
    }

    pub fn all(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn count_with_status(&self, status: CandidateStatus) -> usize {
        self.candidates.iter().filter(|c| c.status == status).count()
    }

    /// Dashboard listing: case-insensitive match on name or email, then sorted
    pub fn search(&self, term: &str, sort_by: SortBy) -> Vec<&Candidate> {
        let needle = term.trim().to_lowercase();
        self.candidates
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .sorted_by(|a, b| sort_by.compare(a, b))
            .collect()
    }
}
