use serde::{Deserialize, Serialize};

use crate::questions::{Difficulty, Question};
use crate::util::round_to_tenth;

/// A length threshold: answers strictly longer than `min_chars` earn `points`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthTier {
    pub min_chars: usize,
    pub points: f64,
}

/// Tunable constants of the answer heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Checked in order, first match wins
    pub length_tiers: Vec<LengthTier>,
    pub floor_points: f64,
    pub easy_multiplier: f64,
    pub medium_multiplier: f64,
    pub hard_multiplier: f64,
    pub max_time_bonus: f64,
    pub keywords: Vec<String>,
    pub keyword_bonus: f64,
    pub max_keyword_bonus: f64,
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            length_tiers: vec![
                LengthTier {
                    min_chars: 200,
                    points: 8.0,
                },
                LengthTier {
                    min_chars: 100,
                    points: 6.0,
                },
                LengthTier {
                    min_chars: 50,
                    points: 4.0,
                },
                LengthTier {
                    min_chars: 20,
                    points: 2.0,
                },
            ],
            floor_points: 1.0,
            easy_multiplier: 1.0,
            medium_multiplier: 1.2,
            hard_multiplier: 1.5,
            max_time_bonus: 2.0,
            keywords: [
                "react",
                "javascript",
                "node",
                "api",
                "database",
                "component",
                "function",
                "async",
                "promise",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            keyword_bonus: 0.5,
            max_keyword_bonus: 2.0,
            max_score: 10.0,
        }
    }
}

impl ScoringConfig {
    pub fn base_points(&self, answer: &str) -> f64 {
        let length = answer.trim().chars().count();
        self.length_tiers
            .iter()
            .find(|tier| length > tier.min_chars)
            .map(|tier| tier.points)
            .unwrap_or(self.floor_points)
    }

    pub fn multiplier(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy_multiplier,
            Difficulty::Medium => self.medium_multiplier,
            Difficulty::Hard => self.hard_multiplier,
        }
    }

    pub fn time_bonus(&self, elapsed_secs: u32, limit_secs: u32) -> f64 {
        if limit_secs == 0 {
            return 0.0;
        }
        let efficiency = (1.0 - elapsed_secs as f64 / limit_secs as f64).max(0.0);
        efficiency * self.max_time_bonus
    }

    pub fn keyword_points(&self, answer: &str) -> f64 {
        let lowered = answer.to_lowercase();
        let matched = self
            .keywords
            .iter()
            .filter(|keyword| lowered.contains(&keyword.to_lowercase()))
            .count();
        (matched as f64 * self.keyword_bonus).min(self.max_keyword_bonus)
    }
}

/// Scores an answer on a 0-10 scale, rounded to one decimal.
pub fn score_answer(
    config: &ScoringConfig,
    question: &Question,
    answer: &str,
    elapsed_secs: u32,
) -> f64 {
    let raw = config.base_points(answer) * config.multiplier(question.difficulty)
        + config.time_bonus(elapsed_secs, question.time_limit_secs)
        + config.keyword_points(answer);

    round_to_tenth(raw.clamp(0.0, config.max_score))
}
