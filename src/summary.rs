use crate::questions::{Difficulty, Question};
use crate::util::{mean, round_to_tenth};

/// Qualitative band for an overall average
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PerformanceBand {
    Excellent,
    Good,
    Fair,
    #[strum(serialize = "Needs Improvement")]
    NeedsImprovement,
}

impl PerformanceBand {
    pub fn from_average(average: f64) -> Self {
        if average >= 8.0 {
            PerformanceBand::Excellent
        } else if average >= 6.0 {
            PerformanceBand::Good
        } else if average >= 4.0 {
            PerformanceBand::Fair
        } else {
            PerformanceBand::NeedsImprovement
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Strong candidate with comprehensive technical knowledge. Highly recommended for senior positions.",
            PerformanceBand::Good => "Solid technical foundation with room for growth. Suitable for mid-level positions.",
            PerformanceBand::Fair => "Basic understanding demonstrated. May be suitable for junior positions with mentoring.",
            PerformanceBand::NeedsImprovement => "Limited technical knowledge shown. Additional training and experience recommended.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSummary {
    pub score: f64,
    pub band: PerformanceBand,
    pub text: String,
}

fn scores_of<'a>(questions: impl Iterator<Item = &'a Question>) -> Vec<f64> {
    questions.map(|q| q.score.unwrap_or(0.0)).collect()
}

fn band_average(questions: &[Question], difficulty: Difficulty) -> f64 {
    let scores = scores_of(questions.iter().filter(|q| q.difficulty == difficulty));
    mean(&scores).unwrap_or(0.0)
}

fn descriptor(average: f64, words: [&'static str; 3]) -> &'static str {
    if average > 6.0 {
        words[0]
    } else if average > 4.0 {
        words[1]
    } else {
        words[2]
    }
}

/// Aggregates the scored questions into a final score and a written report.
///
/// Unscored questions count as zero. An empty band averages to zero.
pub fn generate_summary(questions: &[Question]) -> InterviewSummary {
    let average = mean(&scores_of(questions.iter())).unwrap_or(0.0);
    let easy = band_average(questions, Difficulty::Easy);
    let medium = band_average(questions, Difficulty::Medium);
    let hard = band_average(questions, Difficulty::Hard);
    let band = PerformanceBand::from_average(average);

    let text = format!(
        "Overall Performance: {band} ({average:.1}/10)\n\
         \n\
         Breakdown:\n\
         • Easy Questions: {easy:.1}/10\n\
         • Medium Questions: {medium:.1}/10\n\
         • Hard Questions: {hard:.1}/10\n\
         \n\
         {recommendation}\n\
         \n\
         The candidate showed {foundation} foundational knowledge, {intermediate} intermediate skills, and {advanced} advanced problem-solving abilities.",
        recommendation = band.recommendation(),
        foundation = descriptor(easy, ["strong", "adequate", "weak"]),
        intermediate = descriptor(medium, ["good", "fair", "limited"]),
        advanced = descriptor(hard, ["impressive", "developing", "minimal"]),
    );

    InterviewSummary {
        score: round_to_tenth(average),
        band,
        text,
    }
}
