use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty band controlling the question pool and the time limit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[strum(serialize = "easy")]
    Easy,
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "hard")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn time_limit_secs(&self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub fn pool(&self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => EASY_POOL,
            Difficulty::Medium => MEDIUM_POOL,
            Difficulty::Hard => HARD_POOL,
        }
    }
}

/// Slot layout every interview follows: two of each band, easiest first
pub const QUESTION_TEMPLATE: [Difficulty; 6] = [
    Difficulty::Easy,
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Hard,
];

pub const QUESTIONS_PER_INTERVIEW: usize = QUESTION_TEMPLATE.len();

const EASY_POOL: &[&str] = &[
    "What is the difference between var, let, and const in JavaScript?",
    "Explain what React components are and how they work.",
    "What is the purpose of the useState hook in React?",
    "What is the difference between == and === in JavaScript?",
    "What is npm and what is it used for?",
    "Explain the concept of the virtual DOM in React.",
];

const MEDIUM_POOL: &[&str] = &[
    "Explain the concept of closures in JavaScript with an example.",
    "What are React hooks and why were they introduced? Name at least 3 hooks.",
    "How does asynchronous programming work in JavaScript? Explain Promises.",
    "What is the difference between REST and GraphQL?",
    "Explain the event loop in JavaScript and how it handles asynchronous operations.",
    "What are controlled and uncontrolled components in React?",
];

const HARD_POOL: &[&str] = &[
    "Design a scalable Node.js application architecture for handling 10,000+ concurrent users.",
    "Explain React's reconciliation algorithm and how it optimizes re-renders.",
    "Implement a debounce function from scratch and explain when you'd use it.",
    "How would you optimize a React application for performance? Discuss at least 5 techniques.",
    "Explain the differences between SQL and NoSQL databases and when to use each.",
    "Design a real-time chat application using WebSockets. What challenges would you face?",
];

/// One interview question and, once answered, its result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
    pub difficulty: Difficulty,
    pub time_limit_secs: u32,
    pub answer: Option<String>,
    pub score: Option<f64>,
    pub elapsed_secs: Option<u32>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            difficulty,
            time_limit_secs: difficulty.time_limit_secs(),
            answer: None,
            score: None,
            elapsed_secs: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Draws the questions for a new interview.
///
/// Each slot of [`QUESTION_TEMPLATE`] picks uniformly from its band's pool.
/// Slots are independent, so the same prompt may be drawn twice.
pub fn generate_questions<R: Rng + ?Sized>(rng: &mut R) -> Vec<Question> {
    QUESTION_TEMPLATE
        .iter()
        .map(|&difficulty| {
            let prompt = difficulty
                .pool()
                .choose(rng)
                .copied()
                .unwrap_or_default();
            Question::new(prompt, difficulty)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_template_order_and_limits() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = generate_questions(&mut rng);

        assert_eq!(questions.len(), 6);
        let bands: Vec<Difficulty> = questions.iter().map(|q| q.difficulty).collect();
        assert_eq!(bands, QUESTION_TEMPLATE.to_vec());

        let limits: Vec<u32> = questions.iter().map(|q| q.time_limit_secs).collect();
        assert_eq!(limits, vec![20, 20, 60, 60, 120, 120]);
    }

    #[test]
    fn test_questions_come_from_matching_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            for q in generate_questions(&mut rng) {
                assert!(q.difficulty.pool().contains(&q.prompt.as_str()));
            }
        }
    }

    #[test]
    fn test_generated_questions_are_unanswered() {
        let mut rng = StdRng::seed_from_u64(1);
        let questions = generate_questions(&mut rng);
        assert!(questions.iter().all(|q| !q.is_answered()));
        assert!(questions.iter().all(|q| q.score.is_none()));
        assert!(questions.iter().all(|q| q.elapsed_secs.is_none()));
    }

    #[test]
    fn test_seeded_draw_is_reproducible() {
        let a: Vec<String> = generate_questions(&mut StdRng::seed_from_u64(99))
            .into_iter()
            .map(|q| q.prompt)
            .collect();
        let b: Vec<String> = generate_questions(&mut StdRng::seed_from_u64(99))
            .into_iter()
            .map(|q| q.prompt)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_question_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions(&mut rng);
        let mut ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_difficulty_display() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let back: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(back, Difficulty::Medium);
    }
}
