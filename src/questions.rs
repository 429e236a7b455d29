//! Question bank loading, validation, and shuffling.
//!
//! The state machines never see questions; the runner consumes a
//! [`QuestionDeck`] and feeds the sessions plain correct/incorrect events.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Difficulty tag carried by each bank entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Warm-up questions.
    Easy,
    /// Regular questions.
    Medium,
    /// Expert questions.
    Hard,
}

/// One entry of the question bank, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier.
    pub id: u32,
    /// Category label, used for level filtering.
    pub category: String,
    /// Question text.
    #[serde(rename = "question")]
    pub text: String,
    /// Answer options in bank order.
    pub options: Vec<String>,
    /// Index of the correct entry in `options`.
    #[serde(rename = "correctAnswer")]
    pub correct_option: usize,
    /// Difficulty tag.
    pub difficulty: Difficulty,
}

/// A question whose options were shuffled for presentation.
#[derive(Debug, Clone)]
pub struct ShuffledQuestion {
    /// The underlying bank entry.
    pub question: Question,
    /// Options in presentation order.
    pub options: Vec<String>,
    /// Index of the correct entry in the shuffled `options`.
    pub correct_option: usize,
}

impl ShuffledQuestion {
    /// Whether the selected presentation index is the correct answer.
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option
    }
}

/// Ordered sequence of shuffled questions consumed by the runner.
#[derive(Debug, Clone)]
pub struct QuestionDeck {
    questions: Vec<ShuffledQuestion>,
    cursor: usize,
}

impl QuestionDeck {
    /// Parse a JSON question bank and build a shuffled deck from it.
    pub fn from_json(
        raw: &str,
        limit: Option<usize>,
        rng: &mut impl Rng,
    ) -> Result<Self, EngineError> {
        let bank: Vec<Question> = serde_json::from_str(raw)?;
        Self::build(bank, limit, rng)
    }

    /// Build a deck from a validated bank: shuffle question order, truncate
    /// to `limit` when one is given, then shuffle each question's options.
    pub fn build(
        mut bank: Vec<Question>,
        limit: Option<usize>,
        rng: &mut impl Rng,
    ) -> Result<Self, EngineError> {
        for question in &bank {
            validate_question(question)?;
        }
        bank.shuffle(rng);
        if let Some(limit) = limit {
            bank.truncate(limit);
        }
        let questions = bank
            .into_iter()
            .map(|question| shuffle_options(question, rng))
            .collect();
        Ok(Self {
            questions,
            cursor: 0,
        })
    }

    /// Total number of questions in the deck.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the deck holds no questions at all.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question currently being asked, if any remain.
    pub fn current(&self) -> Option<&ShuffledQuestion> {
        self.questions.get(self.cursor)
    }

    /// Advance past the current question, returning the next one.
    pub fn advance(&mut self) -> Option<&ShuffledQuestion> {
        self.cursor = (self.cursor + 1).min(self.questions.len());
        self.questions.get(self.cursor)
    }
}

fn validate_question(question: &Question) -> Result<(), EngineError> {
    if question.options.len() < 2 {
        return Err(EngineError::InvalidQuestion {
            id: question.id,
            message: "at least two options are required".into(),
        });
    }
    if question.correct_option >= question.options.len() {
        return Err(EngineError::InvalidQuestion {
            id: question.id,
            message: "correct option index out of range".into(),
        });
    }
    Ok(())
}

/// Shuffle a question's options while tracking the relocated correct index.
fn shuffle_options(question: Question, rng: &mut impl Rng) -> ShuffledQuestion {
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    order.shuffle(rng);
    let options = order
        .iter()
        .map(|&index| question.options[index].clone())
        .collect();
    let correct_option = order
        .iter()
        .position(|&index| index == question.correct_option)
        .unwrap_or(0);
    ShuffledQuestion {
        question,
        options,
        correct_option,
    }
}
