use crate::models::difficulty::Difficulty;
use crate::models::question::{Label, QuestionRecord};

use super::score::ScoreState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong { correct: Label },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("no question loaded")]
    NoQuestion,
    #[error("question already answered with {0}")]
    AlreadyAnswered(Label),
}

/// Everything the player sees between requests.
#[derive(Debug, Clone)]
pub struct PlaySession {
    pub category: String,
    pub difficulty: Difficulty,
    question: Option<QuestionRecord>,
    selected: Option<Label>,
    score: ScoreState,
}

impl Default for PlaySession {
    fn default() -> Self {
        Self::new("general knowledge", Difficulty::Progressive)
    }
}

impl PlaySession {
    pub fn new(category: &str, difficulty: Difficulty) -> Self {
        Self {
            category: category.to_string(),
            difficulty,
            question: None,
            selected: None,
            score: ScoreState::default(),
        }
    }

    pub fn question(&self) -> Option<&QuestionRecord> {
        self.question.as_ref()
    }

    pub fn selected(&self) -> Option<Label> {
        self.selected
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    pub fn load(&mut self, record: QuestionRecord) {
        self.question = Some(record);
        self.selected = None;
    }

    /// Grades the current question. Each question counts once.
    pub fn select(&mut self, label: Label) -> Result<Outcome, SelectError> {
        let question = self.question.as_ref().ok_or(SelectError::NoQuestion)?;
        if let Some(previous) = self.selected {
            return Err(SelectError::AlreadyAnswered(previous));
        }

        self.selected = Some(label);
        let correct = label == question.answer;
        self.score.record(correct);
        Ok(if correct {
            Outcome::Correct
        } else {
            Outcome::Wrong {
                correct: question.answer,
            }
        })
    }

    pub fn reset(&mut self) {
        self.score.reset();
        self.question = None;
        self.selected = None;
    }
}
