//! Quiz Flow
//!
//! A [`Quiz`] wraps one [`ParsedMcq`] and tracks the learner's progress through
//! it. Learning pathways stay locked until the question has been either
//! submitted or skipped.

use crate::mcq::{AnswerLetter, ParsedMcq, option_letter};
use serde::Serialize;
use tracing::debug;

/// The answer state of a quiz.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    /// Waiting for a submission. The current selection may change freely.
    Unanswered { selected: Option<AnswerLetter> },
    /// The selection was submitted and graded.
    Submitted { selected: AnswerLetter, correct: bool },
    /// The learner chose not to answer.
    Skipped,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no option has been selected")]
    NoSelection,
    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),
    #[error("the question has already been answered or skipped")]
    Finished,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    mcq: ParsedMcq,
    state: QuizState,
}

impl Quiz {
    pub fn new(mcq: ParsedMcq) -> Self {
        Self {
            mcq,
            state: QuizState::Unanswered { selected: None },
        }
    }

    pub fn mcq(&self) -> &ParsedMcq {
        &self.mcq
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    /// Records `letter` as the current selection.
    pub fn select(&mut self, letter: AnswerLetter) -> Result<(), QuizError> {
        let QuizState::Unanswered { .. } = self.state else {
            return Err(QuizError::Finished);
        };
        if self.mcq.option_for(letter).is_none() {
            return Err(QuizError::UnknownOption(letter.to_string()));
        }
        self.state = QuizState::Unanswered {
            selected: Some(letter),
        };
        Ok(())
    }

    /// Selects by option line (`"B) Organ"`), as the UI reports clicks.
    pub fn select_option(&mut self, option: &str) -> Result<(), QuizError> {
        let letter =
            option_letter(option).ok_or_else(|| QuizError::UnknownOption(option.to_string()))?;
        self.select(letter)
    }

    /// Grades the current selection and returns whether it was correct.
    pub fn submit(&mut self) -> Result<bool, QuizError> {
        match self.state {
            QuizState::Unanswered {
                selected: Some(selected),
            } => {
                let correct = self.mcq.is_correct(selected);
                debug!(%selected, correct, "Quiz answer submitted");
                self.state = QuizState::Submitted { selected, correct };
                Ok(correct)
            }
            QuizState::Unanswered { selected: None } => Err(QuizError::NoSelection),
            _ => Err(QuizError::Finished),
        }
    }

    /// Returns to an unanswered state with no selection. Skipping is final.
    pub fn reset(&mut self) -> Result<(), QuizError> {
        if self.state == QuizState::Skipped {
            return Err(QuizError::Finished);
        }
        self.state = QuizState::Unanswered { selected: None };
        Ok(())
    }

    pub fn skip(&mut self) -> Result<(), QuizError> {
        let QuizState::Unanswered { .. } = self.state else {
            return Err(QuizError::Finished);
        };
        self.state = QuizState::Skipped;
        Ok(())
    }

    pub fn unlocks_pathways(&self) -> bool {
        matches!(
            self.state,
            QuizState::Submitted { .. } | QuizState::Skipped
        )
    }
}
