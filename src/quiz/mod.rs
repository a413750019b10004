pub mod similarity;

use thiserror::Error;

use crate::generate::QuestionItem;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    pub questions: Vec<QuestionItem>,
    pub current_index: usize,
    pub score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// no questions loaded yet
    Empty,
    InProgress,
    Complete,
    /// generation produced nothing to ask
    Failed,
}

/// Outcome of comparing one submitted answer with the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub similarity: u8,
    pub correct: bool,
    /// characters off from the expected answer
    pub distance: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("questions are already loaded, restart first")]
    AlreadyLoaded,

    #[error("no question is being asked (quiz is {0:?})")]
    NotInProgress(Phase),

    #[error("answer is empty")]
    BlankAnswer,

    #[error("answer the current question before moving on")]
    NotAnswered,
}

/// One quiz session.
///
/// The score only changes in [`Quiz::next`], so answering the same question
/// several times still counts it once.
#[derive(Debug, Default)]
pub struct Quiz {
    state: QuizState,
    pending: Option<Evaluation>,
    failed: bool,
}

impl Quiz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.questions.is_empty() {
            if self.failed {
                Phase::Failed
            } else {
                Phase::Empty
            }
        } else if self.state.current_index < self.state.questions.len() {
            Phase::InProgress
        } else {
            Phase::Complete
        }
    }

    /// Start the quiz with generated questions; an empty list marks the
    /// session as failed instead.
    pub fn load(&mut self, questions: Vec<QuestionItem>) -> Result<Phase, QuizError> {
        if !matches!(self.phase(), Phase::Empty | Phase::Failed) {
            return Err(QuizError::AlreadyLoaded);
        }

        self.failed = questions.is_empty();
        self.state = QuizState {
            questions,
            current_index: 0,
            score: 0,
        };
        self.pending = None;
        Ok(self.phase())
    }

    pub fn current(&self) -> Option<&QuestionItem> {
        self.state.questions.get(self.state.current_index)
    }

    /// 1-based number of the current question and the total.
    pub fn position(&self) -> (usize, usize) {
        (self.state.current_index + 1, self.state.questions.len())
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.pending.as_ref()
    }

    /// Score `answer` against the current question. A later submission for the
    /// same question replaces the earlier one.
    pub fn submit(&mut self, answer: &str, threshold: u8) -> Result<Evaluation, QuizError> {
        let phase = self.phase();
        let question = match (phase, self.current()) {
            (Phase::InProgress, Some(question)) => question,
            _ => return Err(QuizError::NotInProgress(phase)),
        };
        if answer.trim().is_empty() {
            return Err(QuizError::BlankAnswer);
        }

        let similarity = similarity::token_sort_ratio(answer, &question.answer);
        let evaluation = Evaluation {
            similarity,
            correct: similarity::is_correct(similarity, threshold),
            distance: similarity::edit_distance(answer, &question.answer),
        };
        self.pending = Some(evaluation);
        Ok(evaluation)
    }

    /// Finalize the current answer and move to the next question.
    pub fn next(&mut self) -> Result<Phase, QuizError> {
        let phase = self.phase();
        if phase != Phase::InProgress {
            return Err(QuizError::NotInProgress(phase));
        }
        let evaluation = self.pending.take().ok_or(QuizError::NotAnswered)?;

        if evaluation.correct {
            self.state.score += 1;
        }
        self.state.current_index += 1;
        Ok(self.phase())
    }

    /// Drop everything and go back to [`Phase::Empty`].
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
