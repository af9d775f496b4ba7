//! Survey scoring state and branch/ending evaluation.

use serde::{Deserialize, Serialize};

use super::step::{BranchOutcome, StepId};

/// Per-conversation survey state: the running score and the step the
/// conversation is currently on.
///
/// The score moves by exactly ±1 at branch evaluation and is read-only
/// everywhere else. Persisted by the conversation store after each
/// successfully completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyState {
    pub score: i64,
    pub current_step: StepId,
}

impl SurveyState {
    /// Fresh state at the start of a conversation.
    pub fn new(start: StepId) -> Self {
        Self {
            score: 0,
            current_step: start,
        }
    }
}

/// Which side of a two-way decision was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Apply a yes/no answer to the running score and select the branch taken.
///
/// `true` increments the score and selects the positive outcome; `false`
/// decrements it and selects the negative outcome. The transport guarantees
/// the answer is already a boolean, so there is nothing to fail here.
pub fn evaluate_branch<'a>(
    state: &mut SurveyState,
    user_choice: bool,
    positive: &'a BranchOutcome,
    negative: &'a BranchOutcome,
) -> (&'a BranchOutcome, Outcome) {
    if user_choice {
        state.score += 1;
        (positive, Outcome::Positive)
    } else {
        state.score -= 1;
        (negative, Outcome::Negative)
    }
}

/// Pick an ending from the accumulated score. Pure: equality counts as
/// positive, and the state is not touched.
pub fn evaluate_ending(state: &SurveyState, required_score: i64) -> Outcome {
    if state.score >= required_score {
        Outcome::Positive
    } else {
        Outcome::Negative
    }
}
