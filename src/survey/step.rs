//! Dialog step graph types.
//!
//! A survey script is a directed graph of tagged steps rooted at a welcome
//! step and terminating at a scored ending. Steps reference each other by
//! [`StepId`]; the assembler resolves and validates those references before
//! any conversation starts.

use serde::{Deserialize, Serialize};

/// Identifier for a dialog step within a survey script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One of the two outcomes of a branch step: the texts sent when the branch
/// is taken, and the step the conversation moves to afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOutcome {
    pub responses: Vec<String>,
    pub next: StepId,
}

impl BranchOutcome {
    pub fn new(responses: Vec<String>, next: impl Into<StepId>) -> Self {
        Self {
            responses,
            next: next.into(),
        }
    }
}

/// A single scripted dialog step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep {
    /// Opens the conversation: emits its responses in order, then advances.
    /// Executing the welcome step resets the running score to zero.
    Welcome {
        responses: Vec<String>,
        next: StepId,
    },
    /// Asks a yes/no question and adjusts the running score by ±1, selecting
    /// one of two successor outcomes.
    Branch {
        prompt: String,
        positive: BranchOutcome,
        negative: BranchOutcome,
    },
    /// Captures one free-text answer, emits its follow-up responses, then
    /// advances.
    FreeText {
        prompt: String,
        responses: Vec<String>,
        next: StepId,
    },
    /// Terminal step: compares the accumulated score against the threshold
    /// and emits one of two pre-authored endings.
    ScoredEnd {
        required_score: i64,
        positive: Vec<String>,
        negative: Vec<String>,
    },
}

impl DialogStep {
    /// The conversation phase a user sits in while this step is active.
    pub fn phase(&self) -> TurnPhase {
        match self {
            Self::Welcome { .. } => TurnPhase::AwaitingWelcome,
            Self::Branch { .. } => TurnPhase::AwaitingBranchResponse,
            Self::FreeText { .. } => TurnPhase::AwaitingFreeText,
            Self::ScoredEnd { .. } => TurnPhase::Ended,
        }
    }

    /// All step ids this step can hand the conversation to.
    pub fn successors(&self) -> Vec<&StepId> {
        match self {
            Self::Welcome { next, .. } | Self::FreeText { next, .. } => vec![next],
            Self::Branch {
                positive, negative, ..
            } => vec![&positive.next, &negative.next],
            Self::ScoredEnd { .. } => vec![],
        }
    }

    /// Whether the conversation ends at this step.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ScoredEnd { .. })
    }
}

/// Where a conversation stands within the survey.
///
/// Derived from the kind of the step the conversation is currently on;
/// `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingWelcome,
    AwaitingBranchResponse,
    AwaitingFreeText,
    Ended,
}

impl TurnPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingWelcome => "awaiting_welcome",
            Self::AwaitingBranchResponse => "awaiting_branch_response",
            Self::AwaitingFreeText => "awaiting_free_text",
            Self::Ended => "ended",
        };
        write!(f, "{s}")
    }
}
