//! The stock apprentice feedback survey script.
//!
//! One welcome step, one yes/no branch, one free-text capture, one scored
//! ending. Prompt and response texts are authored here; the threshold for
//! the positive ending comes from configuration.

use crate::error::ScriptError;

use super::assembler::{SurveyBuilder, SurveyDefinition};
use super::step::BranchOutcome;

fn texts(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

/// Assemble and validate the apprentice feedback survey.
///
/// `required_score` is the score a conversation must reach for the positive
/// ending; with a single branch step the workable range is -1..=1.
pub fn apprentice_feedback_survey(required_score: i64) -> Result<SurveyDefinition, ScriptError> {
    SurveyBuilder::new()
        .welcome_step(
            "start",
            texts(&[
                "Hello! I'm the apprenticeship feedback assistant.",
                "Your answers help us improve apprenticeships, and this takes under a minute.",
            ]),
            "progress-check",
        )
        .branch_step(
            "progress-check",
            "Are you satisfied with how your apprenticeship is going?",
            BranchOutcome::new(
                texts(&["That's great to hear!"]),
                "free-text-feedback",
            ),
            BranchOutcome::new(
                texts(&["I'm sorry to hear that."]),
                "free-text-feedback",
            ),
        )
        .free_text_step(
            "free-text-feedback",
            "In your own words, what's the one thing you'd change about your apprenticeship?",
            texts(&["Thanks, I've passed that along to the team."]),
            "finish",
        )
        .scored_end_step(
            "finish",
            required_score,
            texts(&[
                "Brilliant, thanks for taking the time to share your feedback.",
                "Keep up the good work, and speak soon!",
            ]),
            texts(&[
                "Thank you for being honest with us, it really does help.",
                "Someone from the team may be in touch to talk things through.",
            ]),
        )
        .finalize()
}
