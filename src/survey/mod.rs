//! The survey core: scoring state machine, script assembler, and the
//! interpreter that walks a validated script.

pub mod assembler;
pub mod runner;
pub mod script;
pub mod state;
pub mod step;

pub use assembler::{SurveyBuilder, SurveyDefinition};
pub use runner::SurveyRunner;
pub use script::apprentice_feedback_survey;
pub use state::{Outcome, SurveyState};
pub use step::{BranchOutcome, DialogStep, StepId, TurnPhase};
