//! Survey interpreter — drives conversations through the validated step
//! graph.
//!
//! One call to [`SurveyRunner::run`] owns one conversation from its
//! persisted position to the scored ending. State is persisted after each
//! successfully completed step, so a failed turn resumes exactly where the
//! last persist left it.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::channels::Conversation;
use crate::error::{Error, ScriptError};
use crate::store::ConversationStore;

use super::assembler::SurveyDefinition;
use super::state::{Outcome, SurveyState, evaluate_branch, evaluate_ending};
use super::step::{DialogStep, StepId};

/// Sent when a turn fails for reasons the user can do nothing about.
const APOLOGY: &str =
    "Whoops, something went wrong on our side. Your answers are safe and we'll pick this up again shortly.";

/// Interprets a [`SurveyDefinition`] for one conversation at a time.
pub struct SurveyRunner {
    definition: Arc<SurveyDefinition>,
    store: Arc<dyn ConversationStore>,
}

impl SurveyRunner {
    pub fn new(definition: Arc<SurveyDefinition>, store: Arc<dyn ConversationStore>) -> Self {
        Self { definition, store }
    }

    /// Drive a conversation to the survey ending, returning which ending
    /// was reached.
    ///
    /// On any error mid-turn the user gets a generic apology and the
    /// persisted state is left at the last completed step; calling `run`
    /// again resumes from there.
    pub async fn run(
        &self,
        conversation_id: Uuid,
        conversation: &dyn Conversation,
    ) -> Result<Outcome, Error> {
        match self.drive(conversation_id, conversation).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(
                    conversation = %conversation_id,
                    channel = conversation.name(),
                    error = %e,
                    "survey turn failed"
                );
                if let Err(apology_err) =
                    conversation.send_responses(&[APOLOGY.to_string()]).await
                {
                    warn!(
                        conversation = %conversation_id,
                        error = %apology_err,
                        "could not deliver the apology message"
                    );
                }
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        conversation_id: Uuid,
        conversation: &dyn Conversation,
    ) -> Result<Outcome, Error> {
        let user_name = self
            .store
            .get_profile(conversation_id)
            .await?
            .map(|p| p.user_name)
            .unwrap_or_else(|| "unknown".to_string());

        let mut state = match self.store.get_state(conversation_id).await? {
            Some(state) if self.definition.step(&state.current_step).is_some() => state,
            Some(state) => {
                // The script changed across a restart and the recorded step
                // is gone; the only deterministic option left is a restart.
                warn!(
                    conversation = %conversation_id,
                    step = %state.current_step,
                    "persisted step is not in the current script, restarting survey"
                );
                SurveyState::new(self.definition.start().clone())
            }
            None => SurveyState::new(self.definition.start().clone()),
        };

        let mut step = self.resolve(&state.current_step)?;

        loop {
            debug!(
                conversation = %conversation_id,
                step = %state.current_step,
                phase = %step.phase(),
                "entering survey step"
            );

            match step {
                DialogStep::Welcome { responses, next } => {
                    state.score = 0;
                    conversation.send_responses(&responses).await?;
                    step = self.advance(conversation_id, &mut state, &next).await?;
                }
                DialogStep::Branch {
                    prompt,
                    positive,
                    negative,
                } => {
                    let choice = conversation.prompt_choice(&prompt).await?;
                    let (selected, taken) =
                        evaluate_branch(&mut state, choice, &positive, &negative);
                    debug!(
                        user = %user_name,
                        score = state.score,
                        branch = %taken,
                        "survey score triggered the {taken} conversation tree"
                    );
                    conversation.send_responses(&selected.responses).await?;
                    let next = selected.next.clone();
                    step = self.advance(conversation_id, &mut state, &next).await?;
                }
                DialogStep::FreeText {
                    prompt,
                    responses,
                    next,
                } => {
                    let answer = conversation.prompt_free_text(&prompt).await?;
                    debug!(user = %user_name, answer = %answer, "free-text feedback captured");
                    conversation.send_responses(&responses).await?;
                    step = self.advance(conversation_id, &mut state, &next).await?;
                }
                DialogStep::ScoredEnd {
                    required_score,
                    positive,
                    negative,
                } => {
                    let outcome = evaluate_ending(&state, required_score);
                    debug!(
                        user = %user_name,
                        score = state.score,
                        ending = %outcome,
                        "survey score triggered the {outcome} ending"
                    );
                    let texts = match outcome {
                        Outcome::Positive => &positive,
                        Outcome::Negative => &negative,
                    };
                    conversation.send_responses(texts).await?;
                    self.store.set_state(conversation_id, &state).await?;
                    return Ok(outcome);
                }
            }
        }
    }

    /// Record the move to `next` and hand back the step to interpret.
    /// Persisting here is what makes a later failure resume deterministically.
    async fn advance(
        &self,
        conversation_id: Uuid,
        state: &mut SurveyState,
        next: &StepId,
    ) -> Result<DialogStep, Error> {
        let from = state.current_step.clone();
        state.current_step = next.clone();
        self.store.set_state(conversation_id, state).await?;
        self.definition.step(next).cloned().ok_or_else(|| {
            ScriptError::UnknownStep {
                from: from.to_string(),
                to: next.to_string(),
            }
            .into()
        })
    }

    /// Look up the step the conversation is currently parked on. The state
    /// loader only hands out ids present in the script, so this holds by
    /// construction.
    fn resolve(&self, id: &StepId) -> Result<DialogStep, Error> {
        self.definition.step(id).cloned().ok_or_else(|| {
            ScriptError::UnknownStep {
                from: id.to_string(),
                to: id.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::error::ChannelError;
    use crate::store::MemoryStore;
    use crate::survey::assembler::SurveyBuilder;
    use crate::survey::step::BranchOutcome;

    /// Transport double that replays scripted answers and records sends.
    struct ScriptedConversation {
        answers: Mutex<Vec<String>>,
        sent: Mutex<Vec<String>>,
    }

    impl ScriptedConversation {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().rev().map(|a| a.to_string()).collect()),
                sent: Mutex::new(Vec::new()),
            }
        }

        async fn sent(&self) -> Vec<String> {
            self.sent.lock().await.clone()
        }

        async fn next_answer(&self) -> Result<String, ChannelError> {
            self.answers
                .lock()
                .await
                .pop()
                .ok_or(ChannelError::ConversationClosed {
                    name: "scripted".to_string(),
                })
        }
    }

    #[async_trait]
    impl Conversation for ScriptedConversation {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send_responses(&self, texts: &[String]) -> Result<(), ChannelError> {
            self.sent.lock().await.extend(texts.iter().cloned());
            Ok(())
        }

        async fn prompt_choice(&self, _prompt: &str) -> Result<bool, ChannelError> {
            loop {
                let answer = self.next_answer().await?;
                if let Some(choice) = crate::channels::parse_choice(&answer) {
                    return Ok(choice);
                }
            }
        }

        async fn prompt_free_text(&self, _prompt: &str) -> Result<String, ChannelError> {
            self.next_answer().await
        }
    }

    fn say(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    fn definition(required_score: i64) -> Arc<SurveyDefinition> {
        Arc::new(
            SurveyBuilder::new()
                .welcome_step("start", say("welcome"), "branch")
                .branch_step(
                    "branch",
                    "Going well?",
                    BranchOutcome::new(say("good"), "details"),
                    BranchOutcome::new(say("bad"), "details"),
                )
                .free_text_step("details", "Tell me more", say("thanks"), "end")
                .scored_end_step("end", required_score, say("positive end"), say("negative end"))
                .finalize()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn welcome_resets_a_stale_score() {
        let store = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();

        // Stale state from an earlier aborted conversation: nonzero score,
        // parked at the welcome step.
        let mut stale = SurveyState::new("start".into());
        stale.score = 5;
        store.set_state(id, &stale).await.unwrap();

        let runner = SurveyRunner::new(definition(1), store.clone());
        let conversation = ScriptedConversation::new(&["yes", "more staff"]);
        let outcome = runner.run(id, &conversation).await.unwrap();

        assert_eq!(outcome, Outcome::Positive);
        let final_state = store.get_state(id).await.unwrap().unwrap();
        assert_eq!(final_state.score, 1, "score restarts from zero at welcome");
    }

    #[tokio::test]
    async fn unknown_persisted_step_restarts_the_survey() {
        let store = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();

        store
            .set_state(id, &SurveyState::new("removed-step".into()))
            .await
            .unwrap();

        let runner = SurveyRunner::new(definition(1), store.clone());
        let conversation = ScriptedConversation::new(&["no", "nothing"]);
        let outcome = runner.run(id, &conversation).await.unwrap();

        assert_eq!(outcome, Outcome::Negative);
        let sent = conversation.sent().await;
        assert_eq!(sent.first().map(String::as_str), Some("welcome"));
    }

    #[tokio::test]
    async fn unrecognized_answers_are_reprompted_until_boolean() {
        let store = Arc::new(MemoryStore::new());
        let runner = SurveyRunner::new(definition(1), store);
        let conversation = ScriptedConversation::new(&["maybe", "dunno", "yes", "all good"]);

        let outcome = runner
            .run(Uuid::new_v4(), &conversation)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Positive);
    }
}
