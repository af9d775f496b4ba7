//! Survey script assembler — declarative builder plus finalize-time
//! validation.
//!
//! The builder collects steps in declaration order; forward references are
//! fine until [`SurveyBuilder::finalize`], which resolves every reference,
//! checks that the graph is rooted at exactly one welcome step, and proves
//! that every reachable step can terminate at a scored ending. A script that
//! fails validation never reaches a conversation.

use std::collections::{HashMap, HashSet};

use crate::error::ScriptError;

use super::step::{BranchOutcome, DialogStep, StepId};

/// An immutable, validated survey script.
#[derive(Debug, Clone)]
pub struct SurveyDefinition {
    steps: HashMap<StepId, DialogStep>,
    start: StepId,
}

impl SurveyDefinition {
    /// The welcome step the survey is rooted at.
    pub fn start(&self) -> &StepId {
        &self.start
    }

    /// Look up a step by id.
    pub fn step(&self, id: &StepId) -> Option<&DialogStep> {
        self.steps.get(id)
    }

    /// Number of steps in the script.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builder for a [`SurveyDefinition`].
///
/// Steps are added declaratively and validated as a whole in `finalize`;
/// the builder itself performs no runtime decision-making.
#[derive(Debug, Default)]
pub struct SurveyBuilder {
    steps: Vec<(StepId, DialogStep)>,
}

impl SurveyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the welcome step: the conversation opener and graph root.
    pub fn welcome_step(
        mut self,
        id: impl Into<StepId>,
        responses: Vec<String>,
        next: impl Into<StepId>,
    ) -> Self {
        self.steps.push((
            id.into(),
            DialogStep::Welcome {
                responses,
                next: next.into(),
            },
        ));
        self
    }

    /// Declare a yes/no branch step with its two outcomes.
    pub fn branch_step(
        mut self,
        id: impl Into<StepId>,
        prompt: impl Into<String>,
        positive: BranchOutcome,
        negative: BranchOutcome,
    ) -> Self {
        self.steps.push((
            id.into(),
            DialogStep::Branch {
                prompt: prompt.into(),
                positive,
                negative,
            },
        ));
        self
    }

    /// Declare a free-text capture step.
    pub fn free_text_step(
        mut self,
        id: impl Into<StepId>,
        prompt: impl Into<String>,
        responses: Vec<String>,
        next: impl Into<StepId>,
    ) -> Self {
        self.steps.push((
            id.into(),
            DialogStep::FreeText {
                prompt: prompt.into(),
                responses,
                next: next.into(),
            },
        ));
        self
    }

    /// Declare the scored ending step.
    pub fn scored_end_step(
        mut self,
        id: impl Into<StepId>,
        required_score: i64,
        positive: Vec<String>,
        negative: Vec<String>,
    ) -> Self {
        self.steps.push((
            id.into(),
            DialogStep::ScoredEnd {
                required_score,
                positive,
                negative,
            },
        ));
        self
    }

    /// Resolve and validate the declared graph, freezing it into an
    /// immutable [`SurveyDefinition`].
    pub fn finalize(self) -> Result<SurveyDefinition, ScriptError> {
        // Duplicate ids first: later checks assume ids are unambiguous.
        let mut steps: HashMap<StepId, DialogStep> = HashMap::with_capacity(self.steps.len());
        for (id, step) in self.steps {
            if steps.insert(id.clone(), step).is_some() {
                return Err(ScriptError::DuplicateStep(id.to_string()));
            }
        }

        // Exactly one welcome step roots the graph.
        let mut welcomes = steps
            .iter()
            .filter(|(_, step)| matches!(step, DialogStep::Welcome { .. }))
            .map(|(id, _)| id.clone());
        let start = welcomes.next().ok_or(ScriptError::MissingWelcome)?;
        if welcomes.next().is_some() {
            return Err(ScriptError::MultipleWelcome);
        }

        // Every reference must resolve to a declared step.
        for (id, step) in &steps {
            for successor in step.successors() {
                if !steps.contains_key(successor) {
                    return Err(ScriptError::UnknownStep {
                        from: id.to_string(),
                        to: successor.to_string(),
                    });
                }
            }
        }

        // Forward walk from the welcome step.
        let reachable = reachable_from(&steps, &start);
        if !reachable
            .iter()
            .any(|id| steps[id].is_terminal())
        {
            return Err(ScriptError::NoReachableEnd);
        }

        // Termination: every reachable step must have a path to an ending.
        // A reachable step without one is stuck on a cycle.
        let terminating = can_reach_end(&steps);
        if let Some(id) = reachable.iter().find(|id| !terminating.contains(*id)) {
            return Err(ScriptError::Unterminating(id.to_string()));
        }

        // Declared-but-unreachable steps are legal but almost certainly a
        // script mistake; surface them for the operator.
        for id in steps.keys() {
            if !reachable.contains(id) {
                tracing::warn!(step = %id, "survey step is unreachable from the welcome step");
            }
        }

        Ok(SurveyDefinition { steps, start })
    }
}

/// Steps reachable from `start`, including `start` itself.
fn reachable_from(steps: &HashMap<StepId, DialogStep>, start: &StepId) -> HashSet<StepId> {
    let mut seen = HashSet::new();
    let mut stack = vec![start.clone()];
    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(step) = steps.get(&id) {
            for successor in step.successors() {
                if !seen.contains(successor) {
                    stack.push(successor.clone());
                }
            }
        }
    }
    seen
}

/// Steps from which some terminal step is reachable, computed as a reverse
/// fixed point: endings terminate, and a step terminates if any successor
/// does.
fn can_reach_end(steps: &HashMap<StepId, DialogStep>) -> HashSet<StepId> {
    let mut terminating: HashSet<StepId> = steps
        .iter()
        .filter(|(_, step)| step.is_terminal())
        .map(|(id, _)| id.clone())
        .collect();

    loop {
        let mut grew = false;
        for (id, step) in steps {
            if terminating.contains(id) {
                continue;
            }
            if step.successors().iter().any(|s| terminating.contains(*s)) {
                terminating.insert(id.clone());
                grew = true;
            }
        }
        if !grew {
            return terminating;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn say(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    /// Minimal valid script: welcome → branch → free text → end.
    fn valid_builder() -> SurveyBuilder {
        SurveyBuilder::new()
            .welcome_step("start", say("hello"), "how-is-it-going")
            .branch_step(
                "how-is-it-going",
                "Is it going well?",
                BranchOutcome::new(say("great"), "details"),
                BranchOutcome::new(say("shame"), "details"),
            )
            .free_text_step("details", "Tell me more", say("thanks"), "end")
            .scored_end_step("end", 1, say("bye, happy"), say("bye, sad"))
    }

    #[test]
    fn valid_script_finalizes() {
        let definition = valid_builder().finalize().unwrap();
        assert_eq!(definition.len(), 4);
        assert_eq!(definition.start().as_str(), "start");
        assert!(definition.step(&"details".into()).is_some());
        assert!(definition.step(&"missing".into()).is_none());
    }

    #[test]
    fn unknown_reference_fails_finalize() {
        let err = SurveyBuilder::new()
            .welcome_step("start", say("hello"), "nowhere")
            .scored_end_step("end", 1, say("+"), say("-"))
            .finalize()
            .unwrap_err();
        assert!(
            matches!(&err, ScriptError::UnknownStep { from, to } if from == "start" && to == "nowhere"),
            "got: {err}"
        );
    }

    #[test]
    fn duplicate_step_fails_finalize() {
        let err = valid_builder()
            .scored_end_step("end", 2, say("again"), say("again"))
            .finalize()
            .unwrap_err();
        assert!(matches!(err, ScriptError::DuplicateStep(id) if id == "end"));
    }

    #[test]
    fn missing_welcome_fails_finalize() {
        let err = SurveyBuilder::new()
            .scored_end_step("end", 1, say("+"), say("-"))
            .finalize()
            .unwrap_err();
        assert!(matches!(err, ScriptError::MissingWelcome));
    }

    #[test]
    fn multiple_welcomes_fail_finalize() {
        let err = valid_builder()
            .welcome_step("start-again", say("hello again"), "end")
            .finalize()
            .unwrap_err();
        assert!(matches!(err, ScriptError::MultipleWelcome));
    }

    #[test]
    fn no_reachable_end_fails_finalize() {
        // Welcome loops straight back to itself; the ending exists but is
        // orphaned.
        let err = SurveyBuilder::new()
            .welcome_step("start", say("hello"), "loop")
            .free_text_step("loop", "Say something", say("noted"), "loop")
            .scored_end_step("end", 1, say("+"), say("-"))
            .finalize()
            .unwrap_err();
        assert!(matches!(err, ScriptError::NoReachableEnd));
    }

    #[test]
    fn cycle_that_prevents_termination_fails_finalize() {
        // The positive branch reaches the ending, but the negative branch
        // traps the conversation in a two-step loop.
        let err = SurveyBuilder::new()
            .welcome_step("start", say("hello"), "fork")
            .branch_step(
                "fork",
                "Happy?",
                BranchOutcome::new(say("great"), "end"),
                BranchOutcome::new(say("hmm"), "trap-a"),
            )
            .free_text_step("trap-a", "Why?", say("I see"), "trap-b")
            .free_text_step("trap-b", "Anything else?", say("noted"), "trap-a")
            .scored_end_step("end", 1, say("+"), say("-"))
            .finalize()
            .unwrap_err();
        assert!(
            matches!(&err, ScriptError::Unterminating(id) if id.starts_with("trap")),
            "got: {err}"
        );
    }

    #[test]
    fn unreachable_step_is_tolerated() {
        // An orphan step is a warning, not an error.
        let definition = valid_builder()
            .free_text_step("orphan", "Unused", say("unused"), "end")
            .finalize()
            .unwrap();
        assert_eq!(definition.len(), 5);
    }
}
