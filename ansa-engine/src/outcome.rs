/// Result of driving one turn of the workflow.
///
/// Suspension is a value, not an error: a turn that needs human review
/// returns `NeedsReview` and the caller continues it later through
/// [`Engine::resume`](crate::Engine::resume).
#[derive(Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    Answered { answer: String },
    NeedsReview { current_answer: String },
}

impl TurnOutcome {
    pub fn answer(&self) -> &str {
        match self {
            TurnOutcome::Answered { answer } => answer,
            TurnOutcome::NeedsReview { current_answer } => current_answer,
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, TurnOutcome::NeedsReview { .. })
    }
}
