use serde::{Deserialize, Serialize};

use crate::AnsaError;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Evaluation {
    /// Quality score in [0, 1].
    pub score: f32,
    /// Short justification from the judge.
    pub reasoning: String,
}

/// Scores a candidate answer against the question and its evidence block.
#[async_trait::async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        evidence: &str,
    ) -> Result<Evaluation, AnsaError>;
}

/// Transforms a final answer according to free-text human instructions.
#[async_trait::async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, answer: &str, instructions: &str) -> Result<String, AnsaError>;
}
