/// Thresholds and context limits for the workflow, injected at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Minimum knowledge-base relevance to skip the web fallback.
    pub rag_threshold: f32,
    /// Minimum evaluation score to finish without human review.
    pub eval_threshold: f32,
    /// How many trailing messages feed the augmented context.
    pub context_turns: usize,
    /// How many evidence items are shown to the evaluator.
    pub evidence_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rag_threshold: 0.7,
            eval_threshold: 0.7,
            context_turns: 6,
            evidence_limit: 3,
        }
    }
}

impl EngineConfig {
    pub fn with_rag_threshold(mut self, value: f32) -> Self {
        self.rag_threshold = value;
        self
    }

    pub fn with_eval_threshold(mut self, value: f32) -> Self {
        self.eval_threshold = value;
        self
    }

    pub fn with_context_turns(mut self, value: usize) -> Self {
        self.context_turns = value;
        self
    }

    pub fn with_evidence_limit(mut self, value: usize) -> Self {
        self.evidence_limit = value;
        self
    }
}
