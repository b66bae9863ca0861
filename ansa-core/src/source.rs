use crate::{AnsaError, Candidate};

/// Retrieval-augmented answering over the local knowledge base.
///
/// `context` is the augmented block built by the engine: the user's durable
/// memory followed by the recent conversation window.
#[async_trait::async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn answer(&self, question: &str, context: &str) -> Result<Candidate, AnsaError>;
}

/// Web search plus synthesis, used as a fallback when local relevance is low.
#[async_trait::async_trait]
pub trait WebSource: Send + Sync {
    async fn answer(&self, question: &str) -> Result<Candidate, AnsaError>;
}
