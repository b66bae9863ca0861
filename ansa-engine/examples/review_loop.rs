// Run: cargo run -p ansa-engine --example review_loop

use std::sync::Arc;

use ansa_core::{
    AnsaError, Candidate, Evaluation, Evaluator, EvidenceItem, KnowledgeSource, Rewriter,
    SourceKind, WebSource,
};
use ansa_engine::{Engine, EngineError, FileCheckpointer, TurnOutcome};
use ansa_memory::BufferMemory;

struct CannedKnowledge;

#[async_trait::async_trait]
impl KnowledgeSource for CannedKnowledge {
    async fn answer(&self, _question: &str, _context: &str) -> Result<Candidate, AnsaError> {
        Ok(Candidate::new(
            SourceKind::KnowledgeBase,
            "The knowledge base has only a weak match for this.",
            vec![EvidenceItem {
                source: Some("faq.md".to_string()),
                chunk_index: Some(2),
                score: 0.41,
                ..Default::default()
            }],
        ))
    }
}

struct CannedWeb;

#[async_trait::async_trait]
impl WebSource for CannedWeb {
    async fn answer(&self, _question: &str) -> Result<Candidate, AnsaError> {
        Ok(Candidate::new(
            SourceKind::Web,
            "According to the docs, use a builder to assemble the engine.",
            vec![EvidenceItem {
                title: Some("ansa docs".to_string()),
                url: Some("https://example.com/docs".to_string()),
                score: 0.58,
                ..Default::default()
            }],
        ))
    }
}

struct HarshJudge;

#[async_trait::async_trait]
impl Evaluator for HarshJudge {
    async fn evaluate(
        &self,
        _question: &str,
        _answer: &str,
        _evidence: &str,
    ) -> Result<Evaluation, AnsaError> {
        Ok(Evaluation {
            score: 0.35,
            reasoning: "thin evidence".to_string(),
        })
    }
}

struct Shortener;

#[async_trait::async_trait]
impl Rewriter for Shortener {
    async fn rewrite(&self, answer: &str, _instructions: &str) -> Result<String, AnsaError> {
        let short: String = answer.chars().take(40).collect();
        Ok(format!("{short}…"))
    }
}

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let checkpoint_dir = std::env::temp_dir().join("ansa-review-loop");
    let engine = Engine::builder()
        .knowledge_source(CannedKnowledge)
        .web_source(CannedWeb)
        .evaluator(HarshJudge)
        .rewriter(Shortener)
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(FileCheckpointer::new(&checkpoint_dir))
        .build()?;

    match engine.submit("thread-42", "user-7", "How do I set this up?").await? {
        TurnOutcome::Answered { answer } => println!("answered directly: {answer}"),
        TurnOutcome::NeedsReview { current_answer } => {
            println!("needs review: {current_answer}");
            let outcome = engine.resume("thread-42", "user-7", "make it shorter").await?;
            println!("after review: {}", outcome.answer());
        }
    }

    Ok(())
}
