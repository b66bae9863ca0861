mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use ansa_core::InMemoryCheckpointer;
use ansa_engine::{Engine, TurnOutcome};
use ansa_memory::BufferMemory;
use support::{kb_candidate, web_candidate, StubEvaluator, StubKnowledge, StubRewriter, StubWeb};

#[tokio::test]
async fn high_scoring_rag_never_invokes_web() {
    let knowledge = StubKnowledge::returning(kb_candidate("from the knowledge base", 0.9));
    let web = StubWeb::returning(web_candidate("from the web", 0.9));
    let web_calls = web.calls.clone();

    let engine = Engine::builder()
        .knowledge_source(knowledge)
        .web_source(web)
        .evaluator(StubEvaluator::scoring(0.85))
        .rewriter(StubRewriter::returning("unused"))
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(InMemoryCheckpointer::default())
        .build()
        .unwrap();

    let outcome = engine.submit("t-1", "u-1", "what is ansa?").await.unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Answered {
            answer: "from the knowledge base".to_string()
        }
    );
    assert_eq!(web_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn low_scoring_rag_always_falls_back_to_web() {
    let knowledge = StubKnowledge::returning(kb_candidate("weak local match", 0.3));
    let web = StubWeb::returning(web_candidate("from the web", 0.6));
    let web_calls = web.calls.clone();
    let evaluator = StubEvaluator::scoring(0.9);
    let eval_calls = evaluator.calls.clone();

    let engine = Engine::builder()
        .knowledge_source(knowledge)
        .web_source(web)
        .evaluator(evaluator)
        .rewriter(StubRewriter::returning("unused"))
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(InMemoryCheckpointer::default())
        .build()
        .unwrap();

    let outcome = engine.submit("t-1", "u-1", "what is ansa?").await.unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Answered {
            answer: "from the web".to_string()
        }
    );
    assert_eq!(web_calls.load(Ordering::SeqCst), 1);
    assert_eq!(eval_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rag_exactly_at_threshold_skips_web() {
    let web = StubWeb::returning(web_candidate("from the web", 0.6));
    let web_calls = web.calls.clone();

    let engine = Engine::builder()
        .knowledge_source(StubKnowledge::returning(kb_candidate("boundary", 0.7)))
        .web_source(web)
        .evaluator(StubEvaluator::scoring(0.9))
        .rewriter(StubRewriter::returning("unused"))
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(InMemoryCheckpointer::default())
        .build()
        .unwrap();

    let outcome = engine.submit("t-1", "u-1", "boundary?").await.unwrap();
    assert_eq!(outcome.answer(), "boundary");
    assert_eq!(web_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn knowledge_source_failure_routes_to_web() {
    let web = StubWeb::returning(web_candidate("rescued by the web", 0.5));
    let web_calls = web.calls.clone();

    let engine = Engine::builder()
        .knowledge_source(StubKnowledge::failing("vector index offline"))
        .web_source(web)
        .evaluator(StubEvaluator::scoring(0.9))
        .rewriter(StubRewriter::returning("unused"))
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(InMemoryCheckpointer::default())
        .build()
        .unwrap();

    let outcome = engine.submit("t-1", "u-1", "anything?").await.unwrap();
    assert_eq!(outcome.answer(), "rescued by the web");
    assert_eq!(web_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn both_sources_failing_still_evaluates_the_sentinel() {
    let evaluator = StubEvaluator::scoring(0.9);
    let eval_calls = evaluator.calls.clone();

    let engine = Engine::builder()
        .knowledge_source(StubKnowledge::failing("down"))
        .web_source(StubWeb::failing("also down"))
        .evaluator(evaluator)
        .rewriter(StubRewriter::returning("unused"))
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(InMemoryCheckpointer::default())
        .build()
        .unwrap();

    // Even a high evaluator score cannot rescue an empty candidate into a
    // confident answer; what matters here is that evaluation still ran and
    // the caller got an unambiguous outcome.
    let outcome = engine.submit("t-1", "u-1", "anything?").await.unwrap();
    assert_eq!(outcome.answer(), "no answer found");
    assert_eq!(eval_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn evidence_block_is_capped_and_labeled() {
    let candidate = ansa_core::Candidate::new(
        ansa_core::SourceKind::KnowledgeBase,
        "well sourced",
        (0..5)
            .map(|i| ansa_core::EvidenceItem {
                title: Some(format!("chunk-{i}")),
                score: 0.9 - i as f32 * 0.05,
                ..Default::default()
            })
            .collect(),
    );
    let evaluator = StubEvaluator::scoring(0.9);
    let seen = evaluator.seen_evidence.clone();

    let engine = Engine::builder()
        .knowledge_source(StubKnowledge::returning(candidate))
        .web_source(StubWeb::returning(web_candidate("unused", 0.1)))
        .evaluator(evaluator)
        .rewriter(StubRewriter::returning("unused"))
        .memory_store_arc(Arc::new(BufferMemory::new()))
        .checkpoint_store(InMemoryCheckpointer::default())
        .build()
        .unwrap();

    engine.submit("t-1", "u-1", "sources?").await.unwrap();

    let evidence = seen.lock().unwrap()[0].clone();
    assert!(evidence.starts_with("[1] title=chunk-0 | score=0.9"));
    assert!(evidence.contains("[3] title=chunk-2"));
    assert!(!evidence.contains("[4]"), "evidence not capped: {evidence}");
}
