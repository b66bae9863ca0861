#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ansa_core::{
    AnsaError, Candidate, Evaluation, Evaluator, EvidenceItem, KnowledgeSource, Rewriter,
    SourceKind, WebSource,
};

pub fn kb_candidate(answer: &str, score: f32) -> Candidate {
    Candidate::new(
        SourceKind::KnowledgeBase,
        answer,
        vec![EvidenceItem {
            source: Some("handbook.pdf".to_string()),
            page: Some(12),
            chunk_index: Some(3),
            score,
            ..Default::default()
        }],
    )
}

pub fn web_candidate(answer: &str, score: f32) -> Candidate {
    Candidate::new(
        SourceKind::Web,
        answer,
        vec![EvidenceItem {
            title: Some("Search result".to_string()),
            url: Some("https://example.com/result".to_string()),
            score,
            ..Default::default()
        }],
    )
}

pub struct StubKnowledge {
    result: Result<Candidate, String>,
    pub calls: Arc<AtomicUsize>,
    pub seen_context: Arc<Mutex<Vec<String>>>,
}

impl StubKnowledge {
    pub fn returning(candidate: Candidate) -> Self {
        Self {
            result: Ok(candidate),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_context: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_context: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for StubKnowledge {
    async fn answer(&self, _question: &str, context: &str) -> Result<Candidate, AnsaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_context.lock().unwrap().push(context.to_string());
        self.result.clone().map_err(AnsaError::AnswerSource)
    }
}

pub struct StubWeb {
    result: Result<Candidate, String>,
    pub calls: Arc<AtomicUsize>,
}

impl StubWeb {
    pub fn returning(candidate: Candidate) -> Self {
        Self {
            result: Ok(candidate),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl WebSource for StubWeb {
    async fn answer(&self, _question: &str) -> Result<Candidate, AnsaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(AnsaError::AnswerSource)
    }
}

pub struct StubEvaluator {
    score: Result<f32, String>,
    pub calls: Arc<AtomicUsize>,
    pub seen_evidence: Arc<Mutex<Vec<String>>>,
}

impl StubEvaluator {
    pub fn scoring(score: f32) -> Self {
        Self {
            score: Ok(score),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_evidence: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            score: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_evidence: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl Evaluator for StubEvaluator {
    async fn evaluate(
        &self,
        _question: &str,
        _answer: &str,
        evidence: &str,
    ) -> Result<Evaluation, AnsaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_evidence.lock().unwrap().push(evidence.to_string());
        match &self.score {
            Ok(score) => Ok(Evaluation {
                score: *score,
                reasoning: "stub".to_string(),
            }),
            Err(reason) => Err(AnsaError::Evaluation(reason.clone())),
        }
    }
}

pub struct StubRewriter {
    output: String,
    fail_remaining: AtomicUsize,
    pub calls: Arc<AtomicUsize>,
}

impl StubRewriter {
    pub fn returning(output: &str) -> Self {
        Self {
            output: output.to_string(),
            fail_remaining: AtomicUsize::new(0),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails the first `n` calls, then behaves like `returning`.
    pub fn failing_first(n: usize, output: &str) -> Self {
        Self {
            output: output.to_string(),
            fail_remaining: AtomicUsize::new(n),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl Rewriter for StubRewriter {
    async fn rewrite(&self, _answer: &str, _instructions: &str) -> Result<String, AnsaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(AnsaError::Rewrite("stub rewriter down".to_string()));
        }
        Ok(self.output.clone())
    }
}
