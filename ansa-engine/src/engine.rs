use std::sync::Arc;

use tracing::{info, info_span, warn};

use ansa_core::{
    Checkpoint, CheckpointStore, ConversationState, Evaluator, EvidenceItem, KnowledgeSource,
    MemoryStore, ReviewRequest, Rewriter, WebSource,
};

use crate::{EngineConfig, EngineError, TurnOutcome};

/// Position in the per-turn workflow. Each variant maps to one stage method;
/// the driver checkpoints after every completed stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Retrieve,
    WebFallback,
    Evaluate,
    HumanReview,
    Rewrite,
    Done,
}

/// The orchestrator: wires answer sources, evaluator, rewriter, memory, and
/// checkpointing into a single resumable pipeline per conversation thread.
///
/// One turn is driven by [`Engine::submit`]; a turn suspended for human
/// review is continued by [`Engine::resume`]. All collaborator calls are
/// blocking round trips and nothing is retried here.
pub struct Engine {
    config: EngineConfig,
    knowledge: Arc<dyn KnowledgeSource>,
    web: Arc<dyn WebSource>,
    evaluator: Arc<dyn Evaluator>,
    rewriter: Arc<dyn Rewriter>,
    memory: Arc<dyn MemoryStore>,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one turn for `thread_id`. Returns either the final answer or a
    /// `NeedsReview` signal; never an ambiguous partial result.
    pub async fn submit(
        &self,
        thread_id: &str,
        user_id: &str,
        user_message: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let span = info_span!("submit", thread_id = %thread_id, user_id = %user_id);
        let _guard = span.enter();

        let existing = self
            .checkpoints
            .load(thread_id)
            .await
            .map_err(EngineError::Checkpoint)?;
        let mut state = match existing {
            Some(checkpoint) => {
                if checkpoint.pending_review.is_some() {
                    return Err(EngineError::ReviewPending(thread_id.to_string()));
                }
                checkpoint.state
            }
            None => ConversationState::new(thread_id, user_id),
        };

        info!("submitting user message");
        state.begin_turn(user_message);
        self.drive(state, Stage::Retrieve).await
    }

    /// Continues a suspended turn with the reviewer's feedback. Empty or
    /// "approve" (any case, surrounding whitespace ignored) commits the
    /// answer as-is; anything else goes through the rewriter. Resumes from
    /// the review gate, never from the start of the turn.
    pub async fn resume(
        &self,
        thread_id: &str,
        user_id: &str,
        feedback: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let span = info_span!("resume", thread_id = %thread_id, user_id = %user_id);
        let _guard = span.enter();

        let checkpoint = self
            .checkpoints
            .load(thread_id)
            .await
            .map_err(EngineError::Checkpoint)?
            .ok_or_else(|| EngineError::UnknownThread(thread_id.to_string()))?;
        if checkpoint.pending_review.is_none() {
            return Err(EngineError::NoPendingReview(thread_id.to_string()));
        }

        info!("resuming with human feedback");
        let mut state = checkpoint.state;
        state.human_feedback = Some(feedback.to_string());
        self.drive(state, Stage::Rewrite).await
    }

    /// The pending interrupt payload for a thread, if it is suspended.
    pub async fn pending_review(
        &self,
        thread_id: &str,
    ) -> Result<Option<ReviewRequest>, EngineError> {
        let checkpoint = self
            .checkpoints
            .load(thread_id)
            .await
            .map_err(EngineError::Checkpoint)?;
        Ok(checkpoint.and_then(|checkpoint| checkpoint.pending_review))
    }

    async fn drive(
        &self,
        mut state: ConversationState,
        entry: Stage,
    ) -> Result<TurnOutcome, EngineError> {
        let mut stage = entry;
        loop {
            stage = self.step(stage, &mut state).await?;
            match stage {
                Stage::HumanReview => {
                    let review =
                        ReviewRequest::for_answer(state.final_answer.clone().unwrap_or_default());
                    let current_answer = review.current_answer.clone();
                    self.persist(&state, Some(review)).await?;
                    return Ok(TurnOutcome::NeedsReview { current_answer });
                }
                Stage::Done => {
                    self.persist(&state, None).await?;
                    return Ok(TurnOutcome::Answered {
                        answer: state.final_answer.clone().unwrap_or_default(),
                    });
                }
                _ => self.persist(&state, None).await?,
            }
        }
    }

    async fn step(&self, stage: Stage, state: &mut ConversationState) -> Result<Stage, EngineError> {
        match stage {
            Stage::Retrieve => Ok(self.retrieve(state).await),
            Stage::WebFallback => Ok(self.web_fallback(state).await),
            Stage::Evaluate => self.evaluate(state).await,
            Stage::Rewrite => self.rewrite(state).await,
            Stage::HumanReview | Stage::Done => Ok(stage),
        }
    }

    async fn retrieve(&self, state: &mut ConversationState) -> Stage {
        let span = info_span!(
            "retrieve",
            thread_id = %state.thread_id,
            user_id = %state.user_id,
            rag_threshold = self.config.rag_threshold,
        );
        let _guard = span.enter();

        let question = state.last_user_message();
        let memory = match self.memory.read(&state.user_id).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "memory read failed; continuing without user memory");
                String::new()
            }
        };
        let context = augmented_context(
            &memory,
            &state.transcript_window(self.config.context_turns),
        );

        match self.knowledge.answer(&question, &context).await {
            Ok(candidate) => state.rag_result = Some(candidate),
            Err(err) => {
                warn!(error = %err, "knowledge source failed; treating result as empty");
                state.rag_result = None;
            }
        }

        if state.rag_qualifies(self.config.rag_threshold) {
            Stage::Evaluate
        } else {
            warn!(
                top_score = state
                    .rag_result
                    .as_ref()
                    .map(|candidate| candidate.top_score)
                    .unwrap_or(0.0),
                threshold = self.config.rag_threshold,
                "knowledge-base relevance below threshold; falling back to web search"
            );
            Stage::WebFallback
        }
    }

    async fn web_fallback(&self, state: &mut ConversationState) -> Stage {
        let span = info_span!("web_fallback", thread_id = %state.thread_id);
        let _guard = span.enter();

        match self.web.answer(&state.last_user_message()).await {
            Ok(candidate) => state.web_result = Some(candidate),
            Err(err) => {
                warn!(error = %err, "web source failed; treating result as empty");
                state.web_result = None;
            }
        }
        Stage::Evaluate
    }

    async fn evaluate(&self, state: &mut ConversationState) -> Result<Stage, EngineError> {
        let span = info_span!(
            "evaluate",
            thread_id = %state.thread_id,
            eval_threshold = self.config.eval_threshold,
        );
        let _guard = span.enter();

        let candidate = state.active_candidate(self.config.rag_threshold);
        let evidence = render_evidence(&candidate.items, self.config.evidence_limit);

        // An evaluator failure never aborts the turn: the score degrades to
        // zero and the answer goes to human review instead.
        let score = match self
            .evaluator
            .evaluate(&state.last_user_message(), &candidate.answer, &evidence)
            .await
        {
            Ok(evaluation) => evaluation.score.clamp(0.0, 1.0),
            Err(err) => {
                warn!(error = %err, "evaluator failed; forcing score to 0.0");
                0.0
            }
        };

        state.final_answer = Some(candidate.answer.clone());
        state.push_assistant(candidate.answer);
        state.eval_score = Some(score);

        if score >= self.config.eval_threshold {
            self.commit_memory(state).await?;
            Ok(Stage::Done)
        } else {
            info!(
                score,
                threshold = self.config.eval_threshold,
                "answer held for human review"
            );
            Ok(Stage::HumanReview)
        }
    }

    async fn rewrite(&self, state: &mut ConversationState) -> Result<Stage, EngineError> {
        let span = info_span!("rewrite", thread_id = %state.thread_id);
        let _guard = span.enter();

        let feedback = state.human_feedback.clone().unwrap_or_default();
        let trimmed = feedback.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("approve") {
            self.commit_memory(state).await?;
            return Ok(Stage::Done);
        }

        let answer = state.final_answer.clone().unwrap_or_default();
        let rewritten = self
            .rewriter
            .rewrite(&answer, &feedback)
            .await
            .map_err(EngineError::Rewrite)?;

        state.final_answer = Some(rewritten.clone());
        state.push_assistant(rewritten);
        self.commit_memory(state).await?;
        Ok(Stage::Done)
    }

    /// Idempotent: `memory_written` guards against a retried or resumed turn
    /// appending the same answer twice.
    async fn commit_memory(&self, state: &mut ConversationState) -> Result<(), EngineError> {
        if state.memory_written {
            return Ok(());
        }
        let answer = match &state.final_answer {
            Some(answer) => answer.clone(),
            None => return Ok(()),
        };
        self.memory
            .append(&state.user_id, &answer)
            .await
            .map_err(EngineError::Memory)?;
        state.memory_written = true;
        Ok(())
    }

    async fn persist(
        &self,
        state: &ConversationState,
        pending_review: Option<ReviewRequest>,
    ) -> Result<(), EngineError> {
        let checkpoint = Checkpoint::new(state.clone(), pending_review);
        self.checkpoints
            .save(&checkpoint)
            .await
            .map_err(EngineError::Checkpoint)
    }
}

fn augmented_context(memory: &str, conversation: &str) -> String {
    format!("User memory:\n{memory}\n\nConversation:\n{conversation}")
}

fn render_evidence(items: &[EvidenceItem], limit: usize) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "[{}] title={} | score={}\n",
            index + 1,
            item.title_or_source(),
            item.score
        ));
    }
    out
}

pub struct EngineBuilder {
    config: EngineConfig,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
    web: Option<Arc<dyn WebSource>>,
    evaluator: Option<Arc<dyn Evaluator>>,
    rewriter: Option<Arc<dyn Rewriter>>,
    memory: Option<Arc<dyn MemoryStore>>,
    checkpoints: Option<Arc<dyn CheckpointStore>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            knowledge: None,
            web: None,
            evaluator: None,
            rewriter: None,
            memory: None,
            checkpoints: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn knowledge_source(mut self, source: impl KnowledgeSource + 'static) -> Self {
        self.knowledge = Some(Arc::new(source));
        self
    }

    pub fn web_source(mut self, source: impl WebSource + 'static) -> Self {
        self.web = Some(Arc::new(source));
        self
    }

    pub fn evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    pub fn rewriter(mut self, rewriter: impl Rewriter + 'static) -> Self {
        self.rewriter = Some(Arc::new(rewriter));
        self
    }

    pub fn memory_store(mut self, memory: impl MemoryStore + 'static) -> Self {
        self.memory = Some(Arc::new(memory));
        self
    }

    pub fn memory_store_arc(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn checkpoint_store(mut self, checkpoints: impl CheckpointStore + 'static) -> Self {
        self.checkpoints = Some(Arc::new(checkpoints));
        self
    }

    pub fn checkpoint_store_arc(mut self, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = Some(checkpoints);
        self
    }

    pub fn build(self) -> Result<Engine, EngineError> {
        let missing = |what: &str| EngineError::InvalidConfig(format!("{what} is required"));
        Ok(Engine {
            config: self.config,
            knowledge: self.knowledge.ok_or_else(|| missing("knowledge source"))?,
            web: self.web.ok_or_else(|| missing("web source"))?,
            evaluator: self.evaluator.ok_or_else(|| missing("evaluator"))?,
            rewriter: self.rewriter.ok_or_else(|| missing("rewriter"))?,
            memory: self.memory.ok_or_else(|| missing("memory store"))?,
            checkpoints: self.checkpoints.ok_or_else(|| missing("checkpoint store"))?,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
