use serde::{Deserialize, Serialize};

use crate::{Candidate, Message, Role};

/// Durable state of one conversation thread.
///
/// Created on the first message for a thread, reloaded from the checkpoint
/// store on every later turn, and mutated in place by each workflow stage.
/// `messages` is append-only and never reordered.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConversationState {
    pub thread_id: String,
    pub user_id: String,
    pub messages: Vec<Message>,
    pub rag_result: Option<Candidate>,
    pub web_result: Option<Candidate>,
    pub final_answer: Option<String>,
    pub eval_score: Option<f32>,
    pub human_feedback: Option<String>,
    pub memory_written: bool,
}

impl ConversationState {
    pub fn new(thread_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            user_id: user_id.into(),
            messages: Vec::new(),
            rag_result: None,
            web_result: None,
            final_answer: None,
            eval_score: None,
            human_feedback: None,
            memory_written: false,
        }
    }

    /// Appends the user's message and resets every per-turn field, so a
    /// candidate or verdict from a previous turn can never leak into the
    /// routing of this one.
    pub fn begin_turn(&mut self, user_message: impl Into<String>) {
        self.messages.push(Message::user(user_message));
        self.rag_result = None;
        self.web_result = None;
        self.final_answer = None;
        self.eval_score = None;
        self.human_feedback = None;
        self.memory_written = false;
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Content of the most recent user message, or empty if none exists.
    pub fn last_user_message(&self) -> String {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| message.content.clone())
            .unwrap_or_default()
    }

    /// Renders the last `max_turns` messages, oldest first, as a compact
    /// transcript block for the knowledge source.
    pub fn transcript_window(&self, max_turns: usize) -> String {
        let start = self.messages.len().saturating_sub(max_turns);
        self.messages[start..]
            .iter()
            .map(|message| match message.role {
                Role::User => format!("User: {}", message.content),
                Role::Assistant => format!("Assistant: {}", message.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the knowledge-base candidate clears the routing threshold.
    pub fn rag_qualifies(&self, rag_threshold: f32) -> bool {
        matches!(&self.rag_result, Some(rag) if rag.top_score >= rag_threshold)
    }

    /// The single candidate fed to evaluation: the knowledge-base result if
    /// it clears the threshold, else the web result, else the "no answer
    /// found" sentinel. Routing and evaluation both go through this rule so
    /// they cannot disagree.
    pub fn active_candidate(&self, rag_threshold: f32) -> Candidate {
        match &self.rag_result {
            Some(rag) if rag.top_score >= rag_threshold => rag.clone(),
            _ => match &self.web_result {
                Some(web) => web.clone(),
                None => Candidate::unanswered(),
            },
        }
    }
}
