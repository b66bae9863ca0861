use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    KnowledgeBase,
    Web,
}

/// One evidence snippet backing a candidate answer.
///
/// Knowledge-base items carry `source`/`page`/`chunk_index`; web items carry
/// `title`/`url`. All locator fields are optional so a single shape covers
/// both providers.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct EvidenceItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    pub score: f32,
}

impl EvidenceItem {
    pub fn title_or_source(&self) -> &str {
        self.title
            .as_deref()
            .or(self.source.as_deref())
            .or(self.url.as_deref())
            .unwrap_or("unknown")
    }
}

/// A provisional answer plus the evidence it was synthesized from.
///
/// Candidates are ephemeral: recomputed every turn, never persisted beyond
/// the turn's conversation state.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Candidate {
    pub kind: SourceKind,
    pub answer: String,
    pub items: Vec<EvidenceItem>,
    pub top_score: f32,
}

impl Candidate {
    /// Builds a candidate, deriving `top_score` from the items rather than
    /// trusting the provider.
    pub fn new(kind: SourceKind, answer: impl Into<String>, items: Vec<EvidenceItem>) -> Self {
        let top_score = items.iter().map(|item| item.score).fold(0.0, f32::max);
        Self {
            kind,
            answer: answer.into(),
            items,
            top_score,
        }
    }

    /// Sentinel used when every source came back empty or failed. Scores
    /// zero so evaluation routes it to human review.
    pub fn unanswered() -> Self {
        Self {
            kind: SourceKind::Web,
            answer: "no answer found".to_string(),
            items: Vec::new(),
            top_score: 0.0,
        }
    }
}
