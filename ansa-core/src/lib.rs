mod candidate;
mod checkpoint;
mod error;
mod evaluate;
mod memory;
mod message;
mod source;
mod state;

pub use candidate::{Candidate, EvidenceItem, SourceKind};
pub use checkpoint::{
    Checkpoint, CheckpointHistory, CheckpointMetadata, CheckpointStore, InMemoryCheckpointer,
    ReviewRequest,
};
pub use error::AnsaError;
pub use evaluate::{Evaluation, Evaluator, Rewriter};
pub use memory::{MemoryEntry, MemoryStore};
pub use message::{Message, Role};
pub use source::{KnowledgeSource, WebSource};
pub use state::ConversationState;
