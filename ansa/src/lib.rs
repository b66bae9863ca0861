//! Umbrella crate re-exporting the ansa workspace.
//!
//! The core vocabulary is always available; the engine and the memory
//! stores are feature-gated so adapter crates can depend on the contracts
//! alone.

pub use ansa_core::{
    AnsaError, Candidate, Checkpoint, CheckpointHistory, CheckpointMetadata, CheckpointStore,
    ConversationState, Evaluation, Evaluator, EvidenceItem, InMemoryCheckpointer, KnowledgeSource,
    MemoryEntry, MemoryStore, Message, ReviewRequest, Rewriter, Role, SourceKind, WebSource,
};

#[cfg(feature = "engine")]
pub use ansa_engine::{
    CheckpointRecord, Engine, EngineBuilder, EngineConfig, EngineError, FileCheckpointer,
    TurnOutcome,
};

#[cfg(feature = "memory")]
pub use ansa_memory::{BufferMemory, FileMemory};
