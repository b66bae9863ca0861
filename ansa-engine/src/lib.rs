mod config;
mod engine;
mod error;
mod file_checkpointer;
mod outcome;

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder};
pub use error::EngineError;
pub use file_checkpointer::{CheckpointRecord, FileCheckpointer};
pub use outcome::TurnOutcome;
