//! Bridge crate - Business logic for moving diabetes data between services
//!
//! This crate provides:
//! - Domain models (Entry, EntryBatch, SyncCursor, TimeWindow, EffectiveConfig)
//! - Configuration resolution from environment, file and prompts
//! - Storage trait abstractions for the config and cursor files
//! - Nightscout source client and LibreView sink client
//! - Checkpointed sync engine
//!
//! This crate has no terminal dependencies; prompting goes through the
//! [`Prompter`] trait so the binary decides how to ask.

pub mod error;
pub mod libreview;
pub mod models;
pub mod nightscout;
pub mod resolve;
pub mod storage;
pub mod sync;

pub use error::{ConfigError, CursorError, SyncError};
pub use libreview::LibreViewClient;
pub use models::{
    BatchCounts, EffectiveConfig, Entry, EntryBatch, EntryKind, RawConfig, RunMode, SyncCursor,
    TimeWindow,
};
pub use nightscout::NightscoutClient;
pub use resolve::{
    Answer, EnvSource, MapEnv, ProcessEnv, Prompter, Question, Resolution, Resolver,
    ScriptedPrompter,
};
pub use storage::{
    ConfigStore, CursorStore, FileConfigStore, FileCursorStore, InMemoryConfigStore,
    InMemoryCursorStore,
};
pub use sync::{
    // Collaborators
    AuthSession, Credentials, EntrySink, EntrySource,
    // Time
    Clock, FixedClock, SystemClock,
    // Execution
    Orchestrator, RunState, SyncJob, SyncOutcome, SyncReport, run_job,
};
