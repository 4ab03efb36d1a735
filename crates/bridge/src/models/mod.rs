//! Domain models for transfer runs

mod cursor;
mod entry;
mod settings;
mod window;

pub use cursor::SyncCursor;
pub use entry::{BatchCounts, Entry, EntryBatch, EntryKind};
pub use settings::{EffectiveConfig, RawConfig, keys};
pub use window::{RunMode, TimeWindow};
