//! Storage traits and implementations
//!
//! Configuration and cursor persistence sit behind traits so the resolver
//! and orchestrator can run against JSON files or purely in memory.

mod file;
mod memory;
mod traits;

pub use file::{CONFIG_FILE, CURSOR_FILE, FileConfigStore, FileCursorStore};
pub use memory::{InMemoryConfigStore, InMemoryCursorStore};
pub use traits::{ConfigStore, CursorStore};

use crate::models::SyncCursor;
use crate::sync::timing::Clock;

/// Load the cursor, falling back to the first-run default when it can't be read
///
/// The failure is logged and the stored file is left as it is; it is only
/// replaced after a later run commits.
pub fn load_or_default(store: &dyn CursorStore, clock: &dyn Clock) -> SyncCursor {
    match store.load() {
        Ok(cursor) => cursor,
        Err(e) => {
            let fallback = SyncCursor::first_run(clock.now());
            log::error!("Error reading cursor: {}. Using {} instead", e, fallback.last);
            fallback
        }
    }
}
