//! Search input handling.
//!
//! The table keeps two strings: the raw text of the search box, updated on
//! every keystroke, and the committed term, updated only once typing
//! settles. Only the committed term ever leaves the table.

mod debouncer;
mod task;

pub use debouncer::Debouncer;
pub use task::SearchTask;

use std::time::Duration;

/// Quiet period used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);
