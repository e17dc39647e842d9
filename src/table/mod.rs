//! File-backed lookup table subsystem.
//!
//! # Data Flow
//! ```text
//! source files (text, one entry per line)
//!     → parser.rs (line grammar, quote-aware delimiter scan)
//!     → loader.rs (merge all sources into one Mapping, all-or-nothing)
//!     → store.rs (RwLock<Arc<Mapping>>, swapped wholesale)
//!     → FileTable::lookup (readers)
//!
//! Every reload interval:
//!     reload.rs observes stamps (state.rs)
//!     → unchanged: sleep again
//!     → changed: loader.rs → success: swap store, record stamps
//!                          → failure: log, keep store and stamps
//! ```
//!
//! # Design Decisions
//! - A removed source is an empty source, not an error
//! - The initial load is fatal on error; background reloads never are
//! - Polling only; no filesystem notifications

pub mod file;
pub mod loader;
pub mod parser;
pub mod reload;
pub mod state;
pub mod store;

pub use file::FileTable;
pub use loader::{load_snapshot, Mapping};
pub use parser::{parse_line, Entry, LineError};
pub use reload::{ReloadLoop, TickOutcome};
pub use state::{FileStamp, LoadState};
pub use store::Store;
