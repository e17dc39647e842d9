//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Construction (table/file.rs):
//!     Validate config → Initial load (fatal on error) → Store
//!
//! Init:
//!     Shutdown::spawn → ReloadLoop::run (background task)
//!
//! Close (shutdown.rs):
//!     Trigger broadcast → Loop exits at next await point → Join handle
//!
//! Signals (signals.rs, binary only):
//!     SIGTERM/SIGINT → Close table
//!     SIGHUP → Immediate reload
//! ```
//!
//! # Design Decisions
//! - Close is complete only once the loop task has been joined
//! - Dropping the coordinator closes the channel, which also stops the loop

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{Signal, Signals};
