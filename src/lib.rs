//! File-backed, hot-reloading key-value lookup tables.
//!
//! A [`FileTable`] parses one or more text files into an in-memory mapping
//! and keeps it in sync with the files by polling their modification times.
//! A bad edit never replaces a working table; a removed file reads as empty.
//!
//! ```no_run
//! use file_table::{FileTable, TableConfig};
//!
//! # async fn example() -> file_table::Result<()> {
//! let mut table = FileTable::new(&TableConfig::with_files(["/etc/mail/aliases"]))?;
//! table.init()?;
//! if let Some(target) = table.lookup("postmaster") {
//!     println!("postmaster -> {}", target);
//! }
//! table.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod table;

pub use config::TableConfig;
pub use error::{Result, TableError};
pub use table::FileTable;
