//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or CLI flags
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TableConfig (validated, immutable)
//!     → FileTable::new
//! ```
//!
//! # Design Decisions
//! - The source set is fixed for the lifetime of a table
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::{LogFormat, ObservabilityConfig, TableConfig};
pub use validation::{validate_config, ValidationError};
