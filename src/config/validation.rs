//! Configuration validation.
//!
//! # Responsibilities
//! - Require a non-empty source set with no empty paths
//! - Validate value ranges (reload interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TableConfig → Result<(), Vec<ValidationError>>
//! - Runs before any source file is read

use std::fmt;

use crate::config::schema::TableConfig;

/// A single semantic problem with a [`TableConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoFiles,
    EmptyPath { index: usize },
    ZeroInterval,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoFiles => write!(f, "at least one source file is required"),
            ValidationError::EmptyPath { index } => write!(f, "files[{}] is an empty path", index),
            ValidationError::ZeroInterval => write!(f, "reload_interval_ms must be greater than 0"),
        }
    }
}

/// Check `config` for semantic problems.
pub fn validate_config(config: &TableConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.files.is_empty() {
        errors.push(ValidationError::NoFiles);
    }
    for (index, path) in config.files.iter().enumerate() {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath { index });
        }
    }
    if config.reload_interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Join validation errors into one message.
pub fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
