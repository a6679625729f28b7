//! Error types for sismo-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed: {0} issue(s)")]
    Validation(usize),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
