//! Error types

use std::time::Duration;

use thiserror::Error;

use crate::util::config::ConfigError;

/// Result alias used across the crate.
pub type DemoResult<T> = Result<T, DemoError>;

/// Errors raised while launching tasks or reporting captures.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to spawn task `{name}`: {source}")]
    Spawn {
        /// Name of the task that could not be started
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{pending} task(s) in the {phase} phase did not signal readiness within {waited:?}")]
    ReadyTimeout {
        /// Phase whose tasks were awaited
        phase: &'static str,
        /// Readiness signals still outstanding
        pending: usize,
        /// How long the launcher waited
        waited: Duration,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write capture: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode capture as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
