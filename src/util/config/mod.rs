//! taskdump configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. Config file (--config demo.ron)
//! 3. Default values
//! ```
//!
//! The defaults reproduce the plain demo: both phases, a three second settle
//! delay, one capture per phase into a 102,400 byte buffer, and no exit.
//!
//! # Example file
//!
//! ```ron
//! (
//!     settle_ms: 500,
//!     phases: blocking,
//!     samples: 2,
//!     exit_after_capture: true,
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::capture::CaptureLimit;

/// Which phases the launcher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSelection {
    #[default]
    Both,
    Blocking,
    Spinning,
}

impl PhaseSelection {
    pub fn runs_blocking(&self) -> bool {
        matches!(self, PhaseSelection::Both | PhaseSelection::Blocking)
    }

    pub fn runs_spinning(&self) -> bool {
        matches!(self, PhaseSelection::Both | PhaseSelection::Spinning)
    }
}

/// How captures are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `Stack of N bytes: ...`
    #[default]
    Text,
    /// One pretty-printed JSON snapshot per capture.
    Json,
}

/// Launcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Delay between readiness and the capture of a phase.
    pub settle_ms: u64,
    /// Upper bound on waiting for readiness signals.
    pub ready_timeout_ms: u64,
    /// Capture buffer size; `0` means unbounded.
    pub capture_bytes: usize,
    pub phases: PhaseSelection,
    /// Captures taken per phase.
    pub samples: usize,
    /// Delay between captures of the same phase.
    pub sample_interval_ms: u64,
    pub format: OutputFormat,
    /// Return after the last capture instead of holding the process.
    pub exit_after_capture: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            settle_ms: 3_000,
            ready_timeout_ms: 10_000,
            capture_bytes: CaptureLimit::DEFAULT_BYTES,
            phases: PhaseSelection::Both,
            samples: 1,
            sample_interval_ms: 3_000,
            format: OutputFormat::Text,
            exit_after_capture: false,
        }
    }
}

impl DemoConfig {
    #[inline]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[inline]
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    #[inline]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    #[inline]
    pub fn capture_limit(&self) -> CaptureLimit {
        CaptureLimit::from_bytes(self.capture_bytes)
    }

    /// Layer CLI overrides on top of this config.
    pub fn apply(
        mut self,
        overrides: &Overrides,
    ) -> Self {
        if let Some(ms) = overrides.settle_ms {
            self.settle_ms = ms;
        }
        if let Some(bytes) = overrides.capture_bytes {
            self.capture_bytes = bytes;
        }
        if let Some(phases) = overrides.phases {
            self.phases = phases;
        }
        if let Some(samples) = overrides.samples {
            self.samples = samples;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if overrides.exit_after_capture {
            self.exit_after_capture = true;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::Invalid("samples must be at least 1".into()));
        }
        if self.ready_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "ready_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub settle_ms: Option<u64>,
    pub capture_bytes: Option<usize>,
    pub phases: Option<PhaseSelection>,
    pub samples: Option<usize>,
    pub format: Option<OutputFormat>,
    pub exit_after_capture: bool,
}

/// Load a RON config file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<DemoConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: DemoConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Resolve the effective config from an optional file and CLI overrides.
pub fn resolve(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<DemoConfig, ConfigError> {
    let base = match path {
        Some(path) => load_config(path)?,
        None => DemoConfig::default(),
    };
    let config = base.apply(overrides);
    config.validate()?;
    Ok(config)
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
