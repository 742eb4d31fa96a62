//! taskdump
//!
//! Launches tasks that park forever (timed sleep, rendezvous send, double
//! lock, wait on an ungrounded counter) next to tasks that spin forever
//! without parking, then dumps every task's state so the two can be told
//! apart.
//!
//! # Example
//!
//! ```no_run
//! use std::io;
//! use taskdump::{DemoConfig, Launcher, TaskRegistry};
//!
//! fn main() -> taskdump::DemoResult<()> {
//!     let config = DemoConfig {
//!         exit_after_capture: true,
//!         ..DemoConfig::default()
//!     };
//!     Launcher::new(config, TaskRegistry::global(), io::stdout()).run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/taskdump")]
#![warn(rust_2018_idioms)]

pub mod demo;
pub mod error;
pub mod launcher;
pub mod runtime;

// Utility modules
pub mod util;

// Re-exports
pub use error::{DemoError, DemoResult};
pub use launcher::{Launcher, Phase};
pub use runtime::capture::{CaptureLimit, CaptureReport, Snapshot};
pub use runtime::registry::TaskRegistry;
pub use util::config::DemoConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program name
pub const NAME: &str = "taskdump";
