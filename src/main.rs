//! taskdump - CLI

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use taskdump::util::config::{self, OutputFormat, Overrides, PhaseSelection};
use taskdump::util::logger;
use taskdump::{Launcher, TaskRegistry, NAME, VERSION};
use tracing::debug;

/// Launch blocked and spinning tasks and dump their states
#[derive(Parser, Debug)]
#[command(name = "taskdump")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    /// RON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Milliseconds between a phase's readiness and its capture
    #[arg(long, value_name = "MS")]
    settle: Option<u64>,

    /// Capture buffer size in bytes (0 = unbounded)
    #[arg(long, value_name = "BYTES")]
    capture_bytes: Option<usize>,

    /// Phases to run
    #[arg(long, value_enum)]
    phases: Option<PhaseSelection>,

    /// Captures per phase
    #[arg(long, value_name = "N")]
    samples: Option<usize>,

    /// Capture output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Exit after the last capture instead of holding the process
    #[arg(long)]
    exit: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            settle_ms: self.settle,
            capture_bytes: self.capture_bytes,
            phases: self.phases,
            samples: self.samples,
            format: self.format,
            exit_after_capture: self.exit,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli(args.verbose);

    let config = config::resolve(args.config.as_deref(), &args.overrides())
        .context("Failed to load configuration")?;
    debug!("{:?}", config);

    let mut launcher = Launcher::new(config, TaskRegistry::global(), io::stdout().lock());
    launcher.run().context("Demo failed")?;
    Ok(())
}
