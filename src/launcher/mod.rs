//! Launcher: starts the demo tasks and captures them.
//!
//! The launcher registers itself as task `main`, then walks the [`Phase`]
//! machine. Each launch phase spawns four tasks and waits until every one
//! has signalled readiness (about to park, or inside its loop); the capture
//! that follows first waits the settle delay, then takes `samples`
//! snapshots and writes them to the output.

mod phase;

pub use phase::Phase;

use std::io::Write;
use std::sync::Arc;
use std::thread;

use tracing::{debug, info};

use crate::demo::Variant;
use crate::error::{DemoError, DemoResult};
use crate::runtime::capture::Snapshot;
use crate::runtime::registry::TaskRegistry;
use crate::runtime::sync::WaitGroup;
use crate::runtime::task::TaskHandle;
use crate::util::config::{DemoConfig, OutputFormat};

const MAIN_ENTRY: &str = concat!(module_path!(), "::Launcher::run");

/// Drives the demo and writes captures to `out`.
pub struct Launcher<W: Write> {
    config: DemoConfig,
    registry: Arc<TaskRegistry>,
    out: W,
    phase: Phase,
    main: TaskHandle,
    launched: Vec<TaskHandle>,
    captures: Vec<Snapshot>,
}

impl<W: Write> Launcher<W> {
    /// Create a launcher and register the calling thread as `main`.
    pub fn new(
        config: DemoConfig,
        registry: Arc<TaskRegistry>,
        out: W,
    ) -> Self {
        let main = registry.register("main", MAIN_ENTRY);
        main.running();
        Self {
            config,
            registry,
            out,
            phase: Phase::Init,
            main,
            launched: Vec::new(),
            captures: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Snapshots taken so far, in order.
    #[inline]
    pub fn captures(&self) -> &[Snapshot] {
        &self.captures
    }

    /// Tasks started so far, in order.
    #[inline]
    pub fn launched(&self) -> &[TaskHandle] {
        &self.launched
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Advance one phase and perform its work.
    ///
    /// Returns the new phase, or `None` if already terminal. Entering
    /// [`Phase::Holding`] never returns.
    pub fn step(&mut self) -> DemoResult<Option<Phase>> {
        let Some(next) = self
            .phase
            .next(self.config.phases, self.config.exit_after_capture)
        else {
            return Ok(None);
        };
        debug!("phase {} -> {}", self.phase, next);
        self.phase = next;

        match next {
            Phase::Init => unreachable!("no phase transitions back to init"),
            Phase::BlockingPhase => {
                writeln!(self.out, "Booting blocking tasks...")?;
                self.out.flush()?;
                self.launch(&Variant::BLOCKING, "blocking")?;
            }
            Phase::SpinningPhase => {
                let gap = if self.captures.is_empty() { "" } else { "\n\n\n" };
                writeln!(self.out, "{}Booting nonblocking tasks...", gap)?;
                self.out.flush()?;
                self.launch(&Variant::SPINNING, "spinning")?;
            }
            Phase::CaptureOne | Phase::CaptureTwo => {
                thread::sleep(self.config.settle());
                self.capture()?;
            }
            Phase::Holding => self.hold(),
            Phase::Done => {
                info!("done after {} capture(s)", self.captures.len());
                self.main.finish();
            }
        }
        Ok(Some(next))
    }

    /// Step until a terminal phase. With the default config this never
    /// returns: the launcher ends up holding.
    pub fn run(&mut self) -> DemoResult<()> {
        while self.step()?.is_some() {}
        Ok(())
    }

    fn launch(
        &mut self,
        variants: &[Variant],
        phase: &'static str,
    ) -> DemoResult<()> {
        let ready = Arc::new(WaitGroup::new());
        ready.add(variants.len());
        for variant in variants {
            let handle = variant.launch(&self.registry, Arc::clone(&ready))?;
            self.launched.push(handle);
        }

        let waited = self.config.ready_timeout();
        if !ready.wait_timeout(waited) {
            return Err(DemoError::ReadyTimeout {
                phase,
                pending: ready.count(),
                waited,
            });
        }
        info!("{} {} tasks ready", variants.len(), phase);
        Ok(())
    }

    fn capture(&mut self) -> DemoResult<()> {
        for sample in 0..self.config.samples {
            if sample > 0 {
                thread::sleep(self.config.sample_interval());
            }
            self.main.running();
            let snapshot = Snapshot::take(&self.registry);

            match self.config.format {
                OutputFormat::Text => {
                    let report = snapshot.render(self.config.capture_limit());
                    writeln!(self.out, "{}", report)?;
                }
                OutputFormat::Json => {
                    writeln!(self.out, "{}", snapshot.to_json()?)?;
                }
            }
            self.out.flush()?;

            let summary = snapshot.summary();
            info!(
                "{} sample {}: {} tasks, {} blocked, {} runnable",
                self.phase,
                sample + 1,
                summary.total,
                summary.blocked,
                summary.runnable
            );
            self.captures.push(snapshot);
        }
        Ok(())
    }

    fn hold(&self) -> ! {
        info!("holding; the process exits only when killed");
        loop {
            thread::park();
        }
    }
}

#[cfg(test)]
mod tests;
