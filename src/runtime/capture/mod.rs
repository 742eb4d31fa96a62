//! Point-in-time capture of every live task.
//!
//! [`Snapshot::take`] copies the registry at one instant; the snapshot can
//! then be rendered as a Go-style text dump bounded by a [`CaptureLimit`],
//! or serialized as JSON.
//!
//! ```text
//! task 3 [chan send, 3 seconds]:
//! taskdump::demo::blocking::block_chan()
//! 	src/demo/blocking.rs:35 progress=0
//! ```

mod render;

pub use render::{CaptureLimit, CaptureReport};

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use crate::error::DemoResult;
use crate::runtime::registry::TaskRegistry;
use crate::runtime::task::{TaskId, TaskRecord, TaskState};
use render::CaptureBuffer;

/// Coarse classification of a captured task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskClass {
    Blocked,
    Runnable,
    Finished,
}

/// One task as seen by a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub name: String,
    pub entry: &'static str,
    pub state: TaskState,
    pub file: &'static str,
    pub line: u32,
    /// Milliseconds spent in `state` at capture time.
    pub in_state_ms: u64,
    pub progress: u64,
}

impl TaskSnapshot {
    fn of(record: &TaskRecord) -> Self {
        let (state, transition, progress) = record.observe();
        Self {
            id: record.id(),
            name: record.name().to_string(),
            entry: record.entry(),
            state,
            file: transition.site.file(),
            line: transition.site.line(),
            in_state_ms: saturating_millis(transition.since.elapsed()),
            progress,
        }
    }

    pub fn class(&self) -> TaskClass {
        match self.state {
            TaskState::Blocked(_) => TaskClass::Blocked,
            TaskState::Runnable | TaskState::Running => TaskClass::Runnable,
            TaskState::Finished => TaskClass::Finished,
        }
    }

    /// The bracketed status in a dump header, e.g. `chan send, 3 seconds`.
    fn status(&self) -> String {
        match self.state {
            TaskState::Blocked(reason) if self.in_state_ms >= 1_000 => {
                format!(
                    "{}, {}",
                    reason.label(),
                    wait_duration(Duration::from_millis(self.in_state_ms))
                )
            }
            state => state.to_string(),
        }
    }
}

/// Whole milliseconds, clamped to `u64::MAX`.
pub(crate) fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn wait_duration(waited: Duration) -> String {
    let secs = waited.as_secs();
    match secs {
        0..=1 => "1 second".to_string(),
        2..=59 => format!("{} seconds", secs),
        60..=119 => "1 minute".to_string(),
        _ => format!("{} minutes", secs / 60),
    }
}

/// Task counts by class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub blocked: usize,
    pub runnable: usize,
    pub finished: usize,
}

/// Every live task at one instant, in registration order.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(skip)]
    taken_at: Instant,
    pub tasks: Vec<TaskSnapshot>,
}

impl Snapshot {
    pub fn take(registry: &TaskRegistry) -> Self {
        let records = registry.records();
        Self {
            taken_at: Instant::now(),
            tasks: records.iter().map(|r| TaskSnapshot::of(r)).collect(),
        }
    }

    #[inline]
    pub fn taken_at(&self) -> Instant {
        self.taken_at
    }

    pub fn get(
        &self,
        id: TaskId,
    ) -> Option<&TaskSnapshot> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find(
        &self,
        name: &str,
    ) -> Option<&TaskSnapshot> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// `(id, class)` pairs in registration order.
    pub fn classification(&self) -> Vec<(TaskId, TaskClass)> {
        self.tasks.iter().map(|t| (t.id, t.class())).collect()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.tasks.len(),
            ..Summary::default()
        };
        for task in &self.tasks {
            match task.class() {
                TaskClass::Blocked => summary.blocked += 1,
                TaskClass::Runnable => summary.runnable += 1,
                TaskClass::Finished => summary.finished += 1,
            }
        }
        summary
    }

    /// Render the text dump within `limit`.
    pub fn render(
        &self,
        limit: CaptureLimit,
    ) -> CaptureReport {
        let mut buf = CaptureBuffer::new(limit);
        for (i, task) in self.tasks.iter().enumerate() {
            if i > 0 {
                let _ = buf.write_char('\n');
            }
            let _ = writeln!(buf, "task {} [{}]:", task.id.inner(), task.status());
            let _ = writeln!(buf, "{}()", task.entry);
            let _ = writeln!(
                buf,
                "\t{}:{} progress={}",
                task.file, task.line, task.progress
            );
        }

        let report = buf.finish();
        if report.truncated {
            warn!(
                "capture of {} tasks truncated to {} bytes",
                self.tasks.len(),
                report.bytes
            );
        }
        report
    }

    pub fn to_json(&self) -> DemoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
