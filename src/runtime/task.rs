//! Task records tracked by the registry.
//!
//! A task is one OS thread started through [`TaskRegistry::spawn`]. Since the
//! process cannot walk the stacks of other threads, every task keeps its own
//! record up to date: the state it is in, the source location of its last
//! state transition and a progress counter that stands in for a program
//! counter.
//!
//! [`TaskRegistry::spawn`]: crate::runtime::registry::TaskRegistry::spawn

use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

/// Unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Get the inner value.
    #[inline]
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(val: u64) -> Self {
        Self(val)
    }
}

impl fmt::Display for TaskId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "task {}", self.0)
    }
}

/// The wait condition a blocked task is parked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitReason {
    /// Timer wait.
    Sleep,
    /// Rendezvous send with no receiver ready.
    ChanSend,
    /// Exclusive lock already held.
    MutexLock,
    /// Wait counter that never reaches zero.
    WaitGroup,
}

impl WaitReason {
    /// All reasons, in discriminant order.
    pub const ALL: [WaitReason; 4] = [
        WaitReason::Sleep,
        WaitReason::ChanSend,
        WaitReason::MutexLock,
        WaitReason::WaitGroup,
    ];

    /// Label used in text dumps.
    pub fn label(&self) -> &'static str {
        match self {
            WaitReason::Sleep => "sleep",
            WaitReason::ChanSend => "chan send",
            WaitReason::MutexLock => "sync.Mutex.Lock",
            WaitReason::WaitGroup => "sync.WaitGroup.Wait",
        }
    }
}

impl fmt::Display for WaitReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Spawned but not yet executing its body.
    Runnable,
    /// Executing.
    Running,
    /// Parked in a wait condition.
    Blocked(WaitReason),
    /// Body returned.
    Finished,
}

const BLOCKED_BASE: u8 = 16;

impl TaskState {
    /// Convert from u8 (for atomic storage).
    #[inline]
    pub fn from_u8(val: u8) -> Self {
        match val {
            0 => TaskState::Runnable,
            1 => TaskState::Running,
            2 => TaskState::Finished,
            v if v >= BLOCKED_BASE && ((v - BLOCKED_BASE) as usize) < WaitReason::ALL.len() => {
                TaskState::Blocked(WaitReason::ALL[(v - BLOCKED_BASE) as usize])
            }
            _ => TaskState::Runnable,
        }
    }

    /// Convert to u8 (for atomic storage).
    #[inline]
    pub fn as_u8(&self) -> u8 {
        match self {
            TaskState::Runnable => 0,
            TaskState::Running => 1,
            TaskState::Finished => 2,
            TaskState::Blocked(reason) => BLOCKED_BASE + *reason as u8,
        }
    }

    /// Whether the task is parked.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        matches!(self, TaskState::Blocked(_))
    }

    /// Whether the task can make progress (running or runnable).
    #[inline]
    pub fn is_runnable(&self) -> bool {
        matches!(self, TaskState::Runnable | TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            TaskState::Runnable => f.write_str("runnable"),
            TaskState::Running => f.write_str("running"),
            TaskState::Blocked(reason) => f.write_str(reason.label()),
            TaskState::Finished => f.write_str("finished"),
        }
    }
}

/// Where and when the last state transition happened.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    /// Source location of the transition.
    pub site: &'static Location<'static>,
    /// Instant of the transition.
    pub since: Instant,
}

/// Registry entry for one task.
pub struct TaskRecord {
    id: TaskId,
    name: String,
    entry: &'static str,
    state: AtomicU8,
    transition: Mutex<Transition>,
    progress: AtomicU64,
}

impl fmt::Debug for TaskRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TaskRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entry", &self.entry)
            .field("state", &self.state())
            .field("progress", &self.progress())
            .finish()
    }
}

impl TaskRecord {
    /// Create a runnable record. The site is the caller's location.
    #[track_caller]
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        entry: &'static str,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            entry,
            state: AtomicU8::new(TaskState::Runnable.as_u8()),
            transition: Mutex::new(Transition {
                site: Location::caller(),
                since: Instant::now(),
            }),
            progress: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name of the function the task runs.
    #[inline]
    pub fn entry(&self) -> &'static str {
        self.entry
    }

    #[inline]
    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::SeqCst))
    }

    #[inline]
    pub fn progress(&self) -> u64 {
        self.progress.load(Ordering::Relaxed)
    }

    /// State, last transition and progress read together.
    pub fn observe(&self) -> (TaskState, Transition, u64) {
        let transition = self.transition.lock();
        (self.state(), *transition, self.progress())
    }

    /// Set the state and record the caller as the transition site.
    #[track_caller]
    pub fn set_state(
        &self,
        state: TaskState,
    ) {
        let site = Location::caller();
        let mut transition = self.transition.lock();
        self.state.store(state.as_u8(), Ordering::SeqCst);
        *transition = Transition {
            site,
            since: Instant::now(),
        };
    }

    /// Count one loop iteration.
    #[inline]
    pub fn tick(&self) {
        self.progress.fetch_add(1, Ordering::Relaxed);
    }

    /// Time spent in the current state.
    pub fn elapsed_in_state(&self) -> Duration {
        self.transition.lock().since.elapsed()
    }
}

/// The handle a task body uses to report on itself.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    record: Arc<TaskRecord>,
}

impl TaskHandle {
    pub(crate) fn new(record: Arc<TaskRecord>) -> Self {
        Self { record }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.record.id()
    }

    #[inline]
    pub fn record(&self) -> &Arc<TaskRecord> {
        &self.record
    }

    #[inline]
    pub fn state(&self) -> TaskState {
        self.record.state()
    }

    /// Mark the task as about to park on `reason`.
    #[track_caller]
    pub fn block_on(
        &self,
        reason: WaitReason,
    ) {
        self.record.set_state(TaskState::Blocked(reason));
    }

    #[track_caller]
    pub fn running(&self) {
        self.record.set_state(TaskState::Running);
    }

    #[track_caller]
    pub fn finish(&self) {
        self.record.set_state(TaskState::Finished);
    }

    #[inline]
    pub fn tick(&self) {
        self.record.tick();
    }
}
