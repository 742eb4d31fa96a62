//! Process-wide task registry
//!
//! Every task started through [`TaskRegistry::spawn`] owns a [`TaskRecord`]
//! that stays registered until its body returns (or unwinds). A capture
//! enumerates the registry instead of walking thread stacks.
//!
//! The binary uses [`TaskRegistry::global`]; tests create their own
//! registries so that captures only see the tasks they launched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{DemoError, DemoResult};
use crate::runtime::task::{TaskHandle, TaskId, TaskRecord, TaskState};

static GLOBAL: Lazy<Arc<TaskRegistry>> = Lazy::new(|| Arc::new(TaskRegistry::new()));

/// Registration-ordered set of live tasks.
#[derive(Debug)]
pub struct TaskRegistry {
    next_id: AtomicU64,
    tasks: RwLock<IndexMap<TaskId, Arc<TaskRecord>>>,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    /// Create an empty registry. Ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tasks: RwLock::new(IndexMap::new()),
        }
    }

    /// The registry shared by the whole process.
    pub fn global() -> Arc<TaskRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Register a record without starting a thread.
    ///
    /// Used for the calling thread itself (the launcher registers as `main`).
    #[track_caller]
    pub fn register(
        &self,
        name: impl Into<String>,
        entry: &'static str,
    ) -> TaskHandle {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = Arc::new(TaskRecord::new(id, name, entry));
        self.tasks.write().insert(id, Arc::clone(&record));
        trace!("registered {} ({})", id, record.name());
        TaskHandle::new(record)
    }

    /// Drop a record. Returns whether it was present.
    pub fn deregister(
        &self,
        id: TaskId,
    ) -> bool {
        self.tasks.write().shift_remove(&id).is_some()
    }

    /// Start `body` on a new named thread with a registered record.
    ///
    /// The thread is detached: nothing joins it and it cannot be cancelled.
    /// The record is removed once `body` returns or panics.
    #[track_caller]
    pub fn spawn<F>(
        self: &Arc<Self>,
        name: impl Into<String>,
        entry: &'static str,
        body: F,
    ) -> DemoResult<TaskHandle>
    where
        F: FnOnce(TaskHandle) + Send + 'static,
    {
        let name = name.into();
        let handle = self.register(name.clone(), entry);
        let task = handle.clone();
        let registry = Arc::clone(self);

        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _guard = Deregister {
                    registry,
                    task: task.clone(),
                };
                body(task);
            });

        match spawned {
            Ok(_detached) => {
                debug!("spawned {} `{}`", handle.id(), name);
                Ok(handle)
            }
            Err(source) => {
                self.deregister(handle.id());
                Err(DemoError::Spawn { name, source })
            }
        }
    }

    /// Look up a live task.
    pub fn get(
        &self,
        id: TaskId,
    ) -> Option<Arc<TaskRecord>> {
        self.tasks.read().get(&id).cloned()
    }

    /// All live records in registration order.
    pub fn records(&self) -> Vec<Arc<TaskRecord>> {
        self.tasks.read().values().cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

/// Marks the task finished and removes it when the thread body exits.
struct Deregister {
    registry: Arc<TaskRegistry>,
    task: TaskHandle,
}

impl Drop for Deregister {
    fn drop(&mut self) {
        if self.task.state() != TaskState::Finished {
            self.task.finish();
        }
        self.registry.deregister(self.task.id());
        trace!("{} exited", self.task.id());
    }
}
