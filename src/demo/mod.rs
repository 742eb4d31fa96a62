//! The eight demo tasks.
//!
//! | Variant | Kind | Effect |
//! |---------|------|--------|
//! | `BlockSleep` | blocking | sleeps for [`blocking::FOREVER`] |
//! | `BlockChan` | blocking | rendezvous send nobody receives |
//! | `BlockMutex` | blocking | locks a held, non-reentrant mutex |
//! | `BlockWaitGroup` | blocking | waits on a counter nobody decrements |
//! | `SpinSleep` | spinning | zero-length sleeps |
//! | `SpinChan` | spinning | non-blocking rendezvous attempts |
//! | `SpinMutex` | spinning | uncontended lock/unlock |
//! | `SpinWaitGroup` | spinning | waits on a zero counter |

pub mod blocking;
pub mod spinning;

use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::error::DemoResult;
use crate::runtime::registry::TaskRegistry;
use crate::runtime::sync::WaitGroup;
use crate::runtime::task::{TaskHandle, WaitReason};

type Body = fn(&TaskHandle, &WaitGroup);

/// Whether a variant parks or spins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Blocking,
    Spinning,
}

/// A demo task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    BlockSleep,
    BlockChan,
    BlockMutex,
    BlockWaitGroup,
    SpinSleep,
    SpinChan,
    SpinMutex,
    SpinWaitGroup,
}

impl Variant {
    /// Launched together in the blocking phase.
    pub const BLOCKING: [Variant; 4] = [
        Variant::BlockSleep,
        Variant::BlockChan,
        Variant::BlockMutex,
        Variant::BlockWaitGroup,
    ];

    /// Launched together in the spinning phase.
    pub const SPINNING: [Variant; 4] = [
        Variant::SpinSleep,
        Variant::SpinChan,
        Variant::SpinMutex,
        Variant::SpinWaitGroup,
    ];

    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::BlockSleep
            | Variant::BlockChan
            | Variant::BlockMutex
            | Variant::BlockWaitGroup => VariantKind::Blocking,
            _ => VariantKind::Spinning,
        }
    }

    /// Wait condition a blocking variant ends up in.
    pub fn wait_reason(&self) -> Option<WaitReason> {
        match self {
            Variant::BlockSleep => Some(WaitReason::Sleep),
            Variant::BlockChan => Some(WaitReason::ChanSend),
            Variant::BlockMutex => Some(WaitReason::MutexLock),
            Variant::BlockWaitGroup => Some(WaitReason::WaitGroup),
            _ => None,
        }
    }

    /// Task and thread name.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::BlockSleep => "block_sleep",
            Variant::BlockChan => "block_chan",
            Variant::BlockMutex => "block_mutex",
            Variant::BlockWaitGroup => "block_wait_group",
            Variant::SpinSleep => "spin_sleep",
            Variant::SpinChan => "spin_chan",
            Variant::SpinMutex => "spin_mutex",
            Variant::SpinWaitGroup => "spin_wait_group",
        }
    }

    fn body(&self) -> Body {
        match self {
            Variant::BlockSleep => blocking::block_sleep,
            Variant::BlockChan => blocking::block_chan,
            Variant::BlockMutex => blocking::block_mutex,
            Variant::BlockWaitGroup => blocking::block_wait_group,
            Variant::SpinSleep => spinning::spin_sleep,
            Variant::SpinChan => spinning::spin_chan,
            Variant::SpinMutex => spinning::spin_mutex,
            Variant::SpinWaitGroup => spinning::spin_wait_group,
        }
    }

    /// Fully qualified path of the body, e.g. `taskdump::demo::blocking::block_chan`.
    pub fn entry(&self) -> &'static str {
        match self {
            Variant::BlockSleep => type_name_of_val(&blocking::block_sleep),
            Variant::BlockChan => type_name_of_val(&blocking::block_chan),
            Variant::BlockMutex => type_name_of_val(&blocking::block_mutex),
            Variant::BlockWaitGroup => type_name_of_val(&blocking::block_wait_group),
            Variant::SpinSleep => type_name_of_val(&spinning::spin_sleep),
            Variant::SpinChan => type_name_of_val(&spinning::spin_chan),
            Variant::SpinMutex => type_name_of_val(&spinning::spin_mutex),
            Variant::SpinWaitGroup => type_name_of_val(&spinning::spin_wait_group),
        }
    }

    /// Spawn the variant on its own thread.
    ///
    /// The task calls `ready.done()` once, right before it parks or enters
    /// its loop; the caller is expected to have added one unit for it.
    pub fn launch(
        self,
        registry: &Arc<TaskRegistry>,
        ready: Arc<WaitGroup>,
    ) -> DemoResult<TaskHandle> {
        let body = self.body();
        registry.spawn(self.name(), self.entry(), move |task| body(&task, &ready))
    }
}

impl fmt::Display for Variant {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
