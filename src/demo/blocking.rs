//! Tasks that park forever.
//!
//! Each body marks its record blocked at the call that parks it, signals
//! readiness, then parks. None of them is ever released.

use std::thread;
use std::time::Duration;

use crossbeam::channel;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::runtime::sync::WaitGroup;
use crate::runtime::task::{TaskHandle, WaitReason};

/// Far beyond any observation window.
pub const FOREVER: Duration = Duration::from_secs(99_999_999);

pub fn block_sleep(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    task.block_on(WaitReason::Sleep);
    ready.done();
    thread::sleep(FOREVER);
    woke_up(task);
}

pub fn block_chan(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    // `_rx` stays alive so the send waits for a receiver instead of failing.
    let (tx, _rx) = channel::bounded::<()>(0);
    task.block_on(WaitReason::ChanSend);
    ready.done();
    if let Err(err) = tx.send(()) {
        debug!("{}: {}", task.id(), err);
    }
    woke_up(task);
}

pub fn block_mutex(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    let mtx = Mutex::new(());
    let _held = mtx.lock();
    task.block_on(WaitReason::MutexLock);
    ready.done();
    // parking_lot mutexes are not reentrant: this never returns.
    let _again = mtx.lock();
    woke_up(task);
}

pub fn block_wait_group(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    let wg = WaitGroup::new();
    wg.add(1);
    task.block_on(WaitReason::WaitGroup);
    ready.done();
    wg.wait();
    woke_up(task);
}

fn woke_up(task: &TaskHandle) {
    warn!("{} left a wait it should never leave", task.id());
    task.finish();
}
