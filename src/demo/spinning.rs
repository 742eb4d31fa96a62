//! Tasks that loop forever without parking.

use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, TrySendError};
use parking_lot::Mutex;

use crate::runtime::sync::WaitGroup;
use crate::runtime::task::TaskHandle;

pub fn spin_sleep(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    task.running();
    ready.done();
    loop {
        thread::sleep(Duration::ZERO);
        task.tick();
    }
}

pub fn spin_chan(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    let (tx, _rx) = channel::bounded::<()>(0);
    task.running();
    ready.done();
    loop {
        // Nobody receives, so this is always `Full`.
        if let Err(TrySendError::Disconnected(())) = tx.try_send(()) {
            break;
        }
        task.tick();
    }
}

pub fn spin_mutex(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    let mtx = Mutex::new(());
    task.running();
    ready.done();
    loop {
        drop(mtx.lock());
        task.tick();
    }
}

pub fn spin_wait_group(
    task: &TaskHandle,
    ready: &WaitGroup,
) {
    let wg = WaitGroup::new();
    task.running();
    ready.done();
    loop {
        wg.wait();
        task.tick();
    }
}
