//! Runtime system
//!
//! Task records, the registry that tracks them, the wait counter the demo
//! tasks park on, and point-in-time captures.

pub mod capture;
pub mod registry;
pub mod sync;
pub mod task;
