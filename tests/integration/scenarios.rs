//! End-to-end scenarios: each phase on its own, through the public API.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use taskdump::demo::Variant;
use taskdump::runtime::capture::TaskClass;
use taskdump::runtime::task::TaskState;
use taskdump::util::config::PhaseSelection;
use taskdump::{DemoConfig, Launcher, Snapshot, TaskRegistry};

fn config(phases: PhaseSelection) -> DemoConfig {
    DemoConfig {
        settle_ms: 100,
        sample_interval_ms: 250,
        samples: 2,
        phases,
        exit_after_capture: true,
        ..DemoConfig::default()
    }
}

/// Four blocked tasks plus the launcher, and nothing changes between samples.
#[test]
fn test_blocking_scenario_is_stable() {
    let registry = Arc::new(TaskRegistry::new());
    let mut launcher = Launcher::new(config(PhaseSelection::Blocking), registry, Vec::new());
    launcher.run().unwrap();

    let [first, second] = launcher.captures() else {
        panic!("expected two captures");
    };
    assert_eq!(first.summary().total, 5);
    assert_eq!(first.summary().blocked, 4);
    assert_eq!(first.classification(), second.classification());

    for variant in Variant::BLOCKING {
        let before = first.find(variant.name()).unwrap();
        let after = second.find(variant.name()).unwrap();
        let expected = TaskState::Blocked(variant.wait_reason().unwrap());
        assert_eq!(before.state, expected);
        assert_eq!(after.state, expected);
        assert_eq!((before.file, before.line), (after.file, after.line));
        assert_eq!(after.progress, 0);
    }
}

/// Spinning tasks are never parked and keep moving between samples.
#[test]
fn test_spinning_scenario_keeps_moving() {
    let registry = Arc::new(TaskRegistry::new());
    let mut launcher = Launcher::new(config(PhaseSelection::Spinning), registry, Vec::new());
    launcher.run().unwrap();

    let [first, second] = launcher.captures() else {
        panic!("expected two captures");
    };
    for variant in Variant::SPINNING {
        let before = first.find(variant.name()).unwrap();
        let after = second.find(variant.name()).unwrap();
        assert_eq!(before.class(), TaskClass::Runnable);
        assert_eq!(after.class(), TaskClass::Runnable);
        assert!(after.progress > before.progress, "{} stalled", variant);
    }
}

/// Back-to-back captures agree on which tasks are blocked.
#[test]
fn test_immediate_recapture_is_idempotent() {
    let registry = Arc::new(TaskRegistry::new());
    let mut launcher = Launcher::new(config(PhaseSelection::Both), registry.clone(), Vec::new());
    launcher.run().unwrap();
    thread::sleep(Duration::from_millis(10));

    let a = Snapshot::take(&registry);
    let b = Snapshot::take(&registry);
    assert_eq!(a.classification(), b.classification());
    assert_eq!(a.summary().blocked, 4);
    assert_eq!(a.summary().runnable, 4);
    assert_eq!(a.summary().finished, 1);
}
