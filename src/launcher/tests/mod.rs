//! Launcher 单元测试

use std::sync::Arc;

use crate::launcher::{Launcher, Phase};
use crate::runtime::registry::TaskRegistry;
use crate::runtime::task::TaskState;
use crate::util::config::{DemoConfig, OutputFormat, PhaseSelection};

fn quick_config(phases: PhaseSelection) -> DemoConfig {
    DemoConfig {
        settle_ms: 50,
        sample_interval_ms: 100,
        phases,
        exit_after_capture: true,
        ..DemoConfig::default()
    }
}

#[test]
fn test_phase_order_for_both() {
    let mut phase = Phase::Init;
    let mut seen = vec![phase];
    while let Some(next) = phase.next(PhaseSelection::Both, false) {
        seen.push(next);
        phase = next;
    }
    assert_eq!(
        seen,
        [
            Phase::Init,
            Phase::BlockingPhase,
            Phase::CaptureOne,
            Phase::SpinningPhase,
            Phase::CaptureTwo,
            Phase::Holding,
        ]
    );
}

#[test]
fn test_phase_selection_skips_phases() {
    assert_eq!(
        Phase::Init.next(PhaseSelection::Spinning, true),
        Some(Phase::SpinningPhase)
    );
    assert_eq!(
        Phase::CaptureOne.next(PhaseSelection::Blocking, true),
        Some(Phase::Done)
    );
    assert_eq!(
        Phase::CaptureOne.next(PhaseSelection::Blocking, false),
        Some(Phase::Holding)
    );
    assert_eq!(Phase::Done.next(PhaseSelection::Both, true), None);
    assert!(Phase::Holding.is_terminal());
    assert!(Phase::CaptureTwo.is_capture());
    assert!(!Phase::SpinningPhase.is_capture());
}

#[test]
fn test_no_phase_leads_back_to_init() {
    let phases = [
        Phase::Init,
        Phase::BlockingPhase,
        Phase::CaptureOne,
        Phase::SpinningPhase,
        Phase::CaptureTwo,
        Phase::Holding,
        Phase::Done,
    ];
    let selections = [
        PhaseSelection::Both,
        PhaseSelection::Blocking,
        PhaseSelection::Spinning,
    ];
    for phase in phases {
        for selection in selections {
            for exit in [false, true] {
                assert_ne!(phase.next(selection, exit), Some(Phase::Init));
            }
        }
    }
}

#[test]
fn test_launcher_registers_itself_as_main() {
    let registry = Arc::new(TaskRegistry::new());
    let launcher = Launcher::new(quick_config(PhaseSelection::Blocking), registry.clone(), Vec::new());

    assert_eq!(launcher.phase(), Phase::Init);
    let records = registry.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "main");
    assert_eq!(records[0].state(), TaskState::Running);
}

#[test]
fn test_blocking_only_run_captures_four_blocked_plus_main() {
    let registry = Arc::new(TaskRegistry::new());
    let mut launcher = Launcher::new(quick_config(PhaseSelection::Blocking), registry, Vec::new());
    launcher.run().unwrap();

    assert_eq!(launcher.phase(), Phase::Done);
    assert_eq!(launcher.launched().len(), 4);
    assert_eq!(launcher.captures().len(), 1);

    let summary = launcher.captures()[0].summary();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.blocked, 4);
    assert_eq!(summary.runnable, 1);

    let output = String::from_utf8(launcher.into_output()).unwrap();
    assert!(output.starts_with("Booting blocking tasks...\nStack of "));
    assert!(!output.contains("nonblocking"));
    assert!(output.contains("[sync.Mutex.Lock"));
    assert!(output.contains("[chan send"));
}

#[test]
fn test_text_capture_reports_its_own_length() {
    let registry = Arc::new(TaskRegistry::new());
    let mut launcher = Launcher::new(quick_config(PhaseSelection::Blocking), registry, Vec::new());
    launcher.run().unwrap();

    let output = String::from_utf8(launcher.into_output()).unwrap();
    let dump = output.split_once("Stack of ").unwrap().1;
    let (count, rest) = dump.split_once(" bytes: ").unwrap();
    let count: usize = count.parse().unwrap();
    let text = rest.strip_suffix('\n').unwrap();

    assert!(count <= 102_400);
    assert_eq!(count, text.len());
}

#[test]
fn test_spinning_only_run_samples_progress() {
    let registry = Arc::new(TaskRegistry::new());
    let config = DemoConfig {
        samples: 2,
        ..quick_config(PhaseSelection::Spinning)
    };
    let mut launcher = Launcher::new(config, registry, Vec::new());
    launcher.run().unwrap();

    let captures = launcher.captures();
    assert_eq!(captures.len(), 2);
    for capture in captures {
        assert_eq!(capture.summary().blocked, 0);
        assert_eq!(capture.summary().runnable, 5);
    }
    for name in ["spin_sleep", "spin_chan", "spin_mutex", "spin_wait_group"] {
        let before = captures[0].find(name).unwrap().progress;
        let after = captures[1].find(name).unwrap().progress;
        assert!(after > before, "{} did not advance", name);
    }

    let output = String::from_utf8(launcher.into_output()).unwrap();
    assert!(output.starts_with("Booting nonblocking tasks...\n"));
}

#[test]
fn test_json_format_writes_parseable_snapshots() {
    let registry = Arc::new(TaskRegistry::new());
    let config = DemoConfig {
        format: OutputFormat::Json,
        ..quick_config(PhaseSelection::Blocking)
    };
    let mut launcher = Launcher::new(config, registry, Vec::new());
    launcher.run().unwrap();

    let output = String::from_utf8(launcher.into_output()).unwrap();
    let json = output.strip_prefix("Booting blocking tasks...\n").unwrap();
    let value: serde_json::Value = serde_json::from_str(json.trim_end()).unwrap();
    assert_eq!(value["tasks"].as_array().unwrap().len(), 5);
}

#[test]
fn test_step_after_done_is_none() {
    let registry = Arc::new(TaskRegistry::new());
    let mut launcher = Launcher::new(quick_config(PhaseSelection::Blocking), registry, Vec::new());
    launcher.run().unwrap();
    assert!(launcher.step().unwrap().is_none());
}
