// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::Pattern;
use crate::controller::ReleasePolicy;
use crate::journal::CrossingEvent;
use crate::test_support::{within, DEADLOCK_LIMIT};
use std::time::Duration;
use yare::parameterized;

fn quick_config(agents: u32, policy: ReleasePolicy) -> SimulationConfig {
    SimulationConfig {
        agents,
        pattern: Pattern::Alternate,
        dwell: Duration::from_millis(2),
        stagger: Duration::ZERO,
        policy,
    }
}

#[test]
fn run_completes_every_agent() {
    let report = within(DEADLOCK_LIMIT, || {
        Simulation::new(quick_config(6, ReleasePolicy::Batch))
            .run()
            .unwrap()
    });

    assert_eq!(report.records.len(), 6);
    let ids: Vec<u32> = report.records.iter().map(|r| r.agent.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert!(report.final_state.is_empty());
    assert_eq!(report.final_state.check(), Ok(()));
    assert_eq!(report.final_state.stats().admissions, 6);
}

#[test]
fn timeline_has_three_moments_per_agent() {
    let report = within(DEADLOCK_LIMIT, || {
        Simulation::new(quick_config(4, ReleasePolicy::Batch))
            .run()
            .unwrap()
    });

    assert_eq!(report.timeline.len(), 12);
    for agent in 1..=4 {
        let moments: Vec<Moment> = report
            .timeline
            .iter()
            .filter(|entry| entry.agent == agent)
            .map(|entry| entry.moment)
            .collect();
        assert_eq!(moments.len(), 3);
        assert_eq!(moments[0], Moment::Arriving);
        assert!(matches!(moments[1], Moment::Entered { .. }));
        assert!(matches!(moments[2], Moment::Left { .. }));
    }
}

#[test]
fn single_direction_population_never_waits() {
    let config = SimulationConfig {
        pattern: Pattern::AllWest,
        ..quick_config(3, ReleasePolicy::Batch)
    };

    let report = within(DEADLOCK_LIMIT, move || Simulation::new(config).run().unwrap());

    assert_eq!(report.waited(), 0);
    assert_eq!(report.final_state.stats().parks, 0);
    assert_eq!(report.final_state.stats().batches, 0);
}

/// Five agents per direction, each crossing once, must always finish and
/// never break mutual exclusion, whatever the interleaving.
#[parameterized(
    batch = { ReleasePolicy::Batch },
    hand_off = { ReleasePolicy::HandOff },
)]
fn five_and_five_always_finish(policy: ReleasePolicy) {
    within(DEADLOCK_LIMIT, move || {
        let simulation = Simulation::new(quick_config(10, policy));
        for _ in 0..50 {
            let report = simulation.run().unwrap();
            assert_eq!(report.records.len(), 10);
            assert!(report.final_state.is_empty());
            assert_eq!(report.final_state.check(), Ok(()));
            assert_eq!(crate::journal::audit(&events(&report)), Ok(()));
        }
    });
}

#[test]
fn hand_off_releases_are_flagged_in_journal() {
    let config = SimulationConfig {
        pattern: Pattern::Grouped,
        dwell: Duration::from_millis(20),
        ..quick_config(4, ReleasePolicy::HandOff)
    };

    let report = within(DEADLOCK_LIMIT, move || Simulation::new(config).run().unwrap());

    for event in events(&report) {
        if let CrossingEvent::BatchReleased { handed_off, .. } = event {
            assert!(handed_off);
        }
    }
}

#[test]
fn zero_agents_is_rejected() {
    let err = Simulation::new(quick_config(0, ReleasePolicy::Batch))
        .run()
        .unwrap_err();
    assert!(matches!(err, SimulationError::Config(ConfigError::NoAgents)));
}

#[test]
fn report_serializes_to_json() {
    let report = within(DEADLOCK_LIMIT, || {
        Simulation::new(quick_config(2, ReleasePolicy::Batch))
            .run()
            .unwrap()
    });

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["config"]["agents"], 2);
    assert_eq!(json["records"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["timeline"][0]["kind"], "arriving");
    assert_eq!(json["final_state"]["occupants"], 0);
}

#[test]
fn timeline_entries_render_like_the_log() {
    let entry = TimelineEntry {
        at_ms: 1200,
        agent: 3,
        direction: Direction::West,
        moment: Moment::Entered { occupants: 2 },
    };

    assert_eq!(
        entry.to_string(),
        "[  1200ms] agent 3 entered (West), occupants: 2"
    );
}

fn events(report: &SimulationReport) -> Vec<CrossingEvent> {
    report
        .journal
        .iter()
        .map(|entry| entry.event.clone())
        .collect()
}

#[test]
fn report_display_ends_with_summary() {
    let report = within(DEADLOCK_LIMIT, || {
        Simulation::new(quick_config(2, ReleasePolicy::Batch))
            .run()
            .unwrap()
    });

    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[6].starts_with("2 agents crossed in "), "{text}");
}
