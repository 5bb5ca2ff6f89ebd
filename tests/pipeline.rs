// ABOUTME: Integration tests for the compensating-action pipeline.
// ABOUTME: Checks unwind order, best-effort rollback, and error reporting.

use bg_restage::pipeline::{Action, Pipeline, PipelineObserver};
use proptest::prelude::*;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct StepBroke(String);

type Log = Arc<Mutex<Vec<String>>>;

/// An action that logs its forward run and, optionally, its compensation.
fn action(
    log: &Log,
    index: usize,
    fails: bool,
    compensated: bool,
    compensation_fails: bool,
) -> Action<'static, StepBroke> {
    let forward_log = Arc::clone(log);
    let action = Action::new(format!("step-{index}"), move || async move {
        forward_log.lock().unwrap().push(format!("forward:{index}"));
        if fails {
            Err(StepBroke(format!("step {index} broke")))
        } else {
            Ok(())
        }
    });
    if !compensated {
        return action;
    }
    let undo_log = Arc::clone(log);
    action.compensates_prior(move || async move {
        undo_log.lock().unwrap().push(format!("undo:{index}"));
        if compensation_fails {
            Err(StepBroke(format!("undo {index} broke")))
        } else {
            Ok(())
        }
    })
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn all_success_runs_no_compensation() {
    let log = Log::default();
    let pipeline = Pipeline::with_actions(
        (0..4).map(|i| action(&log, i, false, true, false)).collect(),
        "deploy failed",
    );

    pipeline.execute().await.unwrap();

    assert_eq!(
        entries(&log),
        vec!["forward:0", "forward:1", "forward:2", "forward:3"]
    );
}

#[tokio::test]
async fn failure_unwinds_prior_compensations_newest_first() {
    let log = Log::default();
    let pipeline = Pipeline::new("deploy failed")
        .then(action(&log, 0, false, true, false))
        .then(action(&log, 1, false, false, false))
        .then(action(&log, 2, false, true, false))
        .then(action(&log, 3, true, true, false))
        .then(action(&log, 4, false, true, false));

    let err = pipeline.execute().await.unwrap_err();

    assert_eq!(
        entries(&log),
        vec!["forward:0", "forward:1", "forward:2", "forward:3", "undo:2", "undo:0"]
    );
    assert_eq!(err.failed_step().index, 3);
    assert_eq!(err.failed_step().name, "step-3");
    assert_eq!(
        err.to_string(),
        "deploy failed: step 'step-3' failed: step 3 broke"
    );
}

#[tokio::test]
async fn rollback_continues_after_failing_compensation() {
    let log = Log::default();
    let pipeline = Pipeline::new("deploy failed")
        .then(action(&log, 0, false, true, true))
        .then(action(&log, 1, false, true, true))
        .then(action(&log, 2, false, true, false))
        .then(action(&log, 3, true, false, false));

    let err = pipeline.execute().await.unwrap_err();

    assert_eq!(
        entries(&log),
        vec!["forward:0", "forward:1", "forward:2", "forward:3", "undo:2", "undo:1", "undo:0"]
    );
    assert!(err.requires_manual_intervention());
    let failed: Vec<usize> = err.unwind_failures().iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![1, 0]);
    assert_eq!(
        err.to_string(),
        "deploy failed: step 'step-3' failed: step 3 broke; rollback incomplete, \
         compensation in 'step-1' failed: undo 1 broke (and 1 more rollback failure(s))"
    );
    assert_eq!(err.into_error().0, "step 3 broke");
}

#[tokio::test]
async fn empty_pipeline_is_a_no_op() {
    let pipeline: Pipeline<'_, StepBroke> = Pipeline::new("nothing");
    assert!(pipeline.is_empty());
    pipeline.execute().await.unwrap();
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl PipelineObserver for Recorder {
    fn step_started(&mut self, index: usize, _name: &str) {
        self.events.push(format!("start:{index}"));
    }

    fn step_failed(&mut self, index: usize, _name: &str, error: &dyn fmt::Display) {
        self.events.push(format!("failed:{index}:{error}"));
    }

    fn compensation_started(&mut self, index: usize, _name: &str) {
        self.events.push(format!("undo:{index}"));
    }

    fn compensation_failed(&mut self, index: usize, _name: &str, _error: &dyn fmt::Display) {
        self.events.push(format!("undo-failed:{index}"));
    }
}

#[tokio::test]
async fn observer_sees_every_transition() {
    let log = Log::default();
    let pipeline = Pipeline::new("deploy failed")
        .then(action(&log, 0, false, true, true))
        .then(action(&log, 1, false, true, false))
        .then(action(&log, 2, true, true, false));

    let mut recorder = Recorder::default();
    pipeline.execute_observed(&mut recorder).await.unwrap_err();

    assert_eq!(
        recorder.events,
        vec![
            "start:0",
            "start:1",
            "start:2",
            "failed:2:step 2 broke",
            "undo:1",
            "undo:0",
            "undo-failed:0",
        ]
    );
}

#[derive(Debug, Clone)]
struct StepShape {
    compensated: bool,
    compensation_fails: bool,
}

fn shape() -> impl Strategy<Value = StepShape> {
    (any::<bool>(), any::<bool>()).prop_map(|(compensated, compensation_fails)| StepShape {
        compensated,
        compensation_fails,
    })
}

proptest! {
    #[test]
    fn unwind_visits_each_prior_compensation_once_in_descending_order(
        steps in prop::collection::vec(shape(), 1..12),
        failing in any::<prop::sample::Index>(),
    ) {
        let failing = failing.index(steps.len());
        let log = Log::default();
        let actions: Vec<_> = steps
            .iter()
            .enumerate()
            .map(|(i, s)| action(&log, i, i == failing, s.compensated, s.compensation_fails))
            .collect();

        let result = futures::executor::block_on(
            Pipeline::with_actions(actions, "failed").execute(),
        );
        let err = result.unwrap_err();

        let expected_undo: Vec<usize> = (0..failing)
            .rev()
            .filter(|&i| steps[i].compensated)
            .collect();
        let undone: Vec<usize> = entries(&log)
            .iter()
            .filter_map(|e| e.strip_prefix("undo:"))
            .map(|i| i.parse().unwrap())
            .collect();
        prop_assert_eq!(&undone, &expected_undo);

        let forwards = entries(&log).iter().filter(|e| e.starts_with("forward:")).count();
        prop_assert_eq!(forwards, failing + 1);

        let expected_failures: Vec<usize> = expected_undo
            .iter()
            .copied()
            .filter(|&i| steps[i].compensation_fails)
            .collect();
        let failures: Vec<usize> = err.unwind_failures().iter().map(|f| f.index).collect();
        prop_assert_eq!(&failures, &expected_failures);
        prop_assert_eq!(err.requires_manual_intervention(), !expected_failures.is_empty());
    }
}
