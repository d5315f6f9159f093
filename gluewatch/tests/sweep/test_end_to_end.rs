use claims::*;
use gluewatch::cloudwatch::{MetricUnit, RunScope};
use gluewatch::glue::RunState;
use gluewatch::phases::derive;
use pretty_assertions::assert_eq;

use crate::fixtures::*;

#[tokio::test]
async fn test_one_job_with_one_active_run() {
    once_cell::sync::Lazy::force(&gluewatch::tracing::TEST_TRACING);
    let main_span = tracing::info_span!("test_one_job_with_one_active_run");
    let _main_span_guard = main_span.enter();

    let glue = InMemoryGlue::new(
        vec![(
            "orders-etl",
            vec![
                make_run("jr_3", RunState::Running, None, 40),
                make_run("jr_2", RunState::Succeeded, Some(3_600), 20),
                make_run("jr_1", RunState::Failed, Some(7_200), 10),
            ],
        )],
        100,
    );

    let forwarder = make_forwarder(glue, RecordingPublisher::default());
    let outcome = assert_ok!(forwarder.sweep().await);
    assert_eq!(outcome.jobs_seen, 1);
    assert_eq!(outcome.job_batches, 1);
    assert_eq!(outcome.run_batches, 1);
    assert!(!outcome.has_failures());
    assert_eq!(
        outcome.to_string(),
        "Glue Job Custom Metrics Published; Glue Job Run Custom Metrics Published"
    );

    let batches = forwarder.publisher().accepted_for("orders-etl");
    let aggregates = aggregate(&batches);
    assert_eq!(aggregates.len(), 1);
    let job_batch = aggregates[0];
    assert!((5..=7).contains(&job_batch.len()));
    assert_eq!(job_batch.len(), 6);

    let count = assert_some!(job_batch.point(derive::EXECUTION_COUNT));
    assert_eq!(count.value, 3.0);
    assert_eq!(count.unit, MetricUnit::Count);
    let average = assert_some!(job_batch.point(derive::AVG_EXECUTION_DURATION_SECS));
    assert_eq!(average.value, 23.0);
    let state = assert_some!(job_batch.point(derive::LATEST_RUN_STATE));
    assert_eq!(state.value, 1.0);
    assert_none!(job_batch.point(derive::LATEST_RUN_COMPLETION_TIME_EPOCH));

    for point in job_batch.points.iter() {
        assert_eq!(point.timestamp, *NOW);
        let dims: Vec<(&str, &str)> = point.dimensions.iter().map(|d| (d.name, d.value.as_str())).collect();
        assert_eq!(
            dims,
            vec![
                ("JobName", "orders-etl"),
                ("JobRunId", "ALL"),
                ("ErrorMessage", "No Error"),
                ("Namespace", "Glue"),
            ]
        );
    }

    let runs = per_run(&batches);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].scope, RunScope::Run("jr_3".to_string()));
    let names: Vec<&str> = runs[0].points.iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        vec![
            derive::CURRENT_RUN_STATE,
            derive::RUN_START_TIME_EPOCH,
            derive::RUN_EXECUTION_DURATION_SECS,
            derive::RUN_ERROR_STATE,
        ]
    );

    let history_requests = forwarder.glue().job_runs_requests.lock().unwrap().clone();
    assert_eq!(history_requests, vec![("orders-etl".to_string(), None)]);
}

#[tokio::test]
async fn test_recently_completed_runs_reported_with_error_message() {
    once_cell::sync::Lazy::force(&gluewatch::tracing::TEST_TRACING);
    let main_span = tracing::info_span!("test_recently_completed_runs_reported_with_error_message");
    let _main_span_guard = main_span.enter();

    let mut failed = make_run("jr_2", RunState::Failed, Some(120), 75);
    failed.error_message = Some("Command failed with exit code 1".to_string());

    let glue = InMemoryGlue::new(
        vec![(
            "billing",
            vec![failed, make_run("jr_1", RunState::Succeeded, Some(600), 45)],
        )],
        100,
    );

    let forwarder = make_forwarder(glue, RecordingPublisher::default());
    let outcome = assert_ok!(forwarder.sweep().await);
    assert_eq!(outcome.run_batches, 2);

    let batches = forwarder.publisher().accepted_for("billing");
    let job_batch = aggregate(&batches)[0];
    assert_eq!(job_batch.len(), 7);
    let error_state = assert_some!(job_batch.point(derive::LATEST_RUN_ERROR_STATE));
    assert_eq!(error_state.value, 1.0);
    let completion = assert_some!(job_batch.point(derive::LATEST_RUN_COMPLETION_TIME_EPOCH));
    assert_eq!(completion.value, secs_ago(120).timestamp() as f64);
    assert_eq!(completion.dimensions[2].value, "Command failed with exit code 1");

    let run_ids: Vec<String> = per_run(&batches).iter().map(|b| b.scope.to_string()).collect();
    assert_eq!(run_ids, vec!["jr_2".to_string(), "jr_1".to_string()]);

    let succeeded = per_run(&batches)[1];
    assert_eq!(succeeded.points[0].dimensions[2].value, "No Error");
    let error_state = assert_some!(succeeded.point(derive::RUN_ERROR_STATE));
    assert_eq!(error_state.value, 0.0);
}

#[tokio::test]
async fn test_jobs_without_runs_are_skipped() {
    let glue = InMemoryGlue::new(
        vec![
            ("fresh", vec![]),
            ("hourly", vec![make_run("jr_1", RunState::Succeeded, Some(5_000), 12)]),
        ],
        100,
    );

    let forwarder = make_forwarder(glue, RecordingPublisher::default());
    let outcome = assert_ok!(forwarder.sweep().await);
    assert_eq!(outcome.jobs_seen, 2);
    assert_eq!(outcome.jobs_skipped, 1);
    assert_eq!(outcome.job_batches, 1);
    assert_eq!(outcome.run_batches, 0);

    assert!(forwarder.publisher().accepted_for("fresh").is_empty());
    assert_eq!(forwarder.publisher().accepted_for("hourly").len(), 1);
}
