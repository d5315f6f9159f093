use claims::*;
use gluewatch::cloudwatch::RunScope;
use gluewatch::glue::RunState;
use pretty_assertions::assert_eq;

use crate::fixtures::*;

#[tokio::test]
async fn test_publish_failure_continues_with_remaining_runs_and_jobs() {
    once_cell::sync::Lazy::force(&gluewatch::tracing::TEST_TRACING);
    let main_span = tracing::info_span!("test_publish_failure_continues_with_remaining_runs_and_jobs");
    let _main_span_guard = main_span.enter();

    let glue = InMemoryGlue::new(
        vec![
            (
                "ingest",
                vec![
                    make_run("in_3", RunState::Running, None, 10),
                    make_run("in_2", RunState::Stopping, None, 10),
                    make_run("in_1", RunState::Succeeded, Some(100), 10),
                ],
            ),
            ("export", vec![make_run("ex_1", RunState::Waiting, None, 0)]),
        ],
        100,
    );
    let publisher = RecordingPublisher::rejecting(vec![("ingest", "in_3"), ("export", "ALL")]);

    let forwarder = make_forwarder(glue, publisher);
    let outcome = assert_ok!(forwarder.sweep().await);

    assert_eq!(outcome.jobs_seen, 2);
    assert_eq!(outcome.job_batches, 1);
    assert_eq!(outcome.run_batches, 3);
    assert_eq!(outcome.failures.len(), 2);
    assert_eq!(outcome.failures[0].job_name, "ingest");
    assert_eq!(outcome.failures[0].scope, RunScope::Run("in_3".to_string()));
    assert_eq!(outcome.failures[1].job_name, "export");
    assert_eq!(outcome.failures[1].scope, RunScope::Aggregate);
    assert_eq!(
        outcome.to_string(),
        "Failed to Publish Glue Job Run Custom Metrics for Job: ingest and Run Id: in_3; \
         Failed to Publish Glue Job Custom Metrics for: export"
    );

    let attempts = forwarder.publisher().attempts.lock().unwrap().clone();
    assert_eq!(attempts.get("ingest"), Some(&4));
    assert_eq!(attempts.get("export"), Some(&2));

    let run_ids: Vec<String> = per_run(&forwarder.publisher().accepted_for("ingest"))
        .iter()
        .map(|b| b.scope.to_string())
        .collect();
    assert_eq!(run_ids, vec!["in_2".to_string(), "in_1".to_string()]);
}
