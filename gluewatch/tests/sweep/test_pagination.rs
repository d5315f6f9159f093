use claims::*;
use gluewatch::glue::{self, RunState};
use pretty_assertions::assert_eq;

use crate::fixtures::*;

#[tokio::test]
async fn test_job_catalog_drained_across_pages() {
    once_cell::sync::Lazy::force(&gluewatch::tracing::TEST_TRACING);
    let main_span = tracing::info_span!("test_job_catalog_drained_across_pages");
    let _main_span_guard = main_span.enter();

    let glue = InMemoryGlue::new(
        vec![("a", vec![]), ("b", vec![]), ("c", vec![]), ("d", vec![]), ("e", vec![])],
        3,
    );

    let names = assert_ok!(glue::list_all_job_names(&glue).await);
    assert_eq!(names, vec!["a", "b", "c", "d", "e"]);

    let requests = glue.list_jobs_requests.lock().unwrap().clone();
    assert_eq!(requests, vec![None, Some("3".to_string())]);
}

#[tokio::test]
async fn test_run_history_drained_before_deriving() {
    let runs: Vec<_> = (0..7)
        .map(|i| make_run(&format!("jr_{}", 7 - i), RunState::Succeeded, Some(10_000 + i), 10 * (i + 1)))
        .collect();
    let glue = InMemoryGlue::new(vec![("paged", runs)], 3);

    let forwarder = make_forwarder(glue, RecordingPublisher::default());
    let outcome = assert_ok!(forwarder.sweep().await);
    assert_eq!(outcome.job_batches, 1);
    assert_eq!(outcome.run_batches, 0);

    let requests = forwarder.glue().job_runs_requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![
            ("paged".to_string(), None),
            ("paged".to_string(), Some("3".to_string())),
            ("paged".to_string(), Some("6".to_string())),
        ]
    );

    let batches = forwarder.publisher().accepted_for("paged");
    let count = assert_some!(batches[0].point(gluewatch::phases::derive::EXECUTION_COUNT));
    assert_eq!(count.value, 7.0);
    let average = assert_some!(batches[0].point(gluewatch::phases::derive::AVG_EXECUTION_DURATION_SECS));
    assert_eq!(average.value, 40.0);
}
