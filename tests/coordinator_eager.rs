// tests/coordinator_eager.rs

mod common;

use parspec::engine::ParallelExecution;
use parspec::errors::ParspecError;
use parspec::event::SuiteEvent;
use parspec::result::UnhandledError;
use parspec::spec::SpecCollection;
use parspec_test_utils::builders::{spec_collection, spec_names};
use parspec_test_utils::fakes::{
    FakeExecutor, FakeLauncher, RecordingEventBus, RecordingPlugins, collaborators,
};
use parspec_test_utils::{init_tracing, with_timeout};

use common::{manifest, options, result_names, skipped_names};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn seven_specs_ten_streams_runs_one_spec_per_stream() {
    init_tracing();

    let launcher = FakeLauncher::new();
    let executor = FakeExecutor::new();
    let plugins = RecordingPlugins::new();
    let events = RecordingEventBus::new();

    let execution = ParallelExecution::new(
        manifest(),
        spec_collection(7),
        options(10, "eager"),
        collaborators(&launcher, &executor, &plugins, &events),
    );
    assert_eq!(execution.number_of_streams(), 7);

    let suite = with_timeout(execution.run()).await.unwrap();

    assert_eq!(suite.streams, 7);
    assert_eq!(suite.spec_results.len(), 7);
    assert!(!suite.is_failed);
    assert!(suite.unhandled_errors.is_empty());

    let per_stream = executor.executed();
    assert_eq!(per_stream.len(), 7);
    assert!(per_stream.values().all(|specs| specs.len() == 1));
    assert_eq!(launcher.killed(), vec![1, 2, 3, 4, 5, 6, 7]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_failing_stream_is_isolated() {
    init_tracing();

    let launcher = FakeLauncher::failing(&[2]);
    let executor = FakeExecutor::new();
    let plugins = RecordingPlugins::new();
    let events = RecordingEventBus::new();

    let suite = with_timeout(
        ParallelExecution::new(
            manifest(),
            spec_collection(9),
            options(3, "eager"),
            collaborators(&launcher, &executor, &plugins, &events),
        )
        .run(),
    )
    .await
    .unwrap();

    // Round-robin: stream 2 owns specs 1, 4 and 7.
    assert!(suite.is_failed);
    assert_eq!(suite.unhandled_errors.len(), 1);
    match &suite.unhandled_errors[0] {
        UnhandledError::StreamExec(err) => {
            assert_eq!(err.specs_skipped, vec!["spec_1.spec", "spec_4.spec", "spec_7.spec"]);
            assert!(err.message.starts_with("Failed to start runner."));
        }
        other => panic!("expected StreamExecError, got {other:?}"),
    }

    assert_eq!(suite.spec_results.len(), 6);
    assert_eq!(suite.specs_skipped_count, 3);
    assert_eq!(suite.specs_executed() + suite.specs_skipped_count, 9);
    assert_eq!(launcher.started(), vec![1, 3]);
    assert_eq!(launcher.killed(), vec![1, 3]);
    assert_eq!(
        executor.executed().keys().copied().collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[tokio::test]
async fn every_stream_failing_still_finishes() {
    let launcher = FakeLauncher::failing(&[1, 2]);
    let executor = FakeExecutor::new();
    let plugins = RecordingPlugins::new();
    let events = RecordingEventBus::new();

    let suite = with_timeout(
        ParallelExecution::new(
            manifest(),
            spec_collection(4),
            options(2, "eager"),
            collaborators(&launcher, &executor, &plugins, &events),
        )
        .run(),
    )
    .await
    .unwrap();

    assert!(suite.is_failed);
    assert!(suite.spec_results.is_empty());
    assert_eq!(suite.unhandled_errors.len(), 2);
    assert_eq!(common::skipped_names(&suite), spec_names(4));
    assert_eq!(suite.specs_skipped_count, 4);
    assert_eq!(plugins.log().last().map(String::as_str), Some("kill"));
}

#[tokio::test]
async fn failed_specs_are_counted_and_reported_to_plugins() {
    let launcher = FakeLauncher::new();
    let executor = FakeExecutor::new().failing_spec("spec_2.spec");
    let plugins = RecordingPlugins::new();
    let events = RecordingEventBus::new();

    let suite = with_timeout(
        ParallelExecution::new(
            manifest(),
            spec_collection(5),
            options(2, "EAGER"),
            collaborators(&launcher, &executor, &plugins, &events),
        )
        .run(),
    )
    .await
    .unwrap();

    assert!(suite.is_failed);
    assert_eq!(suite.specs_failed_count, 1);
    assert_eq!(result_names(&suite), spec_names(5));

    let log = plugins.log();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0], "start");
    assert!(log[1].contains("\"suite_execution_result\""));
    assert!(log[1].contains("\"specs_failed_count\": 1"));
    assert_eq!(log[2], "kill");

    let names = events.names();
    assert_eq!(names, vec!["suite_start", "suite_end"]);
    match events.events().last() {
        Some(SuiteEvent::SuiteEnd(result)) => assert_eq!(result.specs_failed_count, 1),
        other => panic!("expected SuiteEnd, got {other:?}"),
    }
}

#[tokio::test]
async fn plugin_start_failure_aborts_before_any_stream() {
    let launcher = FakeLauncher::new();
    let executor = FakeExecutor::new();
    let plugins = RecordingPlugins::failing_start();
    let events = RecordingEventBus::new();

    let res = ParallelExecution::new(
        manifest(),
        spec_collection(3),
        options(3, "eager"),
        collaborators(&launcher, &executor, &plugins, &events),
    )
    .run()
    .await;

    match res {
        Err(ParspecError::PluginStart(msg)) => assert!(msg.contains("plugin binary missing")),
        other => panic!("expected PluginStart error, got {other:?}"),
    }
    assert!(launcher.started().is_empty());
    assert_eq!(events.names(), vec!["suite_start"]);
}

#[tokio::test]
async fn empty_collection_runs_no_streams() {
    let launcher = FakeLauncher::new();
    let executor = FakeExecutor::new();
    let plugins = RecordingPlugins::new();
    let events = RecordingEventBus::new();

    let suite = with_timeout(
        ParallelExecution::new(
            manifest(),
            SpecCollection::default(),
            options(4, "eager"),
            collaborators(&launcher, &executor, &plugins, &events),
        )
        .run(),
    )
    .await
    .unwrap();

    assert_eq!(suite.streams, 0);
    assert!(suite.spec_results.is_empty());
    assert!(!suite.is_failed);
    assert!(launcher.started().is_empty());
    assert_eq!(events.names(), vec!["suite_start", "suite_end"]);
}

#[tokio::test]
async fn bogus_strategy_behaves_like_eager() {
    async fn per_stream(strategy: &str) -> Vec<Vec<String>> {
        let launcher = FakeLauncher::new();
        let executor = FakeExecutor::new();
        let suite = ParallelExecution::new(
            manifest(),
            spec_collection(6),
            options(3, strategy),
            collaborators(
                &launcher,
                &executor,
                &RecordingPlugins::new(),
                &RecordingEventBus::new(),
            ),
        )
        .run()
        .await
        .unwrap();
        assert_eq!(suite.strategy.to_string(), "eager");
        executor.executed().into_values().collect()
    }

    let bogus = with_timeout(per_stream("bogus")).await;
    let unset = with_timeout(per_stream("")).await;
    assert_eq!(bogus, unset);
    assert_eq!(bogus[0], vec!["spec_0.spec", "spec_3.spec"]);
}

#[tokio::test]
async fn panicking_stream_reports_its_bucket_as_skipped() {
    let launcher = FakeLauncher::new();
    let executor = FakeExecutor::new().panicking_on(2);
    let plugins = RecordingPlugins::new();
    let events = RecordingEventBus::new();

    let suite = with_timeout(
        ParallelExecution::new(
            manifest(),
            spec_collection(9),
            options(3, "eager"),
            collaborators(&launcher, &executor, &plugins, &events),
        )
        .run(),
    )
    .await
    .unwrap();

    assert!(suite.is_failed);
    assert_eq!(
        skipped_names(&suite),
        vec!["spec_1.spec", "spec_4.spec", "spec_7.spec"]
    );
    assert_eq!(suite.specs_skipped_count, 3);
    assert_eq!(suite.specs_executed() + suite.specs_skipped_count, 9);
    assert!(!executor.executed().contains_key(&2));
    assert_eq!(events.names(), vec!["suite_start", "suite_end"]);
}
