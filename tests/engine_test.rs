use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossq::engine::{EngineRunner, Recommender, RunOutcome};
use crossq::error::ApiError;

// Helper to drop a shell script into the temp dir; the runner invokes it
// as `sh <script> <title> <dataset>`, mirroring the production
// `python3 <script> <title> <dataset>` argument vector.
fn write_script(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "crossq-engine-test-{}-{}.sh",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).expect("failed to write test script");
    path
}

fn sh_runner(script: PathBuf, timeout: Duration, max_runs: usize) -> EngineRunner {
    EngineRunner::new("sh".to_string(), script, timeout, max_runs)
}

fn dataset() -> &'static Path {
    Path::new("/tmp/audio_features.csv")
}

#[tokio::test]
async fn test_run_captures_stdout_and_stderr_separately() {
    let script = write_script(
        "split-streams",
        "echo 'DEBUG: loading dataset' >&2\necho 'Physical.mp3'\n",
    );
    let runner = sh_runner(script, Duration::from_secs(5), 2);

    match runner.run("Levitating", dataset()).await {
        RunOutcome::Completed {
            status,
            stdout,
            stderr,
        } => {
            assert!(status.success());
            assert_eq!(stdout.trim(), "Physical.mp3");
            assert!(stderr.contains("DEBUG: loading dataset"));
            // diagnostics must never bleed into the useful output
            assert!(!stdout.contains("DEBUG"));
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_reports_nonzero_exit() {
    let script = write_script("nonzero", "echo 'cannot read dataset' >&2\nexit 3\n");
    let runner = sh_runner(script, Duration::from_secs(5), 2);

    match runner.run("Levitating", dataset()).await {
        RunOutcome::Completed { status, stderr, .. } => {
            assert_eq!(status.code(), Some(3));
            assert!(stderr.contains("cannot read dataset"));
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_times_out_and_terminates() {
    let script = write_script("hang", "sleep 30\n");
    let runner = sh_runner(script, Duration::from_millis(300), 2);

    let started = Instant::now();
    let outcome = runner.run("Levitating", dataset()).await;
    let elapsed = started.elapsed();

    assert!(matches!(outcome, RunOutcome::TimedOut));
    // deadline plus kill confirmation, nowhere near the sleep duration
    assert!(elapsed < Duration::from_secs(10));
}

#[tokio::test]
async fn test_run_launch_error_for_missing_program() {
    let runner = EngineRunner::new(
        "/nonexistent/crossq-engine".to_string(),
        PathBuf::from("script.py"),
        Duration::from_secs(5),
        2,
    );

    assert!(matches!(
        runner.run("Levitating", dataset()).await,
        RunOutcome::LaunchError(_)
    ));
}

#[tokio::test]
async fn test_run_admission_bound_serializes() {
    let script = write_script("slow-ok", "sleep 0.5\necho 'ok.mp3'\n");
    let runner = std::sync::Arc::new(sh_runner(script, Duration::from_secs(5), 1));

    let started = Instant::now();
    let first = {
        let runner = std::sync::Arc::clone(&runner);
        tokio::spawn(async move { runner.run("one", dataset()).await })
    };
    let second = {
        let runner = std::sync::Arc::clone(&runner);
        tokio::spawn(async move { runner.run("two", dataset()).await })
    };

    let first = first.await.expect("task panicked");
    let second = second.await.expect("task panicked");
    let elapsed = started.elapsed();

    assert!(matches!(first, RunOutcome::Completed { .. }));
    assert!(matches!(second, RunOutcome::Completed { .. }));
    // with one permit the runs cannot overlap
    assert!(elapsed >= Duration::from_millis(900));
}

fn build_recommender(script: PathBuf, timeout: Duration) -> Recommender {
    Recommender::new(
        sh_runner(script, timeout, 2),
        vec!["not found".to_string()],
    )
}

#[tokio::test]
async fn test_recommend_strips_extension() {
    let script = write_script("recommend-ok", "echo 'Physical.mp3'\n");
    let recommender = build_recommender(script, Duration::from_secs(5));

    let title = recommender.recommend("Levitating", dataset()).await.unwrap();
    assert_eq!(title, "Physical");
}

#[tokio::test]
async fn test_recommend_sanitizes_title_before_invocation() {
    // the script echoes its first argument back, so the result shows
    // exactly what the engine was handed
    let script = write_script("echo-arg", "printf '%s\\n' \"$1\"\n");
    let recommender = build_recommender(script, Duration::from_secs(5));

    let title = recommender
        .recommend("Levitating (feat. DaBaby)", dataset())
        .await
        .unwrap();
    assert_eq!(title, "Levitating");
}

#[tokio::test]
async fn test_recommend_empty_output() {
    let script = write_script("silent", "exit 0\n");
    let recommender = build_recommender(script, Duration::from_secs(5));

    let result = recommender.recommend("Levitating", dataset()).await;
    assert!(matches!(result, Err(ApiError::EmptyResult)));
}

#[tokio::test]
async fn test_recommend_error_prefix_is_not_found() {
    let script = write_script("error-prefix", "echo 'ERROR: no usable match'\n");
    let recommender = build_recommender(script, Duration::from_secs(5));

    let result = recommender.recommend("Levitating", dataset()).await;
    assert!(matches!(result, Err(ApiError::EngineNotFound { .. })));
}

#[tokio::test]
async fn test_recommend_marker_is_not_found_case_insensitive() {
    let script = write_script("marker", "echo 'target was Not Found in the dataset'\n");
    let recommender = build_recommender(script, Duration::from_secs(5));

    match recommender.recommend("Levitating", dataset()).await {
        Err(ApiError::EngineNotFound { title }) => assert_eq!(title, "Levitating"),
        other => panic!("expected EngineNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recommend_failure_carries_stderr() {
    let script = write_script("fails", "echo 'traceback follows' >&2\nexit 2\n");
    let recommender = build_recommender(script, Duration::from_secs(5));

    match recommender.recommend("Levitating", dataset()).await {
        Err(ApiError::EngineFailure { status, stderr }) => {
            assert_eq!(status, 2);
            assert!(stderr.contains("traceback follows"));
        }
        other => panic!("expected EngineFailure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recommend_timeout() {
    let script = write_script("recommend-hang", "sleep 30\n");
    let recommender = build_recommender(script, Duration::from_millis(300));

    let result = recommender.recommend("Levitating", dataset()).await;
    assert!(matches!(result, Err(ApiError::EngineTimeout)));
}

#[tokio::test]
async fn test_recommend_unavailable() {
    let runner = EngineRunner::new(
        "/nonexistent/crossq-engine".to_string(),
        PathBuf::from("script.py"),
        Duration::from_secs(5),
        2,
    );
    let recommender = Recommender::new(runner, vec!["not found".to_string()]);

    let result = recommender.recommend("Levitating", dataset()).await;
    assert!(matches!(result, Err(ApiError::EngineUnavailable(_))));
}
