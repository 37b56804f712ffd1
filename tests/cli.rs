use std::path::Path;
use std::process::Output;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tokio::process::Command;

const PODCAST: &str = include_str!("fixtures/podcast.xml");

/// Mock feed and webhook endpoints for one test.
#[derive(Default)]
struct Mock {
    feed_status: AtomicU16,
    feed_hits: AtomicUsize,
    hook_status: AtomicU16,
    hook_hits: AtomicUsize,
    /// When set, the hook answers 500 unless the body equals it.
    expected_body: Option<Vec<u8>>,
}

impl Mock {
    fn new(feed_status: u16, hook_status: u16) -> Self {
        Self {
            feed_status: AtomicU16::new(feed_status),
            hook_status: AtomicU16::new(hook_status),
            ..Self::default()
        }
    }
}

async fn feed(State(mock): State<Arc<Mock>>) -> (StatusCode, &'static str) {
    mock.feed_hits.fetch_add(1, Ordering::SeqCst);
    let status = StatusCode::from_u16(mock.feed_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, PODCAST)
}

async fn hook(State(mock): State<Arc<Mock>>, method: Method, body: Bytes) -> StatusCode {
    mock.hook_hits.fetch_add(1, Ordering::SeqCst);
    if method != Method::POST {
        return StatusCode::BAD_REQUEST;
    }
    if let Some(expected) = &mock.expected_body {
        if expected.as_slice() != body.as_ref() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
    StatusCode::from_u16(mock.hook_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn spawn_mock(mock: Arc<Mock>) -> String {
    let app = Router::new()
        .route("/feed.xml", get(feed))
        .route("/hook", any(hook))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock");
    });

    format!("http://{addr}")
}

async fn run(base: &str, cache: &Path, extra: &[&str]) -> Output {
    let config = cache.with_extension("toml");
    std::fs::write(&config, "").expect("write empty config");

    Command::new(env!("CARGO_BIN_EXE_rss2http"))
        .arg("--rss")
        .arg(format!("{base}/feed.xml"))
        .arg("--post")
        .arg(format!("{base}/hook"))
        .arg("--cache")
        .arg(cache)
        .arg("--config")
        .arg(&config)
        .args(extra)
        .output()
        .await
        .expect("run rss2http")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[tokio::test]
async fn test_fails_when_post_fails() {
    let mock = Arc::new(Mock::new(200, 500));
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run(&base, &dir.path().join("cache"), &[]).await;

    assert!(!output.status.success(), "expected failure: {}", stderr(&output));
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error while posting data to"), "{err}");
    assert!(err.contains("500"), "{err}");
    assert_eq!(mock.hook_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_succeeds_when_post_accepted() {
    let mock = Arc::new(Mock::new(200, 200));
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run(&base, &dir.path().join("cache"), &[]).await;

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(mock.feed_hits.load(Ordering::SeqCst), 1);
    assert_eq!(mock.hook_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_posts_template_body() {
    let tpl = r#"{"dummy": "template"}"#;
    let mock = Arc::new(Mock {
        expected_body: Some(tpl.as_bytes().to_vec()),
        ..Mock::new(200, 200)
    });
    let base = spawn_mock(mock).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run(&base, &dir.path().join("cache"), &["--tpl", tpl]).await;

    assert!(output.status.success(), "{}", stderr(&output));
}

#[tokio::test]
async fn test_fresh_cache_gets_one_file() {
    let mock = Arc::new(Mock::new(200, 200));
    let base = spawn_mock(mock).await;
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    std::fs::create_dir(&cache).unwrap();

    let output = run(&base, &cache, &[]).await;

    assert!(output.status.success(), "{}", stderr(&output));
    let files: Vec<_> = std::fs::read_dir(&cache)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1, "unexpected cache files: {files:?}");
    assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), PODCAST);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name.len(), 64);
}

#[tokio::test]
async fn test_cached_feed_survives_feed_outage() {
    let mock = Arc::new(Mock::new(200, 200));
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");

    let first = run(&base, &cache, &[]).await;
    assert!(first.status.success(), "{}", stderr(&first));

    mock.feed_status.store(500, Ordering::SeqCst);
    let second = run(&base, &cache, &[]).await;

    assert!(second.status.success(), "{}", stderr(&second));
    assert_eq!(mock.feed_hits.load(Ordering::SeqCst), 1);
    assert_eq!(mock.hook_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_feed_status_error_is_reported() {
    let mock = Arc::new(Mock::new(404, 200));
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run(&base, &dir.path().join("cache"), &[]).await;

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error while downloading/saving"), "{err}");
    assert!(err.contains("404"), "{err}");
    assert_eq!(mock.hook_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_template_fails_before_fetch() {
    let mock = Arc::new(Mock::new(200, 200));
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run(&base, &dir.path().join("cache"), &["--tpl", "{{ .Author }}"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Author"), "{}", stderr(&output));
    assert_eq!(mock.feed_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_dry_run_prints_body() {
    let mock = Arc::new(Mock::new(200, 200));
    let base = spawn_mock(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let output = run(
        &base,
        &dir.path().join("cache"),
        &["--dry-run", "--seed", "1", "--tpl", "{{ .Published }}"],
    )
    .await;

    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim_end().ends_with("GMT"), "{stdout}");
    assert_eq!(mock.hook_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "seed = \"not a number\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rss2http"))
        .arg("--config")
        .arg(&config)
        .output()
        .await
        .expect("run rss2http");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to parse config file"), "{}", stderr(&output));
}
