//! Model loader integration tests
//!
//! Covers local and remote artifact sources and the distinction between
//! unreachable and invalid artifacts. Remote sources are served by a
//! throwaway axum server bound to an ephemeral local port.

use axum::http::{header, StatusCode};
use axum::{routing::get, Router};
use lyricgenre_classifiers::model_loader::sha256_hex;
use lyricgenre_classifiers::{Classifier, LoadedModel, ModelConfig, ModelSource};
use lyricgenre_core::Error;
use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

const MODEL_JSON: &str = include_str!("../../../models/genre-model.json");

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn storage_router() -> Router {
    Router::new()
        .route("/genreModel.json", get(|| async { MODEL_JSON }))
        .route("/garbage.json", get(|| async { "not a model" }))
        .route("/truncated.json", get(|| async { &MODEL_JSON[..200] }))
        .route(
            "/blob/genreModel.json",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/genreModel.json")]) }),
        )
        .route(
            "/slow.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                MODEL_JSON
            }),
        )
}

fn remote_config(addr: SocketAddr, path: &str) -> ModelConfig {
    ModelConfig::from_url(&format!("http://{addr}{path}"))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_load_from_local_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MODEL_JSON.as_bytes()).unwrap();

    let model = LoadedModel::load(&ModelConfig::from_local(file.path()))
        .await
        .unwrap();

    let metadata = model.metadata();
    assert_eq!(metadata.name, "german-lyrics-genre");
    assert_eq!(metadata.labels.len(), 5);
    assert_eq!(metadata.size_bytes, MODEL_JSON.len());
    assert_eq!(metadata.sha256, sha256_hex(MODEL_JSON.as_bytes()));
}

#[tokio::test]
async fn test_missing_local_file_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    let config = ModelConfig::from_local(dir.path().join("missing.json"));

    let err = LoadedModel::load(&config).await.err().unwrap();
    assert!(matches!(err, Error::ArtifactUnreachable { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_load_from_remote_url() {
    let addr = serve(storage_router()).await;
    let config = remote_config(addr, "/genreModel.json");

    let model = LoadedModel::load(&config).await.unwrap();
    assert_eq!(model.metadata().source, format!("http://{addr}/genreModel.json"));

    let result = model.classifier().classify("digga rap flow").await.unwrap();
    assert_eq!(result.label.as_str(), "hiphop");
}

#[tokio::test]
async fn test_remote_not_found_is_unreachable() {
    let addr = serve(storage_router()).await;
    let config = remote_config(addr, "/does-not-exist.json");

    let err = LoadedModel::load(&config).await.err().unwrap();
    match err {
        Error::ArtifactUnreachable { reason, .. } => assert!(reason.contains("404")),
        other => panic!("expected unreachable artifact, got {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_to_raw_file_is_followed() {
    let addr = serve(storage_router()).await;
    let config = remote_config(addr, "/blob/genreModel.json");

    let model = LoadedModel::load(&config).await.unwrap();
    assert_eq!(model.metadata().labels.len(), 5);
    assert_eq!(model.metadata().sha256, sha256_hex(MODEL_JSON.as_bytes()));
}

#[tokio::test]
async fn test_hanging_storage_is_unreachable() {
    let addr = serve(storage_router()).await;
    let config = remote_config(addr, "/slow.json").with_timeout(Duration::from_secs(1));

    let started = std::time::Instant::now();
    let err = LoadedModel::load(&config).await.err().unwrap();

    assert!(matches!(err, Error::ArtifactUnreachable { .. }), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_storage_down_is_unreachable() {
    // Grab a free port and close it again so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = LoadedModel::load(&remote_config(addr, "/genreModel.json"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, Error::ArtifactUnreachable { .. }), "got {err:?}");
    assert!(err.is_startup_fatal());
}

#[tokio::test]
async fn test_garbage_and_truncated_artifacts_are_invalid() {
    let addr = serve(storage_router()).await;

    for path in ["/garbage.json", "/truncated.json"] {
        let err = LoadedModel::load(&remote_config(addr, path)).await.err().unwrap();
        assert!(matches!(err, Error::ArtifactInvalid(_)), "{path}: got {err:?}");
    }
}

#[tokio::test]
async fn test_digest_pinning() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MODEL_JSON.as_bytes()).unwrap();

    let pinned = ModelConfig::from_local(file.path())
        .with_sha256(sha256_hex(MODEL_JSON.as_bytes()).to_uppercase());
    assert!(LoadedModel::load(&pinned).await.is_ok());

    let wrong = ModelConfig::from_local(file.path()).with_sha256(sha256_hex(b"other"));
    let err = LoadedModel::load(&wrong).await.err().unwrap();
    assert!(matches!(err, Error::ArtifactInvalid(_)));
    assert!(err.to_string().contains("digest mismatch"));
}

#[tokio::test]
async fn test_reloading_same_bytes_agrees() {
    let first = LoadedModel::from_bytes(MODEL_JSON.as_bytes(), "first", None).unwrap();
    let second = LoadedModel::from_bytes(MODEL_JSON.as_bytes(), "second", None).unwrap();

    let held_out = [
        "",
        "Stahl und Feuer",
        "Tanzen bis zum Morgen, Baby",
        "Ein Rebell mit Gitarre",
        "Sehnsucht nach dem Himmel",
        "Wir sind die Jungs vom Block",
        "Lorem ipsum dolor sit amet",
    ];

    for text in held_out {
        let a = first.classifier().classify(text).await.unwrap();
        let b = second.classifier().classify(text).await.unwrap();
        assert_eq!(a.label, b.label, "disagreement on {text:?}");
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn test_source_display_round_trips_through_parse() {
    for source in [
        "./models/genre-model.json",
        "https://www.dropbox.com/s/abc/genreModel.json?dl=1",
        "hf://tlary/genre-model/genre-model.json",
    ] {
        let parsed = ModelSource::parse(source).unwrap();
        assert_eq!(ModelSource::parse(&parsed.to_string()).unwrap(), parsed);
    }
}
