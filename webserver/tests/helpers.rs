//! Test helper utilities for webserver integration tests

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use store::{StorePaths, WorkingStore};
use webserver::{EditorServer, RealEditorStore, ServerState};

pub fn seed_rows() -> Vec<(u64, Vec<&'static str>)> {
    vec![
        (1001, vec!["ACME CORP", "ACME CORPORATION", "ACME"]),
        (1002, vec!["GLOBEX LLC"]),
        (1003, vec!["INITECH", "INITECH INC"]),
    ]
}

fn write_source(path: &Path, rows: &[(u64, Vec<&str>)]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer
        .write_record(["spons_dfe_ein", "unique_names_v2"])
        .unwrap();
    for (ein, names) in rows {
        let names_json = serde_json::to_string(names).unwrap();
        writer.write_record([ein.to_string(), names_json]).unwrap();
    }
    writer.flush().unwrap();
}

/// Build a router over a real store seeded from a temp source CSV. The
/// `TempDir` must stay alive for the duration of the test.
pub fn build_router() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("unique_ein_spons.csv");
    write_source(&source, &seed_rows());
    let working = dir.path().join("working_data.csv");

    let working_store = WorkingStore::open(StorePaths::new(&source, &working)).unwrap();
    let server = EditorServer::new(
        ServerState::new(source, working),
        RealEditorStore::new(working_store),
    );
    (dir, server.build_router())
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
