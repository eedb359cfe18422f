//! End-to-end tests for the REST surface
//!
//! These drive the real axum router over a store backed by a temp
//! directory, covering the list → detail → save → stats loop.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{build_router, get_json, post_json, seed_rows};

#[tokio::test]
async fn test_list_first_page() {
    let (_dir, router) = build_router();

    let (status, body) = get_json(&router, "/eins?page=1&page_size=2").await;
    assert_eq!(status, StatusCode::OK);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["ein"], 1001);
    assert_eq!(items[0]["is_edited"], false);
    assert_eq!(items[0]["completion_status"], "not_started");

    let pagination = &body["pagination"];
    assert_eq!(pagination["total_count"], 3);
    assert_eq!(pagination["total_pages"], 2);
    assert_eq!(pagination["has_next"], true);
    assert_eq!(pagination["has_previous"], false);
}

#[tokio::test]
async fn test_all_pages_cover_every_ein_once() {
    let (_dir, router) = build_router();

    let mut seen = Vec::new();
    for page in 1..=2 {
        let (_, body) = get_json(&router, &format!("/eins?page={page}&page_size=2")).await;
        for item in body["items"].as_array().unwrap() {
            seen.push(item["ein"].as_u64().unwrap());
        }
    }
    assert_eq!(seen, vec![1001, 1002, 1003]);

    let (_, beyond) = get_json(&router, "/eins?page=3&page_size=2").await;
    assert!(beyond["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_detail_returns_source_names() {
    let (_dir, router) = build_router();

    let (status, body) = get_json(&router, "/ein/1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["spons_dfe_ein"], 1001);

    let names: Vec<&str> = body["unique_names_v2"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_str().unwrap())
        .collect();
    assert_eq!(names, seed_rows()[0].1);
    assert_eq!(body["total_names"], 3);
    assert_eq!(body["new_name"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_unknown_ein_is_404() {
    let (_dir, router) = build_router();

    let (status, body) = get_json(&router, "/ein/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "EIN 9999 not found");
}

#[tokio::test]
async fn test_save_round_trip() {
    let (_dir, router) = build_router();

    let (status, body) = post_json(
        &router,
        "/ein/1001/save",
        json!({
            "marked_names": ["ACME"],
            "new_name": "  Acme Corporation  "
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_name"], "ACME CORPORATION");
    assert_eq!(body["marked_count"], 1);
    assert_eq!(body["completion_status"], "partially_done");
    assert_eq!(body["message"], "Changes saved.");

    let (_, detail) = get_json(&router, "/ein/1001").await;
    assert_eq!(detail["new_name"], "ACME CORPORATION");
    assert_eq!(detail["marked_names"][0], "ACME");

    let (_, stats) = get_json(&router, "/stats").await;
    assert_eq!(stats["edited_eins"], 1);
}

#[tokio::test]
async fn test_save_transfers_name_to_existing_ein() {
    let (_dir, router) = build_router();

    let (status, body) = post_json(
        &router,
        "/ein/1001/save",
        json!({ "name_ein_mappings": { "ACME": 1002 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transferred_count"], 1);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("1 name(s) transferred")
    );

    let (_, target) = get_json(&router, "/ein/1002").await;
    let names = target["unique_names_v2"].as_array().unwrap();
    assert_eq!(names.last().unwrap(), "ACME");
}

#[tokio::test]
async fn test_save_maps_name_to_absent_ein() {
    let (_dir, router) = build_router();

    let (status, body) = post_json(
        &router,
        "/ein/1003/save",
        json!({ "name_ein_mappings": { "INITECH INC": 7777 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transferred_count"], 0);
    assert_eq!(body["mappings_count"], 1);

    let (_, detail) = get_json(&router, "/ein/1003").await;
    assert_eq!(detail["name_ein_mappings"]["INITECH INC"], 7777);
    assert_eq!(detail["total_names"], 2);
}

#[tokio::test]
async fn test_save_rejects_unknown_marked_name() {
    let (_dir, router) = build_router();

    let (status, body) = post_json(
        &router,
        "/ein/1001/save",
        json!({ "marked_names": ["NOT A CANDIDATE"] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("NOT A CANDIDATE"));

    // Record untouched.
    let (_, detail) = get_json(&router, "/ein/1001").await;
    assert!(detail["marked_names"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_save_unknown_ein_is_404() {
    let (_dir, router) = build_router();

    let (status, _) = post_json(&router, "/ein/4242/save", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_shape() {
    let (_dir, router) = build_router();

    let (status, stats) = get_json(&router, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_eins"], 3);
    assert_eq!(stats["edited_eins"], 0);
    assert_eq!(stats["total_names"], 6);
    assert_eq!(stats["total_mappings"], 0);
    assert_eq!(stats["not_started_count"], 3);
    assert_eq!(stats["has_saved_data"], true);
}

#[tokio::test]
async fn test_health_and_api_info() {
    let (_dir, router) = build_router();

    let (status, health) = get_json(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["records_loaded"], 3);
    assert_eq!(health["working_file_exists"], true);
    assert_eq!(health["source_file_exists"], true);

    let (status, info) = get_json(&router, "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["message"], "EIN Names Editor API");
    assert_eq!(info["records_loaded"], 3);
}
