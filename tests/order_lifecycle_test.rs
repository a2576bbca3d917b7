mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn ledger_lists_sample_orders_newest_first() {
    let app = TestApp::new().await;

    let body = read_json(app.request(Method::GET, "/api/v1/orders", None).await).await;
    let data = &body["data"];
    assert_eq!(data["total"], 2);
    assert_eq!(data["items"][0]["id"], "ORDER-20231205-002");
    assert_eq!(data["items"][1]["id"], "ORDER-20231201-001");

    // Party names come from the current master data.
    assert_eq!(
        data["items"][0]["source_name"],
        "パステルクリーニング アクロス神辺店"
    );
    assert_eq!(
        data["items"][0]["destination_name"],
        "いしだクリーニング 本社工場"
    );
}

#[tokio::test]
async fn ledger_filters_by_source_and_status() {
    let app = TestApp::new().await;

    let body = read_json(
        app.request(Method::GET, "/api/v1/orders?source_id=F001", None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], "ORDER-20231201-001");

    let body = read_json(
        app.request(Method::GET, "/api/v1/orders?status=pending", None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], "ORDER-20231205-002");

    let body = read_json(
        app.request(Method::GET, "/api/v1/orders?page=2&limit=1", None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["id"], "ORDER-20231201-001");
    assert_eq!(body["data"]["total_pages"], 2);
}

#[tokio::test]
async fn page_far_beyond_the_ledger_is_just_empty() {
    let app = TestApp::new().await;

    let path = format!("/api/v1/orders?page={}&limit=2", u64::MAX);
    let response = app.request(Method::GET, &path, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn pending_order_completes_exactly_once() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders/ORDER-20231205-002/complete",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "completed");

    // Completing again, or completing an already-completed order, fails.
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders/ORDER-20231205-002/complete",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders/ORDER-20231201-001/complete",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completion_leaves_snapshots_untouched() {
    let app = TestApp::new().await;

    app.request(
        Method::POST,
        "/api/v1/orders/ORDER-20231205-002/complete",
        None,
    )
    .await;

    let body = read_json(
        app.request(Method::GET, "/api/v1/orders/ORDER-20231205-002", None)
            .await,
    )
    .await;
    let order = &body["data"];
    assert_eq!(order["status"], "completed");
    assert_eq!(order["items"][0]["item_id"], "I0001");
    assert_eq!(order["items"][0]["quantity"], 100);
    assert_eq!(order["items"][0]["price"], "15");
    assert_eq!(order["total_amount"], "6500");
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/orders/ORD-00000000-nope", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders/ORD-00000000-nope/complete",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn printable_sheet_renders_current_master_names() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/printable-order/ORDER-20231201-001", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(html.contains("資材発注書"));
    assert!(html.contains("御中"));
    assert!(html.contains("カーボンフィルター"));
    assert!(html.contains("¥38,000"));
    assert!(html.contains("午前中配送希望"));
    // Company block of the issuing side.
    assert!(html.contains("いしだクリーニング"));
    assert!(html.contains("084-952-0041"));
}

#[tokio::test]
async fn printable_sheet_for_unknown_order_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/printable-order/ORD-00000000-nope", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn master_edits_change_rendered_names_but_not_order_snapshots() {
    let app = TestApp::new().await;

    // Rename the head factory in the location master.
    let mut locations = read_json(
        app.request(Method::GET, "/api/v1/masters/locations", None)
            .await,
    )
    .await["data"]
        .clone();
    for loc in locations.as_array_mut().unwrap() {
        if loc["id"] == "F001" {
            loc["name"] = json!("いしだクリーニング 第二工場");
        }
    }
    let response = app
        .request(Method::PUT, "/api/v1/masters/locations", Some(locations))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(
        app.request(Method::GET, "/api/v1/orders/ORDER-20231205-002", None)
            .await,
    )
    .await;
    let order = &body["data"];
    // Resolved name follows the edit; the line snapshots do not.
    assert_eq!(order["destination_name"], "いしだクリーニング 第二工場");
    assert_eq!(order["items"][0]["item_name"], "サービスバッグ大");
    assert_eq!(order["items"][0]["price"], "15");
}
