mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn masters_round_trip_through_replacement() {
    let app = TestApp::new().await;

    let body = read_json(
        app.request(Method::GET, "/api/v1/masters/suppliers", None)
            .await,
    )
    .await;
    let mut suppliers = body["data"].clone();
    assert_eq!(suppliers.as_array().unwrap().len(), 6);

    suppliers.as_array_mut().unwrap().push(json!({
        "id": "SUP007",
        "name": "新規資材商事",
        "type": "vendor"
    }));

    let response = app
        .request(Method::PUT, "/api/v1/masters/suppliers", Some(suppliers))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(
        app.request(Method::GET, "/api/v1/masters/suppliers", None)
            .await,
    )
    .await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"新規資材商事"));
}

#[tokio::test]
async fn replacement_rejects_duplicate_and_empty_ids() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/masters/items",
            Some(json!([
                { "id": "I0001", "category": "タグ類", "name": "A", "unit": "箱", "price": "0" },
                { "id": "I0001", "category": "タグ類", "name": "B", "unit": "箱", "price": "0" }
            ])),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::PUT,
            "/api/v1/masters/locations",
            Some(json!([
                { "id": "", "name": "名無し", "type": "store" }
            ])),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Failed replacements leave the stored master untouched.
    let body = read_json(
        app.request(Method::GET, "/api/v1/masters/locations", None)
            .await,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn replacement_publishes_a_change_notice() {
    let app = TestApp::new().await;

    let mut rx = app.state.store.subscribe();

    let items = read_json(app.request(Method::GET, "/api/v1/masters/items", None).await).await
        ["data"]
        .clone();
    let response = app
        .request(Method::PUT, "/api/v1/masters/items", Some(items))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let key = rx.recv().await.expect("change notice");
    assert_eq!(key.as_str(), "master_items");
}

#[tokio::test]
async fn removing_a_routed_location_empties_its_destinations() {
    let app = TestApp::new().await;

    // Drop the head factory from the location master; the static route map
    // still points at it, but it no longer resolves to a destination.
    let locations = read_json(
        app.request(Method::GET, "/api/v1/masters/locations", None)
            .await,
    )
    .await["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|l| l["id"] != "F001")
        .cloned()
        .collect::<Vec<_>>();

    let response = app
        .request(
            Method::PUT,
            "/api/v1/masters/locations",
            Some(json!(locations)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(
        app.request(Method::GET, "/api/v1/routing/S001/destinations", None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["destinations"].as_array().unwrap().len(), 0);
    assert!(body["data"]["effective_selection"].is_null());
}
