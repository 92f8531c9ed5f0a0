use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::actions::DriverForm;
use crate::entities::{dashboard, drivers, new_drivers, trips};
use crate::fetcher::{ApiClient, ApiError, ClientOptions, Endpoint, Envelope};
use crate::pipeline::StyleCategory;
use crate::utils::DisplayFormat;
use crate::view::{ListPage, NoticeLevel};

#[derive(Default)]
struct Backend {
    drivers: Vec<Value>,
    rides: Vec<Value>,
    requests: Vec<Value>,
    dashboard: Value,
    updates: Vec<(String, Value)>,
    delete_calls: usize,
    fail_delete: bool,
}

type Shared = Arc<Mutex<Backend>>;

async fn list_drivers(State(state): State<Shared>) -> Json<Value> {
    let backend = state.lock().unwrap();
    Json(json!({"success": true, "data": backend.drivers}))
}

async fn get_driver(State(state): State<Shared>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let backend = state.lock().unwrap();
    match backend.drivers.iter().find(|d| d["_id"] == id.as_str()) {
        Some(driver) => (StatusCode::OK, Json(json!({"success": true, "data": driver}))),
        None => (StatusCode::NOT_FOUND, Json(json!({"success": false}))),
    }
}

async fn update_driver(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut backend = state.lock().unwrap();
    backend.updates.push((id.clone(), body.clone()));
    match backend.drivers.iter_mut().find(|d| d["_id"] == id.as_str()) {
        Some(driver) => {
            *driver = body;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn delete_driver(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut backend = state.lock().unwrap();
    backend.delete_calls += 1;
    if backend.fail_delete {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = backend.drivers.len();
    backend.drivers.retain(|d| d["_id"] != id.as_str());
    if backend.drivers.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn list_rides(State(state): State<Shared>) -> Json<Value> {
    let backend = state.lock().unwrap();
    Json(json!({"success": true, "rides": backend.rides}))
}

async fn list_requests(State(state): State<Shared>) -> Json<Value> {
    let backend = state.lock().unwrap();
    Json(Value::Array(backend.requests.clone()))
}

async fn summary(State(state): State<Shared>) -> Json<Value> {
    let backend = state.lock().unwrap();
    Json(backend.dashboard.clone())
}

async fn spawn_backend(backend: Backend) -> (ApiClient, Shared) {
    let state: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/api/driverRequest/get", get(list_drivers))
        .route("/api/admin/getDriver/{id}", get(get_driver))
        .route("/api/admin/updateDriver/{id}", put(update_driver))
        .route("/api/admin/deleteDriver/{id}", delete(delete_driver))
        .route("/api/rideRequest/getAllRides", get(list_rides))
        .route("/requests", get(list_requests))
        .route("/api/admin/dashboard", get(summary))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbage", get(|| async { "<html>not json</html>" }))
        .route(
            "/refused",
            get(|| async { Json(json!({"success": false, "data": []})) }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::new(&ClientOptions {
        base_url: format!("http://{addr}"),
        timeout_secs: 1,
        proxy: None,
    })
    .unwrap();
    (client, state)
}

fn driver(i: usize) -> Value {
    let status = if i % 2 == 0 { "on-duty" } else { "off-duty" };
    json!({
        "_id": format!("d{i}"),
        "fullName": format!("Driver {i}"),
        "contactNumber": format!("98765000{i:02}"),
        "status": status,
        "vehicleDetails": {"make": "Maruti", "model": "Dzire", "numberPlate": format!("RJ14 {i}")}
    })
}

fn drivers_page() -> ListPage {
    ListPage::new(
        drivers::list_spec(4),
        drivers::endpoint(Envelope::DATA),
        DisplayFormat::default(),
    )
}

#[tokio::test]
async fn ten_drivers_paginate_four_per_page() {
    let (client, _) = spawn_backend(Backend {
        drivers: (1..=10).map(driver).collect(),
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    assert!(page.refresh(&client).await);
    assert!(page.notice().is_none());

    let first = page.render();
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.rows.len(), 4);
    assert_eq!(first.rows[0].id, "d1");
    assert_eq!(first.rows[0].derived_status.label, "On Trip");
    assert_eq!(first.rows[1].derived_status.style, StyleCategory::Positive);

    assert!(page.go_to_page(3));
    let last = page.render();
    assert_eq!(last.rows.len(), 2);
    assert_eq!(last.start_index, 8);
    assert_eq!(last.rows[1].id, "d10");

    assert!(!page.go_to_page(4));
    assert_eq!(page.render().current_page, 3);
}

#[tokio::test]
async fn search_narrows_fetched_drivers() {
    let (client, _) = spawn_backend(Backend {
        drivers: (1..=10).map(driver).collect(),
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    page.refresh(&client).await;
    page.set_query("RJ14 1");
    let rendered = page.render();
    // "RJ14 1" and "RJ14 10"
    assert_eq!(rendered.total_items, 2);
    assert_eq!(rendered.total_pages, 1);
}

#[tokio::test]
async fn dashboard_without_ongoing_trips_shows_empty_state() {
    let (client, _) = spawn_backend(Backend {
        dashboard: json!({"ongoingTrips": 0}),
        ..Backend::default()
    })
    .await;
    let doc = client.fetch_document(dashboard::SUMMARY_PATH).await.unwrap();
    let view = dashboard::DashboardView::build(
        &dashboard::DashboardSummary::from_value(&doc),
        &DisplayFormat::default(),
    );
    assert!(view.ongoing_trips.is_empty());
    assert_eq!(view.ongoing_trips.empty_message, "No ongoing trips");
}

#[tokio::test]
async fn dashboard_with_ongoing_trips_shows_one_row() {
    let (client, _) = spawn_backend(Backend {
        dashboard: json!({"ongoingTrips": 2, "totalEarnings": 500, "newUsers": [{}, {}]}),
        ..Backend::default()
    })
    .await;
    let doc = client.fetch_document(dashboard::SUMMARY_PATH).await.unwrap();
    let view = dashboard::DashboardView::build(
        &dashboard::DashboardSummary::from_value(&doc),
        &DisplayFormat::default(),
    );
    assert_eq!(view.ongoing_trips.rows.len(), 1);
    assert_eq!(view.ongoing_trips.rows[0].field("Fare"), Some("₹500"));
    assert_eq!(view.stats[1].value, "2");
}

#[tokio::test]
async fn delete_then_refetch_excludes_driver() {
    let mut records: Vec<Value> = (1..=3).map(driver).collect();
    records.push(json!({"_id": "abc123", "fullName": "Gone Soon"}));
    let (client, state) = spawn_backend(Backend {
        drivers: records,
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    page.refresh(&client).await;
    assert!(page.list().contains_id("abc123"));

    page.delete_driver(&client, "abc123").await.unwrap();
    assert!(!page.list().contains_id("abc123"));
    assert_eq!(page.list().rows().len(), 3);
    assert_eq!(page.notice().map(|n| n.level), Some(NoticeLevel::Info));
    assert_eq!(state.lock().unwrap().delete_calls, 1);
}

#[tokio::test]
async fn failed_delete_keeps_rows_and_sets_notice() {
    let (client, state) = spawn_backend(Backend {
        drivers: (1..=3).map(driver).collect(),
        fail_delete: true,
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    page.refresh(&client).await;

    let err = page.delete_driver(&client, "d2").await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status, .. } if status.as_u16() == 500));
    assert_eq!(page.list().rows().len(), 3);
    assert!(page.list().contains_id("d2"));
    let notice = page.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("d2"));
    assert_eq!(state.lock().unwrap().delete_calls, 1);
}

#[tokio::test]
async fn empty_id_is_rejected_without_a_request() {
    let (client, state) = spawn_backend(Backend::default()).await;
    let mut page = drivers_page();
    let err = page.delete_driver(&client, "  ").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
    assert_eq!(state.lock().unwrap().delete_calls, 0);
}

#[tokio::test]
async fn update_sends_merged_record_and_refetches() {
    let (client, state) = spawn_backend(Backend {
        drivers: (1..=2).map(driver).collect(),
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    page.refresh(&client).await;

    let form = DriverForm {
        full_name: Some("Driver One".to_string()),
        salary: Some("18000".to_string()),
        ..DriverForm::default()
    };
    page.update_driver(&client, "d1", &form).await.unwrap();

    let backend = state.lock().unwrap();
    assert_eq!(backend.updates.len(), 1);
    let (id, body) = &backend.updates[0];
    assert_eq!(id, "d1");
    assert_eq!(body["fullName"], "Driver One");
    assert_eq!(body["salary"], 18000.0);
    assert_eq!(body["vehicleDetails"]["numberPlate"], "RJ14 1");
    drop(backend);

    let rows = page.list().rows();
    assert_eq!(rows[0].field("Name"), Some("Driver One"));
}

#[tokio::test]
async fn invalid_form_sends_nothing() {
    let (client, state) = spawn_backend(Backend {
        drivers: vec![driver(1)],
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    page.refresh(&client).await;
    let form = DriverForm {
        contact_number: Some("call me".to_string()),
        ..DriverForm::default()
    };
    let err = page.update_driver(&client, "d1", &form).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
    assert!(state.lock().unwrap().updates.is_empty());
    assert_eq!(page.list().rows().len(), 1);
}

#[tokio::test]
async fn server_error_yields_empty_collection_and_error() {
    let (client, _) = spawn_backend(Backend::default()).await;
    let outcome = client
        .fetch_collection(&Endpoint::new("broken", Envelope::BareArray))
        .await;
    assert!(outcome.records.is_empty());
    assert!(matches!(outcome.error, Some(ApiError::Http { .. })));
}

#[tokio::test]
async fn malformed_body_yields_decode_error() {
    let (client, _) = spawn_backend(Backend::default()).await;
    let outcome = client
        .fetch_collection(&Endpoint::new("garbage", Envelope::BareArray))
        .await;
    assert!(outcome.records.is_empty());
    assert!(matches!(outcome.error, Some(ApiError::Decode { .. })));

    let refused = client
        .fetch_collection(&Endpoint::new("refused", Envelope::DATA))
        .await;
    assert!(refused.records.is_empty());
    assert!(matches!(refused.error, Some(ApiError::Decode { .. })));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let (client, _) = spawn_backend(Backend::default()).await;
    let outcome = client
        .fetch_collection(&Endpoint::new("slow", Envelope::BareArray))
        .await;
    assert!(outcome.records.is_empty());
    assert!(outcome.error.as_ref().is_some_and(ApiError::is_timeout));
}

#[tokio::test]
async fn envelope_mismatch_leaves_page_empty() {
    let (client, _) = spawn_backend(Backend {
        drivers: (1..=3).map(driver).collect(),
        ..Backend::default()
    })
    .await;
    let mut page = ListPage::new(
        drivers::list_spec(4),
        drivers::endpoint(Envelope::BareArray),
        DisplayFormat::default(),
    );
    page.refresh(&client).await;
    assert!(page.list().rows().is_empty());
    assert!(page.notice().is_some());
}

#[tokio::test]
async fn late_resolution_is_discarded() {
    let (client, state) = spawn_backend(Backend {
        drivers: (1..=2).map(driver).collect(),
        ..Backend::default()
    })
    .await;
    let mut page = drivers_page();
    let endpoint = page.endpoint().clone();

    let stale = page.begin_refresh();
    let stale_outcome = client.fetch_collection(&endpoint).await;

    state.lock().unwrap().drivers = (1..=5).map(driver).collect();
    let fresh = page.begin_refresh();
    let fresh_outcome = client.fetch_collection(&endpoint).await;

    assert!(page.apply(fresh, fresh_outcome));
    assert!(!page.apply(stale, stale_outcome));
    assert_eq!(page.list().rows().len(), 5);
}

#[tokio::test]
async fn trips_use_rides_envelope() {
    let (client, _) = spawn_backend(Backend {
        rides: vec![
            json!({"_id": "r1", "pickupAddress": "MI Road", "fare": 236}),
            json!({"_id": "r2", "pickupAddress": "Airport"}),
        ],
        ..Backend::default()
    })
    .await;
    let mut page = ListPage::new(trips::list_spec(4), trips::endpoint(), DisplayFormat::default());
    page.refresh(&client).await;
    let rendered = page.render();
    assert_eq!(rendered.rows.len(), 2);
    assert_eq!(rendered.rows[0].field("GST"), Some("₹23.6"));
    assert_eq!(rendered.rows[1].field("Fare"), Some("₹0"));
}

#[tokio::test]
async fn new_driver_requests_are_a_bare_array() {
    let (client, _) = spawn_backend(Backend {
        requests: vec![json!({"fullName": "Asha"}), json!({"fullName": "Vikram", "status": "Approved"})],
        ..Backend::default()
    })
    .await;
    let endpoint = Endpoint {
        path: "requests".to_string(),
        ..new_drivers::endpoint()
    };
    let mut page = ListPage::new(new_drivers::list_spec(4), endpoint, DisplayFormat::default());
    page.refresh(&client).await;
    let rows = page.list().rows();
    assert_eq!(rows[0].id, "driver-0");
    assert_eq!(rows[0].derived_status.style, StyleCategory::Warning);
    assert_eq!(rows[1].field("Action"), Some("Activate Account"));
    assert_eq!(rows[1].derived_status.style, StyleCategory::Positive);
}
