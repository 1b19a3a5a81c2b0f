// libs/appointment-cell/tests/api_test.rs
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::handlers::AppState;
use appointment_cell::router::{appointment_routes, system_routes};
use appointment_cell::store::MemoryStore;
use doctor_cell::catalog::DoctorCatalog;
use shared_config::AppConfig;

fn test_app() -> Router {
    let catalog = Arc::new(DoctorCatalog::seeded());
    let store = Arc::new(MemoryStore::new(catalog.roster()));
    let state = Arc::new(AppState {
        config: AppConfig::default(),
        catalog,
        store,
        started_at: Instant::now(),
        version: "1.0.0",
    });

    Router::new()
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api", system_routes(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_payload() -> Value {
    json!({
        "patientName": "Asha Juma",
        "phone": "0712345678",
        "email": "asha@example.com",
        "date": "2025-06-10",
        "time": "08:00",
        "doctorId": 1,
        "symptoms": "Headache"
    })
}

async fn book(app: &Router, payload: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(with_json("POST", "/api/appointments", payload))
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

#[tokio::test]
async fn booking_then_rebooking_then_confirming() {
    let app = test_app();

    // First booking lands as pending.
    let (status, body) = book(&app, booking_payload()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Appointment created successfully");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["doctorName"], "Dr. John Mwamba");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("APT"));

    // The same payload again is a duplicate.
    let (status, body) = book(&app, booking_payload()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Appointment already exists for this patient at the same time"
    );

    // The slot now shows as booked for that day.
    let response = app
        .clone()
        .oneshot(get("/api/availability/1/2025-06-10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["doctorId"], 1);
    assert_eq!(body["date"], "2025-06-10");
    assert_eq!(body["bookedSlots"], json!(["08:00"]));
    assert!(!body["availableSlots"]
        .as_array()
        .unwrap()
        .contains(&json!("08:00")));

    // Confirm the appointment.
    let response = app
        .clone()
        .oneshot(with_json(
            "PUT",
            &format!("/api/appointments/{id}/status"),
            json!({"status": "confirmed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Appointment confirmed successfully");
    assert_eq!(body["data"]["status"], "confirmed");

    // An unknown status name is rejected.
    let response = app
        .clone()
        .oneshot(with_json(
            "PUT",
            &format!("/api/appointments/{id}/status"),
            json!({"status": "archived"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(
        body["message"],
        "Invalid status. Must be: pending, confirmed, completed, or cancelled"
    );
}

#[tokio::test]
async fn rival_booking_for_the_same_slot_conflicts() {
    let app = test_app();
    book(&app, booking_payload()).await;

    let mut rival = booking_payload();
    rival["phone"] = json!("0698765432");
    rival["patientName"] = json!("Neema Said");

    let (status, body) = book(&app, rival).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Time slot is already booked for this doctor");
}

#[tokio::test]
async fn missing_fields_produce_the_workflow_message() {
    let app = test_app();

    let mut payload = booking_payload();
    payload.as_object_mut().unwrap().remove("phone");

    let (status, body) = book(&app, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Missing required fields: patientName, phone, date, time, doctorId"
    );
}

#[tokio::test]
async fn terminal_appointments_reject_further_updates() {
    let app = test_app();
    let (_, body) = book(&app, booking_payload()).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    for target in ["confirmed", "completed"] {
        let response = app
            .clone()
            .oneshot(with_json(
                "PUT",
                &format!("/api/appointments/{id}/status"),
                json!({"status": target}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(with_json(
            "PUT",
            &format!("/api/appointments/{id}/status"),
            json!({"status": "cancelled"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(
        body["message"],
        "Cannot change status from completed to cancelled"
    );
}

#[tokio::test]
async fn lookups_and_deletion() {
    let app = test_app();
    let (_, body) = book(&app, booking_payload()).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Fetch by id.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/appointments/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["id"], id.as_str());

    // Unknown id is a 404.
    let response = app
        .clone()
        .oneshot(get("/api/appointments/APT0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Appointment not found");

    // Search by phone.
    let response = app
        .clone()
        .oneshot(get("/api/appointments/search/0712345678"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["count"], 1);

    let response = app
        .clone()
        .oneshot(get("/api/appointments/search/0700000000"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));

    // Delete, then the listing is empty again.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/appointments/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Appointment deleted successfully");

    let response = app.clone().oneshot(get("/api/appointments")).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn today_filter_only_matches_the_current_date() {
    let app = test_app();
    book(&app, booking_payload()).await;

    let mut today_booking = booking_payload();
    today_booking["date"] = json!(chrono::Utc::now().format("%Y-%m-%d").to_string());
    today_booking["time"] = json!("09:00");
    today_booking["phone"] = json!("0698765432");
    let (status, _) = book(&app, today_booking).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get("/api/appointments/today"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["time"], "09:00");
}

#[tokio::test]
async fn stats_and_health_report_live_counts() {
    let app = test_app();
    let (_, body) = book(&app, booking_payload()).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let mut second = booking_payload();
    second["time"] = json!("10:00");
    book(&app, second).await;

    app.clone()
        .oneshot(with_json(
            "PUT",
            &format!("/api/appointments/{id}/status"),
            json!({"status": "confirmed"}),
        ))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["totalAppointments"], 2);
    assert_eq!(body["data"]["pending"], 1);
    assert_eq!(body["data"]["confirmed"], 1);
    assert_eq!(body["data"]["completed"], 0);
    assert_eq!(body["data"]["cancelled"], 0);
    assert_eq!(body["data"]["totalPatients"], 1);
    assert_eq!(body["data"]["totalDoctors"], 6);

    let response = app.clone().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Hospital Appointment System");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["appointments"], 2);
    assert_eq!(body["patients"], 1);
}

#[tokio::test]
async fn availability_for_an_unknown_doctor_is_not_found() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get("/api/availability/99/2025-06-10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Doctor not found");
}
