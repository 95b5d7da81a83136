//! Restful-booker replica: open reads, token-guarded writes.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pomar_suites::booker::{AuthRequest, Booking, PartialBooking};
use serde_json::{json, Value};

/// Token handed out for the admin account
pub const TOKEN: &str = "abc123";

#[derive(Default)]
struct Store {
    bookings: BTreeMap<u64, Booking>,
    next_id: u64,
}

type Shared = Arc<Mutex<Store>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.split(';').any(|c| c.trim() == format!("token={TOKEN}")))
}

async fn ping() -> Response {
    (StatusCode::CREATED, "Created").into_response()
}

async fn auth(Json(request): Json<AuthRequest>) -> Json<Value> {
    if request.username == "admin" && request.password == "password123" {
        Json(json!({ "token": TOKEN }))
    } else {
        Json(json!({ "reason": "Bad credentials" }))
    }
}

async fn create(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let Ok(booking) = serde_json::from_value::<Booking>(body) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    };
    let mut store = store.lock().unwrap();
    store.next_id += 1;
    let id = store.next_id;
    let _ = store.bookings.insert(id, booking.clone());
    Json(json!({ "bookingid": id, "booking": booking })).into_response()
}

async fn ids(State(store): State<Shared>) -> Json<Value> {
    let store = store.lock().unwrap();
    let ids: Vec<Value> = store.bookings.keys().map(|id| json!({ "bookingid": id })).collect();
    Json(Value::Array(ids))
}

async fn fetch(State(store): State<Shared>, Path(id): Path<u64>) -> Response {
    let store = store.lock().unwrap();
    match store.bookings.get(&id) {
        Some(booking) => Json(booking.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn replace(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(booking): Json<Booking>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }
    let mut store = store.lock().unwrap();
    match store.bookings.get_mut(&id) {
        Some(stored) => {
            *stored = booking.clone();
            Json(booking).into_response()
        }
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn patch(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(fields): Json<PartialBooking>,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }
    let mut store = store.lock().unwrap();
    match store.bookings.get_mut(&id) {
        Some(stored) => {
            *stored = fields.apply_to(stored);
            Json(stored.clone()).into_response()
        }
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn remove(State(store): State<Shared>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }
    let removed = store.lock().unwrap().bookings.remove(&id);
    match removed {
        Some(_) => (StatusCode::CREATED, "Created").into_response(),
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

/// Router answering the booker API
pub fn booker_api() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/auth", post(auth))
        .route("/booking", get(ids).post(create))
        .route("/booking/{id}", get(fetch).put(replace).patch(patch).delete(remove))
        .with_state(Shared::default())
}
