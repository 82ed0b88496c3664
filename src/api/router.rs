use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin_guests, checkin, health, rsvp, workshop};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Guest RSVP flow
        .route("/api/rsvp/{token}", get(rsvp::get_guest).post(rsvp::submit_rsvp))
        .route("/api/workshops/availability", get(workshop::availability))

        // Check-in stations
        .route("/api/scan", post(checkin::scan_main))
        .route("/api/workshops/{activity}/scan", post(workshop::scan_workshop))

        // Admin provisioning
        .route("/api/admin/guests", get(admin_guests::list_guests).post(admin_guests::create_guest))
        .route("/api/admin/guests/import", post(admin_guests::import_guests))
        .route("/api/admin/guests/{id}", get(admin_guests::get_guest))
        .route("/api/admin/guests/{id}/qr", get(admin_guests::issue_qr))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
