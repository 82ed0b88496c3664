use rsvp_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::{CapacityRepository, EmailService},
    error::AppError,
    infra::repositories::{
        sqlite_capacity_repo::SqliteCapacityRepo,
        sqlite_checkin_repo::SqliteCheckinRepo,
        sqlite_guest_repo::SqliteGuestRepo,
    },
    state::AppState,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use tera::Tera;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const QR_SECRET: &str = "test-qr-secret";

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Default)]
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<RecordingEmailService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_capacity("leather:1630=2,leather:1700=2,perfume:1630=2,perfume:1700=2").await
    }

    pub async fn with_capacity(capacity: &str) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "confirmation.html",
            "<html>Confirmation for {{ guest_name }}: <img src=\"{{ qr_image_url }}\"/></html>",
        )
        .unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            qr_secret: QR_SECRET.to_string(),
            qr_max_age_days: 30,
            admin_api_token: ADMIN_TOKEN.to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            event_name: "Test Gala".to_string(),
            event_date: "2026-09-01".to_string(),
            event_venue: "Test Hall".to_string(),
            rsvp_base_url: "http://localhost/rsvp".to_string(),
            workshop_capacity: capacity.to_string(),
        };

        let email = Arc::new(RecordingEmailService::default());

        let state = Arc::new(AppState {
            config: config.clone(),
            guest_repo: Arc::new(SqliteGuestRepo::new(pool.clone())),
            capacity_repo: Arc::new(SqliteCapacityRepo::new(pool.clone())),
            checkin_repo: Arc::new(SqliteCheckinRepo::new(pool.clone())),
            email_service: email.clone(),
            templates,
        });

        state
            .capacity_repo
            .seed(&config.workshop_capacities())
            .await
            .expect("Failed to seed capacity ledger");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
        }
    }

    /// Provisions a guest through the admin API, returning `(id, token)`.
    #[allow(dead_code)]
    pub async fn create_guest(&self, name: &str, email: &str) -> (String, String) {
        let payload = serde_json::json!({
            "name": name,
            "email": email,
            "invite_type": "named",
            "category": "tier-b"
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/guests")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response.status().is_success(),
            "Guest provisioning failed in test helper: status {}",
            response.status()
        );

        let body = parse_body(response).await;
        (
            body["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::empty())
        .unwrap()
}
