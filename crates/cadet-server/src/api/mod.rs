use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use cadet_store::Store;

use crate::config::ServerConfig;
use crate::session::SessionStore;

mod auth;
mod bookings;
mod dashboard;
mod directory;
mod flight_logs;
mod messages;
mod milestones;


#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub sessions: SessionStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Store, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            sessions: SessionStore::new(config.session_ttl_secs),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Cookies need credentialed CORS, which rules out wildcard origins.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(600));

    Router::new()
        .route("/health", get(health_check))
        .route("/info", get(server_info))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Directory
        .route("/api/users/instructors", get(directory::instructors))
        .route("/api/aircraft", get(directory::aircraft))
        .route("/api/instructor/students", get(directory::my_students))
        // Bookings
        .route("/api/bookings", post(bookings::create))
        .route("/api/bookings/student", get(bookings::for_student))
        .route("/api/bookings/instructor", get(bookings::for_instructor))
        .route("/api/bookings/:id/status", patch(bookings::update_status))
        // Flight logs
        .route(
            "/api/flightlogs",
            get(flight_logs::mine).post(flight_logs::create),
        )
        .route(
            "/api/flightlogs/student/:student_id",
            get(flight_logs::for_student),
        )
        .route("/api/flightlogs/:id/status", patch(flight_logs::update_status))
        // Milestones
        .route(
            "/api/milestones",
            get(milestones::mine).post(milestones::create),
        )
        .route(
            "/api/milestones/student/:student_id",
            get(milestones::for_student),
        )
        .route("/api/milestones/:id/progress", patch(milestones::update_progress))
        .route("/api/milestones/:id/complete", patch(milestones::complete))
        // Dashboards
        .route("/api/dashboard/student", get(dashboard::student))
        .route("/api/dashboard/instructor", get(dashboard::instructor))
        // Messages
        .route("/api/messages", post(messages::send))
        .route("/api/messages/contacts", get(messages::contacts))
        .route("/api/messages/read/:sender_id", patch(messages::mark_read))
        .route("/api/messages/:contact_id", get(messages::conversation))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfoResponse {
    name: String,
    version: &'static str,
    registration_open: bool,
    strict_transitions: bool,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: state.config.instance_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        registration_open: state.config.registration_open,
        strict_transitions: state.config.strict_transitions,
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
