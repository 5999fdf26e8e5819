use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_auth, security_headers_middleware, trace_id,
};
use crate::routes::{
    attendance, auth, dormitories, health, rooms, schedules, students, unknown_rfids, users,
};
use shared::jwt::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
}

/// Builds the application router from configuration, constructing the JWT
/// keys from the configured PEM pair.
pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let jwt = JwtKeys::new(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )
    .map_err(|e| anyhow::anyhow!("invalid JWT key configuration: {}", e))?;

    let state = AppState {
        pool,
        config: Arc::new(config),
        jwt: Arc::new(jwt),
    };
    Ok(create_router(state))
}

/// Assembles the router over a prepared state. Split out so tests can
/// supply symmetric test keys instead of an RSA pair.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.server.request_timeout_secs;

    // Everything behind JWT auth.
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        // Accounts
        .route("/api/v1/users", post(users::create).get(users::list))
        .route("/api/v1/users/:id", get(users::get).delete(users::delete))
        .route("/api/v1/users/:id/role", put(users::update_role))
        // Dormitories
        .route(
            "/api/v1/dormitories",
            post(dormitories::create).get(dormitories::list),
        )
        .route(
            "/api/v1/dormitories/:id",
            get(dormitories::get)
                .put(dormitories::update)
                .delete(dormitories::delete),
        )
        // Rooms
        .route("/api/v1/rooms", post(rooms::create).get(rooms::list))
        .route(
            "/api/v1/rooms/:id",
            get(rooms::get).put(rooms::update).delete(rooms::delete),
        )
        // Students
        .route(
            "/api/v1/students",
            post(students::create).get(students::list),
        )
        .route(
            "/api/v1/students/:id",
            get(students::get)
                .put(students::update)
                .delete(students::delete),
        )
        // Schedules and device assignment
        .route(
            "/api/v1/schedules",
            post(schedules::create).get(schedules::list),
        )
        .route(
            "/api/v1/schedules/:id",
            get(schedules::get)
                .put(schedules::update)
                .delete(schedules::delete),
        )
        .route(
            "/api/v1/schedules/:id/devices",
            post(schedules::assign_devices).get(schedules::list_devices),
        )
        // Attendance
        .route(
            "/api/v1/attendance",
            post(attendance::create).get(attendance::list),
        )
        .route(
            "/api/v1/attendance/student/:id",
            get(attendance::list_for_student),
        )
        .route("/api/v1/attendance/:id", put(attendance::update))
        .route("/api/v1/attendance/rfid-scan", post(attendance::rfid_scan))
        .route("/api/v1/attendance/rfid-logs", get(attendance::rfid_logs))
        // Unknown-tag ledger
        .route("/api/v1/unknown-rfids", get(unknown_rfids::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(CompressionLayer::new())
        .with_state(state)
}
