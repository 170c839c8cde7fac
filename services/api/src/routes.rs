//! API service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::MAX_BODY_BYTES, error::ApiError, middleware::auth_middleware, state::AppState,
};

pub mod auth;
pub mod pages;
pub mod surveys;

/// Create the router for the survey service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/auth/profile",
            get(auth::get_profile)
                .put(auth::update_profile)
                .fallback(api_not_found),
        )
        .route(
            "/surveys",
            get(surveys::list_surveys)
                .post(surveys::create_survey)
                .fallback(api_not_found),
        )
        .route(
            "/surveys/:id",
            get(surveys::get_survey).fallback(api_not_found),
        )
        .route(
            "/surveys/:id/responses",
            post(surveys::submit_response).fallback(api_not_found),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // A known path with an unsupported method answers like an unknown path.
    let api_routes = Router::new()
        .route("/health", get(health_check).fallback(api_not_found))
        .route("/auth/register", post(auth::register).fallback(api_not_found))
        .route("/auth/login", post(auth::login).fallback(api_not_found))
        .merge(protected_routes)
        .fallback(api_not_found);

    Router::new()
        .nest("/api", api_routes)
        .merge(pages::router(&state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let connected = common::database::health_check(&state.db_pool).await;

    Json(json!({
        "success": true,
        "status": "Server is running",
        "database": if connected { "Connected" } else { "Disconnected" },
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("API endpoint not found".to_string())
}
