//! HTML pages and static assets from the public directory

use axum::{
    Router,
    extract::{Request, State},
    handler::Handler,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;

use crate::state::AppState;

const PAGES: [(&str, &str); 7] = [
    ("/", "index.html"),
    ("/login", "login.html"),
    ("/register", "register.html"),
    ("/dashboard", "dashboard.html"),
    ("/profile", "profile.html"),
    ("/create-survey", "create-survey.html"),
    ("/survey/:id", "survey.html"),
];

const FALLBACK_NOT_FOUND: &str =
    "<!DOCTYPE html><html><head><title>Not Found</title></head><body><h1>Page not found</h1></body></html>";

/// Page routes plus a static-file fallback
pub fn router(state: &AppState) -> Router<AppState> {
    let mut router = Router::new();
    for (path, file) in PAGES {
        router = router.route(
            path,
            get(move |State(state): State<AppState>, request: Request| async move {
                serve_page(&state.public_dir, file, request).await
            }),
        );
    }

    let assets = ServeDir::new(&state.public_dir).fallback(not_found.with_state(state.clone()));
    router.fallback_service(assets)
}

async fn serve_page(public_dir: &Path, file: &str, request: Request) -> Response {
    match ServeFile::new(public_dir.join(file)).try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => {
            debug!("Page {} is missing", file);
            not_found_page(public_dir).await
        }
        Err(e) => {
            debug!("Page {} unavailable: {}", file, e);
            not_found_page(public_dir).await
        }
    }
}

async fn not_found(State(state): State<AppState>) -> Response {
    not_found_page(&state.public_dir).await
}

async fn not_found_page(public_dir: &Path) -> Response {
    let body = tokio::fs::read_to_string(public_dir.join("404.html"))
        .await
        .unwrap_or_else(|_| FALLBACK_NOT_FOUND.to_string());

    (StatusCode::NOT_FOUND, Html(body)).into_response()
}
