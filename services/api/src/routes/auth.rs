//! Registration, login and profile handlers

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::user::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateProfileRequest},
    state::AppState,
    validation::{normalize_email, validate_profile_update, validate_registration},
};

const DUPLICATE_EMAIL: &str = "User with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let new_user = validate_registration(payload).map_err(ApiError::BadRequest)?;
    info!("Registration attempt for {}", new_user.email);

    let existing = state
        .user_repository
        .find_by_email(&new_user.email)
        .await
        .map_err(ApiError::internal("Registration failed. Please try again."))?;
    if existing.is_some() {
        return Err(ApiError::BadRequest(DUPLICATE_EMAIL.to_string()));
    }

    // A concurrent registration can still win the race; the unique key catches it.
    let user = state
        .user_repository
        .create(&new_user)
        .await
        .map_err(ApiError::internal("Registration failed. Please try again."))?
        .ok_or_else(|| ApiError::BadRequest(DUPLICATE_EMAIL.to_string()))?;

    let token = state
        .jwt_service
        .generate_token(user.id, &user.email)
        .map_err(ApiError::internal("Registration failed. Please try again."))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Registration successful".to_string(),
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let (Some(email), Some(password)) = (
        payload.email.as_deref().map(normalize_email).filter(|e| !e.is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "Please provide email and password".to_string(),
        ));
    };

    if !state.login_limiter.is_allowed(&email).await {
        return Err(ApiError::TooManyRequests(
            "Too many failed login attempts. Please try again later.".to_string(),
        ));
    }

    let user = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(ApiError::internal("Login failed. Please try again."))?;

    let verified = match &user {
        Some(user) => state
            .user_repository
            .verify_password(user, &password)
            .await
            .map_err(ApiError::internal("Login failed. Please try again."))?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        warn!("Failed login for {}", email);
        state.login_limiter.record_failure(&email).await;
        return Err(ApiError::BadRequest(INVALID_CREDENTIALS.to_string()));
    };

    state.login_limiter.reset(&email).await;

    let token = state
        .jwt_service
        .generate_token(user.id, &user.email)
        .map_err(ApiError::internal("Login failed. Please try again."))?;

    info!("User {} logged in", user.id);

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}

/// Current user's profile with stats and rank
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .user_repository
        .find_profile(auth.id)
        .await
        .map_err(ApiError::internal("Failed to fetch profile"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "user": profile,
    })))
}

/// Update the current user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let update = validate_profile_update(payload).map_err(ApiError::BadRequest)?;

    let updated = state
        .user_repository
        .update_profile(auth.id, &update)
        .await
        .map_err(ApiError::internal("Failed to update profile"))?;

    if !updated {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
    })))
}
