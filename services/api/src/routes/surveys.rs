//! Survey listing, creation and submission handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::survey::{CreateSurveyRequest, SubmitResponseRequest, SurveyQuery},
    state::AppState,
    validation::{validate_new_survey, validate_submission},
};

/// Published surveys, optionally filtered by category and search text
pub async fn list_surveys(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<SurveyQuery>,
) -> ApiResult<impl IntoResponse> {
    let surveys = state
        .survey_repository
        .list(auth.id, &query)
        .await
        .map_err(ApiError::internal("Failed to fetch surveys"))?;

    Ok(Json(json!({
        "success": true,
        "surveys": surveys,
    })))
}

/// One survey with its ordered questions
pub async fn get_survey(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let survey = state
        .survey_repository
        .find_by_id(id, auth.id)
        .await
        .map_err(ApiError::internal("Failed to fetch survey"))?
        .ok_or_else(|| ApiError::NotFound("Survey not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "survey": survey,
    })))
}

/// Create a survey owned by the caller
pub async fn create_survey(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateSurveyRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let new_survey = validate_new_survey(payload).map_err(ApiError::BadRequest)?;
    info!("{} is publishing survey '{}'", auth.email, new_survey.title);

    let survey_id = state
        .survey_repository
        .create(&new_survey, auth.id)
        .await
        .map_err(ApiError::internal("Failed to create survey"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Survey created successfully",
            "surveyId": survey_id,
        })),
    ))
}

/// Submit the caller's answers to a survey
pub async fn submit_response(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<SubmitResponseRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let response = validate_submission(payload).map_err(ApiError::BadRequest)?;
    let already_completed = || ApiError::BadRequest("You have already completed this survey".to_string());

    let completed = state
        .survey_repository
        .has_user_completed(id, auth.id)
        .await
        .map_err(ApiError::internal("Failed to submit response"))?;
    if completed {
        return Err(already_completed());
    }

    let exists = state
        .survey_repository
        .exists(id)
        .await
        .map_err(ApiError::internal("Failed to submit response"))?;
    if !exists {
        return Err(ApiError::NotFound("Survey not found".to_string()));
    }

    let points_earned = state
        .survey_repository
        .submit_response(id, auth.id, &response)
        .await
        .map_err(ApiError::internal("Failed to submit response"))?
        .ok_or_else(already_completed)?;

    Ok(Json(json!({
        "success": true,
        "message": "Response submitted successfully",
        "pointsEarned": points_earned,
    })))
}
