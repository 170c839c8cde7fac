//! End-to-end flow against a real PostgreSQL database
//!
//! Ignored by default; run with `DATABASE_URL=... cargo test -- --ignored`.

use api::{
    jwt::{JwtConfig, JwtService},
    routes::create_router,
    state::AppState,
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{
    database::{DatabaseConfig, init_pool},
    schema::{create_schema, seed_sample_data},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = init_pool(&DatabaseConfig::from_env().unwrap()).await.unwrap();
    create_schema(&pool).await.unwrap();
    seed_sample_data(&pool).await.unwrap();

    let jwt = JwtService::new(JwtConfig {
        secret: "integration-test-secret".to_string(),
        token_expiry: 3600,
    })
    .unwrap();

    create_router(AppState::new(pool, jwt, PathBuf::from("public")))
}

async fn call(app: &Router, method: &str, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn unique_email(tag: &str) -> String {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{}-{}@example.com", tag, nonce)
}

/// Register a fresh account and return its token
async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/register",
        json!({
            "firstName": "Rank",
            "lastName": "Tester",
            "email": email,
            "password": "secret1",
            "confirmPassword": "secret1",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn profile(app: &Router, token: &str) -> Value {
    let (status, body) = call(app, "GET", "/api/auth/profile", Value::Null, Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    body["user"].clone()
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_register_create_answer_and_score() {
    let app = app().await;
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let email = format!("flow-{}@example.com", nonce);

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        json!({
            "firstName": "Flow",
            "lastName": "Tester",
            "email": email,
            "password": "secret1",
            "confirmPassword": "secret1",
            "academicLevel": "graduate",
            "graduationYear": "2027",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user"]["firstName"], "Flow");

    // Same email again, in a different case.
    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        json!({
            "firstName": "Flow",
            "lastName": "Again",
            "email": email.to_uppercase(),
            "password": "secret1",
            "confirmPassword": "secret1",
        }),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");

    let (status, body) = call(&app, "POST", "/api/auth/login", json!({"email": email, "password": "wrong-one"}), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = call(&app, "POST", "/api/auth/login", json!({"email": email, "password": "secret1"}), None).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "POST",
        "/api/surveys",
        json!({
            "title": format!("Flow survey {}", nonce),
            "description": "Checks ordering and scoring",
            "category": "Testing",
            "estimatedTime": 3,
            "questions": [
                {"question": "First?", "type": "single-choice", "options": ["Yes", "No"]},
                {"question": "Second?", "type": "text", "required": false},
                {"question": "Third?", "type": "rating"},
            ],
        }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let survey_id = body["surveyId"].as_i64().unwrap();

    let (status, body) = call(&app, "GET", &format!("/api/surveys/{}", survey_id), Value::Null, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let questions = body["survey"]["questions"].as_array().unwrap();
    let texts: Vec<&str> = questions.iter().map(|q| q["question_text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["First?", "Second?", "Third?"]);
    assert_eq!(questions[0]["options"], json!(["Yes", "No"]));
    assert_eq!(body["survey"]["completed"], false);

    let submission = json!({"responses": {"1": "Yes", "3": 4}, "timeSpent": 42, "rating": 5});
    let uri = format!("/api/surveys/{}/responses", survey_id);
    let (status, body) = call(&app, "POST", &uri, submission.clone(), Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["pointsEarned"], 50);

    let (status, body) = call(&app, "POST", &uri, submission, Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have already completed this survey");

    let (status, body) = call(&app, "GET", "/api/auth/profile", Value::Null, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["total_points"], 50);
    assert_eq!(body["user"]["surveys_completed"], 1);
    assert_eq!(body["user"]["academic_level"], "graduate");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = call(&app, "GET", "/api/surveys?category=testing&search=flow%20survey", Value::Null, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["surveys"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(survey_id))
        .expect("new survey is listed");
    assert_eq!(listed["participants"], 1);
    assert_eq!(listed["average_rating"], 5.0);
    assert_eq!(listed["completed"], true);

    let (status, _) = call(&app, "POST", "/api/surveys/999999999/responses", json!({"responses": {}}), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_profile_update_and_missing_survey() {
    let app = app().await;
    let token = register(&app, &unique_email("profile")).await;
    let before = profile(&app, &token).await;

    let (status, body) = call(
        &app,
        "PUT",
        "/api/auth/profile",
        json!({"firstName": "  ", "lastName": "Tester"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "First name and last name are required");

    let (status, body) = call(
        &app,
        "PUT",
        "/api/auth/profile",
        json!({
            "firstName": "Renamed",
            "lastName": "Tester",
            "institution": "Open University",
            "academicLevel": "phd",
            "graduationYear": 2030,
        }),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Profile updated successfully");

    let after = profile(&app, &token).await;
    assert_eq!(after["first_name"], "Renamed");
    assert_eq!(after["institution"], "Open University");
    assert_eq!(after["academic_level"], "phd");
    assert_eq!(after["graduation_year"], 2030);

    let updated_at = |user: &Value| -> DateTime<Utc> {
        user["updated_at"].as_str().unwrap().parse().unwrap()
    };
    assert!(updated_at(&after) > updated_at(&before));

    let (status, body) = call(&app, "GET", "/api/surveys/999999999", Value::Null, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Survey not found"}));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_tied_points_share_a_rank() {
    let app = app().await;
    let author = register(&app, &unique_email("author")).await;
    let other = register(&app, &unique_email("other")).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/surveys",
        json!({
            "title": "Rank survey",
            "description": "Both users answer it once",
            "category": "Testing",
            "questions": [{"question": "Ready?", "type": "text"}],
        }),
        Some(&author),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let uri = format!("/api/surveys/{}/responses", body["surveyId"].as_i64().unwrap());

    for token in [&author, &other] {
        let (status, body) = call(&app, "POST", &uri, json!({"responses": {"1": "yes"}}), Some(token)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let author_profile = profile(&app, &author).await;
    let other_profile = profile(&app, &other).await;
    assert_eq!(author_profile["total_points"], 50);
    assert_eq!(other_profile["total_points"], 50);
    assert_eq!(author_profile["rank"], other_profile["rank"]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_repeated_bad_logins_are_throttled() {
    let app = app().await;
    let email = unique_email("throttle");
    register(&app, &email).await;

    for _ in 0..5 {
        let (status, body) = call(&app, "POST", "/api/auth/login", json!({"email": email, "password": "wrong-one"}), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid email or password");
    }

    // Locked even with the right password.
    let (status, body) = call(&app, "POST", "/api/auth/login", json!({"email": email, "password": "secret1"}), None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
}
