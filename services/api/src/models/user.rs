//! User models and related payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

use super::lenient_option;

/// Academic level stored on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicLevel {
    Undergraduate,
    Graduate,
    Postgraduate,
    Phd,
    Other,
}

impl AcademicLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicLevel::Undergraduate => "undergraduate",
            AcademicLevel::Graduate => "graduate",
            AcademicLevel::Postgraduate => "postgraduate",
            AcademicLevel::Phd => "phd",
            AcademicLevel::Other => "other",
        }
    }
}

impl FromStr for AcademicLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "undergraduate" => Ok(AcademicLevel::Undergraduate),
            "graduate" => Ok(AcademicLevel::Graduate),
            "postgraduate" => Ok(AcademicLevel::Postgraduate),
            "phd" => Ok(AcademicLevel::Phd),
            "other" => Ok(AcademicLevel::Other),
            other => Err(format!("unknown academic level: {}", other)),
        }
    }
}

impl fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials row used for login
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Full profile with gamification counters and leaderboard rank
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub academic_level: Option<String>,
    pub graduation_year: Option<i32>,
    pub profile_picture: Option<String>,
    pub total_points: i32,
    pub surveys_completed: i32,
    pub current_streak: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rank: i64,
}

/// User summary returned alongside a token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Optional profile columns shared by registration and profile updates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDetails {
    pub date_of_birth: Option<NaiveDate>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub academic_level: Option<AcademicLevel>,
    pub graduation_year: Option<i32>,
}

/// Validated registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub details: ProfileDetails,
}

/// Validated profile update
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub details: ProfileDetails,
}

/// Request for user registration
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub academic_level: Option<AcademicLevel>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub graduation_year: Option<i32>,
}

/// Request for user login
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request for a profile update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub academic_level: Option<AcademicLevel>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub graduation_year: Option<i32>,
}

/// Response for registration and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}
