//! Survey, question and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;

use super::lenient_option;

/// Points credited for every accepted response
pub const POINTS_PER_RESPONSE: i32 = 50;

/// Estimated completion time used when the author gives none
pub const DEFAULT_ESTIMATED_TIME: i32 = 5;

/// Kind of answer a question expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    Text,
    Rating,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Text => "text",
            QuestionType::Rating => "rating",
        }
    }

    /// Whether answers are picked from the option list
    pub fn has_choices(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-choice" => Ok(QuestionType::SingleChoice),
            "multiple-choice" => Ok(QuestionType::MultipleChoice),
            "text" => Ok(QuestionType::Text),
            "rating" => Ok(QuestionType::Rating),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}

/// Query parameters for survey listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl SurveyQuery {
    /// Category filter; blank or `all` disables it
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    /// Free-text filter over title and description
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Survey row as listed on the dashboard
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SurveySummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub estimated_time: i32,
    pub thumbnail: Option<String>,
    pub created_by: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub participants: i64,
    pub average_rating: Option<f64>,
    pub completed: bool,
}

/// Survey row with author names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub estimated_time: i32,
    pub thumbnail: Option<String>,
    pub created_by: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub question_text: String,
    pub question_type: String,
    #[sqlx(json)]
    pub options: Vec<String>,
    pub is_required: bool,
    pub question_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A survey with its ordered questions, as seen by one user
#[derive(Debug, Clone, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<Question>,
    pub completed: bool,
}

/// Question as submitted by the survey builder
#[derive(Debug, Default, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, rename = "type")]
    pub question_type: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: Option<bool>,
}

/// Request for survey creation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub estimated_time: Option<i32>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionRequest>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub required: bool,
}

/// Validated survey, questions in display order
#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
    pub description: String,
    pub category: String,
    pub estimated_time: i32,
    pub questions: Vec<NewQuestion>,
}

/// Request for a survey submission
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    #[serde(default)]
    pub responses: Option<Value>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub time_spent: Option<i32>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub rating: Option<i32>,
}

/// Validated survey submission
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub responses: Value,
    pub time_spent: i32,
    pub rating: Option<i32>,
}
