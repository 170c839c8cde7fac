//! Input validation utilities
//!
//! Every check runs before the database is touched. Messages are returned
//! verbatim to the client.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{
    survey::{
        CreateSurveyRequest, DEFAULT_ESTIMATED_TIME, NewQuestion, NewResponse, NewSurvey,
        QuestionType, SubmitResponseRequest,
    },
    user::{NewUser, ProfileDetails, ProfileUpdate, RegisterRequest, UpdateProfileRequest},
};

pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_NAME_LENGTH: usize = 50;
const MAX_TITLE_LENGTH: usize = 200;
const MAX_CATEGORY_LENGTH: usize = 50;
const MAX_DETAIL_LENGTH: usize = 100;

/// Trimmed, non-empty value of an optional text field
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lowercased, trimmed form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 100 {
        return Err("Email must be at most 100 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a new password against its confirmation
pub fn validate_password(password: &str, confirm_password: Option<&str>) -> Result<(), String> {
    if confirm_password != Some(password) {
        return Err("Passwords do not match".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at most {} characters long",
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

fn validate_names(first_name: &str, last_name: &str) -> Result<(), String> {
    if first_name.chars().count() > MAX_NAME_LENGTH || last_name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Names must be at most {} characters long",
            MAX_NAME_LENGTH
        ));
    }
    Ok(())
}

fn validate_details(details: &ProfileDetails) -> Result<(), String> {
    let too_long = |value: &Option<String>| {
        value
            .as_deref()
            .is_some_and(|v| v.chars().count() > MAX_DETAIL_LENGTH)
    };

    if too_long(&details.institution) {
        return Err(format!(
            "Institution must be at most {} characters long",
            MAX_DETAIL_LENGTH
        ));
    }

    if too_long(&details.field_of_study) {
        return Err(format!(
            "Field of study must be at most {} characters long",
            MAX_DETAIL_LENGTH
        ));
    }

    validate_graduation_year(details.graduation_year)
}

fn validate_graduation_year(year: Option<i32>) -> Result<(), String> {
    match year {
        Some(year) if !(1900..=2100).contains(&year) => {
            Err("Graduation year must be between 1900 and 2100".to_string())
        }
        _ => Ok(()),
    }
}

/// Check a registration form and turn it into a [`NewUser`]
pub fn validate_registration(payload: RegisterRequest) -> Result<NewUser, String> {
    let (Some(first_name), Some(last_name), Some(email)) = (
        present(payload.first_name),
        present(payload.last_name),
        present(payload.email),
    ) else {
        return Err("Please fill in all required fields".to_string());
    };
    let Some(password) = payload.password.filter(|p| !p.is_empty()) else {
        return Err("Please fill in all required fields".to_string());
    };

    validate_password(&password, payload.confirm_password.as_deref())?;

    let email = normalize_email(&email);
    validate_email(&email)?;
    validate_names(&first_name, &last_name)?;

    let details = ProfileDetails {
        date_of_birth: payload.date_of_birth,
        institution: present(payload.institution),
        field_of_study: present(payload.field_of_study),
        academic_level: payload.academic_level,
        graduation_year: payload.graduation_year,
    };
    validate_details(&details)?;

    Ok(NewUser {
        first_name,
        last_name,
        email,
        password,
        details,
    })
}

/// Check a profile form and turn it into a [`ProfileUpdate`]
pub fn validate_profile_update(payload: UpdateProfileRequest) -> Result<ProfileUpdate, String> {
    let (Some(first_name), Some(last_name)) =
        (present(payload.first_name), present(payload.last_name))
    else {
        return Err("First name and last name are required".to_string());
    };

    validate_names(&first_name, &last_name)?;

    let details = ProfileDetails {
        date_of_birth: payload.date_of_birth,
        institution: present(payload.institution),
        field_of_study: present(payload.field_of_study),
        academic_level: payload.academic_level,
        graduation_year: payload.graduation_year,
    };
    validate_details(&details)?;

    Ok(ProfileUpdate {
        first_name,
        last_name,
        details,
    })
}

/// Check a survey builder submission and turn it into a [`NewSurvey`]
pub fn validate_new_survey(payload: CreateSurveyRequest) -> Result<NewSurvey, String> {
    let (Some(title), Some(description), Some(category), Some(questions)) = (
        present(payload.title),
        present(payload.description),
        present(payload.category),
        payload.questions.filter(|q| !q.is_empty()),
    ) else {
        return Err(
            "Please fill in all required fields and add at least one question".to_string(),
        );
    };

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title must be at most {} characters long",
            MAX_TITLE_LENGTH
        ));
    }

    if category.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(format!(
            "Category must be at most {} characters long",
            MAX_CATEGORY_LENGTH
        ));
    }

    let estimated_time = payload.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME);
    if estimated_time <= 0 {
        return Err("Estimated time must be a positive number of minutes".to_string());
    }

    let questions = questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| {
            let number = index + 1;
            let text = present(question.question)
                .ok_or_else(|| format!("Question {} has no text", number))?;
            let question_type: QuestionType = question
                .question_type
                .as_deref()
                .unwrap_or_default()
                .parse()
                .map_err(|e| format!("Question {}: {}", number, e))?;
            let options: Vec<String> = question
                .options
                .unwrap_or_default()
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();

            if question_type.has_choices() && options.is_empty() {
                return Err(format!("Question {} needs at least one option", number));
            }

            Ok(NewQuestion {
                text,
                question_type,
                options,
                required: question.required.unwrap_or(true),
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(NewSurvey {
        title,
        description,
        category,
        estimated_time,
        questions,
    })
}

/// Check a survey submission and turn it into a [`NewResponse`]
pub fn validate_submission(payload: SubmitResponseRequest) -> Result<NewResponse, String> {
    let Some(responses) = payload.responses.filter(|r| !r.is_null()) else {
        return Err("Please provide your survey responses".to_string());
    };

    let time_spent = payload.time_spent.unwrap_or(0);
    if time_spent < 0 {
        return Err("Time spent cannot be negative".to_string());
    }

    if let Some(rating) = payload.rating {
        if !(1..=5).contains(&rating) {
            return Err("Rating must be between 1 and 5".to_string());
        }
    }

    Ok(NewResponse {
        responses,
        time_spent,
        rating: payload.rating,
    })
}
