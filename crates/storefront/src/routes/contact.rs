//! Contact form route handlers.
//!
//! Messages are write-only from the public side: they land in the
//! `contacts` collection with status `new` and only admin reads them.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sockshop_core::{ContactStatus, NewContactMessage};

use crate::checkout::validate::{ValidationErrors, is_valid_email, is_valid_phone};
use crate::error::Result;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub comment: String,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

/// Submit a contact message.
///
/// POST /contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let errors = validate(&form);
    if !errors.is_empty() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ContactResponse {
                success: false,
                message: Some("Please fix the highlighted fields".to_string()),
                fields: Some(errors),
            }),
        ));
    }

    let message = NewContactMessage {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        phone: form.phone.trim().to_string(),
        comment: form.comment.trim().to_string(),
        status: ContactStatus::New,
    };

    state.docstore().create_contact(&message).await?;

    tracing::info!("contact message submitted");
    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: None,
            fields: None,
        }),
    ))
}

/// Same email/phone rules as checkout.
fn validate(form: &ContactForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if form.comment.trim().is_empty() {
        errors.push("comment", "Message is required");
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.push("email", "Please enter a valid email address");
    }

    let phone = form.phone.trim();
    if phone.is_empty() {
        errors.push("phone", "Phone number is required");
    } else if !is_valid_phone(phone) {
        errors.push("phone", "Phone must be 11 digits starting with 09");
    }

    errors
}
