//! Contact form types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sanitized form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub service: String,
    pub company_size: String,
    /// Preferred contact channel
    pub preference: String,
    pub message: String,
}

/// Request metadata kept with a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// An accepted contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: String,
    pub received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub form: ContactForm,
    #[serde(default)]
    pub meta: SubmissionMeta,
}

impl ContactSubmission {
    /// Stamp a validated form with a fresh id and the current time
    pub fn new(form: ContactForm, user_agent: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            received_at: Utc::now(),
            form,
            meta: SubmissionMeta { user_agent },
        }
    }
}

/// Body of a `201` answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: String,
}
