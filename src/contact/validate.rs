//! Server-side sanitizing and validation of contact payloads

use super::types::ContactForm;
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Longest accepted field, in characters
pub const MAX_FIELD_LEN: usize = 2000;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Trim, drop HTML tags, cap at [`MAX_FIELD_LEN`] characters
pub fn sanitize(value: &str) -> String {
    HTML_TAG
        .replace_all(value.trim(), "")
        .chars()
        .take(MAX_FIELD_LEN)
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Sanitized string field; anything that is not a JSON string reads as empty
fn field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .map(sanitize)
        .unwrap_or_default()
}

/// Sanitize every field of a raw JSON body
pub fn sanitize_form(body: &Value) -> ContactForm {
    ContactForm {
        name: field(body, "name"),
        email: field(body, "email"),
        service: field(body, "service"),
        company_size: field(body, "companySize"),
        preference: field(body, "preference"),
        message: field(body, "message"),
    }
}

/// First rule the form breaks, as a [`Error::Validation`]
pub fn validate(form: &ContactForm) -> Result<()> {
    if form.name.chars().count() < 2 {
        return Err(Error::validation("Name must be at least 2 characters."));
    }
    if !is_valid_email(&form.email) {
        return Err(Error::validation("A valid email address is required."));
    }
    if form.message.chars().count() < 10 {
        return Err(Error::validation("Message must be at least 10 characters."));
    }
    Ok(())
}

/// Sanitize then validate
pub fn parse_form(body: &Value) -> Result<ContactForm> {
    let form = sanitize_form(body);
    validate(&form)?;
    Ok(form)
}
