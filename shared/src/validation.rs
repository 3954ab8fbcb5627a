//! Input validation functions
//!
//! This module provides validation utilities for user input.

use std::sync::OnceLock;

/// Longest password bcrypt will consider; longer input would be truncated
pub const MAX_PASSWORD_BYTES: usize = 72;

fn email_regex() -> &'static regex_lite::Regex {
    static EMAIL_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate a password before it is hashed
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a required search term from a query string
pub fn validate_search_term<'a>(param: &str, value: Option<&'a str>) -> Result<&'a str, String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("Query parameter '{}' is required", param)),
    }
}
