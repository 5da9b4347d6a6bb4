//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Product and order names
pub const MAX_NAME_LEN: usize = 150;

/// Product and order descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length
/// limit. Limits count characters, not bytes.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let chars = value.chars().count();
    if chars > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({chars} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that a field was supplied at all, then apply the required-text
/// rules. Returns the owned value for convenience.
pub fn require_text(value: Option<&str>, field: &str, max_len: usize) -> Result<String, AppError> {
    let v = value.ok_or_else(|| AppError::validation(format!("{field} is required")))?;
    validate_required_text(v, field, max_len)?;
    Ok(v.to_string())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value {
        let chars = v.chars().count();
        if chars > max_len {
            return Err(AppError::validation(format!(
                "{field} is too long ({chars} chars, max {max_len})"
            )));
        }
    }
    Ok(())
}

/// Validate that a numeric amount is finite and non-negative.
pub fn validate_non_negative(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}
