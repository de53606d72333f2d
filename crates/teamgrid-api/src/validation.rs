//! Input validation utilities for Teamgrid API
//!
//! This module provides validation functions for API requests.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use validator::ValidationError;

/// Maximum length for name fields (customer, project, member, milestone)
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for comment fields
pub const MAX_COMMENT_LENGTH: usize = 1024;

/// Maximum length for email fields
pub const MAX_EMAIL_LENGTH: usize = 320;

/// Maximum number of days accepted by a single batch or query
pub const MAX_RANGE_DAYS: i64 = 1000;

static COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("invalid color regex"));

/// Validate a name field
///
/// Names must:
/// - Not be empty or whitespace-only
/// - Not exceed MAX_NAME_LENGTH characters
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name_empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::new("name_too_long"));
    }
    Ok(())
}

/// Validate an optional comment field
pub fn validate_comment(comment: &str) -> Result<(), ValidationError> {
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::new("comment_too_long"));
    }
    Ok(())
}

/// Validate an email address
///
/// A light structural check; deliverability is not this layer's concern.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::new("email_invalid"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::new("email_invalid"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::new("email_invalid"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("email_invalid"));
    }
    Ok(())
}

/// Validate a project display color (`#RRGGBB`)
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if !COLOR_REGEX.is_match(color) {
        return Err(ValidationError::new("color_invalid"));
    }
    Ok(())
}

/// Validate an inclusive date range
///
/// The range must be ordered and span no more than MAX_RANGE_DAYS days.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start > end {
        return Err(ValidationError::new("date_range_inverted"));
    }
    if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
        return Err(ValidationError::new("date_range_too_long"));
    }
    Ok(())
}
