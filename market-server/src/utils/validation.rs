//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::error::AppError;
use shared::models::PackageTerms;
use rust_decimal::Decimal;

use crate::orders::traits::OrderError;

// ── Text length limits ──────────────────────────────────────────────

/// Gig titles
pub const MAX_GIG_TITLE_LEN: usize = 80;

/// Gig descriptions
pub const MAX_GIG_DESCRIPTION_LEN: usize = 1200;

/// Usernames, subcategories, package titles, tags
pub const MAX_NAME_LEN: usize = 100;

/// Delivery messages, revision requests, cancel reasons, requirement answers
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Review comments
pub const MAX_REVIEW_LEN: usize = 500;

/// URLs / file references
pub const MAX_URL_LEN: usize = 2048;

/// Attachments per delivery
pub const MAX_FILES: usize = 20;

/// Tags per gig
pub const MAX_TAGS: usize = 10;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate every entry of an optional list against a length limit.
pub fn validate_text_list(
    values: &[String],
    field: &str,
    max_items: usize,
    max_len: usize,
) -> Result<(), AppError> {
    if values.len() > max_items {
        return Err(AppError::validation(format!(
            "{field} has too many entries ({}, max {max_items})",
            values.len()
        )));
    }
    for value in values {
        validate_required_text(value, field, max_len)?;
    }
    Ok(())
}

/// Package tier: titled, described, positive price, delivery of at least a day
pub fn validate_package(terms: &PackageTerms, tier: &str) -> Result<(), AppError> {
    validate_required_text(&terms.title, &format!("{tier}.title"), MAX_NAME_LEN)?;
    validate_required_text(
        &terms.description,
        &format!("{tier}.description"),
        MAX_GIG_DESCRIPTION_LEN,
    )?;
    if terms.price <= Decimal::ZERO {
        return Err(AppError::new(shared::error::ErrorCode::GigInvalidPrice)
            .with_detail("package", tier.to_string()));
    }
    if terms.delivery_time == 0 {
        return Err(AppError::validation(format!(
            "{tier}.delivery_time must be at least 1 day"
        )));
    }
    Ok(())
}

// ── Validation helpers (Order actions) ──────────────────────────────

/// Validate a required string for order actions (non-empty + max length).
pub fn validate_order_text(value: &str, field: &str, max_len: usize) -> Result<(), OrderError> {
    if value.trim().is_empty() {
        return Err(OrderError::InvalidInput(format!("{field} must not be empty")));
    }
    validate_order_optional_text(value, field, max_len)
}

/// Validate a string that may be empty for order actions (max length only).
pub fn validate_order_optional_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> Result<(), OrderError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(OrderError::InvalidInput(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate attachment references for deliveries and requirement answers
pub fn validate_order_files(files: &[String]) -> Result<(), OrderError> {
    if files.len() > MAX_FILES {
        return Err(OrderError::InvalidInput(format!(
            "too many files ({}, max {MAX_FILES})",
            files.len()
        )));
    }
    for file in files {
        validate_order_text(file, "file", MAX_URL_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Logo", "title", 80).is_ok());
        assert!(validate_required_text("   ", "title", 80).is_err());
        assert!(validate_required_text(&"x".repeat(81), "title", 80).is_err());
        // counted in characters, not bytes
        assert!(validate_required_text(&"é".repeat(80), "title", 80).is_ok());
    }

    #[test]
    fn test_package_rules() {
        let mut terms = PackageTerms {
            title: "Basic".to_string(),
            description: "One concept".to_string(),
            price: Decimal::from(10),
            delivery_time: 1,
            revisions: 0,
            features: vec![],
        };
        assert!(validate_package(&terms, "basic").is_ok());
        terms.delivery_time = 0;
        assert!(validate_package(&terms, "basic").is_err());
        terms.delivery_time = 2;
        terms.price = Decimal::ZERO;
        let err = validate_package(&terms, "basic").unwrap_err();
        assert_eq!(err.code, shared::error::ErrorCode::GigInvalidPrice);
    }

    #[test]
    fn test_order_text() {
        assert!(matches!(
            validate_order_text("", "message", 10),
            Err(OrderError::InvalidInput(_))
        ));
        assert!(validate_order_optional_text("", "comment", 10).is_ok());
        assert!(validate_order_optional_text("12345678901", "comment", 10).is_err());
        assert!(validate_order_files(&vec!["a.png".to_string(); MAX_FILES + 1]).is_err());
    }
}
