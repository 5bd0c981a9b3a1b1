//! Input validation
//!
//! Checks namespace names before a client is built and operation arguments
//! before any store round-trip, so both store modes reject the same inputs.

use thiserror::Error;

/// Validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{0} '{1}' is too long (max {2} bytes)")]
    TooLong(&'static str, String, usize),

    #[error("Invalid {0} '{1}': {2}")]
    InvalidName(&'static str, String, &'static str),

    #[error("Invalid {0} '{1}': {2}")]
    OutOfRange(&'static str, String, &'static str),
}

/// Maximum length for a database name
pub const MAX_DATABASE_NAME_LENGTH: usize = 64;

/// Maximum length for a full `database.collection` namespace
pub const MAX_NAMESPACE_LENGTH: usize = 255;

/// Characters MongoDB refuses in database names
const FORBIDDEN_DATABASE_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];

/// Validate a database name
///
/// Rules:
/// - Must be 1-64 bytes
/// - Cannot contain `/ \ . " $`, spaces or NUL
pub fn validate_database_name(name: &str) -> Result<(), ValidationError> {
    const KIND: &str = "database name";

    if name.is_empty() {
        return Err(ValidationError::Empty(KIND));
    }

    if name.len() > MAX_DATABASE_NAME_LENGTH {
        return Err(ValidationError::TooLong(KIND, name.to_string(), MAX_DATABASE_NAME_LENGTH));
    }

    if name.contains(FORBIDDEN_DATABASE_CHARS) {
        return Err(ValidationError::InvalidName(
            KIND,
            name.to_string(),
            "contains a character MongoDB does not allow in database names",
        ));
    }

    Ok(())
}

/// Validate a collection name within a database
///
/// Rules:
/// - Cannot be empty
/// - Cannot contain `$` or NUL
/// - Cannot use the reserved `system.` prefix
/// - `database.collection` must fit in 255 bytes
pub fn validate_collection_name(database: &str, name: &str) -> Result<(), ValidationError> {
    const KIND: &str = "collection name";

    if name.is_empty() {
        return Err(ValidationError::Empty(KIND));
    }

    if database.len() + 1 + name.len() > MAX_NAMESPACE_LENGTH {
        return Err(ValidationError::TooLong(KIND, name.to_string(), MAX_NAMESPACE_LENGTH));
    }

    if name.contains(['$', '\0']) {
        return Err(ValidationError::InvalidName(
            KIND,
            name.to_string(),
            "cannot contain '$' or NUL",
        ));
    }

    if name.starts_with("system.") {
        return Err(ValidationError::InvalidName(
            KIND,
            name.to_string(),
            "the 'system.' prefix is reserved",
        ));
    }

    Ok(())
}

/// Validate a 1-based page request
pub fn validate_page(page: u64, page_size: u64) -> Result<(), ValidationError> {
    if page == 0 {
        return Err(ValidationError::OutOfRange("page", page.to_string(), "pages start at 1"));
    }
    if page_size == 0 {
        return Err(ValidationError::OutOfRange(
            "page size",
            page_size.to_string(),
            "must be at least 1",
        ));
    }
    // the server takes skip as a signed 64-bit count
    let skip = (page - 1).checked_mul(page_size).filter(|skip| i64::try_from(*skip).is_ok());
    if skip.is_none() {
        return Err(ValidationError::OutOfRange(
            "page",
            page.to_string(),
            "skips more records than a collection can hold",
        ));
    }
    Ok(())
}

/// Validate a price before it is written
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::OutOfRange("price", price.to_string(), "must be a finite number"));
    }
    if price < 0.0 {
        return Err(ValidationError::OutOfRange("price", price.to_string(), "cannot be negative"));
    }
    Ok(())
}
