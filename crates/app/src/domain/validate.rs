//! Input validation shared by the domain services.

use thiserror::Error;

use crate::uuids::TypedUuid;

/// A raw identifier that is not a well-formed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {label} id: {value:?}")]
pub struct InvalidIdError {
    pub label: &'static str,
    pub value: String,
}

/// Parse a raw identifier, naming the entity it refers to on failure.
///
/// # Errors
///
/// Returns [`InvalidIdError`] when `raw` is not a UUID.
pub fn id<T>(raw: &str, label: &'static str) -> Result<TypedUuid<T>, InvalidIdError> {
    raw.trim()
        .parse::<TypedUuid<T>>()
        .ok()
        .ok_or_else(|| InvalidIdError {
            label,
            value: raw.to_string(),
        })
}
