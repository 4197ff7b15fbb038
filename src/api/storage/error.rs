//! Error types for commerce backend calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single error entry reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Why a form field failed local validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationKind {
    Missing,
    InvalidFormat,
    Duplicate,
    OutOfRange,
    /// Field cannot change once the entity exists
    ReadOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: ValidationKind,
}

/// Local structural check failures, keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, kind: ValidationKind) {
        self.errors.push(FieldError {
            field: field.into(),
            kind,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str, kind: ValidationKind) -> bool {
        self.errors.iter().any(|e| e.field == field && e.kind == kind)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), MutationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(MutationError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{} ({:?})", e.field, e.kind))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Errors raised while preparing or executing a mutation.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationError {
    /// Draft failed local checks; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    /// Version conflict in optimistic locking
    #[error("Version conflict on {entity_type} {entity_id}: expected {expected_version}, current {current_version:?}")]
    Conflict {
        entity_type: String,
        entity_id: String,
        expected_version: i64,
        current_version: Option<i64>,
    },
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {entity_id}")]
    NotFound {
        entity_type: String,
        entity_id: String,
    },
    /// Remote business validation (duplicate field names, invalid operations)
    #[error("Request rejected: {}", summarize(.errors))]
    Rejected { errors: Vec<RemoteError> },
    /// Network or backend failure unrelated to the request content
    #[error("Transport error: {message}")]
    Transport { message: String },
    /// Request used an action or field the remote schema does not know
    #[error("Schema error: {message}")]
    Schema { message: String },
}

fn summarize(errors: &[RemoteError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl MutationError {
    pub fn not_found(entity_type: &str, entity_id: &str) -> Self {
        MutationError::NotFound {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
        }
    }

    pub fn conflict(
        entity_type: &str,
        entity_id: &str,
        expected_version: i64,
        current_version: Option<i64>,
    ) -> Self {
        MutationError::Conflict {
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            expected_version,
            current_version,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        MutationError::Transport {
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        MutationError::Schema {
            message: message.into(),
        }
    }

    /// Whether resubmitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MutationError::Transport { .. })
    }

    /// Whether the caller must reload the entity before retrying.
    pub fn requires_reload(&self) -> bool {
        matches!(self, MutationError::Conflict { .. })
    }
}

/// Optimistic locking check: `expected` must match the stored `current` version.
pub fn check_version(
    entity_type: &str,
    id: &str,
    expected: i64,
    current: i64,
) -> Result<(), MutationError> {
    if expected != current {
        return Err(MutationError::conflict(entity_type, id, expected, Some(current)));
    }
    Ok(())
}
