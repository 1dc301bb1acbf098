//! Error taxonomy for the medication lifecycle engine.
//!
//! Split along the lines callers care about: what never left the client
//! (`Validation`, `InvalidState`, `NotYetDue`) versus what the portal
//! answered (`Forbidden`, `NotFound`, `SessionExpired`) versus the wire
//! itself failing (`Transport`).

use chrono::Duration;
use serde::Serialize;

/// One violated field, attributable to the request or to a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `items[1].scheduleTimes`.
    pub field: String,
    /// Display name of the offending item, when the field belongs to one.
    pub item: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    /// Issue on a request-level field.
    pub fn request(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            item: None,
            message: message.into(),
        }
    }

    /// Issue on a field of the item at `index`.
    pub fn item(index: usize, name: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            field: format!("items[{index}].{field}"),
            item: Some(if name.trim().is_empty() {
                format!("item {}", index + 1)
            } else {
                name.to_string()
            }),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{} ({}): {}", self.field, item, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Engine-level errors, surfaced to the embedding UI.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortalError {
    /// Client-side validation failed; no network call was made.
    #[error("validation failed: {}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// The entity is not in a state that permits this mutation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The dose's scheduled instant has not arrived; no network call was made.
    #[error("dose is not yet due (mutable in {})", crate::dose_gate::format_remaining(*remaining))]
    NotYetDue { remaining: Duration },

    /// Portal answered 403 — rejected, but the session stays valid.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Portal answered 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Portal answered 401 — the bearer token is no longer accepted.
    #[error("session expired")]
    SessionExpired,

    /// Network failure, non-JSON body, or any unmapped status.
    #[error("transport error: {0}")]
    Transport(String),
}

impl PortalError {
    /// Convenience constructor for a single-issue validation failure.
    pub fn validation(issue: ValidationIssue) -> Self {
        Self::Validation(vec![issue])
    }

    /// Errors that were resolved locally, before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidState(_) | Self::NotYetDue { .. }
        )
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_issue_names_index_and_item() {
        let issue = ValidationIssue::item(1, "Cetirizine", "scheduleTimes", "expected 2 times");
        assert_eq!(issue.field, "items[1].scheduleTimes");
        assert_eq!(issue.item.as_deref(), Some("Cetirizine"));
    }

    #[test]
    fn unnamed_item_falls_back_to_position() {
        let issue = ValidationIssue::item(0, "  ", "itemName", "must not be empty");
        assert_eq!(issue.item.as_deref(), Some("item 1"));
    }

    #[test]
    fn validation_display_joins_issues() {
        let err = PortalError::Validation(vec![
            ValidationIssue::request("startDate", "must not be in the past"),
            ValidationIssue::item(0, "Cetirizine", "dosage", "must be positive"),
        ]);
        let text = err.to_string();
        assert!(text.contains("startDate"));
        assert!(text.contains("items[0].dosage"));
    }

    #[test]
    fn local_errors_are_flagged() {
        assert!(PortalError::InvalidState("x".into()).is_local());
        assert!(PortalError::NotYetDue {
            remaining: Duration::minutes(5)
        }
        .is_local());
        assert!(!PortalError::SessionExpired.is_local());
        assert!(!PortalError::Transport("io".into()).is_local());
    }
}
