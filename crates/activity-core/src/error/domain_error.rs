//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{IsoWeek, RecordId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(RecordId),

    #[error("Report not found: {0}")]
    ReportNotFound(RecordId),

    #[error("Comment not found: {0}")]
    CommentNotFound(RecordId),

    #[error("Message not found: {0}")]
    MessageNotFound(RecordId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation failed on {field}: {constraint}")]
    Validation { field: String, constraint: String },

    #[error("Invalid ISO week '{0}', expected YYYY-Www")]
    InvalidIsoWeek(String),

    #[error("A report needs at least one task")]
    EmptyTaskList,

    #[error("Task {index} has invalid hours (must be between 0 and 168)")]
    InvalidTaskHours { index: usize },

    #[error("Cannot deactivate your own account")]
    CannotDeactivateSelf,

    #[error("Recipients are not active employees: {}", join_ids(.0))]
    InvalidRecipients(Vec<RecordId>),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },

    #[error("Not the owner of this report")]
    NotReportOwner,

    #[error("Not the author of this comment")]
    NotCommentAuthor,

    #[error("Not a participant of this message")]
    NotMessageParticipant,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("A report already exists for week {0}")]
    DuplicateReport(IsoWeek),

    #[error("Report {0} has been reviewed and can no longer be changed")]
    ReportLocked(RecordId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

fn join_ids(ids: &[RecordId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DomainError {
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied {
            reason: reason.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ReportNotFound(_) => "UNKNOWN_REPORT",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Validation
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidIsoWeek(_) => "INVALID_ISO_WEEK",
            Self::EmptyTaskList => "EMPTY_TASK_LIST",
            Self::InvalidTaskHours { .. } => "INVALID_TASK_HOURS",
            Self::CannotDeactivateSelf => "CANNOT_DEACTIVATE_SELF",
            Self::InvalidRecipients(_) => "INVALID_RECIPIENTS",

            // Authorization
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::NotReportOwner => "NOT_REPORT_OWNER",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotMessageParticipant => "NOT_MESSAGE_PARTICIPANT",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::DuplicateReport(_) => "DUPLICATE_REPORT",
            Self::ReportLocked(_) => "REPORT_LOCKED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ReportNotFound(_)
                | Self::CommentNotFound(_)
                | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidIsoWeek(_)
                | Self::EmptyTaskList
                | Self::InvalidTaskHours { .. }
                | Self::CannotDeactivateSelf
                | Self::InvalidRecipients(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::AccessDenied { .. }
                | Self::NotReportOwner
                | Self::NotCommentAuthor
                | Self::NotMessageParticipant
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::DuplicateReport(_) | Self::ReportLocked(_)
        )
    }
}

impl From<crate::value_objects::IsoWeekError> for DomainError {
    fn from(err: crate::value_objects::IsoWeekError) -> Self {
        Self::InvalidIsoWeek(err.0)
    }
}
