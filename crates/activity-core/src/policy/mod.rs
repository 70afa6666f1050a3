//! Access policy - the single table deciding which role may run which operation
//!
//! Record-level checks (is this my report?) happen in the services after the
//! operation itself has been allowed here.

use std::fmt;

use crate::entities::Role;
use crate::error::DomainError;
use crate::value_objects::{Capabilities, RecordId};

/// Authenticated caller, as carried by a validated session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: RecordId,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: RecordId, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_role(self.role)
    }
}

/// Every guarded API operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ViewProfile,

    ListUsers,
    ViewUser,
    CreateUser,
    UpdateUser,
    DeactivateUser,
    ListEmployees,

    CreateReport,
    UpdateReport,
    DeleteReport,
    ListReports,
    ViewReport,
    ReviewReport,
    ViewReportStats,

    CreateComment,
    UpdateComment,
    DeleteComment,
    ListAllComments,
    ListReportComments,
    ViewComment,

    SendMessage,
    BroadcastMessage,
    DeleteMessage,
    ViewInbox,
    ViewMessage,
    ViewMessageStats,
    MarkMessageRead,

    ExportData,
    ViewDashboard,
}

impl Operation {
    /// Capabilities of which at least one must be held
    pub const fn required(self) -> Capabilities {
        match self {
            Self::ViewProfile => Capabilities::VIEW_PROFILE,

            Self::ListUsers
            | Self::ViewUser
            | Self::CreateUser
            | Self::UpdateUser
            | Self::DeactivateUser
            | Self::ListEmployees => Capabilities::MANAGE_USERS,

            Self::CreateReport | Self::UpdateReport => Capabilities::AUTHOR_REPORTS,
            Self::DeleteReport => {
                Capabilities::AUTHOR_REPORTS.union(Capabilities::REVIEW_REPORTS)
            }
            Self::ListReports | Self::ViewReport => Capabilities::READ_REPORTS,
            Self::ReviewReport | Self::ViewReportStats => Capabilities::REVIEW_REPORTS,

            Self::CreateComment
            | Self::UpdateComment
            | Self::DeleteComment
            | Self::ListAllComments => Capabilities::WRITE_COMMENTS,
            Self::ListReportComments | Self::ViewComment => Capabilities::READ_COMMENTS,

            Self::SendMessage | Self::BroadcastMessage | Self::DeleteMessage => {
                Capabilities::SEND_MESSAGES
            }
            Self::ViewInbox | Self::ViewMessage | Self::ViewMessageStats => {
                Capabilities::READ_MESSAGES
            }
            Self::MarkMessageRead => Capabilities::RECEIVE_MESSAGES,

            Self::ExportData => Capabilities::EXPORT_DATA,
            Self::ViewDashboard => Capabilities::VIEW_DASHBOARD,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ViewProfile => "view_profile",
            Self::ListUsers => "list_users",
            Self::ViewUser => "view_user",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeactivateUser => "deactivate_user",
            Self::ListEmployees => "list_employees",
            Self::CreateReport => "create_report",
            Self::UpdateReport => "update_report",
            Self::DeleteReport => "delete_report",
            Self::ListReports => "list_reports",
            Self::ViewReport => "view_report",
            Self::ReviewReport => "review_report",
            Self::ViewReportStats => "view_report_stats",
            Self::CreateComment => "create_comment",
            Self::UpdateComment => "update_comment",
            Self::DeleteComment => "delete_comment",
            Self::ListAllComments => "list_all_comments",
            Self::ListReportComments => "list_report_comments",
            Self::ViewComment => "view_comment",
            Self::SendMessage => "send_message",
            Self::BroadcastMessage => "broadcast_message",
            Self::DeleteMessage => "delete_message",
            Self::ViewInbox => "view_inbox",
            Self::ViewMessage => "view_message",
            Self::ViewMessageStats => "view_message_stats",
            Self::MarkMessageRead => "mark_message_read",
            Self::ExportData => "export_data",
            Self::ViewDashboard => "view_dashboard",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a policy check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(String),
}

impl Decision {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(DomainError::AccessDenied { reason }),
        }
    }
}

/// Decide whether `identity` may perform `operation`
pub fn authorize(identity: &Identity, operation: Operation) -> Decision {
    if identity.capabilities().grants_any(operation.required()) {
        Decision::Allowed
    } else {
        Decision::Denied(format!(
            "role '{}' is not allowed to {}",
            identity.role,
            operation.name().replace('_', " ")
        ))
    }
}
