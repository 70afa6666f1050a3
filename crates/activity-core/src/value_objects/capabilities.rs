//! Capability bitflags granted to each role

use bitflags::bitflags;

use crate::entities::Role;

bitflags! {
    /// What a role is allowed to do, independent of which record is touched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Read own profile
        const VIEW_PROFILE     = 1 << 0;
        /// Create, update, deactivate user accounts
        const MANAGE_USERS     = 1 << 1;
        /// Write and delete own weekly reports
        const AUTHOR_REPORTS   = 1 << 2;
        /// Read reports (scope decided per role)
        const READ_REPORTS     = 1 << 3;
        /// Sign off, delete any report, and view cross-employee statistics
        const REVIEW_REPORTS   = 1 << 4;
        /// Write comments on reports
        const WRITE_COMMENTS   = 1 << 5;
        /// Read comments on visible reports
        const READ_COMMENTS    = 1 << 6;
        /// Send direct and broadcast messages
        const SEND_MESSAGES    = 1 << 7;
        /// Read own mailbox
        const READ_MESSAGES    = 1 << 8;
        /// Acknowledge received messages
        const RECEIVE_MESSAGES = 1 << 9;
        /// Download CSV and PDF exports
        const EXPORT_DATA      = 1 << 10;
        /// Dashboard counters
        const VIEW_DASHBOARD   = 1 << 11;

        const EMPLOYEE = Self::VIEW_PROFILE.bits()
            | Self::AUTHOR_REPORTS.bits()
            | Self::READ_REPORTS.bits()
            | Self::READ_COMMENTS.bits()
            | Self::READ_MESSAGES.bits()
            | Self::RECEIVE_MESSAGES.bits()
            | Self::VIEW_DASHBOARD.bits();

        const ADMIN = Self::VIEW_PROFILE.bits()
            | Self::MANAGE_USERS.bits()
            | Self::READ_REPORTS.bits()
            | Self::REVIEW_REPORTS.bits()
            | Self::WRITE_COMMENTS.bits()
            | Self::READ_COMMENTS.bits()
            | Self::SEND_MESSAGES.bits()
            | Self::READ_MESSAGES.bits()
            | Self::EXPORT_DATA.bits()
            | Self::VIEW_DASHBOARD.bits();
    }
}

impl Capabilities {
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Employee => Self::EMPLOYEE,
            Role::Admin => Self::ADMIN,
        }
    }

    /// True when at least one of `required` is granted
    #[inline]
    pub fn grants_any(&self, required: Capabilities) -> bool {
        self.intersects(required)
    }
}
