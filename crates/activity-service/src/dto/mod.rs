//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    BroadcastMessageRequest, CommentListQuery, CreateCommentRequest, CreateReportRequest,
    CreateUserRequest, InboxQuery, LoginRequest, MessageExportQuery, RefreshTokenRequest,
    ReportExportQuery, ReportListQuery, SendMessageRequest, TaskRequest, UpdateCommentRequest,
    UpdateReportRequest, UpdateUserRequest, UserListQuery, WeekRangeQuery,
};

// Re-export commonly used response types
pub use responses::{
    ActivityItem, ActivityKind, AuthResponse, BroadcastResponse, CommentResponse,
    DashboardCounters, DashboardResponse, HealthChecks, HealthResponse, MessageResponse,
    MessageStatsResponse, MessageSummaryResponse, PaginatedResponse, PaginationMeta,
    ReadinessResponse, ReportResponse, ReportSummaryResponse, UserResponse, WeeklyStatsResponse,
};
