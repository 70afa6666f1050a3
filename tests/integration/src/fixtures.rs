//! Test fixtures and data generators
//!
//! Request bodies the tests send and the slices of responses they read.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per process; combined with the pid so reruns don't collide on emails
pub fn unique_suffix() -> String {
    format!("{}-{}", std::process::id(), COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: String,
}

impl CreateUserRequest {
    pub fn employee() -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("employe{suffix}@sahelys.bf"),
            name: format!("Employé {suffix}"),
            password: crate::helpers::TEST_PASSWORD.to_string(),
            role: "employee".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskRequest {
    pub title: String,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateReportRequest {
    pub week_iso: String,
    pub tasks: Vec<TaskRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulties: Option<String>,
}

impl CreateReportRequest {
    /// Design 5h + Review 3h
    pub fn for_week(week_iso: &str) -> Self {
        Self {
            week_iso: week_iso.to_string(),
            tasks: vec![
                TaskRequest {
                    title: "Design".to_string(),
                    hours: 5.0,
                },
                TaskRequest {
                    title: "Review".to_string(),
                    hours: 3.0,
                },
            ],
            difficulties: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub id: String,
    pub user_id: String,
    pub week_iso: String,
    pub total_hours: f64,
    pub tasks_count: usize,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub subject: Option<String>,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct BroadcastMessageRequest {
    pub receiver_ids: Vec<String>,
    pub subject: Option<String>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub receiver_id: String,
    pub content: String,
    pub read_status: bool,
    pub read_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastResponse {
    pub sent_count: usize,
    pub messages: Vec<MessageResponse>,
}
