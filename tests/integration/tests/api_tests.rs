//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get_root("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_root("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], true);
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_login_refresh_and_me() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let email = server.admin.email.to_uppercase();
    let auth = server
        .login(&email, integration_tests::TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(auth.user.role, "admin");
    assert_eq!(auth.user.email, server.admin.email);

    let response = server
        .post(
            "/auth/refresh",
            None,
            &RefreshTokenRequest {
                refresh_token: auth.refresh_token.clone(),
            },
        )
        .await
        .unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(refreshed.user.id, auth.user.id);

    let response = server.get("/auth/me", Some(&refreshed.token)).await.unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);

    // A refresh token is not accepted as an access token
    let response = server.get("/auth/me", Some(&auth.refresh_token)).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .post(
            "/auth/login",
            None,
            &LoginRequest::new(&server.admin.email, "wrong-password"),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();

    let response = server
        .post(
            "/auth/login",
            None,
            &LoginRequest::new("nobody@sahelys.bf", "wrong-password"),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_deactivated_employee_cannot_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (employee, _) = server.new_employee(&admin).await.unwrap();

    let response = server
        .delete(&format!("/users/{}", employee.id), &admin)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post(
            "/auth/login",
            None,
            &LoginRequest::new(&employee.email, integration_tests::TEST_PASSWORD),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE")
        .await
        .unwrap();
}

// ============================================================================
// Access Control Tests
// ============================================================================

#[tokio::test]
async fn test_employee_denied_admin_routes() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (_, employee) = server.new_employee(&admin).await.unwrap();

    for path in ["/users", "/users/employees", "/comments", "/reports/stats/weekly", "/exports/reports/csv"] {
        let response = server.get(path, Some(&employee)).await.unwrap();
        assert_error(response, StatusCode::FORBIDDEN, "ACCESS_DENIED")
            .await
            .unwrap();
    }

    // Denied before the body is even parsed
    let response = server
        .post("/users", Some(&employee), &json!({ "garbage": true }))
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "ACCESS_DENIED")
        .await
        .unwrap();

    let response = server.get("/reports", None).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();

    let request = CreateUserRequest::employee();
    let response = server.post("/users", Some(&admin), &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/users", Some(&admin), &request).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "EMAIL_ALREADY_EXISTS")
        .await
        .unwrap();
}

// ============================================================================
// Report Tests
// ============================================================================

#[tokio::test]
async fn test_report_totals_and_duplicate_week() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (employee_user, employee) = server.new_employee(&admin).await.unwrap();

    let request = CreateReportRequest::for_week("2024-W05");
    let response = server.post("/reports", Some(&employee), &request).await.unwrap();
    let report: ReportResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(report.user_id, employee_user.id);
    assert_eq!(report.week_iso, "2024-W05");
    assert!((report.total_hours - 8.0).abs() < f64::EPSILON);
    assert_eq!(report.tasks_count, 2);
    assert_eq!(report.status, "submitted");

    let response = server.post("/reports", Some(&employee), &request).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "DUPLICATE_REPORT")
        .await
        .unwrap();

    // Another employee may report the same week
    let (_, other) = server.new_employee(&admin).await.unwrap();
    let response = server.post("/reports", Some(&other), &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_creates_keep_one_report() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (_, employee) = server.new_employee(&admin).await.unwrap();

    let request = CreateReportRequest::for_week("2024-W06");
    let (first, second) = tokio::join!(
        server.post("/reports", Some(&employee), &request),
        server.post("/reports", Some(&employee), &request),
    );
    let mut statuses = [first.unwrap().status().as_u16(), second.unwrap().status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 409]);
}

#[tokio::test]
async fn test_review_locks_report() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (_, employee) = server.new_employee(&admin).await.unwrap();

    let response = server
        .post("/reports", Some(&employee), &CreateReportRequest::for_week("2024-W07"))
        .await
        .unwrap();
    let report: ReportResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .put(
            &format!("/reports/{}", report.id),
            &employee,
            &json!({ "tasks": [{ "title": "Design", "hours": 6 }] }),
        )
        .await
        .unwrap();
    let updated: ReportResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!((updated.total_hours - 6.0).abs() < f64::EPSILON);

    let response = server
        .patch(&format!("/reports/{}/review", report.id), &admin)
        .await
        .unwrap();
    let reviewed: ReportResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(reviewed.status, "reviewed");

    let response = server
        .delete(&format!("/reports/{}", report.id), &employee)
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "REPORT_LOCKED")
        .await
        .unwrap();
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_broadcast_and_mark_read() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (alice, alice_token) = server.new_employee(&admin).await.unwrap();
    let (bob, bob_token) = server.new_employee(&admin).await.unwrap();

    let response = server
        .post(
            "/messages/broadcast",
            Some(&admin),
            &BroadcastMessageRequest {
                receiver_ids: vec![alice.id.clone(), bob.id.clone()],
                subject: Some("Réunion".to_string()),
                content: "Réunion lundi à 9h".to_string(),
            },
        )
        .await
        .unwrap();
    let broadcast: BroadcastResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(broadcast.sent_count, 2);
    assert!(broadcast.messages.iter().all(|m| !m.read_status));

    let alice_copy = broadcast
        .messages
        .iter()
        .find(|m| m.receiver_id == alice.id)
        .unwrap();
    let bob_copy = broadcast
        .messages
        .iter()
        .find(|m| m.receiver_id == bob.id)
        .unwrap();

    let path = format!("/messages/{}/mark-read", alice_copy.id);
    let first: MessageResponse = assert_json(
        server.patch(&path, &alice_token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(first.read_status);

    // Idempotent: same end state, no error
    let second: MessageResponse = assert_json(
        server.patch(&path, &alice_token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(second.read_status);
    assert_eq!(second.read_at, first.read_at);

    // Bob's copy is independent
    let response = server
        .get("/messages/inbox?unread_only=true", Some(&bob_token))
        .await
        .unwrap();
    let inbox: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["id"], bob_copy.id.as_str());

    // Bob cannot mark Alice's copy
    let response = server.patch(&path, &bob_token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_message_to_admin_is_rejected() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin_auth = server
        .login(&server.admin.email, integration_tests::TEST_PASSWORD)
        .await
        .unwrap();

    let response = server
        .post(
            "/messages",
            Some(&admin_auth.token),
            &SendMessageRequest {
                receiver_id: admin_auth.user.id.clone(),
                subject: None,
                content: "Bonjour".to_string(),
            },
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_RECIPIENTS")
        .await
        .unwrap();
}

// ============================================================================
// Export and Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_exports_are_attachments() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();

    let response = server.get("/exports/users/csv", Some(&admin)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"utilisateurs_"));
    let body = response.text().await.unwrap();
    assert!(body.starts_with("Nom;Email;"));

    let response = server
        .get("/exports/weekly-summary/2024-W05/pdf", Some(&admin))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    let bytes = response.bytes().await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let response = server
        .get("/exports/weekly-summary/2024-W99/pdf", Some(&admin))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY).await.unwrap();
}

#[tokio::test]
async fn test_dashboard_by_role() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_token().await.unwrap();
    let (_, employee) = server.new_employee(&admin).await.unwrap();

    let response = server.get("/dashboard/stats", Some(&admin)).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["role"], "admin");
    assert!(body["active_employees"].as_i64().unwrap() >= 1);

    let response = server.get("/dashboard/stats", Some(&employee)).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["role"], "employee");
    assert_eq!(body["my_reports"], 0);
    assert!(body["recent_activity"].as_array().unwrap().is_empty());
}
