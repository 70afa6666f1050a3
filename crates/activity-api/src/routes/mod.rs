//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1. Every
//! protected method carries its own guard layer naming the operation it
//! performs.

use activity_core::Operation;
use axum::{
    middleware,
    routing::{delete, get, patch, post, put, MethodRouter},
    Router,
};

use crate::handlers::{auth, comments, dashboard, exports, health, messages, reports, users};
use crate::middleware::{require_operation, GuardState};
use crate::state::AppState;

/// Create the main API router (health routes are separate so they skip rate limiting)
pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes(state))
}

/// Health check routes, outside `/api/v1` and unauthenticated
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Wrap one method route in the guard for `operation`
fn guarded(
    state: &AppState,
    operation: Operation,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        GuardState::new(state.clone(), operation),
        require_operation,
    ))
}

fn api_v1_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes(state))
        .merge(user_routes(state))
        .merge(report_routes(state))
        .merge(comment_routes(state))
        .merge(message_routes(state))
        .merge(export_routes(state))
        .merge(dashboard_routes(state))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/me", guarded(state, Operation::ViewProfile, get(auth::me)))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            guarded(state, Operation::ListUsers, get(users::list_users))
                .merge(guarded(state, Operation::CreateUser, post(users::create_user))),
        )
        .route(
            "/users/employees",
            guarded(state, Operation::ListEmployees, get(users::list_employees)),
        )
        .route(
            "/users/:id",
            guarded(state, Operation::ViewUser, get(users::get_user))
                .merge(guarded(state, Operation::UpdateUser, put(users::update_user)))
                .merge(guarded(
                    state,
                    Operation::DeactivateUser,
                    delete(users::deactivate_user),
                )),
        )
}

fn report_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/reports",
            guarded(state, Operation::ListReports, get(reports::list_reports))
                .merge(guarded(state, Operation::CreateReport, post(reports::create_report))),
        )
        .route(
            "/reports/stats/weekly",
            guarded(state, Operation::ViewReportStats, get(reports::weekly_stats)),
        )
        .route(
            "/reports/:id",
            guarded(state, Operation::ViewReport, get(reports::get_report))
                .merge(guarded(state, Operation::UpdateReport, put(reports::update_report)))
                .merge(guarded(
                    state,
                    Operation::DeleteReport,
                    delete(reports::delete_report),
                )),
        )
        .route(
            "/reports/:id/review",
            guarded(state, Operation::ReviewReport, patch(reports::review_report)),
        )
}

fn comment_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/comments",
            guarded(state, Operation::ListAllComments, get(comments::list_comments)).merge(
                guarded(state, Operation::CreateComment, post(comments::create_comment)),
            ),
        )
        .route(
            "/comments/report/:id",
            guarded(
                state,
                Operation::ListReportComments,
                get(comments::list_report_comments),
            ),
        )
        .route(
            "/comments/:id",
            guarded(state, Operation::ViewComment, get(comments::get_comment))
                .merge(guarded(state, Operation::UpdateComment, put(comments::update_comment)))
                .merge(guarded(
                    state,
                    Operation::DeleteComment,
                    delete(comments::delete_comment),
                )),
        )
}

fn message_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/messages",
            guarded(state, Operation::SendMessage, post(messages::send_message)),
        )
        .route(
            "/messages/broadcast",
            guarded(
                state,
                Operation::BroadcastMessage,
                post(messages::broadcast_message),
            ),
        )
        .route(
            "/messages/inbox",
            guarded(state, Operation::ViewInbox, get(messages::inbox)),
        )
        .route(
            "/messages/stats/summary",
            guarded(state, Operation::ViewMessageStats, get(messages::message_stats)),
        )
        .route(
            "/messages/:id",
            guarded(state, Operation::ViewMessage, get(messages::get_message)).merge(guarded(
                state,
                Operation::DeleteMessage,
                delete(messages::delete_message),
            )),
        )
        .route(
            "/messages/:id/mark-read",
            guarded(state, Operation::MarkMessageRead, patch(messages::mark_read)),
        )
}

fn export_routes(state: &AppState) -> Router<AppState> {
    let export = |route: MethodRouter<AppState>| guarded(state, Operation::ExportData, route);

    Router::new()
        .route("/exports/reports/csv", export(get(exports::reports_csv)))
        .route("/exports/reports/pdf", export(get(exports::reports_pdf)))
        .route("/exports/users/csv", export(get(exports::users_csv)))
        .route("/exports/users/pdf", export(get(exports::users_pdf)))
        .route("/exports/messages/csv", export(get(exports::messages_csv)))
        .route(
            "/exports/weekly-summary/:week_iso/pdf",
            export(get(exports::weekly_summary_pdf)),
        )
}

fn dashboard_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/dashboard/stats",
        guarded(state, Operation::ViewDashboard, get(dashboard::dashboard_stats)),
    )
}
