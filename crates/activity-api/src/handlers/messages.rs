//! Message handlers
//!
//! Admins send and broadcast; employees read and acknowledge. The inbox
//! shows sent mail to admins and received mail to employees.

use activity_service::dto::{
    BroadcastMessageRequest, BroadcastResponse, InboxQuery, MessageResponse,
    MessageStatsResponse, MessageSummaryResponse, SendMessageRequest,
};
use activity_service::MessageService;
use axum::{extract::State, Json};

use crate::extractors::{CurrentUser, IdPath, Pagination, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /messages
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(sender): CurrentUser,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.send(&sender, request).await?;
    Ok(Created(Json(response)))
}

/// One stored message per recipient
///
/// POST /messages/broadcast
pub async fn broadcast_message(
    State(state): State<AppState>,
    CurrentUser(sender): CurrentUser,
    ValidatedJson(request): ValidatedJson<BroadcastMessageRequest>,
) -> ApiResult<Created<Json<BroadcastResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.broadcast(&sender, request).await?;
    Ok(Created(Json(response)))
}

/// GET /messages/inbox?unread_only&skip&limit
pub async fn inbox(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    QueryParams(query): QueryParams<InboxQuery>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<MessageSummaryResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.inbox(&requester, query, page).await?;
    Ok(Json(response))
}

/// GET /messages/stats/summary
pub async fn message_stats(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> ApiResult<Json<MessageStatsResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.stats(&requester).await?;
    Ok(Json(response))
}

/// GET /messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(message_id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.get(&requester, message_id).await?;
    Ok(Json(response))
}

/// PATCH /messages/{id}/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(message_id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.mark_read(&requester, message_id).await?;
    Ok(Json(response))
}

/// DELETE /messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(message_id): IdPath,
) -> ApiResult<NoContent> {
    let service = MessageService::new(state.service_context());
    service.delete(&requester, message_id).await?;
    Ok(NoContent)
}
