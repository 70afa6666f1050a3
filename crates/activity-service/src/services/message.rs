//! Message service
//!
//! Admin to employee messaging. A broadcast is stored as one row per
//! recipient so each copy carries its own read state.

use std::collections::{HashMap, HashSet};

use activity_core::traits::{Mailbox, Page};
use activity_core::{DomainError, Identity, IsoWeek, Message, MessageWithParties, RecordId, User};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    BroadcastMessageRequest, BroadcastResponse, InboxQuery, MessageResponse, MessageStatsResponse,
    MessageSummaryResponse, SendMessageRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Admins look at what they sent, employees at what they received
fn mailbox_of(identity: &Identity) -> Mailbox {
    if identity.is_admin() {
        Mailbox::Sent(identity.user_id)
    } else {
        Mailbox::Received(identity.user_id)
    }
}

/// Drop repeated ids, keeping first-seen order
fn dedupe(ids: Vec<RecordId>) -> Vec<RecordId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send one message to one active employee
    #[instrument(skip(self, sender, request), fields(sender_id = %sender.user_id, receiver_id = %request.receiver_id))]
    pub async fn send(
        &self,
        sender: &Identity,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let receiver = self.load_user(request.receiver_id).await?;
        if !receiver.can_receive_messages() {
            warn!("Message refused: receiver is not an active employee");
            return Err(DomainError::InvalidRecipients(vec![receiver.id]).into());
        }
        let sender_user = self.load_user(sender.user_id).await?;

        let message = Message::new(
            self.ctx.generate_id(),
            sender.user_id,
            receiver.id,
            request.subject,
            request.content,
        );
        self.ctx.message_repo().create(&message).await?;

        info!(message_id = %message.id, "Message sent");
        Ok(MessageResponse::from(MessageWithParties {
            message,
            sender_name: sender_user.name,
            receiver_name: receiver.name,
        }))
    }

    /// Fan a message out to several employees; all rows or none are stored
    #[instrument(skip(self, sender, request), fields(sender_id = %sender.user_id, requested = request.receiver_ids.len()))]
    pub async fn broadcast(
        &self,
        sender: &Identity,
        request: BroadcastMessageRequest,
    ) -> ServiceResult<BroadcastResponse> {
        let receiver_ids = dedupe(request.receiver_ids);
        if receiver_ids.is_empty() {
            return Err(DomainError::validation("receiver_ids", "at least one recipient").into());
        }

        let receivers: HashMap<RecordId, User> = self
            .ctx
            .user_repo()
            .find_by_ids(&receiver_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let invalid: Vec<RecordId> = receiver_ids
            .iter()
            .copied()
            .filter(|id| !receivers.get(id).is_some_and(User::can_receive_messages))
            .collect();
        if !invalid.is_empty() {
            warn!(invalid = invalid.len(), "Broadcast refused: invalid recipients");
            return Err(DomainError::InvalidRecipients(invalid).into());
        }

        let sender_user = self.load_user(sender.user_id).await?;

        let messages: Vec<Message> = receiver_ids
            .iter()
            .map(|receiver_id| {
                Message::new(
                    self.ctx.generate_id(),
                    sender.user_id,
                    *receiver_id,
                    request.subject.clone(),
                    request.content.clone(),
                )
            })
            .collect();
        self.ctx.message_repo().create_many(&messages).await?;

        info!(sent = messages.len(), "Broadcast sent");

        let messages: Vec<MessageResponse> = messages
            .into_iter()
            .map(|message| {
                let receiver_name = receivers
                    .get(&message.receiver_id)
                    .map(|user| user.name.clone())
                    .unwrap_or_default();
                MessageResponse::from(MessageWithParties {
                    message,
                    sender_name: sender_user.name.clone(),
                    receiver_name,
                })
            })
            .collect();

        Ok(BroadcastResponse {
            sent_count: messages.len(),
            messages,
        })
    }

    /// Sent box for admins, received box for employees; newest first.
    /// `unread_only` filters the received box only; an admin's sent box
    /// is always listed whole.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn inbox(
        &self,
        requester: &Identity,
        query: InboxQuery,
        page: Page,
    ) -> ServiceResult<Vec<MessageSummaryResponse>> {
        let unread_only = query.unread_only && !requester.is_admin();
        let messages = self
            .ctx
            .message_repo()
            .list(mailbox_of(requester), unread_only, page)
            .await?;
        Ok(messages.into_iter().map(MessageSummaryResponse::from).collect())
    }

    /// Read one message. Opening an unread message as its receiver marks it read.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn get(&self, requester: &Identity, message_id: RecordId) -> ServiceResult<MessageResponse> {
        let mut view = self.view(message_id).await?;
        if !view.message.is_participant(requester.user_id) {
            warn!(message_id = %message_id, "Message read refused: not a participant");
            return Err(DomainError::NotMessageParticipant.into());
        }

        if view.message.receiver_id == requester.user_id && !view.message.read_status {
            view.message = self
                .ctx
                .message_repo()
                .mark_read(message_id, Utc::now())
                .await?;
            debug!(message_id = %message_id, "Message marked read on open");
        }

        Ok(MessageResponse::from(view))
    }

    /// Receiver only. Already-read messages are returned unchanged.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn mark_read(&self, requester: &Identity, message_id: RecordId) -> ServiceResult<MessageResponse> {
        let mut view = self.view(message_id).await?;
        if view.message.receiver_id != requester.user_id {
            warn!(message_id = %message_id, "Mark read refused: not the receiver");
            return Err(ServiceError::access_denied(
                "only the receiver can mark a message as read",
            ));
        }

        if !view.message.read_status {
            view.message = self
                .ctx
                .message_repo()
                .mark_read(message_id, Utc::now())
                .await?;
            info!(message_id = %message_id, "Message marked read");
        }

        Ok(MessageResponse::from(view))
    }

    /// Sender only
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn delete(&self, requester: &Identity, message_id: RecordId) -> ServiceResult<()> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.sender_id != requester.user_id {
            warn!(message_id = %message_id, "Message delete refused: not the sender");
            return Err(ServiceError::access_denied(
                "only the sender can delete a message",
            ));
        }

        self.ctx.message_repo().delete(message_id).await?;

        info!(message_id = %message_id, "Message deleted");
        Ok(())
    }

    /// Mailbox counters; the week starts Monday 00:00 UTC
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn stats(&self, requester: &Identity) -> ServiceResult<MessageStatsResponse> {
        let (week_start, _) = IsoWeek::current().utc_range();
        let stats = self
            .ctx
            .message_repo()
            .stats(mailbox_of(requester), week_start)
            .await?;
        Ok(MessageStatsResponse::from(stats))
    }

    async fn view(&self, message_id: RecordId) -> ServiceResult<MessageWithParties> {
        self.ctx
            .message_repo()
            .find_with_parties(message_id)
            .await?
            .ok_or_else(|| DomainError::MessageNotFound(message_id).into())
    }

    async fn load_user(&self, user_id: RecordId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}
