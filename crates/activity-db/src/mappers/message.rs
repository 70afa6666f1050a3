//! Message models -> entities

use activity_core::{DomainError, Message, MessageStats, MessageWithParties, RecordId};

use crate::models::{MessageModel, MessageStatsModel, MessageWithPartiesModel};

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: RecordId::new(model.id),
            sender_id: RecordId::new(model.sender_id),
            receiver_id: RecordId::new(model.receiver_id),
            subject: model.subject,
            content: model.content,
            read_status: model.read_status,
            read_at: model.read_at,
            created_at: model.created_at,
        }
    }
}

impl TryFrom<MessageWithPartiesModel> for MessageWithParties {
    type Error = DomainError;

    fn try_from(model: MessageWithPartiesModel) -> Result<Self, Self::Error> {
        Ok(MessageWithParties {
            message: model.message.into(),
            sender_name: model.sender_name,
            receiver_name: model.receiver_name,
        })
    }
}

impl From<MessageStatsModel> for MessageStats {
    fn from(model: MessageStatsModel) -> Self {
        MessageStats {
            total_messages: model.total_messages,
            unread_messages: model.unread_messages,
            messages_this_week: model.messages_this_week,
        }
    }
}
