//! Messaging service over in-memory repositories

mod common;

use activity_core::traits::Page;
use activity_service::dto::{BroadcastMessageRequest, InboxQuery, SendMessageRequest};
use activity_service::MessageService;
use common::TestApp;

fn note(content: &str) -> Option<String> {
    Some(content.to_string())
}

#[tokio::test]
async fn test_send_and_read_marks_message_once() {
    let app = TestApp::new();
    let chef = app.admin("Chef");
    let awa = app.employee("Awa");
    let moussa = app.employee("Moussa");
    let service = MessageService::new(&app.ctx);

    let sent = service
        .send(
            &chef,
            SendMessageRequest {
                receiver_id: awa.user_id,
                subject: note("Planning"),
                content: "Merci d'envoyer le rapport".into(),
            },
        )
        .await
        .unwrap();
    assert!(!sent.read_status);
    assert_eq!(sent.sender_name, "Chef");
    assert_eq!(sent.receiver_name, "Awa");

    // Outsiders cannot read it
    assert_eq!(service.get(&moussa, sent.id).await.unwrap_err().status_code(), 403);

    // The sender reading it leaves it unread
    let by_sender = service.get(&chef, sent.id).await.unwrap();
    assert!(!by_sender.read_status);

    // Only the receiver may mark it read
    assert_eq!(service.mark_read(&chef, sent.id).await.unwrap_err().status_code(), 403);

    let first = service.mark_read(&awa, sent.id).await.unwrap();
    assert!(first.read_status);
    let read_at = first.read_at.unwrap();

    let second = service.mark_read(&awa, sent.id).await.unwrap();
    assert!(second.read_status);
    assert_eq!(second.read_at, Some(read_at));

    let opened = service.get(&awa, sent.id).await.unwrap();
    assert_eq!(opened.read_at, Some(read_at));
}

#[tokio::test]
async fn test_opening_unread_message_marks_it_read() {
    let app = TestApp::new();
    let chef = app.admin("Chef");
    let awa = app.employee("Awa");
    let service = MessageService::new(&app.ctx);

    let sent = service
        .send(
            &chef,
            SendMessageRequest {
                receiver_id: awa.user_id,
                subject: None,
                content: "Bonjour".into(),
            },
        )
        .await
        .unwrap();

    let opened = service.get(&awa, sent.id).await.unwrap();
    assert!(opened.read_status);
    assert!(opened.read_at.is_some());

    let stats = service.stats(&awa).await.unwrap();
    assert_eq!(stats.total_messages, 1);
    assert_eq!(stats.unread_messages, 0);
    assert_eq!(stats.messages_this_week, 1);
}

#[tokio::test]
async fn test_send_rejects_admins_and_inactive_receivers() {
    let app = TestApp::new();
    let chef = app.admin("Chef");
    let adjoint = app.admin("Adjoint");
    let parti = app.employee("Parti");
    app.store.deactivate_user(parti.user_id);
    let service = MessageService::new(&app.ctx);

    let to_admin = service
        .send(
            &chef,
            SendMessageRequest {
                receiver_id: adjoint.user_id,
                subject: None,
                content: "?".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(to_admin.status_code(), 422);

    let to_inactive = service
        .send(
            &chef,
            SendMessageRequest {
                receiver_id: parti.user_id,
                subject: None,
                content: "?".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(to_inactive.status_code(), 422);

    let missing = service
        .send(
            &chef,
            SendMessageRequest {
                receiver_id: activity_core::RecordId::new(999_999),
                subject: None,
                content: "?".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(missing.status_code(), 404);
    assert_eq!(app.store.message_count(), 0);
}

#[tokio::test]
async fn test_broadcast_creates_one_message_per_recipient() {
    let app = TestApp::new();
    let chef = app.admin("Chef");
    let awa = app.employee("Awa");
    let moussa = app.employee("Moussa");
    let ali = app.employee("Ali");
    let service = MessageService::new(&app.ctx);

    let result = service
        .broadcast(
            &chef,
            BroadcastMessageRequest {
                receiver_ids: vec![awa.user_id, moussa.user_id, ali.user_id, awa.user_id],
                subject: note("Réunion"),
                content: "Réunion lundi à 9h".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.sent_count, 3);
    assert_eq!(app.store.message_count(), 3);

    // Each copy has its own read state
    let awa_copy = result
        .messages
        .iter()
        .find(|m| m.receiver_id == awa.user_id)
        .unwrap();
    service.mark_read(&awa, awa_copy.id).await.unwrap();

    let moussa_inbox = service
        .inbox(&moussa, InboxQuery { unread_only: true }, Page::default())
        .await
        .unwrap();
    assert_eq!(moussa_inbox.len(), 1);
    assert_eq!(moussa_inbox[0].content_preview, "Réunion lundi à 9h");

    let awa_unread = service
        .inbox(&awa, InboxQuery { unread_only: true }, Page::default())
        .await
        .unwrap();
    assert!(awa_unread.is_empty());

    let sent_box = service
        .inbox(&chef, InboxQuery::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(sent_box.len(), 3);
    // The sent box ignores the unread filter
    let sent_unread = service
        .inbox(&chef, InboxQuery { unread_only: true }, Page::default())
        .await
        .unwrap();
    assert_eq!(sent_unread.len(), 3);

    let stats = service.stats(&chef).await.unwrap();
    assert_eq!(stats.total_messages, 3);
    assert_eq!(stats.unread_messages, 2);
}

#[tokio::test]
async fn test_broadcast_with_invalid_recipient_writes_nothing() {
    let app = TestApp::new();
    let chef = app.admin("Chef");
    let adjoint = app.admin("Adjoint");
    let awa = app.employee("Awa");
    let service = MessageService::new(&app.ctx);

    let err = service
        .broadcast(
            &chef,
            BroadcastMessageRequest {
                receiver_ids: vec![awa.user_id, adjoint.user_id, activity_core::RecordId::new(77)],
                subject: None,
                content: "Bonjour".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.error_code(), "INVALID_RECIPIENTS");
    assert_eq!(app.store.message_count(), 0);
}

#[tokio::test]
async fn test_only_sender_deletes() {
    let app = TestApp::new();
    let chef = app.admin("Chef");
    let awa = app.employee("Awa");
    let service = MessageService::new(&app.ctx);

    let sent = service
        .send(
            &chef,
            SendMessageRequest {
                receiver_id: awa.user_id,
                subject: None,
                content: "Bonjour".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(service.delete(&awa, sent.id).await.unwrap_err().status_code(), 403);
    service.delete(&chef, sent.id).await.unwrap();
    assert_eq!(service.get(&chef, sent.id).await.unwrap_err().status_code(), 404);
}
