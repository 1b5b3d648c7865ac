//! Ticket model operations against the scripted API

mod common;

use common::mock_api::{Call, MockApi, Op};
use common::mock_data::{TicketBuilder, attachment, comment, legacy_issue_row, mock_ticket, staged};
use ent_support::api::{ApiFailure, ListScope};
use ent_support::controller::protect_staged;
use ent_support::error::SupportError;
use ent_support::model::{IssueRow, ModelEvent, Ticket, TicketCollection};
use ent_support::types::{EscalationStatus, TicketStatus};
use serde_json::json;

#[tokio::test]
async fn test_sync_replaces_collection() {
    let api = MockApi::with_tickets(vec![mock_ticket(1), mock_ticket(2)]);
    let mut tickets = TicketCollection::new();
    let mut events = tickets.subscribe();

    assert_eq!(tickets.sync(&api, ListScope::Visible).await.unwrap(), 2);
    assert!(tickets.is_synced());
    assert_eq!(events.try_recv().unwrap(), ModelEvent::TicketsSynced(2));
}

#[tokio::test]
async fn test_create_merges_server_fields() {
    let api = MockApi::new();
    let mut tickets = TicketCollection::new();
    let mut ticket = Ticket {
        subject: "Subject".to_string(),
        description: "Description".to_string(),
        ..Default::default()
    };

    ticket.create(&api, &mut tickets).await.unwrap();

    assert_eq!(ticket.id, Some(100));
    assert_eq!(ticket.subject, "Subject");
    assert_eq!(ticket.owner.as_deref(), Some("user-1"));
    assert!(ticket.created.is_some());
    assert_eq!(tickets.len(), 1);
}

#[tokio::test]
async fn test_update_requires_id() {
    let api = MockApi::new();
    let mut tickets = TicketCollection::new();
    let mut ticket = Ticket::new();

    let result = ticket.update(&api, &mut tickets).await;
    assert!(matches!(result, Err(SupportError::NotPersisted)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_processing_blocks_second_submission() {
    let api = MockApi::new();
    let mut tickets = TicketCollection::new();
    let mut ticket = mock_ticket(5);
    ticket.processing = true;

    let result = ticket.update(&api, &mut tickets).await;
    assert!(matches!(result, Err(SupportError::Busy)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_failure_clears_processing() {
    let api = MockApi::with_tickets(vec![mock_ticket(5)]);
    api.fail(Op::Update, ApiFailure::server(None));
    let mut tickets = TicketCollection::new();
    let mut ticket = mock_ticket(5);

    assert!(ticket.update(&api, &mut tickets).await.is_err());
    assert!(!ticket.processing);

    api.recover(Op::Update);
    assert!(ticket.update(&api, &mut tickets).await.is_ok());
}

#[tokio::test]
async fn test_empty_sub_resources_keep_current_lists() {
    let api = MockApi::with_tickets(vec![mock_ticket(5)]);
    let mut ticket = mock_ticket(5);
    ticket.comments = vec![comment(1, "kept")];
    ticket.attachments = vec![attachment("doc-1", "kept.png")];

    assert_eq!(ticket.load_comments(&api).await.unwrap(), 0);
    assert_eq!(ticket.load_attachments(&api).await.unwrap(), 0);
    assert_eq!(ticket.comments[0].content, "kept");
    assert_eq!(ticket.attachments[0].name, "kept.png");

    api.set_comments(5, vec![comment(1, "first"), comment(2, "second")]);
    assert_eq!(ticket.load_comments(&api).await.unwrap(), 2);
    assert_eq!(ticket.comments[1].content, "second");
}

#[tokio::test]
async fn test_bug_tracker_issue_typed_body() {
    let api = MockApi::new();
    api.set_issue_rows(
        3,
        vec![IssueRow {
            id: 4012,
            content: json!({"issue": {"id": 4012, "subject": "Escalated"}}),
            attachments: json!([]),
        }],
    );
    let mut ticket = mock_ticket(3);

    assert!(ticket.load_bug_tracker_issue(&api).await.unwrap());
    assert_eq!(ticket.issue.unwrap().subject, "Escalated");
}

#[tokio::test]
async fn test_bug_tracker_issue_missing() {
    let api = MockApi::new();
    let mut ticket = mock_ticket(3);
    assert!(!ticket.load_bug_tracker_issue(&api).await.unwrap());
    assert!(ticket.issue.is_none());
}

#[tokio::test]
async fn test_bug_tracker_issue_links_attachments() {
    let api = MockApi::new();
    api.set_issue_rows(3, vec![legacy_issue_row(4012, "doc-7")]);
    let mut ticket = TicketBuilder::new(3)
        .attachment("doc-7", "report.pdf")
        .attachment("doc-8", "other.pdf")
        .build();

    ticket.load_bug_tracker_issue(&api).await.unwrap();

    assert_eq!(ticket.attachments[0].bug_tracker_id, Some(933));
    assert_eq!(ticket.attachments[1].bug_tracker_id, None);
}

#[tokio::test]
async fn test_escalate_sets_issue() {
    let api = MockApi::with_tickets(vec![mock_ticket(9)]);
    let mut tickets = TicketCollection::new();
    tickets.sync(&api, ListScope::Visible).await.unwrap();
    let mut ticket = mock_ticket(9);

    ticket.escalate(&api, &mut tickets).await.unwrap();

    assert!(ticket.is_escalated());
    assert_eq!(ticket.last_issue_update.as_deref(), Some("2016-03-12T08:00:00Z"));
    assert_eq!(
        tickets.get(9).unwrap().escalation_status,
        EscalationStatus::Successful
    );
}

#[tokio::test]
async fn test_escalate_transport_error_marks_failed() {
    let api = MockApi::with_tickets(vec![mock_ticket(9)]);
    api.fail(Op::Escalate, ApiFailure::transport("connection refused"));
    let mut tickets = TicketCollection::new();
    let mut ticket = mock_ticket(9);

    assert!(ticket.escalate(&api, &mut tickets).await.is_err());
    assert_eq!(ticket.escalation_status, EscalationStatus::Failed);
}

#[tokio::test]
async fn test_comment_issue_requires_issue() {
    let api = MockApi::new();
    let mut ticket = TicketBuilder::new(3)
        .status(TicketStatus::Opened)
        .build();

    let result = ticket.comment_issue(&api, "Hello").await;
    assert!(matches!(result, Err(SupportError::NotEscalated)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_protect_staged_skips_protected_documents() {
    let api = MockApi::new();
    let mut list = vec![
        staged("doc-1", "a.png").protected(),
        staged("doc-2", "b.png"),
    ];

    assert_eq!(protect_staged(&api, &mut list).await.unwrap(), 1);
    assert_eq!(api.calls(), vec![Call::Duplicate("doc-2".to_string())]);
    assert_eq!(list[0].id, "doc-1");
    assert_eq!(list[1].id, "protected-doc-2");
    assert!(list[1].protected);
}

#[tokio::test]
async fn test_protect_staged_reports_first_failure_in_order() {
    let api = MockApi::new();
    api.fail_duplicate("doc-1", ApiFailure::server(None));
    api.refuse_duplicate("doc-3");
    let mut list = vec![
        staged("doc-1", "a.png"),
        staged("doc-2", "b.png"),
        staged("doc-3", "c.png"),
    ];

    match protect_staged(&api, &mut list).await {
        Err(SupportError::ProtectedCopyFailed { name, .. }) => assert_eq!(name, "a.png"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(list[1].id, "doc-2");
}
