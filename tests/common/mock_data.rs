//! Builders for test tickets, attachments and bug-tracker rows.

#![allow(dead_code)]

use ent_support::model::{Attachment, Comment, IssueRow, StagedAttachment, Ticket};
use ent_support::types::{EscalationStatus, TicketId, TicketStatus};
use ent_support::user::{App, School, UserContext};
use serde_json::json;

use super::mock_api::MOCK_USER_ID;

/// Builder for creating test tickets
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    pub fn new(id: TicketId) -> Self {
        Self {
            ticket: Ticket {
                id: Some(id),
                subject: format!("Ticket {id}"),
                description: "Something is broken".to_string(),
                category: Some("/workspace/workspace".to_string()),
                school_id: Some("school-a".to_string()),
                status: Some(TicketStatus::New),
                owner: Some(MOCK_USER_ID.to_string()),
                owner_name: Some("Jane Doe".to_string()),
                created: Some(format!("2016-03-{:02}T10:00:00.000", id % 28 + 1)),
                modified: Some(format!("2016-03-{:02}T10:00:00.000", id % 28 + 1)),
                ..Default::default()
            },
        }
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.ticket.subject = subject.to_string();
        self
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.ticket.status = Some(status);
        self
    }

    pub fn escalation(mut self, status: EscalationStatus) -> Self {
        self.ticket.escalation_status = status;
        self
    }

    pub fn school(mut self, school_id: &str) -> Self {
        self.ticket.school_id = Some(school_id.to_string());
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.ticket.owner = Some(owner.to_string());
        self
    }

    pub fn attachment(mut self, document_id: &str, name: &str) -> Self {
        self.ticket.attachments.push(attachment(document_id, name));
        self
    }

    pub fn build(self) -> Ticket {
        self.ticket
    }
}

/// Create a simple ticket with default values
pub fn mock_ticket(id: TicketId) -> Ticket {
    TicketBuilder::new(id).build()
}

pub fn attachment(document_id: &str, name: &str) -> Attachment {
    Attachment {
        document_id: document_id.to_string(),
        name: name.to_string(),
        size: Some(1024),
        owner: Some(MOCK_USER_ID.to_string()),
        ..Default::default()
    }
}

pub fn comment(id: i64, content: &str) -> Comment {
    Comment {
        id: Some(id),
        content: content.to_string(),
        owner: Some(MOCK_USER_ID.to_string()),
        owner_name: Some("Jane Doe".to_string()),
        ..Default::default()
    }
}

pub fn staged(id: &str, title: &str) -> StagedAttachment {
    StagedAttachment::new(id, title, 2048)
}

pub fn protected_staged(id: &str, title: &str) -> StagedAttachment {
    StagedAttachment::new(id, title, 2048).protected()
}

/// A `bugtrackerissue` row in the double-encoded form older servers send
pub fn legacy_issue_row(issue_id: i64, linked_document: &str) -> IssueRow {
    let content = json!({
        "issue": {
            "id": issue_id,
            "subject": "Escalated ticket",
            "status": {"id": 1, "name": "New"},
            "journals": [{"id": 1, "notes": "Taken into account"}],
            "attachments": [{"id": 933, "filename": "report.pdf", "filesize": 4096}]
        }
    });
    let links = json!([{"id": 933, "document_id": linked_document, "gridfs_id": null}]);
    IssueRow {
        id: issue_id,
        content: json!(content.to_string()),
        attachments: json!(links.to_string()),
    }
}

/// A local administrator of `school-a` who knows two applications
pub fn admin_user() -> UserContext {
    UserContext {
        id: MOCK_USER_ID.to_string(),
        username: "jane.doe".to_string(),
        admin_schools: vec!["school-a".to_string()],
        apps: vec![
            App {
                name: "Workspace".to_string(),
                address: "/workspace/workspace".to_string(),
            },
            App {
                name: "Blog".to_string(),
                address: "/blog".to_string(),
            },
        ],
        schools: vec![School {
            id: "school-a".to_string(),
            name: "Lycée Victor Hugo".to_string(),
        }],
    }
}
