//! Client-side ticket model.
//!
//! A [`Ticket`] carries its nested comments and attachments, serializes
//! itself to the wire format ([`TicketPayload`]) and performs its remote
//! operations through a [`SupportApi`](crate::api::SupportApi). Tickets live
//! in a [`TicketCollection`] that broadcasts [`ModelEvent`]s to observers.

mod collection;
mod issue;
mod payload;
mod ticket;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SupportError;
use crate::types::{EventType, TicketStatus};

pub use collection::{ModelEvent, TicketCollection};
pub use issue::{
    AttachmentLink, Issue, IssueAttachment, IssueDocument, IssueRow, Journal, NamedRef,
    decode_issue_row, link_attachments,
};
pub use payload::{PayloadAttachment, TicketPayload};
pub use ticket::Ticket;

/// A comment posted on a ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: Option<i64>,
    pub content: String,
    pub owner: Option<String>,
    pub owner_name: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

/// A workspace document linked to a ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub id: Option<i64>,
    /// Workspace document id
    pub document_id: String,
    pub name: String,
    pub size: Option<u64>,
    pub owner: Option<String>,
    pub owner_name: Option<String>,
    pub created: Option<String>,
    /// Id of the same file on the bug tracker, once escalated
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub bug_tracker_id: Option<i64>,
}

/// Metadata block of a workspace document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub size: u64,
}

/// A workspace document picked in the form, not yet linked to the ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAttachment {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    /// Protected documents are visible to every participant of the ticket
    #[serde(default)]
    pub protected: bool,
}

impl StagedAttachment {
    pub fn new(id: impl Into<String>, title: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            metadata: DocumentMetadata { size },
            protected: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    pub fn size(&self) -> u64 {
        self.metadata.size
    }
}

impl FromStr for StagedAttachment {
    type Err = SupportError;

    /// Parse `ID:NAME:SIZE` with an optional `:protected` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SupportError::InvalidAttachment(s.to_string());
        let parts: Vec<&str> = s.split(':').collect();
        let (id, name, size, protected) = match parts.as_slice() {
            [id, name, size] => (*id, *name, *size, false),
            [id, name, size, "protected"] => (*id, *name, *size, true),
            _ => return Err(invalid()),
        };
        if id.is_empty() || name.is_empty() {
            return Err(invalid());
        }
        let size: u64 = size.parse().map_err(|_| invalid())?;

        let attachment = StagedAttachment::new(id, name, size);
        Ok(if protected {
            attachment.protected()
        } else {
            attachment
        })
    }
}

/// An entry in a ticket's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketEvent {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<EventType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_attachment_from_str() {
        let a: StagedAttachment = "doc-1:report.pdf:2048".parse().unwrap();
        assert_eq!(a.id, "doc-1");
        assert_eq!(a.title, "report.pdf");
        assert_eq!(a.size(), 2048);
        assert!(!a.protected);

        let p: StagedAttachment = "doc-2:photo.png:10:protected".parse().unwrap();
        assert!(p.protected);
    }

    #[test]
    fn test_staged_attachment_from_str_invalid() {
        assert!("doc-1".parse::<StagedAttachment>().is_err());
        assert!("doc-1:name:big".parse::<StagedAttachment>().is_err());
        assert!(":name:10".parse::<StagedAttachment>().is_err());
        assert!("doc-1:name:10:public".parse::<StagedAttachment>().is_err());
    }

    #[test]
    fn test_staged_attachment_workspace_shape() {
        let json = r#"{"_id":"abc","title":"cv.odt","metadata":{"size":77,"content-type":"x"}}"#;
        let a: StagedAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(a.id, "abc");
        assert_eq!(a.size(), 77);
        assert!(!a.protected);
    }

    #[test]
    fn test_ticket_event_deserialization() {
        let json = r#"{"username":"Jane","event":"Ticket created","status":1,
            "event_date":"2016-03-10T14:22:05.123","user_id":"u-1","event_type":1}"#;
        let event: TicketEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.status, Some(TicketStatus::New));
        assert_eq!(event.event_type, Some(EventType::Created));
    }
}
