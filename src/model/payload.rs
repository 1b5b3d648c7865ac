use serde::Serialize;

use crate::types::TicketStatus;

use super::Ticket;

/// Attachment reference sent with a create/update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadAttachment {
    pub id: String,
    pub name: String,
    pub size: u64,
}

/// Wire representation of a ticket submitted to the server.
///
/// `subject`, `description`, `category` and `school_id` are always present;
/// `status`, `newComment` and `attachments` only when set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPayload {
    pub subject: String,
    pub description: String,
    pub category: Option<String>,
    pub school_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(rename = "newComment", skip_serializing_if = "Option::is_none")]
    pub new_comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<PayloadAttachment>,
}

impl Ticket {
    pub fn to_payload(&self) -> TicketPayload {
        TicketPayload {
            subject: self.subject.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            school_id: self.school_id.clone(),
            status: self.status,
            new_comment: self.new_comment.clone(),
            attachments: self
                .new_attachments
                .iter()
                .map(|a| PayloadAttachment {
                    id: a.id.clone(),
                    name: a.title.clone(),
                    size: a.size(),
                })
                .collect(),
        }
    }
}
