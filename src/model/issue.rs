//! Bug-tracker mirror of an escalated ticket.
//!
//! The tracker answers with a Redmine-shaped issue document. The
//! `bugtrackerissue` endpoint stores that document in a text column, so older
//! servers send `content` and `attachments` as JSON strings that have to be
//! parsed a second time; newer ones send them as plain JSON values.
//! [`decode_issue_row`] accepts both.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

use super::Attachment;

/// `{id, name}` reference used by the tracker for statuses and users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// A comment or change entry on the tracker side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Journal {
    pub id: i64,
    pub user: Option<NamedRef>,
    pub notes: Option<String>,
    pub created_on: Option<String>,
}

impl Journal {
    /// Journals without notes only record field changes
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueAttachment {
    pub id: i64,
    pub filename: String,
    pub filesize: Option<u64>,
    pub content_type: Option<String>,
    pub content_url: Option<String>,
    pub created_on: Option<String>,
    /// Workspace document this file came from, if it was sent from the ENT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Storage id of a file received from the tracker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridfs_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: i64,
    pub subject: String,
    pub description: Option<String>,
    pub status: Option<NamedRef>,
    pub author: Option<NamedRef>,
    pub created_on: Option<String>,
    pub updated_on: Option<String>,
    pub journals: Vec<Journal>,
    pub attachments: Vec<IssueAttachment>,
}

impl Issue {
    /// Journals carrying a comment, oldest first
    pub fn comments(&self) -> impl Iterator<Item = &Journal> {
        self.journals.iter().filter(|j| j.has_notes())
    }
}

/// `{issue: {...}}` body returned by escalate and comment calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueDocument {
    pub issue: Issue,
}

/// Row of the `bugtrackerissue` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueRow {
    pub id: i64,
    pub content: Value,
    pub attachments: Value,
}

/// Link between a tracker attachment and its ENT file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentLink {
    pub id: i64,
    pub document_id: Option<String>,
    pub gridfs_id: Option<String>,
}

/// Decode a field that may hold a JSON-encoded string or the value itself.
fn decode_field<T: DeserializeOwned + Default>(value: &Value) -> Result<T> {
    match value {
        Value::Null => Ok(T::default()),
        Value::String(text) if text.trim().is_empty() => Ok(T::default()),
        Value::String(text) => Ok(serde_json::from_str(text)?),
        other => Ok(T::deserialize(other)?),
    }
}

/// Decode a `bugtrackerissue` row into its issue and attachment links.
///
/// Returns `None` when the row carries no issue document.
pub fn decode_issue_row(row: &IssueRow) -> Result<Option<(Issue, Vec<AttachmentLink>)>> {
    let document: Option<IssueDocument> = decode_field(&row.content)?;
    let Some(document) = document else {
        return Ok(None);
    };
    let links: Vec<AttachmentLink> = decode_field(&row.attachments)?;
    Ok(Some((document.issue, links)))
}

/// Cross-reference workspace attachments and tracker attachments.
///
/// A link whose `document_id` matches a workspace attachment gives that
/// attachment its tracker id; the tracker attachment with the link's id gets
/// the link's `document_id` and `gridfs_id`. Returns the number of linked
/// workspace attachments.
pub fn link_attachments(
    attachments: &mut [Attachment],
    issue: &mut Issue,
    links: &[AttachmentLink],
) -> usize {
    let mut linked = 0;
    for link in links {
        if let Some(document_id) = &link.document_id
            && let Some(attachment) = attachments
                .iter_mut()
                .find(|a| &a.document_id == document_id)
        {
            attachment.bug_tracker_id = Some(link.id);
            linked += 1;
        }

        if let Some(remote) = issue.attachments.iter_mut().find(|a| a.id == link.id) {
            remote.document_id = link.document_id.clone();
            remote.gridfs_id = link.gridfs_id.clone();
        }
    }
    linked
}
