use serde::{Deserialize, Serialize};

use crate::api::SupportApi;
use crate::error::{Result, SupportError};
use crate::types::{EscalationStatus, TicketId, TicketStatus, null_as_default};

use super::issue::{decode_issue_row, link_attachments};
use super::{Attachment, Comment, Issue, StagedAttachment, TicketCollection};

/// A support ticket as the client holds it.
///
/// Fields the server maintains (`owner`, `created`, ...) are only read from
/// responses. `new_attachments`, `new_comment` and `processing` are form
/// state and never deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    pub id: Option<TicketId>,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Address of the application the ticket is about
    pub category: Option<String>,
    pub school_id: Option<String>,
    pub status: Option<TicketStatus>,
    #[serde(deserialize_with = "null_as_default")]
    pub escalation_status: EscalationStatus,

    pub owner: Option<String>,
    pub owner_name: Option<String>,
    pub profile: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub short_desc: Option<String>,
    pub event_count: Option<u32>,
    pub last_issue_update: Option<String>,

    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub issue: Option<Issue>,
    #[serde(skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    #[serde(skip)]
    pub new_attachments: Vec<StagedAttachment>,
    #[serde(skip)]
    pub new_comment: Option<String>,
    #[serde(skip)]
    pub processing: bool,
}

impl Ticket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TicketStatus {
        self.status.unwrap_or_default()
    }

    pub fn is_escalated(&self) -> bool {
        self.escalation_status == EscalationStatus::Successful
    }

    pub fn has_attachment(&self, document_id: &str) -> bool {
        self.attachments.iter().any(|a| a.document_id == document_id)
    }

    /// Copy the fields of a server record into this ticket.
    ///
    /// Absent fields in the record leave local values untouched, so a partial
    /// response never erases what the client already knows.
    pub fn merge(&mut self, record: Ticket) {
        fn keep<T>(local: &mut Option<T>, remote: Option<T>) {
            if remote.is_some() {
                *local = remote;
            }
        }

        keep(&mut self.id, record.id);
        if !record.subject.is_empty() {
            self.subject = record.subject;
        }
        if !record.description.is_empty() {
            self.description = record.description;
        }
        keep(&mut self.category, record.category);
        keep(&mut self.school_id, record.school_id);
        keep(&mut self.status, record.status);
        // NOT_DONE is also what an absent field decodes to
        if record.escalation_status != EscalationStatus::NotDone {
            self.escalation_status = record.escalation_status;
        }
        keep(&mut self.owner, record.owner);
        keep(&mut self.owner_name, record.owner_name);
        keep(&mut self.profile, record.profile);
        keep(&mut self.created, record.created);
        keep(&mut self.modified, record.modified);
        keep(&mut self.short_desc, record.short_desc);
        keep(&mut self.event_count, record.event_count);
        keep(&mut self.last_issue_update, record.last_issue_update);
    }

    fn begin(&mut self) -> Result<()> {
        if self.processing {
            return Err(SupportError::Busy);
        }
        self.processing = true;
        Ok(())
    }

    fn persisted_id(&self) -> Result<TicketId> {
        self.id.ok_or(SupportError::NotPersisted)
    }

    /// `POST /support/ticket`, then add the ticket to the collection.
    pub async fn create<A: SupportApi>(
        &mut self,
        api: &A,
        tickets: &mut TicketCollection,
    ) -> Result<()> {
        self.begin()?;
        let result = api.create_ticket(&self.to_payload()).await;
        self.processing = false;

        self.merge(result?);
        if self.status.is_none() {
            self.status = Some(TicketStatus::New);
        }
        tracing::info!("created ticket {:?}", self.id);
        tickets.push(self.clone());
        Ok(())
    }

    /// `PUT /support/ticket/:id`, then refresh the collection entry.
    pub async fn update<A: SupportApi>(
        &mut self,
        api: &A,
        tickets: &mut TicketCollection,
    ) -> Result<()> {
        let id = self.persisted_id()?;
        self.begin()?;
        let result = api.update_ticket(id, &self.to_payload()).await;
        self.processing = false;

        self.merge(result?);
        tracing::info!("updated ticket {}", id);
        tickets.upsert(self.clone());
        Ok(())
    }

    /// Load the comments; an empty answer keeps the current list.
    pub async fn load_comments<A: SupportApi>(&mut self, api: &A) -> Result<usize> {
        let id = self.persisted_id()?;
        let comments = api.ticket_comments(id).await?;
        let count = comments.len();
        if count > 0 {
            self.comments = comments;
        }
        Ok(count)
    }

    /// Load the attachments; an empty answer keeps the current list.
    pub async fn load_attachments<A: SupportApi>(&mut self, api: &A) -> Result<usize> {
        let id = self.persisted_id()?;
        let attachments = api.ticket_attachments(id).await?;
        let count = attachments.len();
        if count > 0 {
            self.attachments = attachments;
        }
        Ok(count)
    }

    /// Load the bug-tracker mirror and link its attachments to ours.
    ///
    /// Returns `false` when the server has no issue for this ticket.
    pub async fn load_bug_tracker_issue<A: SupportApi>(&mut self, api: &A) -> Result<bool> {
        let id = self.persisted_id()?;
        let rows = api.bug_tracker_issue(id).await?;
        let Some(row) = rows.first() else {
            return Ok(false);
        };
        let Some((mut issue, links)) = decode_issue_row(row)? else {
            return Ok(false);
        };

        let linked = link_attachments(&mut self.attachments, &mut issue, &links);
        tracing::debug!(
            "issue {} loaded for ticket {} ({} linked attachments)",
            issue.id,
            id,
            linked
        );
        self.issue = Some(issue);
        Ok(true)
    }

    /// Forward the ticket to the bug tracker.
    ///
    /// The escalation status goes to IN_PROGRESS before the call and
    /// observers are told so. Success stores the returned issue; a server
    /// error marks the escalation FAILED; a client error (the server refused,
    /// e.g. because the ticket is already escalated) resets it to NOT_DONE.
    pub async fn escalate<A: SupportApi>(
        &mut self,
        api: &A,
        tickets: &mut TicketCollection,
    ) -> Result<()> {
        let id = self.persisted_id()?;
        let status = self.status();
        if !status.allows_escalation() {
            return Err(SupportError::EscalationNotAllowed(status));
        }
        if !self
            .escalation_status
            .can_transition_to(EscalationStatus::InProgress)
        {
            return Err(SupportError::AlreadyEscalated(self.escalation_status));
        }

        self.begin()?;
        self.escalation_status = EscalationStatus::InProgress;
        tickets.set_escalation_status(id, self.escalation_status);

        let result = api.escalate_ticket(id).await;
        self.processing = false;

        let outcome: Result<()> = match result {
            Ok(document) => {
                self.escalation_status = EscalationStatus::Successful;
                self.last_issue_update = document.issue.updated_on.clone();
                self.issue = Some(document.issue);
                tracing::info!("ticket {} escalated", id);
                Ok(())
            }
            Err(failure) => {
                self.escalation_status = if failure.is_client_error() {
                    EscalationStatus::NotDone
                } else {
                    EscalationStatus::Failed
                };
                tracing::warn!("escalation of ticket {} failed: {}", id, failure);
                Err(failure.into())
            }
        };
        tickets.set_escalation_status(id, self.escalation_status);
        outcome
    }

    /// Send a comment to the bug tracker; the answer replaces the issue.
    pub async fn comment_issue<A: SupportApi>(&mut self, api: &A, content: &str) -> Result<()> {
        let issue_id = self
            .issue
            .as_ref()
            .map(|issue| issue.id)
            .ok_or(SupportError::NotEscalated)?;

        self.begin()?;
        let result = api.comment_issue(issue_id, content).await;
        self.processing = false;

        let document = result?;
        self.last_issue_update = document.issue.updated_on.clone();
        self.issue = Some(document.issue);
        Ok(())
    }
}
