//! Support REST API transport.
//!
//! `SupportApi` is the seam between the ticket model and the platform: the
//! model and controller only ever talk to this trait, and `HttpSupportApi`
//! implements it over HTTP.

pub mod error;
pub mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::model::{
    Attachment, Comment, IssueDocument, IssueRow, Ticket, TicketEvent, TicketPayload,
};
use crate::types::{TicketId, TicketStatus};

pub use error::{ApiFailure, FailureKind};
pub use http::HttpSupportApi;

pub type ApiResult<T> = std::result::Result<T, ApiFailure>;

/// Which tickets a list call returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    /// Every ticket visible to the caller (own tickets, plus the tickets of
    /// administered schools for local administrators)
    #[default]
    Visible,
    /// Only the caller's own tickets
    Mine,
}

/// Response of the workspace duplication service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatedDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: String,
}

impl DuplicatedDocument {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Common interface for the support backend
pub trait SupportApi: Send + Sync {
    /// `GET /support/tickets` or `GET /support/tickets/mine`
    fn list_tickets(&self, scope: ListScope)
    -> impl Future<Output = ApiResult<Vec<Ticket>>> + Send;

    /// `POST /support/ticket`
    fn create_ticket(
        &self,
        payload: &TicketPayload,
    ) -> impl Future<Output = ApiResult<Ticket>> + Send;

    /// `PUT /support/ticket/:id`
    fn update_ticket(
        &self,
        id: TicketId,
        payload: &TicketPayload,
    ) -> impl Future<Output = ApiResult<Ticket>> + Send;

    /// `GET /support/ticket/:id/comments`
    fn ticket_comments(&self, id: TicketId)
    -> impl Future<Output = ApiResult<Vec<Comment>>> + Send;

    /// `GET /support/ticket/:id/attachments`
    fn ticket_attachments(
        &self,
        id: TicketId,
    ) -> impl Future<Output = ApiResult<Vec<Attachment>>> + Send;

    /// `GET /support/ticket/:id/bugtrackerissue`
    fn bug_tracker_issue(
        &self,
        id: TicketId,
    ) -> impl Future<Output = ApiResult<Vec<IssueRow>>> + Send;

    /// `POST /support/ticket/:id/escalate`
    fn escalate_ticket(
        &self,
        id: TicketId,
    ) -> impl Future<Output = ApiResult<IssueDocument>> + Send;

    /// `POST /support/issue/:id/comment`
    fn comment_issue(
        &self,
        issue_id: i64,
        content: &str,
    ) -> impl Future<Output = ApiResult<IssueDocument>> + Send;

    /// `POST /support/ticketstatus/:newStatus`
    fn update_status(
        &self,
        status: TicketStatus,
        ids: &[TicketId],
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// `GET /support/events/:id`
    fn ticket_events(
        &self,
        id: TicketId,
    ) -> impl Future<Output = ApiResult<Vec<TicketEvent>>> + Send;

    /// `GET /support/escalation`
    fn escalation_activated(&self) -> impl Future<Output = ApiResult<bool>> + Send;

    /// `GET /support/isBugTrackerCommDirect`
    fn bug_tracker_comm_direct(&self) -> impl Future<Output = ApiResult<bool>> + Send;

    /// Duplicate a workspace document into a protected copy
    fn duplicate_attachment(
        &self,
        document_id: &str,
    ) -> impl Future<Output = ApiResult<DuplicatedDocument>> + Send;
}
