//! Scripted in-memory implementation of the support API.
//!
//! The mock behaves like a small support server: created tickets get ids,
//! comments and attachments sent with an update are stored and returned by
//! the sub-resource calls. Every call is recorded so tests can assert what
//! went over the wire, and any operation can be made to fail.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use ent_support::api::{ApiFailure, ApiResult, DuplicatedDocument, ListScope, SupportApi};
use ent_support::model::{
    Attachment, Comment, Issue, IssueDocument, IssueRow, Journal, Ticket, TicketEvent,
    TicketPayload,
};
use ent_support::types::{EscalationStatus, TicketId, TicketStatus};
use parking_lot::Mutex;
use serde_json::Value;

pub const MOCK_USER_ID: &str = "user-1";

/// A recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListTickets(ListScope),
    CreateTicket(Value),
    UpdateTicket(TicketId, Value),
    Comments(TicketId),
    Attachments(TicketId),
    BugTrackerIssue(TicketId),
    Escalate(TicketId),
    CommentIssue(i64, String),
    UpdateStatus(TicketStatus, Vec<TicketId>),
    Events(TicketId),
    EscalationActivated,
    CommDirect,
    Duplicate(String),
}

/// Operations that can be scripted to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Comments,
    Attachments,
    BugTrackerIssue,
    Escalate,
    CommentIssue,
    UpdateStatus,
    Events,
}

#[derive(Debug, Clone)]
enum DuplicateOutcome {
    Refused,
    Failed(ApiFailure),
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    tickets: Vec<Ticket>,
    comments: HashMap<TicketId, Vec<Comment>>,
    attachments: HashMap<TicketId, Vec<Attachment>>,
    issue_rows: HashMap<TicketId, Vec<IssueRow>>,
    events: HashMap<TicketId, Vec<TicketEvent>>,
    failures: HashMap<Op, ApiFailure>,
    duplicates: HashMap<String, DuplicateOutcome>,
    escalation_activated: bool,
    comm_direct: bool,
    next_id: TicketId,
    next_issue_id: i64,
}

#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock();
            state.next_id = 100;
            state.next_issue_id = 4000;
        }
        api
    }

    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        let api = Self::new();
        api.state.lock().tickets = tickets;
        api
    }

    /// Make every call of an operation fail
    pub fn fail(&self, op: Op, failure: ApiFailure) {
        self.state.lock().failures.insert(op, failure);
    }

    pub fn recover(&self, op: Op) {
        self.state.lock().failures.remove(&op);
    }

    /// The duplication service answers with a non-ok status for this document
    pub fn refuse_duplicate(&self, document_id: &str) {
        self.state
            .lock()
            .duplicates
            .insert(document_id.to_string(), DuplicateOutcome::Refused);
    }

    pub fn fail_duplicate(&self, document_id: &str, failure: ApiFailure) {
        self.state
            .lock()
            .duplicates
            .insert(document_id.to_string(), DuplicateOutcome::Failed(failure));
    }

    pub fn set_comments(&self, id: TicketId, comments: Vec<Comment>) {
        self.state.lock().comments.insert(id, comments);
    }

    pub fn set_attachments(&self, id: TicketId, attachments: Vec<Attachment>) {
        self.state.lock().attachments.insert(id, attachments);
    }

    pub fn set_issue_rows(&self, id: TicketId, rows: Vec<IssueRow>) {
        self.state.lock().issue_rows.insert(id, rows);
    }

    pub fn set_events(&self, id: TicketId, events: Vec<TicketEvent>) {
        self.state.lock().events.insert(id, events);
    }

    pub fn set_escalation_activated(&self, activated: bool) {
        self.state.lock().escalation_activated = activated;
    }

    pub fn set_comm_direct(&self, direct: bool) {
        self.state.lock().comm_direct = direct;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Calls that reach the ticket resources (everything but duplication)
    pub fn ticket_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Duplicate(_)))
            .collect()
    }

    pub fn duplicated(&self) -> HashSet<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Duplicate(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn stored_ticket(&self, id: TicketId) -> Option<Ticket> {
        self.state
            .lock()
            .tickets
            .iter()
            .find(|t| t.id == Some(id))
            .cloned()
    }

    fn record(&self, call: Call, op: Option<Op>) -> ApiResult<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match op.and_then(|op| state.failures.get(&op)) {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

fn payload_value(payload: &TicketPayload) -> Value {
    serde_json::to_value(payload).expect("payload should serialize")
}

fn store_attachments(state: &mut MockState, id: TicketId, payload: &TicketPayload) {
    let stored = state.attachments.entry(id).or_default();
    for attachment in &payload.attachments {
        stored.push(Attachment {
            id: Some(stored.len() as i64 + 1),
            document_id: attachment.id.clone(),
            name: attachment.name.clone(),
            size: Some(attachment.size),
            owner: Some(MOCK_USER_ID.to_string()),
            ..Default::default()
        });
    }
}

impl SupportApi for MockApi {
    async fn list_tickets(&self, scope: ListScope) -> ApiResult<Vec<Ticket>> {
        self.record(Call::ListTickets(scope), Some(Op::List))?;
        let state = self.state.lock();
        Ok(state
            .tickets
            .iter()
            .filter(|t| scope == ListScope::Visible || t.owner.as_deref() == Some(MOCK_USER_ID))
            .cloned()
            .collect())
    }

    async fn create_ticket(&self, payload: &TicketPayload) -> ApiResult<Ticket> {
        self.record(Call::CreateTicket(payload_value(payload)), Some(Op::Create))?;
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let ticket = Ticket {
            id: Some(id),
            subject: payload.subject.clone(),
            description: payload.description.clone(),
            category: payload.category.clone(),
            school_id: payload.school_id.clone(),
            status: Some(TicketStatus::New),
            owner: Some(MOCK_USER_ID.to_string()),
            owner_name: Some("Jane Doe".to_string()),
            created: Some("2016-03-10T14:22:05.123".to_string()),
            modified: Some("2016-03-10T14:22:05.123".to_string()),
            ..Default::default()
        };
        store_attachments(&mut state, id, payload);
        state.tickets.push(ticket.clone());
        // The server answers with the generated fields only
        Ok(Ticket {
            id: ticket.id,
            status: ticket.status,
            owner: ticket.owner,
            created: ticket.created,
            modified: ticket.modified,
            ..Default::default()
        })
    }

    async fn update_ticket(&self, id: TicketId, payload: &TicketPayload) -> ApiResult<Ticket> {
        self.record(
            Call::UpdateTicket(id, payload_value(payload)),
            Some(Op::Update),
        )?;
        let mut state = self.state.lock();
        if let Some(comment) = &payload.new_comment {
            let comments = state.comments.entry(id).or_default();
            comments.push(Comment {
                id: Some(comments.len() as i64 + 1),
                content: comment.clone(),
                owner: Some(MOCK_USER_ID.to_string()),
                ..Default::default()
            });
        }
        store_attachments(&mut state, id, payload);

        let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == Some(id)) else {
            return Err(ApiFailure::client(Some("support.ticket.not.found")));
        };
        ticket.subject = payload.subject.clone();
        ticket.description = payload.description.clone();
        ticket.category = payload.category.clone();
        ticket.school_id = payload.school_id.clone();
        if payload.status.is_some() {
            ticket.status = payload.status;
        }
        ticket.modified = Some("2016-03-11T09:00:00.000".to_string());
        Ok(ticket.clone())
    }

    async fn ticket_comments(&self, id: TicketId) -> ApiResult<Vec<Comment>> {
        self.record(Call::Comments(id), Some(Op::Comments))?;
        Ok(self.state.lock().comments.get(&id).cloned().unwrap_or_default())
    }

    async fn ticket_attachments(&self, id: TicketId) -> ApiResult<Vec<Attachment>> {
        self.record(Call::Attachments(id), Some(Op::Attachments))?;
        Ok(self
            .state
            .lock()
            .attachments
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn bug_tracker_issue(&self, id: TicketId) -> ApiResult<Vec<IssueRow>> {
        self.record(Call::BugTrackerIssue(id), Some(Op::BugTrackerIssue))?;
        Ok(self
            .state
            .lock()
            .issue_rows
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn escalate_ticket(&self, id: TicketId) -> ApiResult<IssueDocument> {
        self.record(Call::Escalate(id), Some(Op::Escalate))?;
        let mut state = self.state.lock();
        let issue_id = state.next_issue_id;
        state.next_issue_id += 1;

        let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == Some(id)) else {
            return Err(ApiFailure::client(Some("support.ticket.not.found")));
        };
        ticket.escalation_status = EscalationStatus::Successful;
        Ok(IssueDocument {
            issue: Issue {
                id: issue_id,
                subject: ticket.subject.clone(),
                description: Some(ticket.description.clone()),
                updated_on: Some("2016-03-12T08:00:00Z".to_string()),
                ..Default::default()
            },
        })
    }

    async fn comment_issue(&self, issue_id: i64, content: &str) -> ApiResult<IssueDocument> {
        self.record(
            Call::CommentIssue(issue_id, content.to_string()),
            Some(Op::CommentIssue),
        )?;
        Ok(IssueDocument {
            issue: Issue {
                id: issue_id,
                updated_on: Some("2016-03-13T08:00:00Z".to_string()),
                journals: vec![Journal {
                    id: 1,
                    notes: Some(content.to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            },
        })
    }

    async fn update_status(&self, status: TicketStatus, ids: &[TicketId]) -> ApiResult<()> {
        self.record(
            Call::UpdateStatus(status, ids.to_vec()),
            Some(Op::UpdateStatus),
        )?;
        let mut state = self.state.lock();
        for ticket in state.tickets.iter_mut() {
            if ticket.id.is_some_and(|id| ids.contains(&id)) {
                ticket.status = Some(status);
            }
        }
        Ok(())
    }

    async fn ticket_events(&self, id: TicketId) -> ApiResult<Vec<TicketEvent>> {
        self.record(Call::Events(id), Some(Op::Events))?;
        Ok(self.state.lock().events.get(&id).cloned().unwrap_or_default())
    }

    async fn escalation_activated(&self) -> ApiResult<bool> {
        self.record(Call::EscalationActivated, None)?;
        Ok(self.state.lock().escalation_activated)
    }

    async fn bug_tracker_comm_direct(&self) -> ApiResult<bool> {
        self.record(Call::CommDirect, None)?;
        Ok(self.state.lock().comm_direct)
    }

    async fn duplicate_attachment(&self, document_id: &str) -> ApiResult<DuplicatedDocument> {
        self.record(Call::Duplicate(document_id.to_string()), None)?;
        let outcome = self.state.lock().duplicates.get(document_id).cloned();
        match outcome {
            Some(DuplicateOutcome::Failed(failure)) => Err(failure),
            Some(DuplicateOutcome::Refused) => Ok(DuplicatedDocument {
                id: String::new(),
                status: "ko".to_string(),
            }),
            None => Ok(DuplicatedDocument {
                id: format!("protected-{document_id}"),
                status: "ok".to_string(),
            }),
        }
    }
}
