use thiserror::Error;

use crate::api::ApiFailure;
use crate::types::{EscalationStatus, TicketStatus};

#[derive(Error, Debug)]
pub enum SupportError {
    // Form validation errors
    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("subject too long: {actual} characters (max: {max})")]
    SubjectTooLong { max: usize, actual: usize },

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("attachment '{0}' is staged more than once")]
    DuplicateNewAttachment(String),

    #[error("{}", already_linked_message(.0))]
    AttachmentAlreadyLinked(Vec<String>),

    #[error("comment cannot be empty")]
    EmptyComment,

    // Lifecycle errors
    #[error("escalation is not allowed for a ticket with status '{0}'")]
    EscalationNotAllowed(TicketStatus),

    #[error("ticket escalation is already {0}")]
    AlreadyEscalated(EscalationStatus),

    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("ticket has not been saved yet")]
    NotPersisted,

    #[error("ticket has not been escalated to the bug tracker")]
    NotEscalated,

    #[error("a request is already in progress for this ticket")]
    Busy,

    #[error("no ticket is open")]
    NoOpenTicket,

    #[error("protected copy of attachment '{name}' failed: {reason}")]
    ProtectedCopyFailed { name: String, reason: String },

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid attachment '{0}': expected ID:NAME:SIZE[:protected]")]
    InvalidAttachment(String),

    // Remote errors
    #[error("{0}")]
    Api(#[from] ApiFailure),

    /// A controller operation failed; carries the translated notification
    #[error("{0}")]
    OperationFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn already_linked_message(names: &[String]) -> String {
    match names {
        [name] => format!("attachment '{name}' is already linked to this ticket"),
        _ => format!(
            "attachments '{}' are already linked to this ticket",
            names.join("', '")
        ),
    }
}

impl SupportError {
    /// Translation key used when the error is shown as a notification.
    ///
    /// Remote errors carrying a server-supplied message use that message as
    /// the key: the server answers with translation keys, and unknown keys
    /// are displayed verbatim.
    pub fn i18n_key(&self) -> String {
        let key = match self {
            SupportError::EmptySubject => "support.ticket.validation.error.subject.is.empty",
            SupportError::SubjectTooLong { .. } => {
                "support.ticket.validation.error.subject.too.long"
            }
            SupportError::EmptyDescription => {
                "support.ticket.validation.error.description.is.empty"
            }
            SupportError::DuplicateNewAttachment(_) => {
                "support.ticket.validation.error.duplicate.in.new.attachments"
            }
            SupportError::AttachmentAlreadyLinked(names) if names.len() == 1 => {
                "support.ticket.validation.error.attachment.already.linked"
            }
            SupportError::AttachmentAlreadyLinked(_) => {
                "support.ticket.validation.error.attachments.already.linked"
            }
            SupportError::EmptyComment => "support.issue.validation.error.comment.is.empty",
            SupportError::EscalationNotAllowed(_) => {
                "support.ticket.escalation.not.allowed.for.status"
            }
            SupportError::AlreadyEscalated(_) => "support.error.escalation.conflict",
            SupportError::TicketNotFound(_) => "support.ticket.not.found",
            SupportError::NotEscalated => "support.ticket.not.escalated",
            SupportError::Busy => "support.request.in.progress",
            SupportError::ProtectedCopyFailed { .. } => {
                "support.attachment.protected.copy.error"
            }
            SupportError::Api(failure) => return failure.i18n_key(),
            _ => "support.error.unexpected",
        };
        key.to_string()
    }

    /// Values substituted into the translated message (`{0}`, `{1}`, ...).
    pub fn i18n_args(&self) -> Vec<String> {
        match self {
            SupportError::SubjectTooLong { max, .. } => vec![max.to_string()],
            SupportError::DuplicateNewAttachment(name) => vec![name.clone()],
            SupportError::AttachmentAlreadyLinked(names) => vec![names.join(", ")],
            SupportError::EscalationNotAllowed(status) => {
                vec![crate::lang::translate(status.i18n_key())]
            }
            SupportError::TicketNotFound(id) => vec![id.clone()],
            SupportError::ProtectedCopyFailed { name, .. } => vec![name.clone()],
            SupportError::Config(msg) => vec![msg.clone()],
            _ => vec![],
        }
    }

    /// True for errors raised by local validation, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SupportError::EmptySubject
                | SupportError::SubjectTooLong { .. }
                | SupportError::EmptyDescription
                | SupportError::DuplicateNewAttachment(_)
                | SupportError::AttachmentAlreadyLinked(_)
                | SupportError::EmptyComment
                | SupportError::EscalationNotAllowed(_)
                | SupportError::AlreadyEscalated(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SupportError>;
