//! Form validation for ticket create/edit and issue comments.
//!
//! Every check runs before any network call.

use std::collections::HashSet;

use crate::error::{Result, SupportError};
use crate::model::Ticket;
use crate::types::MAX_SUBJECT_LENGTH;

/// Validates a ticket subject.
///
/// Rules:
/// - Must not be empty or whitespace-only after trimming
/// - Must not exceed MAX_SUBJECT_LENGTH characters as sent, surrounding
///   whitespace included
pub fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(SupportError::EmptySubject);
    }

    let actual = subject.chars().count();
    if actual > MAX_SUBJECT_LENGTH {
        return Err(SupportError::SubjectTooLong {
            max: MAX_SUBJECT_LENGTH,
            actual,
        });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(SupportError::EmptyDescription);
    }
    Ok(())
}

/// Rejects a staging list holding the same document twice.
pub fn validate_staged_unique(ticket: &Ticket) -> Result<()> {
    let mut seen = HashSet::new();
    for staged in &ticket.new_attachments {
        if !seen.insert(staged.id.as_str()) {
            return Err(SupportError::DuplicateNewAttachment(staged.title.clone()));
        }
    }
    Ok(())
}

/// Rejects staged documents that are already attached to the ticket.
///
/// All offenders are reported, by name.
pub fn validate_not_linked(ticket: &Ticket) -> Result<()> {
    let linked: Vec<String> = ticket
        .new_attachments
        .iter()
        .filter(|staged| ticket.has_attachment(&staged.id))
        .map(|staged| staged.title.clone())
        .collect();

    if linked.is_empty() {
        Ok(())
    } else {
        Err(SupportError::AttachmentAlreadyLinked(linked))
    }
}

/// Checks run on submission of the create form
pub fn validate_new_ticket(ticket: &Ticket) -> Result<()> {
    validate_subject(&ticket.subject)?;
    validate_description(&ticket.description)?;
    validate_staged_unique(ticket)
}

/// Checks run on submission of the edit form
pub fn validate_edited_ticket(ticket: &Ticket) -> Result<()> {
    validate_new_ticket(ticket)?;
    validate_not_linked(ticket)
}

pub fn validate_comment(comment: &str) -> Result<()> {
    if comment.trim().is_empty() {
        return Err(SupportError::EmptyComment);
    }
    Ok(())
}
