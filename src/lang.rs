//! Translation lookup for notification and label keys.
//!
//! The platform serves translations per locale; this module carries the
//! default (English) bundle used by the command-line front end. Unknown keys
//! translate to themselves, which is also how server-supplied messages that
//! are not keys end up displayed verbatim.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static DEFAULT_BUNDLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Ticket statuses
        ("support.ticket.status.new", "New"),
        ("support.ticket.status.opened", "Opened"),
        ("support.ticket.status.resolved", "Resolved"),
        ("support.ticket.status.closed", "Closed"),
        // Escalation statuses
        ("support.ticket.escalation.status.not.done", "Not escalated"),
        ("support.ticket.escalation.status.in.progress", "Escalation in progress"),
        ("support.ticket.escalation.status.successful", "Escalated"),
        ("support.ticket.escalation.status.failed", "Escalation failed"),
        // Validation
        (
            "support.ticket.validation.error.subject.is.empty",
            "The subject is required",
        ),
        (
            "support.ticket.validation.error.subject.too.long",
            "The subject cannot exceed {0} characters",
        ),
        (
            "support.ticket.validation.error.description.is.empty",
            "The description is required",
        ),
        (
            "support.ticket.validation.error.duplicate.in.new.attachments",
            "The file {0} has been added twice",
        ),
        (
            "support.ticket.validation.error.attachment.already.linked",
            "The file {0} is already attached to this ticket",
        ),
        (
            "support.ticket.validation.error.attachments.already.linked",
            "The files {0} are already attached to this ticket",
        ),
        (
            "support.issue.validation.error.comment.is.empty",
            "The comment is required",
        ),
        (
            "support.ticket.escalation.not.allowed.for.status",
            "A ticket with status {0} cannot be escalated",
        ),
        // Outcomes
        ("support.ticket.has.been.created", "The ticket has been created"),
        ("support.ticket.has.been.updated", "The ticket has been updated"),
        (
            "support.ticket.escalation.successful",
            "The ticket has been escalated to the bug tracker",
        ),
        (
            "support.ticket.escalation.failed",
            "The ticket could not be escalated to the bug tracker",
        ),
        (
            "support.error.escalation.conflict",
            "The ticket cannot be escalated: it is closed, resolved or already escalated",
        ),
        (
            "support.issue.comment.has.been.added",
            "The comment has been sent to the bug tracker",
        ),
        (
            "support.ticket.status.has.been.updated",
            "The status of {0} ticket(s) has been updated",
        ),
        ("support.ticket.not.found", "Ticket {0} not found"),
        (
            "support.ticket.not.escalated",
            "This ticket has not been escalated",
        ),
        (
            "support.request.in.progress",
            "A request is already in progress for this ticket",
        ),
        (
            "support.attachment.protected.copy.error",
            "The file {0} could not be shared with the ticket participants",
        ),
        ("support.error.server", "The server could not process the request"),
        ("support.error.network", "The server could not be reached"),
        ("support.error.unexpected", "An unexpected error occurred"),
        // History
        ("support.ticket.histo.creation", "Ticket created"),
        ("support.ticket.histo.modification", "Ticket updated"),
        ("support.ticket.histo.add.comment", "Comment added"),
        ("support.ticket.histo.escalate", "Ticket escalated"),
        (
            "support.ticket.histo.bug.tracker.comment",
            "Comment received from the bug tracker",
        ),
        (
            "support.ticket.histo.bug.tracker.update",
            "Bug tracker issue updated",
        ),
    ])
});

/// Translate a key, falling back to the key itself.
pub fn translate(key: &str) -> String {
    DEFAULT_BUNDLE
        .get(key)
        .map(|s| s.to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Translate a key and substitute positional `{n}` placeholders.
pub fn translate_with(key: &str, args: &[String]) -> String {
    let mut text = translate(key);
    for (i, arg) in args.iter().enumerate() {
        text = text.replace(&format!("{{{i}}}"), arg);
    }
    text
}
