//! Text rendering of tickets, issues and history.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::model::{Issue, Ticket, TicketEvent};
use crate::user::UserContext;

use super::{
    format_date, format_escalation_colored, format_optional_date, format_status_colored,
    status_label,
};

/// A row in the ticket list table
#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

const SUBJECT_WIDTH: usize = 48;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Ticket list as a table
pub fn format_ticket_table(tickets: &[&Ticket], user: &UserContext) -> String {
    let rows: Vec<TicketRow> = tickets
        .iter()
        .map(|ticket| TicketRow {
            id: ticket.id.map(|id| id.to_string()).unwrap_or_default(),
            status: status_label(ticket.status()),
            subject: truncate(&ticket.subject, SUBJECT_WIDTH),
            category: ticket
                .category
                .as_deref()
                .map(|address| user.app_name(address).unwrap_or(address).to_string())
                .unwrap_or_default(),
            owner: ticket.owner_name.clone().unwrap_or_default(),
            modified: format_optional_date(ticket.modified.as_deref()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Full ticket with its comments and attachments
pub fn format_ticket_detail(ticket: &Ticket, user: &UserContext) -> String {
    let mut out = String::new();
    let id = ticket.id.map(|id| format!("#{id}")).unwrap_or_default();

    out.push_str(&format!("{} {}\n", id.cyan().bold(), ticket.subject.bold()));
    out.push_str(&format!(
        "{}: {}\n",
        "Status".cyan(),
        format_status_colored(ticket.status())
    ));
    out.push_str(&format!(
        "{}: {}\n",
        "Escalation".cyan(),
        format_escalation_colored(ticket.escalation_status)
    ));
    if let Some(category) = &ticket.category {
        let label = user.app_name(category).unwrap_or(category.as_str());
        out.push_str(&format!("{}: {}\n", "Category".cyan(), label));
    }
    if let Some(school_id) = &ticket.school_id {
        let label = user.school_name(school_id).unwrap_or(school_id.as_str());
        out.push_str(&format!("{}: {}\n", "School".cyan(), label));
    }
    if let Some(owner) = &ticket.owner_name {
        let profile = ticket
            .profile
            .as_deref()
            .map(|p| format!(" ({p})"))
            .unwrap_or_default();
        out.push_str(&format!("{}: {}{}\n", "Owner".cyan(), owner, profile));
    }
    out.push_str(&format!(
        "{}: {}  {}: {}\n",
        "Created".cyan(),
        format_optional_date(ticket.created.as_deref()),
        "Modified".cyan(),
        format_optional_date(ticket.modified.as_deref()),
    ));

    out.push('\n');
    out.push_str(ticket.description.trim_end());
    out.push('\n');

    if !ticket.attachments.is_empty() {
        out.push_str(&format!("\n{}\n", "Attachments".cyan().bold()));
        for attachment in &ticket.attachments {
            let size = attachment
                .size
                .map(|s| format!(" ({s} bytes)"))
                .unwrap_or_default();
            let tracker = if attachment.bug_tracker_id.is_some() {
                format!(" {}", "[bug tracker]".dimmed())
            } else {
                String::new()
            };
            out.push_str(&format!(
                "  - {}{}{}\n",
                attachment.name, size, tracker
            ));
        }
    }

    if !ticket.comments.is_empty() {
        out.push_str(&format!("\n{}\n", "Comments".cyan().bold()));
        for comment in &ticket.comments {
            out.push_str(&format!(
                "  {} {}\n    {}\n",
                comment.owner_name.as_deref().unwrap_or("?").bold(),
                format_optional_date(comment.created.as_deref()).dimmed(),
                comment.content.trim_end()
            ));
        }
    }
    out
}

/// Bug-tracker issue with its comment thread
pub fn format_issue(issue: &Issue) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        format!("Issue #{}", issue.id).cyan().bold(),
        issue.subject.bold()
    ));
    if let Some(status) = &issue.status {
        out.push_str(&format!("{}: {}\n", "Status".cyan(), status.name));
    }
    if let Some(updated) = &issue.updated_on {
        out.push_str(&format!("{}: {}\n", "Updated".cyan(), format_date(updated)));
    }

    if !issue.attachments.is_empty() {
        out.push_str(&format!("\n{}\n", "Attachments".cyan().bold()));
        for attachment in &issue.attachments {
            out.push_str(&format!("  - {}\n", attachment.filename));
        }
    }

    let comments: Vec<_> = issue.comments().collect();
    if !comments.is_empty() {
        out.push_str(&format!("\n{}\n", "Comments".cyan().bold()));
        for journal in comments {
            let author = journal
                .user
                .as_ref()
                .map(|u| u.name.as_str())
                .unwrap_or("?");
            out.push_str(&format!(
                "  {} {}\n    {}\n",
                author.bold(),
                format_optional_date(journal.created_on.as_deref()).dimmed(),
                journal.notes.as_deref().unwrap_or("").trim_end()
            ));
        }
    }
    out
}

/// History of a ticket, oldest first
pub fn format_events(events: &[TicketEvent]) -> String {
    let mut out = String::new();
    for event in events {
        let label = event
            .event_type
            .map(|t| crate::lang::translate(t.i18n_key()))
            .unwrap_or_else(|| event.event.clone());
        let status = event
            .status
            .map(|s| format!(" [{}]", status_label(s)))
            .unwrap_or_default();
        out.push_str(&format!(
            "{} {} {}{}\n",
            format_optional_date(event.event_date.as_deref()).dimmed(),
            event.username.as_deref().unwrap_or("?").cyan(),
            label,
            status
        ));
    }
    out
}
