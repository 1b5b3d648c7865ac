use owo_colors::OwoColorize;

use crate::controller::{Notification, NotificationLevel};
use crate::lang;
use crate::types::{EscalationStatus, TicketStatus};

pub mod ticket;

pub use ticket::*;

pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Format a server timestamp for display.
///
/// Ticket dates come without offset (`2016-03-10T14:22:05.123`), bug-tracker
/// dates in UTC (`2016-03-12T08:00:00Z`). Anything else is shown as is.
pub fn format_date(value: &str) -> String {
    if let Ok(timestamp) = value.parse::<jiff::Timestamp>() {
        return timestamp.strftime(DATE_FORMAT).to_string();
    }
    if let Ok(datetime) = value.parse::<jiff::civil::DateTime>() {
        return datetime.strftime(DATE_FORMAT).to_string();
    }
    value.to_string()
}

pub fn format_optional_date(value: Option<&str>) -> String {
    value.map(format_date).unwrap_or_else(|| "-".to_string())
}

pub fn status_label(status: TicketStatus) -> String {
    lang::translate(status.i18n_key())
}

pub fn format_status_colored(status: TicketStatus) -> String {
    let label = status_label(status);
    match status {
        TicketStatus::New => label.yellow().to_string(),
        TicketStatus::Opened => label.cyan().to_string(),
        TicketStatus::Resolved => label.green().to_string(),
        TicketStatus::Closed => label.dimmed().to_string(),
    }
}

pub fn format_escalation_colored(status: EscalationStatus) -> String {
    let label = lang::translate(status.i18n_key());
    match status {
        EscalationStatus::NotDone => label.dimmed().to_string(),
        EscalationStatus::InProgress => label.yellow().to_string(),
        EscalationStatus::Successful => label.green().to_string(),
        EscalationStatus::Failed => label.red().to_string(),
    }
}

/// One line per notification, colored by level
pub fn format_notification(notification: &Notification) -> String {
    let message = notification.message();
    match notification.level {
        NotificationLevel::Info => message.cyan().to_string(),
        NotificationLevel::Success => message.green().to_string(),
        NotificationLevel::Error => format!("{} {}", "error:".red().bold(), message),
    }
}
