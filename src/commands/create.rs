use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect, notification_json, notification_text, settle};
use crate::error::{Result, SupportError};
use crate::model::StagedAttachment;

/// Options for creating a ticket
pub struct CreateOptions {
    pub subject: String,
    pub description: String,
    /// Application address, or application name as known to the user
    pub category: Option<String>,
    pub school_id: Option<String>,
    pub attachments: Vec<StagedAttachment>,
}

/// Create a new ticket
pub async fn cmd_create(options: CreateOptions, output_json: bool) -> Result<()> {
    let mut controller = connect()?;

    let category = options
        .category
        .map(|category| resolve_category(controller.user(), category));

    controller.new_ticket();
    let form = controller
        .edited_ticket_mut()
        .ok_or(SupportError::NoOpenTicket)?;
    form.subject = options.subject;
    form.description = options.description;
    form.category = category;
    if options.school_id.is_some() {
        form.school_id = options.school_id;
    }
    form.new_attachments = options.attachments;

    let ok = controller.create_ticket().await;
    let notifications = settle(&mut controller, ok)?;

    let Some(ticket) = controller.ticket() else {
        return Ok(());
    };
    let id = ticket.id.map(|id| id.to_string()).unwrap_or_default();
    let text = format!(
        "{}\n{} {}",
        notification_text(&notifications),
        "Created".green(),
        format!("#{id}").cyan()
    );
    CommandOutput::new(json!({
        "action": "created",
        "ticket": ticket,
        "messages": notification_json(&notifications),
    }))
    .with_text(text)
    .print(output_json)
}

/// Accept an application name where an address is expected
pub(crate) fn resolve_category(user: &crate::user::UserContext, category: String) -> String {
    user.apps
        .iter()
        .find(|app| app.name.eq_ignore_ascii_case(&category))
        .map(|app| app.address.clone())
        .unwrap_or(category)
}
