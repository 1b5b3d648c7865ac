use owo_colors::OwoColorize;
use serde_json::json;

use super::create::resolve_category;
use super::{CommandOutput, connect, notification_json, notification_text, open, settle};
use crate::error::{Result, SupportError};
use crate::model::StagedAttachment;
use crate::types::TicketStatus;

/// Changes applied to an existing ticket; `None` keeps the current value
#[derive(Default)]
pub struct EditOptions {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<TicketStatus>,
    pub comment: Option<String>,
    pub attachments: Vec<StagedAttachment>,
}

/// Update a ticket, optionally adding a comment and attachments
pub async fn cmd_edit(id: &str, options: EditOptions, output_json: bool) -> Result<()> {
    let mut controller = connect()?;
    open(&mut controller, id).await?;

    let category = options
        .category
        .map(|category| resolve_category(controller.user(), category));

    if !controller.edit_ticket() {
        settle(&mut controller, false)?;
    }
    let form = controller
        .edited_ticket_mut()
        .ok_or(SupportError::NoOpenTicket)?;
    if let Some(subject) = options.subject {
        form.subject = subject;
    }
    if let Some(description) = options.description {
        form.description = description;
    }
    if category.is_some() {
        form.category = category;
    }
    if options.status.is_some() {
        form.status = options.status;
    }
    form.new_comment = options.comment;
    form.new_attachments = options.attachments;

    let ok = controller.update_ticket().await;
    let notifications = settle(&mut controller, ok)?;

    let Some(ticket) = controller.ticket() else {
        return Ok(());
    };
    let text = format!(
        "{}\n{} #{}",
        notification_text(&notifications),
        "Updated".green(),
        id
    );
    CommandOutput::new(json!({
        "action": "updated",
        "ticket": ticket,
        "messages": notification_json(&notifications),
    }))
    .with_text(text)
    .print(output_json)
}
