use serde_json::json;

use super::{CommandOutput, open, settle};
use crate::display::{format_events, format_ticket_detail};
use crate::error::Result;

/// Display a ticket with its comments and attachments
pub async fn cmd_show(id: &str, output_json: bool) -> Result<()> {
    let mut controller = super::connect()?;
    open(&mut controller, id).await?;

    let Some(ticket) = controller.ticket() else {
        return Ok(());
    };
    let text = format_ticket_detail(ticket, controller.user());
    CommandOutput::new(json!(ticket))
        .with_text(text)
        .print(output_json)
}

/// Display the history of a ticket
pub async fn cmd_events(id: &str, output_json: bool) -> Result<()> {
    let mut controller = super::connect()?;
    open(&mut controller, id).await?;
    let ok = controller.ticket_events().await;
    settle(&mut controller, ok)?;

    let events = controller.events();
    let text = if events.is_empty() {
        "No events".to_string()
    } else {
        format_events(events)
    };
    CommandOutput::new(json!(events))
        .with_text(text)
        .print(output_json)
}
