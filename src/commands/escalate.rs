use serde_json::json;

use super::{CommandOutput, connect, notification_json, notification_text, open, settle};
use crate::display::format_escalation_colored;
use crate::error::{Result, SupportError};

/// Escalate a ticket to the bug tracker
pub async fn cmd_escalate(id: &str, output_json: bool) -> Result<()> {
    let mut controller = connect()?;

    let ok = controller.load_escalation_setting().await;
    settle(&mut controller, ok)?;
    if !controller.escalation_activated() {
        return Err(SupportError::Config(
            "escalation to the bug tracker is not activated on this platform".to_string(),
        ));
    }

    open(&mut controller, id).await?;
    let ok = controller.escalate_ticket().await;
    let notifications = settle(&mut controller, ok)?;

    let Some(ticket) = controller.ticket() else {
        return Ok(());
    };
    let text = format!(
        "{}\nEscalation: {}",
        notification_text(&notifications),
        format_escalation_colored(ticket.escalation_status)
    );
    CommandOutput::new(json!({
        "action": "escalated",
        "id": ticket.id,
        "escalation_status": ticket.escalation_status,
        "issue": ticket.issue,
        "messages": notification_json(&notifications),
    }))
    .with_text(text)
    .print(output_json)
}
