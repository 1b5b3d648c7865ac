use serde_json::json;

use super::{CommandOutput, connect, notification_json, notification_text, settle};
use crate::error::Result;
use crate::types::{TicketId, TicketStatus};

/// Set the status of several tickets (local administrators)
pub async fn cmd_set_status(
    status: TicketStatus,
    ids: &[TicketId],
    output_json: bool,
) -> Result<()> {
    let mut controller = connect()?;
    let ok = controller.update_status(ids, status).await;
    let notifications = settle(&mut controller, ok)?;

    CommandOutput::new(json!({
        "action": "status_updated",
        "status": status,
        "ids": ids,
        "messages": notification_json(&notifications),
    }))
    .with_text(notification_text(&notifications))
    .print(output_json)
}
