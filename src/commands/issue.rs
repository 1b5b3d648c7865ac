use serde_json::json;

use super::{CommandOutput, connect, notification_json, notification_text, open, settle};
use crate::api::HttpSupportApi;
use crate::controller::SupportController;
use crate::display::format_issue;
use crate::error::Result;

async fn open_issue(id: &str) -> Result<SupportController<HttpSupportApi>> {
    let mut controller = connect()?;
    let ok = controller.load_escalation_setting().await;
    settle(&mut controller, ok)?;
    open(&mut controller, id).await?;
    let ok = controller.open_issue_view().await;
    settle(&mut controller, ok)?;
    Ok(controller)
}

/// Display the bug-tracker issue of an escalated ticket
pub async fn cmd_issue(id: &str, output_json: bool) -> Result<()> {
    let controller = open_issue(id).await?;
    let Some(issue) = controller.ticket().and_then(|t| t.issue.as_ref()) else {
        return Ok(());
    };
    let mut text = format_issue(issue);
    if controller.bug_tracker_comm_direct() {
        text.push_str("\n\nComments are sent directly to the bug tracker");
    }
    CommandOutput::new(json!({
        "issue": issue,
        "comm_direct": controller.bug_tracker_comm_direct(),
    }))
    .with_text(text)
    .print(output_json)
}

/// Send a comment to the bug tracker
pub async fn cmd_issue_comment(id: &str, text: &str, output_json: bool) -> Result<()> {
    let mut controller = open_issue(id).await?;
    let ok = controller.update_issue(text).await;
    let notifications = settle(&mut controller, ok)?;

    let issue = controller.ticket().and_then(|t| t.issue.as_ref());
    let text_output = match issue {
        Some(issue) => format!("{}\n\n{}", notification_text(&notifications), format_issue(issue)),
        None => notification_text(&notifications),
    };
    CommandOutput::new(json!({
        "action": "issue_commented",
        "issue": issue,
        "messages": notification_json(&notifications),
    }))
    .with_text(text_output)
    .print(output_json)
}
