mod config;
mod create;
mod edit;
mod escalate;
mod issue;
mod ls;
mod show;
mod status;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use create::{CreateOptions, cmd_create};
pub use edit::{EditOptions, cmd_edit};
pub use escalate::cmd_escalate;
pub use issue::{cmd_issue, cmd_issue_comment};
pub use ls::{LsOptions, cmd_ls};
pub use show::{cmd_events, cmd_show};
pub use status::cmd_set_status;

use serde_json::Value;

use crate::api::HttpSupportApi;
use crate::config::Config;
use crate::controller::{Notification, SupportController};
use crate::display::format_notification;
use crate::error::{Result, SupportError};

/// Output of a command, printed as JSON or text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, json: bool) -> Result<()> {
        if json || self.text.is_none() {
            print_json(&self.json)
        } else {
            if let Some(text) = self.text {
                println!("{}", text.trim_end());
            }
            Ok(())
        }
    }
}

/// Print a JSON value to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Controller talking to the configured platform
pub(crate) fn connect() -> Result<SupportController<HttpSupportApi>> {
    let config = Config::load()?;
    let api = HttpSupportApi::from_config(&config)?;
    Ok(SupportController::new(api, config.user))
}

/// Drain the controller's notifications.
///
/// A failed operation turns its first error notification into the command's
/// error; otherwise the notifications are returned for display.
pub(crate) fn settle(
    controller: &mut SupportController<HttpSupportApi>,
    ok: bool,
) -> Result<Vec<Notification>> {
    let notifications = controller.take_notifications();
    if ok {
        return Ok(notifications);
    }
    let message = notifications
        .iter()
        .find(|n| n.is_error())
        .map(|n| n.message())
        .unwrap_or_else(|| crate::lang::translate("support.error.unexpected"));
    Err(SupportError::OperationFailed(message))
}

/// Notifications as text lines
pub(crate) fn notification_text(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(format_notification)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Notifications as JSON messages
pub(crate) fn notification_json(notifications: &[Notification]) -> Vec<String> {
    notifications.iter().map(|n| n.message()).collect()
}

/// Open a ticket by id, mapping an unknown id to an error
pub(crate) async fn open(
    controller: &mut SupportController<HttpSupportApi>,
    id: &str,
) -> Result<()> {
    let ok = controller.display_ticket(id).await;
    if controller.not_found() {
        return Err(SupportError::TicketNotFound(id.to_string()));
    }
    settle(controller, ok).map(|_| ())
}
