use serde_json::json;

use super::{CommandOutput, connect, settle};
use crate::api::ListScope;
use crate::controller::ListFilter;
use crate::display::format_ticket_table;
use crate::error::Result;

pub struct LsOptions {
    pub filter: ListFilter,
    /// Ask the server for the user's own tickets only
    pub mine: bool,
    pub limit: Option<usize>,
}

/// List tickets
pub async fn cmd_ls(options: LsOptions, output_json: bool) -> Result<()> {
    let scope = if options.mine {
        ListScope::Mine
    } else {
        ListScope::Visible
    };
    let mut controller = connect()?.with_scope(scope);
    let ok = controller.display_ticket_list().await;
    settle(&mut controller, ok)?;

    let mut tickets = controller.list(&options.filter);
    if let Some(limit) = options.limit {
        tickets.truncate(limit);
    }

    let json_output = json!(tickets);
    let text_output = if tickets.is_empty() {
        "No tickets".to_string()
    } else {
        format!(
            "{}\n{} ticket(s)",
            format_ticket_table(&tickets, controller.user()),
            tickets.len()
        )
    };

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}
