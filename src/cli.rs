use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::str::FromStr;

use crate::commands::{
    CreateOptions, EditOptions, LsOptions, cmd_config_get, cmd_config_set, cmd_config_show,
    cmd_create, cmd_edit, cmd_escalate, cmd_events, cmd_issue, cmd_issue_comment, cmd_ls,
    cmd_set_status, cmd_show,
};
use crate::controller::{ListFilter, SortField, VALID_SORT_FIELDS};
use crate::model::StagedAttachment;
use crate::types::{TicketId, TicketStatus, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "ent-support")]
#[command(about = "Support tickets of the ENT platform, from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tickets
    #[command(visible_alias = "l")]
    Ls {
        /// Filter by status (repeatable): new, opened, resolved, closed
        #[arg(long, value_parser = parse_status)]
        status: Vec<TicketStatus>,

        /// Only my own tickets
        #[arg(long)]
        mine: bool,

        /// Filter by school id
        #[arg(long)]
        school: Option<String>,

        /// Fuzzy search over id, subject and owner
        #[arg(short, long)]
        query: Option<String>,

        /// Sort by: modified, created, id, subject, status
        #[arg(long, default_value = "modified", value_parser = parse_sort)]
        sort: SortField,

        /// Ascending order (default: descending)
        #[arg(long)]
        asc: bool,

        /// Maximum number of tickets to show
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a ticket with its comments and attachments
    #[command(visible_alias = "s")]
    Show {
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the history of a ticket
    Events {
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new ticket
    #[command(visible_alias = "c")]
    Create {
        /// Ticket subject
        subject: String,

        /// Description text
        #[arg(short, long)]
        description: String,

        /// Application concerned, by address or name
        #[arg(short, long)]
        category: Option<String>,

        /// School id (defaults to the user's only school)
        #[arg(long)]
        school: Option<String>,

        /// Workspace document to attach, as ID:NAME:SIZE (repeatable)
        #[arg(short, long = "attach", value_parser = parse_attachment)]
        attachments: Vec<StagedAttachment>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a ticket
    #[command(visible_alias = "e")]
    Edit {
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// New subject
        #[arg(long)]
        subject: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New application, by address or name
        #[arg(short, long)]
        category: Option<String>,

        /// New status: new, opened, resolved, closed
        #[arg(long, value_parser = parse_status)]
        status: Option<TicketStatus>,

        /// Comment to add
        #[arg(short = 'm', long)]
        comment: Option<String>,

        /// Workspace document to attach, as ID:NAME:SIZE (repeatable)
        #[arg(short, long = "attach", value_parser = parse_attachment)]
        attachments: Vec<StagedAttachment>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Escalate a ticket to the bug tracker
    Escalate {
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bug-tracker issue of an escalated ticket
    Issue {
        #[command(subcommand)]
        action: IssueAction,
    },

    /// Set the status of several tickets
    SetStatus {
        /// New status: new, opened, resolved, closed
        #[arg(value_parser = parse_status)]
        status: TicketStatus,

        /// Ticket ids
        #[arg(required = true)]
        ids: Vec<TicketId>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum IssueAction {
    /// Display the issue
    Show {
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a comment to the issue
    Comment {
        #[arg(value_parser = parse_ticket_id)]
        id: String,

        /// Comment text
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a configuration value
    Get {
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        key: String,
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Ls {
                status,
                mine,
                school,
                query,
                sort,
                asc,
                limit,
                json,
            } => {
                let filter = ListFilter {
                    statuses: status,
                    mine_only: mine,
                    school_id: school,
                    query,
                    sort,
                    ascending: asc,
                };
                cmd_ls(
                    LsOptions {
                        filter,
                        mine,
                        limit,
                    },
                    json,
                )
                .await
            }

            Commands::Show { id, json } => cmd_show(&id, json).await,
            Commands::Events { id, json } => cmd_events(&id, json).await,

            Commands::Create {
                subject,
                description,
                category,
                school,
                attachments,
                json,
            } => {
                cmd_create(
                    CreateOptions {
                        subject,
                        description,
                        category,
                        school_id: school,
                        attachments,
                    },
                    json,
                )
                .await
            }

            Commands::Edit {
                id,
                subject,
                description,
                category,
                status,
                comment,
                attachments,
                json,
            } => {
                cmd_edit(
                    &id,
                    EditOptions {
                        subject,
                        description,
                        category,
                        status,
                        comment,
                        attachments,
                    },
                    json,
                )
                .await
            }

            Commands::Escalate { id, json } => cmd_escalate(&id, json).await,

            Commands::Issue { action } => match action {
                IssueAction::Show { id, json } => cmd_issue(&id, json).await,
                IssueAction::Comment { id, text, json } => {
                    cmd_issue_comment(&id, &text.join(" "), json).await
                }
            },

            Commands::SetStatus { status, ids, json } => {
                cmd_set_status(status, &ids, json).await
            }

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<TicketStatus, String> {
    parse_with_validation(
        s,
        |v| TicketStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_sort(s: &str) -> Result<SortField, String> {
    parse_with_validation(
        s,
        |v| SortField::from_str(v).map_err(|_| String::new()),
        "sort field",
        VALID_SORT_FIELDS,
    )
}

fn parse_attachment(s: &str) -> Result<StagedAttachment, String> {
    StagedAttachment::from_str(s).map_err(|e| e.to_string())
}

/// Ticket ids are numeric on the server
fn parse_ticket_id(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("ID cannot be empty".to_string());
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid ticket id '{s}'. Must be a number"));
    }
    Ok(trimmed.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "ent-support", &mut io::stdout());
}
