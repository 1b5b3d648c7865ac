pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod lang;
pub mod model;
pub mod types;
pub mod user;

pub use api::{ApiFailure, HttpSupportApi, ListScope, SupportApi};
pub use config::Config;
pub use controller::{Notification, NotificationLevel, Route, SupportController, ViewMode};
pub use error::{Result, SupportError};
pub use model::{ModelEvent, Ticket, TicketCollection};
pub use types::{EscalationStatus, EventType, TicketId, TicketStatus};
pub use user::UserContext;
