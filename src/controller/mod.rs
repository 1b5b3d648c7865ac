//! Ticket list/detail controller.
//!
//! The controller owns the ticket collection and the form state, maps routes
//! to views and turns every outcome into a [`Notification`]. Operations never
//! fail: they return whether they succeeded and leave the reason in the
//! notification queue, so a front end only has to render `view()` and drain
//! `take_notifications()`.

pub mod filter;
pub mod notification;
pub mod protected;
pub mod route;
pub mod validation;

use tokio::sync::broadcast;

use crate::api::{ListScope, SupportApi};
use crate::error::{Result, SupportError};
use crate::lang;
use crate::model::{ModelEvent, Ticket, TicketCollection, TicketEvent};
use crate::types::{TicketId, TicketStatus};
use crate::user::UserContext;

pub use filter::{ListFilter, SortField, VALID_SORT_FIELDS};
pub use notification::{Notification, NotificationLevel};
pub use protected::protect_staged;
pub use route::Route;

/// Named view currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    View,
    Create,
    Edit,
    EscalatedIssue,
}

pub struct SupportController<A: SupportApi> {
    api: A,
    user: UserContext,
    tickets: TicketCollection,
    list_scope: ListScope,
    /// Ticket shown in the detail views
    ticket: Option<Ticket>,
    /// Form state of the create/edit views
    edited_ticket: Option<Ticket>,
    view: ViewMode,
    not_found: bool,
    fragment: Option<String>,
    notifications: Vec<Notification>,
    events: Vec<TicketEvent>,
    escalation_activated: bool,
    /// Issue comments reach the tracker directly instead of through a ticket update
    comm_direct: bool,
}

impl<A: SupportApi> SupportController<A> {
    pub fn new(api: A, user: UserContext) -> Self {
        Self {
            api,
            user,
            tickets: TicketCollection::new(),
            list_scope: ListScope::default(),
            ticket: None,
            edited_ticket: None,
            view: ViewMode::default(),
            not_found: false,
            fragment: None,
            notifications: Vec::new(),
            events: Vec::new(),
            escalation_activated: false,
            comm_direct: false,
        }
    }

    /// Restrict the list to the user's own tickets
    pub fn with_scope(mut self, scope: ListScope) -> Self {
        self.list_scope = scope;
        self
    }

    // Accessors

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn tickets(&self) -> &TicketCollection {
        &self.tickets
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.tickets.subscribe()
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn not_found(&self) -> bool {
        self.not_found
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    pub fn edited_ticket(&self) -> Option<&Ticket> {
        self.edited_ticket.as_ref()
    }

    /// Form state, for the front end to fill in
    pub fn edited_ticket_mut(&mut self) -> Option<&mut Ticket> {
        self.edited_ticket.as_mut()
    }

    pub fn events(&self) -> &[TicketEvent] {
        &self.events
    }

    pub fn escalation_activated(&self) -> bool {
        self.escalation_activated
    }

    pub fn bug_tracker_comm_direct(&self) -> bool {
        self.comm_direct
    }

    pub fn is_creating_or_editing(&self) -> bool {
        matches!(self.view, ViewMode::Create | ViewMode::Edit)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Visible tickets after filtering and sorting
    pub fn list(&self, filter: &ListFilter) -> Vec<&Ticket> {
        filter.apply(self.tickets.iter(), &self.user)
    }

    // Labels

    pub fn status_label(&self, code: u8) -> String {
        TicketStatus::from_code(code)
            .map(|status| lang::translate(status.i18n_key()))
            .unwrap_or_else(|| code.to_string())
    }

    /// Name of the application a category address points to
    pub fn category_label(&self, address: &str) -> String {
        self.user
            .app_name(address)
            .map(str::to_string)
            .unwrap_or_else(|| address.to_string())
    }

    pub fn school_name(&self, school_id: &str) -> String {
        self.user
            .school_name(school_id)
            .map(str::to_string)
            .unwrap_or_else(|| school_id.to_string())
    }

    /// Does the user administer the ticket's school?
    pub fn is_local_admin(&self, ticket: &Ticket) -> bool {
        ticket
            .school_id
            .as_deref()
            .is_some_and(|school| self.user.is_local_admin_of(school))
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn fail(&mut self, error: &SupportError) -> bool {
        if error.is_validation() {
            tracing::debug!("rejected: {}", error);
        } else {
            tracing::warn!("{}", error);
        }
        self.notify(Notification::from(error));
        false
    }

    // Routing

    /// Show the view a route fragment points to
    pub async fn navigate(&mut self, fragment: &str) -> bool {
        match Route::parse(fragment) {
            Route::ListTickets => self.display_ticket_list().await,
            Route::DisplayTicket(id) => self.display_ticket(&id).await,
        }
    }

    async fn refresh(&mut self) -> Result<usize> {
        self.tickets.sync(&self.api, self.list_scope).await
    }

    pub async fn display_ticket_list(&mut self) -> bool {
        if let Err(error) = self.refresh().await {
            return self.fail(&error);
        }
        self.fragment = None;
        self.not_found = false;
        self.view = ViewMode::List;
        true
    }

    /// Open a ticket from its route id, loading the list first if needed
    pub async fn display_ticket(&mut self, id: &str) -> bool {
        if (!self.tickets.is_synced() || self.tickets.is_empty())
            && let Err(error) = self.refresh().await
        {
            return self.fail(&error);
        }
        self.open_ticket(id).await
    }

    /// Show a ticket of the collection with its comments and attachments.
    ///
    /// An unknown id only sets the `not_found` flag.
    pub async fn open_ticket(&mut self, id: &str) -> bool {
        let found = id
            .trim()
            .parse::<TicketId>()
            .ok()
            .and_then(|id| self.tickets.get(id))
            .cloned();
        let Some(mut ticket) = found else {
            tracing::debug!("ticket '{}' not found", id);
            self.not_found = true;
            return false;
        };

        self.not_found = false;
        self.events.clear();
        let loaded = self.load_details(&mut ticket).await;
        self.fragment = ticket.id.map(|id| Route::DisplayTicket(id.to_string()).to_string());
        self.ticket = Some(ticket);
        self.view = ViewMode::View;
        match loaded {
            Ok(()) => true,
            Err(error) => self.fail(&error),
        }
    }

    async fn load_details(&self, ticket: &mut Ticket) -> Result<()> {
        ticket.load_comments(&self.api).await?;
        ticket.load_attachments(&self.api).await?;
        if ticket.is_escalated() {
            ticket.load_bug_tracker_issue(&self.api).await?;
        }
        Ok(())
    }

    // Create

    /// Blank form in the Create view
    pub fn new_ticket(&mut self) {
        let mut ticket = Ticket::new();
        if let [school] = self.user.schools.as_slice() {
            ticket.school_id = Some(school.id.clone());
        }
        self.edited_ticket = Some(ticket);
        self.view = ViewMode::Create;
    }

    pub async fn create_ticket(&mut self) -> bool {
        let Some(mut ticket) = self.edited_ticket.take() else {
            return self.fail(&SupportError::NoOpenTicket);
        };

        match self.submit_new(&mut ticket).await {
            Ok(()) => {
                self.fragment = ticket.id.map(|id| Route::DisplayTicket(id.to_string()).to_string());
                self.ticket = Some(ticket);
                self.view = ViewMode::View;
                self.notify(Notification::success("support.ticket.has.been.created"));
                true
            }
            Err(error) => {
                self.edited_ticket = Some(ticket);
                self.fail(&error)
            }
        }
    }

    async fn submit_new(&mut self, ticket: &mut Ticket) -> Result<()> {
        validation::validate_new_ticket(ticket)?;
        protect_staged(&self.api, &mut ticket.new_attachments).await?;
        ticket.create(&self.api, &mut self.tickets).await?;

        if !ticket.new_attachments.is_empty() {
            ticket.new_attachments.clear();
            ticket.load_attachments(&self.api).await?;
        }
        Ok(())
    }

    pub fn cancel_create_ticket(&mut self) {
        self.edited_ticket = None;
        self.view = ViewMode::List;
    }

    // Edit

    /// Copy of the open ticket in the Edit view
    pub fn edit_ticket(&mut self) -> bool {
        let Some(ticket) = &self.ticket else {
            return self.fail(&SupportError::NoOpenTicket);
        };
        let mut copy = ticket.clone();
        copy.new_attachments.clear();
        copy.new_comment = None;
        copy.processing = false;
        self.edited_ticket = Some(copy);
        self.view = ViewMode::Edit;
        true
    }

    pub async fn update_ticket(&mut self) -> bool {
        let Some(mut ticket) = self.edited_ticket.take() else {
            return self.fail(&SupportError::NoOpenTicket);
        };

        match self.submit_edit(&mut ticket).await {
            Ok(()) => {
                self.ticket = Some(ticket);
                self.view = ViewMode::View;
                self.notify(Notification::success("support.ticket.has.been.updated"));
                true
            }
            Err(error) => {
                self.edited_ticket = Some(ticket);
                self.fail(&error)
            }
        }
    }

    async fn submit_edit(&mut self, ticket: &mut Ticket) -> Result<()> {
        validation::validate_edited_ticket(ticket)?;
        protect_staged(&self.api, &mut ticket.new_attachments).await?;
        ticket.update(&self.api, &mut self.tickets).await?;

        if ticket.new_comment.take().is_some_and(|c| !c.is_empty()) {
            ticket.load_comments(&self.api).await?;
        }
        if !ticket.new_attachments.is_empty() {
            ticket.new_attachments.clear();
            ticket.load_attachments(&self.api).await?;
        }
        Ok(())
    }

    pub fn cancel_edit_ticket(&mut self) {
        self.edited_ticket = None;
        self.view = ViewMode::View;
    }

    // Escalation

    pub async fn escalate_ticket(&mut self) -> bool {
        let Some(mut ticket) = self.ticket.take() else {
            return self.fail(&SupportError::NoOpenTicket);
        };
        let result = ticket.escalate(&self.api, &mut self.tickets).await;
        self.ticket = Some(ticket);

        match result {
            Ok(()) => {
                self.notify(Notification::success("support.ticket.escalation.successful"));
                true
            }
            Err(SupportError::Api(failure)) => {
                tracing::warn!("escalation failed: {}", failure);
                let key = match (failure.is_client_error(), failure.message) {
                    (true, Some(message)) => message,
                    (true, None) => "support.error.escalation.conflict".to_string(),
                    (false, _) => "support.ticket.escalation.failed".to_string(),
                };
                self.notify(Notification::error(key));
                false
            }
            Err(error) => self.fail(&error),
        }
    }

    /// Show the bug-tracker side of the open ticket
    pub async fn open_issue_view(&mut self) -> bool {
        let Some(mut ticket) = self.ticket.take() else {
            return self.fail(&SupportError::NoOpenTicket);
        };
        let result = if ticket.is_escalated() {
            ticket.load_bug_tracker_issue(&self.api).await
        } else {
            Ok(false)
        };
        self.ticket = Some(ticket);

        match result {
            Ok(true) => {
                self.view = ViewMode::EscalatedIssue;
                true
            }
            Ok(false) => self.fail(&SupportError::NotEscalated),
            Err(error) => self.fail(&error),
        }
    }

    /// Send a comment to the bug tracker
    pub async fn update_issue(&mut self, comment: &str) -> bool {
        if let Err(error) = validation::validate_comment(comment) {
            return self.fail(&error);
        }
        let Some(mut ticket) = self.ticket.take() else {
            return self.fail(&SupportError::NoOpenTicket);
        };
        let result = ticket.comment_issue(&self.api, comment.trim()).await;
        self.ticket = Some(ticket);

        match result {
            Ok(()) => {
                self.notify(Notification::success("support.issue.comment.has.been.added"));
                true
            }
            Err(error) => self.fail(&error),
        }
    }

    // Administration

    /// Set the status of several tickets at once
    pub async fn update_status(&mut self, ids: &[TicketId], status: TicketStatus) -> bool {
        if ids.is_empty() {
            return true;
        }
        if let Err(failure) = self.api.update_status(status, ids).await {
            return self.fail(&failure.into());
        }

        self.tickets.set_status(ids, status);
        if let Some(ticket) = &mut self.ticket
            && ticket.id.is_some_and(|id| ids.contains(&id))
        {
            ticket.status = Some(status);
        }
        tracing::info!("status of {} tickets set to {}", ids.len(), status);
        self.notify(
            Notification::success("support.ticket.status.has.been.updated")
                .with_args(vec![ids.len().to_string()]),
        );
        true
    }

    /// Load the history of the open ticket
    pub async fn ticket_events(&mut self) -> bool {
        let Some(id) = self.ticket.as_ref().and_then(|t| t.id) else {
            return self.fail(&SupportError::NoOpenTicket);
        };
        match self.api.ticket_events(id).await {
            Ok(events) => {
                self.events = events;
                true
            }
            Err(failure) => self.fail(&failure.into()),
        }
    }

    /// Ask the server whether escalation is enabled, and if so how issue
    /// comments reach the tracker
    pub async fn load_escalation_setting(&mut self) -> bool {
        match self.api.escalation_activated().await {
            Ok(activated) => self.escalation_activated = activated,
            Err(failure) => return self.fail(&failure.into()),
        }
        if !self.escalation_activated {
            self.comm_direct = false;
            return true;
        }
        match self.api.bug_tracker_comm_direct().await {
            Ok(direct) => {
                self.comm_direct = direct;
                true
            }
            Err(failure) => self.fail(&failure.into()),
        }
    }
}
