use tokio::sync::broadcast;

use crate::api::{ListScope, SupportApi};
use crate::error::Result;
use crate::types::{EscalationStatus, TicketId, TicketStatus};

use super::Ticket;

const EVENT_CAPACITY: usize = 64;

/// Change notifications emitted by the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// The collection was reloaded from the server
    TicketsSynced(usize),
    TicketAdded(TicketId),
    TicketChanged(TicketId),
    EscalationChanged {
        id: TicketId,
        status: EscalationStatus,
    },
}

/// In-memory list of the tickets visible to the user.
pub struct TicketCollection {
    tickets: Vec<Ticket>,
    synced: bool,
    events: broadcast::Sender<ModelEvent>,
}

impl Default for TicketCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketCollection {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tickets: Vec::new(),
            synced: false,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModelEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ModelEvent) {
        // Sending only fails when nobody listens
        let _ = self.events.send(event);
    }

    /// Replace the contents with the server's list.
    pub async fn sync<A: SupportApi>(&mut self, api: &A, scope: ListScope) -> Result<usize> {
        let tickets = api.list_tickets(scope).await?;
        tracing::debug!("synced {} tickets", tickets.len());
        self.load(tickets);
        Ok(self.tickets.len())
    }

    pub fn load(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.synced = true;
        self.emit(ModelEvent::TicketsSynced(self.tickets.len()));
    }

    /// Has the collection been loaded at least once?
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter()
    }

    pub fn get(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == Some(id))
    }

    pub fn push(&mut self, ticket: Ticket) {
        let ticket = without_form_state(ticket);
        let id = ticket.id;
        self.tickets.push(ticket);
        if let Some(id) = id {
            self.emit(ModelEvent::TicketAdded(id));
        }
    }

    /// Replace the ticket with the same id, or append it.
    pub fn upsert(&mut self, ticket: Ticket) {
        let Some(id) = ticket.id else {
            return self.push(ticket);
        };
        let ticket = without_form_state(ticket);
        match self.tickets.iter_mut().find(|t| t.id == Some(id)) {
            Some(existing) => *existing = ticket,
            None => self.tickets.push(ticket),
        }
        self.emit(ModelEvent::TicketChanged(id));
    }

    pub fn set_escalation_status(&mut self, id: TicketId, status: EscalationStatus) {
        if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == Some(id)) {
            ticket.escalation_status = status;
        }
        self.emit(ModelEvent::EscalationChanged { id, status });
    }

    /// Apply a status to the listed tickets; returns how many were found.
    pub fn set_status(&mut self, ids: &[TicketId], status: TicketStatus) -> usize {
        let mut changed = Vec::new();
        for ticket in &mut self.tickets {
            if let Some(id) = ticket.id
                && ids.contains(&id)
            {
                ticket.status = Some(status);
                changed.push(id);
            }
        }
        for id in &changed {
            self.emit(ModelEvent::TicketChanged(*id));
        }
        changed.len()
    }
}

fn without_form_state(mut ticket: Ticket) -> Ticket {
    ticket.new_attachments.clear();
    ticket.new_comment = None;
    ticket.processing = false;
    ticket
}
