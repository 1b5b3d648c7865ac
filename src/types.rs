use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SupportError;

/// Server-assigned ticket identifier.
pub type TicketId = i64;

/// Maximum length of a ticket subject (in characters).
pub const MAX_SUBJECT_LENGTH: usize = 255;

/// Display metadata attached to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub code: u8,
    pub i18n_key: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TicketStatus {
    #[default]
    New,
    Opened,
    Resolved,
    Closed,
}

const TICKET_STATUS_TABLE: [StatusInfo; 4] = [
    StatusInfo {
        code: 1,
        i18n_key: "support.ticket.status.new",
    },
    StatusInfo {
        code: 2,
        i18n_key: "support.ticket.status.opened",
    },
    StatusInfo {
        code: 3,
        i18n_key: "support.ticket.status.resolved",
    },
    StatusInfo {
        code: 4,
        i18n_key: "support.ticket.status.closed",
    },
];

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::New,
        TicketStatus::Opened,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn info(self) -> &'static StatusInfo {
        &TICKET_STATUS_TABLE[self as usize]
    }

    pub fn code(self) -> u8 {
        self.info().code
    }

    pub fn i18n_key(self) -> &'static str {
        self.info().i18n_key
    }

    pub fn from_code(code: u8) -> Option<Self> {
        TicketStatus::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Escalation to the bug tracker is only possible for live tickets.
    pub fn allows_escalation(self) -> bool {
        matches!(self, TicketStatus::New | TicketStatus::Opened)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::New => write!(f, "new"),
            TicketStatus::Opened => write!(f, "opened"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = SupportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return TicketStatus::from_code(code)
                .ok_or_else(|| SupportError::InvalidStatus(s.to_string()));
        }
        match s.to_lowercase().as_str() {
            "new" => Ok(TicketStatus::New),
            "opened" | "open" => Ok(TicketStatus::Opened),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(SupportError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<u8> for TicketStatus {
    type Error = SupportError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TicketStatus::from_code(code).ok_or_else(|| SupportError::InvalidStatus(code.to_string()))
    }
}

impl From<TicketStatus> for u8 {
    fn from(status: TicketStatus) -> u8 {
        status.code()
    }
}

pub const VALID_STATUSES: &[&str] = &["new", "opened", "resolved", "closed"];

/// State of the forwarding of a ticket to the external bug tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EscalationStatus {
    #[default]
    NotDone,
    InProgress,
    Successful,
    Failed,
}

const ESCALATION_STATUS_TABLE: [StatusInfo; 4] = [
    StatusInfo {
        code: 1,
        i18n_key: "support.ticket.escalation.status.not.done",
    },
    StatusInfo {
        code: 2,
        i18n_key: "support.ticket.escalation.status.in.progress",
    },
    StatusInfo {
        code: 3,
        i18n_key: "support.ticket.escalation.status.successful",
    },
    StatusInfo {
        code: 4,
        i18n_key: "support.ticket.escalation.status.failed",
    },
];

impl EscalationStatus {
    pub const ALL: [EscalationStatus; 4] = [
        EscalationStatus::NotDone,
        EscalationStatus::InProgress,
        EscalationStatus::Successful,
        EscalationStatus::Failed,
    ];

    pub fn info(self) -> &'static StatusInfo {
        &ESCALATION_STATUS_TABLE[self as usize]
    }

    pub fn code(self) -> u8 {
        self.info().code
    }

    pub fn i18n_key(self) -> &'static str {
        self.info().i18n_key
    }

    pub fn from_code(code: u8) -> Option<Self> {
        EscalationStatus::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Allowed transitions: NOT_DONE -> IN_PROGRESS -> {SUCCESSFUL, FAILED, NOT_DONE}.
    pub fn can_transition_to(self, next: EscalationStatus) -> bool {
        matches!(
            (self, next),
            (EscalationStatus::NotDone, EscalationStatus::InProgress)
                | (EscalationStatus::InProgress, EscalationStatus::Successful)
                | (EscalationStatus::InProgress, EscalationStatus::Failed)
                | (EscalationStatus::InProgress, EscalationStatus::NotDone)
        )
    }
}

impl fmt::Display for EscalationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationStatus::NotDone => write!(f, "not_done"),
            EscalationStatus::InProgress => write!(f, "in_progress"),
            EscalationStatus::Successful => write!(f, "successful"),
            EscalationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl TryFrom<u8> for EscalationStatus {
    type Error = SupportError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        EscalationStatus::from_code(code)
            .ok_or_else(|| SupportError::InvalidStatus(code.to_string()))
    }
}

impl From<EscalationStatus> for u8 {
    fn from(status: EscalationStatus) -> u8 {
        status.code()
    }
}

/// Kind of entry in a ticket's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EventType {
    Created,
    Updated,
    Commented,
    Escalated,
    BugTrackerComment,
    BugTrackerUpdated,
}

impl EventType {
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            EventType::Created => "support.ticket.histo.creation",
            EventType::Updated => "support.ticket.histo.modification",
            EventType::Commented => "support.ticket.histo.add.comment",
            EventType::Escalated => "support.ticket.histo.escalate",
            EventType::BugTrackerComment => "support.ticket.histo.bug.tracker.comment",
            EventType::BugTrackerUpdated => "support.ticket.histo.bug.tracker.update",
        }
    }
}

impl TryFrom<u8> for EventType {
    type Error = SupportError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EventType::Created),
            2 => Ok(EventType::Updated),
            3 => Ok(EventType::Commented),
            4 => Ok(EventType::Escalated),
            5 => Ok(EventType::BugTrackerComment),
            6 => Ok(EventType::BugTrackerUpdated),
            _ => Err(SupportError::InvalidStatus(code.to_string())),
        }
    }
}

impl From<EventType> for u8 {
    fn from(event_type: EventType) -> u8 {
        event_type.code()
    }
}

/// Deserialize a value that the server may send as `null`, using the
/// type's default in that case.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
