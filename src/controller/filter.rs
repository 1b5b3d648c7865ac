//! Filtering and sorting of the ticket list

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::error::SupportError;
use crate::model::Ticket;
use crate::user::UserContext;

/// Column the list is sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Modified,
    Created,
    Id,
    Subject,
    Status,
}

pub const VALID_SORT_FIELDS: &[&str] = &["modified", "created", "id", "subject", "status"];

impl FromStr for SortField {
    type Err = SupportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modified" => Ok(SortField::Modified),
            "created" => Ok(SortField::Created),
            "id" => Ok(SortField::Id),
            "subject" => Ok(SortField::Subject),
            "status" => Ok(SortField::Status),
            _ => Err(SupportError::Config(format!(
                "invalid sort field '{}'. Must be one of: {}",
                s,
                VALID_SORT_FIELDS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::Modified => "modified",
            SortField::Created => "created",
            SortField::Id => "id",
            SortField::Subject => "subject",
            SortField::Status => "status",
        };
        write!(f, "{}", name)
    }
}

/// Criteria applied to the ticket list
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Keep only these statuses; empty keeps all
    pub statuses: Vec<crate::types::TicketStatus>,
    /// Keep only tickets owned by the current user
    pub mine_only: bool,
    pub school_id: Option<String>,
    /// Fuzzy query over id, subject and owner name
    pub query: Option<String>,
    pub sort: SortField,
    /// Oldest/smallest first instead of newest/largest first
    pub ascending: bool,
}

impl ListFilter {
    fn keeps(&self, ticket: &Ticket, user: &UserContext) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&ticket.status()) {
            return false;
        }
        if self.mine_only && ticket.owner.as_deref() != Some(user.id.as_str()) {
            return false;
        }
        if let Some(school) = &self.school_id
            && ticket.school_id.as_ref() != Some(school)
        {
            return false;
        }
        true
    }

    /// Apply the filter and sort order.
    ///
    /// A fuzzy query drops non-matching tickets; the sort order still
    /// decides the order of the remaining ones.
    pub fn apply<'a>(
        &self,
        tickets: impl IntoIterator<Item = &'a Ticket>,
        user: &UserContext,
    ) -> Vec<&'a Ticket> {
        let mut kept: Vec<&Ticket> = tickets
            .into_iter()
            .filter(|t| self.keeps(t, user))
            .collect();

        if let Some(query) = self.query.as_deref().map(str::trim)
            && !query.is_empty()
        {
            let matcher = SkimMatcherV2::default().smart_case();
            kept.retain(|ticket| {
                let search_text = format!(
                    "{} {} {}",
                    ticket.id.map(|id| id.to_string()).unwrap_or_default(),
                    ticket.subject,
                    ticket.owner_name.as_deref().unwrap_or(""),
                );
                matcher.fuzzy_match(&search_text, query).is_some()
            });
        }

        kept.sort_by(|a, b| {
            let ordering = compare(a, b, self.sort);
            if self.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        kept
    }
}

fn compare(a: &Ticket, b: &Ticket, field: SortField) -> Ordering {
    let primary = match field {
        // Server timestamps are ISO 8601 and sort as strings
        SortField::Modified => a.modified.cmp(&b.modified),
        SortField::Created => a.created.cmp(&b.created),
        SortField::Id => a.id.cmp(&b.id),
        SortField::Subject => a.subject.to_lowercase().cmp(&b.subject.to_lowercase()),
        SortField::Status => a.status().cmp(&b.status()),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}
