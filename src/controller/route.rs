use std::fmt;

/// Fragment routes understood by the support screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/list-tickets`
    ListTickets,
    /// `/ticket/:id`; the id is kept raw and parsed when the ticket is opened
    DisplayTicket(String),
}

impl Route {
    /// Parse a fragment. Unknown routes fall back to the ticket list.
    pub fn parse(fragment: &str) -> Self {
        let path = fragment.trim_start_matches('#').trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["ticket", id] => Route::DisplayTicket((*id).to_string()),
            _ => Route::ListTickets,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::ListTickets => write!(f, "/list-tickets"),
            Route::DisplayTicket(id) => write!(f, "/ticket/{}", id),
        }
    }
}
