use crate::domain::call::CallEvent;
use serde::Serialize;

const VERIFIED_MARK: &str = "✔";

/// Display projection of a [`CallEvent`] for the recent-calls table. Missing values
/// render as empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentCallRow {
    pub id: String,
    pub when: String,
    pub mc_number: String,
    pub legal_name: String,
    pub verified: String,
    pub load_id: String,
    pub outcome: String,
    pub sentiment: String,
    pub agreed_price: String,
    pub negotiation_rounds: String,
}

impl From<&CallEvent> for RecentCallRow {
    fn from(event: &CallEvent) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            id: event.id.to_string(),
            when: event.ts.clone(),
            mc_number: text(&event.mc_number),
            legal_name: text(&event.legal_name),
            verified: if event.verified.is_verified() {
                VERIFIED_MARK.to_string()
            } else {
                String::new()
            },
            load_id: text(&event.load_id),
            outcome: text(&event.outcome),
            sentiment: text(&event.sentiment),
            agreed_price: event.agreed_price.to_string(),
            negotiation_rounds: event.negotiation_rounds.to_string(),
        }
    }
}

pub fn recent_call_rows(events: &[CallEvent]) -> Vec<RecentCallRow> {
    events.iter().map(RecentCallRow::from).collect()
}
