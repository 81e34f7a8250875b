//! Backend response types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An order as listed by the backend. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub status: String,
    pub amount: f64,
}

/// Headline dashboard numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_revenue: f64,
    pub active_users: u64,
    pub conversion_rate: f64,
}

/// Named numeric totals for one summary category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryGroup(pub BTreeMap<String, f64>);

impl SummaryGroup {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Sum of all totals in the group
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Monthly summary snapshot, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub incoming: SummaryGroup,
    pub outgoing: SummaryGroup,
    pub volunteer: SummaryGroup,
    pub inventory: SummaryGroup,
}

impl DashboardSummary {
    /// Category groups in display order
    pub fn groups(&self) -> [(&'static str, &SummaryGroup); 4] {
        [
            ("incoming", &self.incoming),
            ("outgoing", &self.outgoing),
            ("volunteer", &self.volunteer),
            ("inventory", &self.inventory),
        ]
    }
}
