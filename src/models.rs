//! Frontend Models
//!
//! Data structures matching the CRM API's opportunity pipeline.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Item-type tag carried by opportunity drags
pub const OPPORTUNITY_ITEM_TYPE: &str = "opportunity";

/// Item types a pipeline column accepts
pub const COLUMN_ACCEPTS: &[&str] = &[OPPORTUNITY_ITEM_TYPE];

/// Opportunity priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    /// CSS class for the priority badge
    pub fn badge_class(&self) -> String {
        format!("priority-badge priority-{}", self.as_str())
    }
}

/// Sales opportunity (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: u32,
    pub title: String,
    pub value: Decimal,
    pub company_name: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub contact_count: u32,
    /// Pipeline status id
    pub status: u32,
}

impl Opportunity {
    pub fn drag_payload(&self) -> DragPayload {
        DragPayload {
            id: self.id,
            current_status: self.status,
        }
    }

    /// Past its expected close date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.expected_close_date.is_some_and(|d| d < today)
    }
}

/// One pipeline stage with its opportunities
///
/// `count` and `total_value` are derived from `opportunities`; call
/// [`PipelineStatus::recompute`] after any change to the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub status_id: u32,
    pub status_name: String,
    #[serde(default = "default_status_color")]
    pub status_color: String,
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub total_value: Decimal,
}

fn default_status_color() -> String {
    "#9ca3af".to_string()
}

impl PipelineStatus {
    pub fn new(status_id: u32, status_name: &str, status_color: &str) -> Self {
        Self {
            status_id,
            status_name: status_name.to_string(),
            status_color: status_color.to_string(),
            opportunities: Vec::new(),
            count: 0,
            total_value: Decimal::ZERO,
        }
    }

    /// Refresh `count` and `total_value` from the opportunity list
    pub fn recompute(&mut self) {
        self.count = self.opportunities.len();
        self.total_value = self.opportunities.iter().map(|o| o.value).sum();
    }

    pub fn contains(&self, opportunity_id: u32) -> bool {
        self.opportunities.iter().any(|o| o.id == opportunity_id)
    }

    pub fn aggregates_consistent(&self) -> bool {
        self.count == self.opportunities.len()
            && self.total_value == self.opportunities.iter().map(|o| o.value).sum::<Decimal>()
    }
}

/// Payload carried by a card drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub id: u32,
    pub current_status: u32,
}

/// Format a value as US dollars, e.g. `$1,234.50`
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.abs().round_dp(2).to_string();
    let (whole, frac) = match rounded.split_once('.') {
        Some((w, f)) => (w.to_string(), f.to_string()),
        None => (rounded, String::new()),
    };

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac:0<2}")
}

/// Format a close date for a card, e.g. `Mar 5, 2025`
pub fn format_close_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => "No date".to_string(),
    }
}
