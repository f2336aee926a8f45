use serde::Serialize;

/// Upper bound on the number of line items kept from the ledger query.
pub const MAX_COST_ITEMS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub discord_webhook_url: String,
    pub project_id: String,
    pub billing_account_id: String,
    pub billing_dataset: String,
    pub billing_table_prefix: String,
    pub report_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostLineItem {
    pub service: String,
    pub sku: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub items: Vec<CostLineItem>,
    pub total_cost: f64,
}

impl CostReport {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_cost: 0.0,
        }
    }

    /// Sorts by cost descending, keeps the top [`MAX_COST_ITEMS`] and totals what was kept.
    pub fn from_items(mut items: Vec<CostLineItem>) -> Self {
        items.sort_by(|a, b| b.cost.total_cmp(&a.cost));
        items.truncate(MAX_COST_ITEMS);
        let total_cost = items.iter().map(|i| i.cost).sum();
        Self { items, total_cost }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub average: f64,
    pub maximum: f64,
    pub minimum: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResourceUsage {
    pub cpu: Option<MetricSummary>,
    pub storage: Option<MetricSummary>,
    pub sql_memory: Option<MetricSummary>,
}

impl ResourceUsage {
    pub fn available_count(&self) -> usize {
        [self.cpu, self.storage, self.sql_memory]
            .iter()
            .filter(|m| m.is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub embeds: Vec<Embed>,
}
