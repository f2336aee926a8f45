use chrono::NaiveDate;

use crate::metrics::ResourceMetric;
use crate::types::{CostReport, ResourceUsage};

/// Everything gathered for one covered day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub cost: CostReport,
    pub usage: ResourceUsage,
}

impl DailyReport {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            cost: CostReport::empty(),
            usage: ResourceUsage::default(),
        }
    }

    /// Whether any data source returned something
    pub fn has_data(&self) -> bool {
        !self.cost.is_empty() || self.usage.available_count() > 0
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            line_item_count: self.cost.items.len(),
            total_cost: self.cost.total_cost,
            metrics_available: self.usage.available_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub line_item_count: usize,
    pub total_cost: f64,
    pub metrics_available: usize,
}

impl ReportSummary {
    pub fn metrics_missing(&self) -> usize {
        ResourceMetric::ALL.len() - self.metrics_available
    }
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} line items, total ${:.2}, {}/{} metrics",
            self.line_item_count,
            self.total_cost,
            self.metrics_available,
            ResourceMetric::ALL.len()
        )
    }
}
