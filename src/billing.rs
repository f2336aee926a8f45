use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::DataSourceError;
use crate::types::{Config, CostLineItem, CostReport, MAX_COST_ITEMS};

/// Parameters of the daily ledger query.
#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub project_id: String,
    pub billing_account_id: String,
    pub dataset: String,
    pub table_prefix: String,
    pub date: NaiveDate,
}

impl CostQuery {
    pub fn from_config(cfg: &Config, date: NaiveDate) -> Self {
        Self {
            project_id: cfg.project_id.clone(),
            billing_account_id: cfg.billing_account_id.clone(),
            dataset: cfg.billing_dataset.clone(),
            table_prefix: cfg.billing_table_prefix.clone(),
            date,
        }
    }

    /// Standard SQL over the date-suffixed export tables. The billing account
    /// and date are bound as `@billing_account_id` and `@target_date`.
    pub fn sql(&self) -> String {
        format!(
            "SELECT
    service.description AS service_name,
    sku.description AS sku_description,
    SUM(cost) AS total_cost
FROM `{}.{}.{}*`
WHERE
    billing_account_id = @billing_account_id
    AND DATE(usage_start_time) = @target_date
GROUP BY service_name, sku_description
ORDER BY total_cost DESC
LIMIT {}",
            self.project_id, self.dataset, self.table_prefix, MAX_COST_ITEMS
        )
    }
}

/// The cost-ledger store backing the aggregator.
#[async_trait]
pub trait CostLedger: Send + Sync {
    async fn query_costs(&self, query: &CostQuery) -> Result<Vec<CostLineItem>, DataSourceError>;
}

/// Fetches the day's most expensive line items. A failed query yields an
/// empty report; the error is logged and not propagated.
pub async fn fetch_daily_cost<L: CostLedger + ?Sized>(ledger: &L, query: &CostQuery) -> CostReport {
    match ledger.query_costs(query).await {
        Ok(rows) => {
            debug!(rows = rows.len(), "cost query returned");
            CostReport::from_items(rows)
        }
        Err(e) => {
            warn!(date = %query.date, error = %e, "cost query failed, reporting zero cost");
            CostReport::empty()
        }
    }
}
