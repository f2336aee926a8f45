use chrono::NaiveDate;
use tracing::info;

use crate::billing::{fetch_daily_cost, CostLedger, CostQuery};
use crate::metrics::{sample_resource_usage, MetricStore};
use crate::report::DailyReport;
use crate::types::Config;

/// Collector structure that groups the two data sources of a report
pub struct ReportCollector<'a> {
    ledger: &'a dyn CostLedger,
    store: &'a dyn MetricStore,
    config: &'a Config,
}

impl<'a> ReportCollector<'a> {
    pub fn new(ledger: &'a dyn CostLedger, store: &'a dyn MetricStore, config: &'a Config) -> Self {
        Self { ledger, store, config }
    }

    /// Cost first, then the metrics. Neither step can fail; missing data
    /// shows up as an empty cost report or absent metric summaries.
    pub async fn collect(&self, date: NaiveDate) -> DailyReport {
        let mut report = DailyReport::new(date);

        info!("Collecting cost data for {}", date);
        let query = CostQuery::from_config(self.config, date);
        report.cost = fetch_daily_cost(self.ledger, &query).await;

        info!("Collecting resource metrics for {}", date);
        report.usage = sample_resource_usage(self.store, &self.config.project_id, date).await;

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataSourceError;
    use crate::metrics::{DayWindow, ResourceMetric};
    use crate::types::CostLineItem;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLedger {
        queries: Mutex<Vec<CostQuery>>,
    }

    #[async_trait]
    impl CostLedger for RecordingLedger {
        async fn query_costs(&self, query: &CostQuery) -> Result<Vec<CostLineItem>, DataSourceError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(vec![CostLineItem {
                service: "Cloud Run".to_string(),
                sku: "CPU Allocation Time".to_string(),
                cost: 3.5,
            }])
        }
    }

    struct DownStore;

    #[async_trait]
    impl MetricStore for DownStore {
        async fn list_point_values(
            &self,
            _project_id: &str,
            _metric: ResourceMetric,
            _window: &DayWindow,
        ) -> Result<Vec<f64>, DataSourceError> {
            Err(DataSourceError::Credentials("no metadata server".to_string()))
        }
    }

    #[tokio::test]
    async fn test_collect_uses_config_for_query() {
        let config = Config {
            discord_webhook_url: "https://discord.com/api/webhooks/1/abc".to_string(),
            project_id: "acme-prod".to_string(),
            billing_account_id: "0123AB-4567CD-89EF01".to_string(),
            billing_dataset: "finops".to_string(),
            billing_table_prefix: "gcp_billing_export_v1".to_string(),
            report_date: None,
        };
        let ledger = RecordingLedger::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let report = ReportCollector::new(&ledger, &DownStore, &config).collect(date).await;

        assert_eq!(report.date, date);
        assert_eq!(report.cost.total_cost, 3.5);
        assert_eq!(report.usage.available_count(), 0);
        assert_eq!(report.summary().metrics_missing(), 3);

        let queries = ledger.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].dataset, "finops");
        assert_eq!(queries[0].table_prefix, "gcp_billing_export_v1");
        assert_eq!(queries[0].billing_account_id, "0123AB-4567CD-89EF01");
    }
}
