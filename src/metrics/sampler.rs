use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::metrics::{DayWindow, MetricStore, ResourceMetric};
use crate::parsing::summarize;
use crate::types::{MetricSummary, ResourceUsage};

/// Samples one metric over the day. Lookup failures and empty results both
/// come back as `None`; errors are logged here and go no further.
pub async fn sample_metric<S: MetricStore + ?Sized>(
    store: &S,
    project_id: &str,
    metric: ResourceMetric,
    window: &DayWindow,
) -> Option<MetricSummary> {
    match store.list_point_values(project_id, metric, window).await {
        Ok(values) => {
            debug!(metric = metric.metric_type(), points = values.len(), "sampled metric");
            summarize(&values)
        }
        Err(e) => {
            warn!(metric = metric.metric_type(), error = %e, "metric lookup failed, omitting from report");
            None
        }
    }
}

/// Runs the three metric lookups one after another for `date`.
pub async fn sample_resource_usage<S: MetricStore + ?Sized>(
    store: &S,
    project_id: &str,
    date: NaiveDate,
) -> ResourceUsage {
    let window = DayWindow::for_date(date);

    let cpu = sample_metric(store, project_id, ResourceMetric::CpuUtilization, &window).await;
    let storage = sample_metric(store, project_id, ResourceMetric::StorageBytes, &window).await;
    let sql_memory = sample_metric(store, project_id, ResourceMetric::SqlMemoryUtilization, &window).await;

    ResourceUsage {
        cpu,
        storage,
        sql_memory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataSourceError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Store that fails for selected metrics and records every lookup.
    struct ScriptedStore {
        failing: Vec<ResourceMetric>,
        values: Vec<f64>,
        calls: Mutex<Vec<(ResourceMetric, DayWindow)>>,
    }

    #[async_trait]
    impl MetricStore for ScriptedStore {
        async fn list_point_values(
            &self,
            _project_id: &str,
            metric: ResourceMetric,
            window: &DayWindow,
        ) -> Result<Vec<f64>, DataSourceError> {
            self.calls.lock().unwrap().push((metric, *window));
            if self.failing.contains(&metric) {
                return Err(DataSourceError::Decode("boom".to_string()));
            }
            Ok(self.values.clone())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let store = ScriptedStore {
            failing: vec![ResourceMetric::StorageBytes],
            values: vec![1.0, 3.0],
            calls: Mutex::new(Vec::new()),
        };

        let usage = sample_resource_usage(&store, "acme-prod", date()).await;

        assert_eq!(usage.cpu, Some(MetricSummary { average: 2.0, maximum: 3.0, minimum: 1.0 }));
        assert_eq!(usage.storage, None);
        assert_eq!(usage.sql_memory, Some(MetricSummary { average: 2.0, maximum: 3.0, minimum: 1.0 }));
        assert_eq!(usage.available_count(), 2);
    }

    #[tokio::test]
    async fn test_lookups_run_in_order_over_the_same_window() {
        let store = ScriptedStore {
            failing: Vec::new(),
            values: Vec::new(),
            calls: Mutex::new(Vec::new()),
        };

        let usage = sample_resource_usage(&store, "acme-prod", date()).await;

        assert_eq!(usage, ResourceUsage::default());
        let calls = store.calls.lock().unwrap();
        let metrics: Vec<ResourceMetric> = calls.iter().map(|(m, _)| *m).collect();
        assert_eq!(metrics, ResourceMetric::ALL.to_vec());
        assert!(calls.iter().all(|(_, w)| *w == DayWindow::for_date(date())));
    }
}
