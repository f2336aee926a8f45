use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DataSourceError;
use crate::gcp::{check_status, TokenSource};
use crate::metrics::{DayWindow, MetricStore, ResourceMetric};
use crate::parsing::parse_point_value;

pub const MONITORING_BASE_URL: &str = "https://monitoring.googleapis.com";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTimeSeriesResponse {
    #[serde(default)]
    time_series: Vec<TimeSeries>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(default)]
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    value: Value,
}

/// Cloud Monitoring `timeSeries.list` client.
#[derive(Debug, Clone)]
pub struct MonitoringClient {
    http: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
}

impl MonitoringClient {
    pub fn new(http: reqwest::Client, tokens: TokenSource) -> Self {
        Self {
            http,
            tokens,
            base_url: MONITORING_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MetricStore for MonitoringClient {
    async fn list_point_values(
        &self,
        project_id: &str,
        metric: ResourceMetric,
        window: &DayWindow,
    ) -> Result<Vec<f64>, DataSourceError> {
        let token = self.tokens.access_token(&self.http).await?;
        let url = format!("{}/v3/projects/{}/timeSeries", self.base_url, project_id);
        let filter = format!("metric.type=\"{}\"", metric.metric_type());
        let (start, end) = window.rfc3339();

        let mut values = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut params = vec![
                ("filter", filter.clone()),
                ("interval.startTime", start.clone()),
                ("interval.endTime", end.clone()),
                ("view", "FULL".to_string()),
            ];
            if let Some(next) = &page_token {
                params.push(("pageToken", next.clone()));
            }

            let res = self.http.get(&url).bearer_auth(&token).query(&params).send().await?;
            let page: ListTimeSeriesResponse = check_status("Cloud Monitoring", res).await?.json().await?;

            // Every series of this metric type is pooled; no per-resource split.
            for series in &page.time_series {
                values.extend(series.points.iter().filter_map(|p| parse_point_value(&p.value)));
            }
            debug!(metric = metric.metric_type(), series = page.time_series.len(), "fetched time series page");

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                    warn!(metric = metric.metric_type(), token = %next, "page token repeated, stopping pagination");
                    break;
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(values)
    }
}
