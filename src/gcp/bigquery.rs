use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::billing::{CostLedger, CostQuery};
use crate::error::DataSourceError;
use crate::gcp::{check_status, TokenSource};
use crate::parsing::parse_cost_row;
use crate::types::CostLineItem;

pub const BIGQUERY_BASE_URL: &str = "https://bigquery.googleapis.com";

const QUERY_TIMEOUT_MS: u64 = 30_000;
const MAX_COMPLETION_POLLS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: String,
    use_legacy_sql: bool,
    parameter_mode: &'static str,
    query_parameters: Vec<QueryParameter>,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryParameter {
    name: &'static str,
    parameter_type: ParameterType,
    parameter_value: ParameterValue,
}

#[derive(Debug, Serialize)]
struct ParameterType {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ParameterValue {
    value: String,
}

impl QueryParameter {
    fn new(name: &'static str, kind: &'static str, value: String) -> Self {
        Self {
            name,
            parameter_type: ParameterType { kind },
            parameter_value: ParameterValue { value },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    #[serde(default)]
    rows: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

/// Minimal BigQuery REST client running synchronous (`jobs.query`) queries.
#[derive(Debug, Clone)]
pub struct BigQueryClient {
    http: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
}

impl BigQueryClient {
    pub fn new(http: reqwest::Client, tokens: TokenSource) -> Self {
        Self {
            http,
            tokens,
            base_url: BIGQUERY_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn run_query(&self, project_id: &str, request: &QueryRequest) -> Result<Vec<Value>, DataSourceError> {
        let token = self.tokens.access_token(&self.http).await?;
        let url = format!("{}/bigquery/v2/projects/{}/queries", self.base_url, project_id);
        let res = self.http.post(&url).bearer_auth(&token).json(request).send().await?;
        let mut response: QueryResponse = check_status("BigQuery", res).await?.json().await?;

        // jobs.query returns early for long-running jobs; wait on the same job
        let mut polls = 0;
        while !response.job_complete {
            let job = response
                .job_reference
                .as_ref()
                .ok_or_else(|| DataSourceError::Decode("incomplete job without jobReference".to_string()))?;
            if polls == MAX_COMPLETION_POLLS {
                return Err(DataSourceError::Incomplete(job.job_id.clone()));
            }
            polls += 1;
            debug!(job_id = %job.job_id, poll = polls, "waiting for BigQuery job");

            let url = format!("{}/bigquery/v2/projects/{}/queries/{}", self.base_url, project_id, job.job_id);
            let mut params = vec![("timeoutMs", QUERY_TIMEOUT_MS.to_string())];
            if let Some(location) = &job.location {
                params.push(("location", location.clone()));
            }
            let res = self.http.get(&url).bearer_auth(&token).query(&params).send().await?;
            response = check_status("BigQuery", res).await?.json().await?;
        }

        Ok(response.rows)
    }
}

#[async_trait]
impl CostLedger for BigQueryClient {
    async fn query_costs(&self, query: &CostQuery) -> Result<Vec<CostLineItem>, DataSourceError> {
        let request = QueryRequest {
            query: query.sql(),
            use_legacy_sql: false,
            parameter_mode: "NAMED",
            query_parameters: vec![
                QueryParameter::new("billing_account_id", "STRING", query.billing_account_id.clone()),
                QueryParameter::new("target_date", "DATE", query.date.format("%Y-%m-%d").to_string()),
            ],
            timeout_ms: QUERY_TIMEOUT_MS,
        };

        let rows = self.run_query(&query.project_id, &request).await?;
        rows.iter()
            .map(|row| {
                parse_cost_row(row).ok_or_else(|| DataSourceError::Decode(format!("malformed cost row: {}", row)))
            })
            .collect()
    }
}
