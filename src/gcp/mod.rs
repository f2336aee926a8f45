// REST plumbing for the Google Cloud collaborators
pub mod bigquery;
pub mod monitoring;

use serde::Deserialize;
use tracing::debug;

use crate::config::EnvironmentProvider;
use crate::error::DataSourceError;

pub use bigquery::BigQueryClient;
pub use monitoring::MonitoringClient;

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Where access tokens come from. Workloads on Cloud Functions / Cloud Run
/// get ambient credentials from the metadata server; a static token can be
/// supplied for local runs.
#[derive(Debug, Clone)]
pub enum TokenSource {
    Static(String),
    MetadataServer { url: String },
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl TokenSource {
    pub fn from_env<E: EnvironmentProvider + ?Sized>(env: &E) -> Self {
        match env.get_var("GOOGLE_OAUTH_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()) {
            Some(token) => TokenSource::Static(token.trim().to_string()),
            None => TokenSource::MetadataServer {
                url: METADATA_TOKEN_URL.to_string(),
            },
        }
    }

    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String, DataSourceError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::MetadataServer { url } => {
                debug!("requesting access token from metadata server");
                let res = http
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| DataSourceError::Credentials(e.to_string()))?;
                if !res.status().is_success() {
                    let status = res.status().as_u16();
                    let body = res.text().await.unwrap_or_default();
                    return Err(DataSourceError::Credentials(format!("metadata server returned {}: {}", status, body)));
                }
                let token: MetadataToken = res
                    .json()
                    .await
                    .map_err(|e| DataSourceError::Credentials(e.to_string()))?;
                Ok(token.access_token)
            }
        }
    }
}

/// Turns a non-2xx API response into a [`DataSourceError::Status`] carrying the body.
pub(crate) async fn check_status(
    service: &'static str,
    res: reqwest::Response,
) -> Result<reqwest::Response, DataSourceError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    Err(DataSourceError::Status { service, status, body })
}
