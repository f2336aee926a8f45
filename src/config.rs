use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::types::Config;

pub const DEFAULT_BILLING_DATASET: &str = "billing_export";
pub const DEFAULT_BILLING_TABLE_PREFIX: &str = "gcp_billing_export";

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default, Clone)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Reads the invocation configuration. All missing required keys are
/// reported together so a single failed run shows the whole problem.
pub fn load_config_with_env<E: EnvironmentProvider + ?Sized>(env: &E) -> Result<Config, ConfigError> {
    let required = |key: &str| {
        env.get_var(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let discord_webhook_url = required("DISCORD_WEBHOOK_URL");
    let project_id = required("GCP_PROJECT_ID");
    let billing_account_id = required("BILLING_ACCOUNT_ID");

    let (discord_webhook_url, project_id, billing_account_id) =
        match (discord_webhook_url, project_id, billing_account_id) {
            (Some(url), Some(project), Some(account)) => (url, project, account),
            (url, project, account) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push("DISCORD_WEBHOOK_URL");
                }
                if project.is_none() {
                    missing.push("GCP_PROJECT_ID");
                }
                if account.is_none() {
                    missing.push("BILLING_ACCOUNT_ID");
                }
                return Err(ConfigError::Missing(missing));
            }
        };

    let billing_dataset = required("BILLING_DATASET")
        .unwrap_or_else(|| DEFAULT_BILLING_DATASET.to_string());
    let billing_table_prefix = required("BILLING_TABLE_PREFIX")
        .unwrap_or_else(|| DEFAULT_BILLING_TABLE_PREFIX.to_string());

    let report_date = match required("REPORT_DATE") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| ConfigError::Invalid {
                key: "REPORT_DATE",
                value: raw.clone(),
            })?,
        ),
        None => None,
    };

    Ok(Config {
        discord_webhook_url,
        project_id,
        billing_account_id,
        billing_dataset,
        billing_table_prefix,
        report_date,
    })
}

/// The day a report covers: the explicit override, otherwise the day before `today`.
pub fn resolve_target_date(cfg: &Config, today: NaiveDate) -> NaiveDate {
    cfg.report_date.unwrap_or(today - Duration::days(1))
}

/// Truthy flag parsing shared by process-level switches such as `RUN_ONCE`.
pub fn flag_enabled<E: EnvironmentProvider + ?Sized>(env: &E, key: &str) -> bool {
    env.get_var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}
