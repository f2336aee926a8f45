// Public modules
pub mod types;
pub mod error;
pub mod config;
pub mod parsing;
pub mod gcp;
pub mod billing;
pub mod metrics;
pub mod collector;
pub mod report;
pub mod discord;
pub mod trigger;

// Re-export commonly used items
pub use types::*;
pub use error::{ConfigError, DataSourceError, DeliveryError, ReportError};
pub use config::{load_config_with_env, resolve_target_date, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use parsing::{parse_cost_row, parse_point_value, summarize, bytes_to_gigabytes};
pub use billing::{fetch_daily_cost, CostLedger, CostQuery};
pub use metrics::*;
pub use gcp::{BigQueryClient, MonitoringClient, TokenSource};
pub use collector::ReportCollector;
pub use report::{DailyReport, ReportSummary};
pub use discord::{build_discord_payload, build_discord_payload_at, send_to_discord};
pub use trigger::{create_router, run_invocation, Invocation, ReporterState};
