use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use chrono::{NaiveDate, Utc};
use http::StatusCode;
use tracing::{error, info, warn};

use crate::billing::CostLedger;
use crate::collector::ReportCollector;
use crate::config::{load_config_with_env, resolve_target_date, EnvironmentProvider};
use crate::discord::{build_discord_payload, send_to_discord};
use crate::error::ReportError;
use crate::metrics::MetricStore;
use crate::report::ReportSummary;
use crate::types::Config;

pub const SUCCESS_MESSAGE: &str = "Report sent successfully";

/// Long-lived collaborators shared by every invocation
#[derive(Clone)]
pub struct ReporterState {
    pub ledger: Arc<dyn CostLedger>,
    pub store: Arc<dyn MetricStore>,
    pub http: reqwest::Client,
    pub env: Arc<dyn EnvironmentProvider + Send + Sync>,
}

/// Terminal state of one invocation, as returned to the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub status: StatusCode,
    pub body: String,
}

impl Invocation {
    fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Runs the whole pipeline once for the day before `today` (or the
/// configured override). Configuration is read fresh on every call.
pub async fn run_invocation(state: &ReporterState, today: NaiveDate) -> Invocation {
    let cfg = match load_config_with_env(state.env.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Refusing to run: {}", e);
            return Invocation::new(StatusCode::BAD_REQUEST, e.to_string());
        }
    };
    let date = resolve_target_date(&cfg, today);
    info!(project = %cfg.project_id, %date, "Starting daily report");

    // A panic inside the pipeline surfaces as a JoinError instead of tearing down the server.
    let outcome = match tokio::spawn(generate_and_deliver(state.clone(), cfg, date)).await {
        Ok(result) => result,
        Err(join) => Err(ReportError::Unexpected(join.to_string())),
    };

    match outcome {
        Ok(summary) => {
            info!("Daily report for {} delivered: {}", date, summary);
            Invocation::new(StatusCode::OK, SUCCESS_MESSAGE)
        }
        Err(e) => {
            error!("Error in daily report for {}: {}", date, e);
            Invocation::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e))
        }
    }
}

async fn generate_and_deliver(state: ReporterState, cfg: Config, date: NaiveDate) -> Result<ReportSummary, ReportError> {
    let collector = ReportCollector::new(state.ledger.as_ref(), state.store.as_ref(), &cfg);
    let report = collector.collect(date).await;
    let summary = report.summary();
    if !report.has_data() {
        warn!("No cost or metric data for {}, sending an empty report", date);
    } else if summary.metrics_missing() > 0 {
        warn!(missing = summary.metrics_missing(), "Some metrics unavailable for {}", date);
    }

    let payload = build_discord_payload(&report.cost, &report.usage, report.date);
    send_to_discord(&state.http, &cfg.discord_webhook_url, &payload).await?;
    Ok(summary)
}

async fn trigger(State(state): State<ReporterState>) -> (StatusCode, String) {
    let outcome = run_invocation(&state, Utc::now().date_naive()).await;
    (outcome.status, outcome.body)
}

async fn health() -> &'static str {
    "ok"
}

/// Scheduler-facing router. The request body is ignored.
pub fn create_router(state: ReporterState) -> Router {
    Router::new()
        .route("/", get(trigger).post(trigger))
        .route("/healthz", get(health))
        .with_state(state)
}
