use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;

use gcp_daily_reporter::config::flag_enabled;
use gcp_daily_reporter::{
    create_router, run_invocation, BigQueryClient, EnvironmentProvider, MonitoringClient, ReporterState,
    SystemEnvironment, TokenSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let env = SystemEnvironment;

    let http = reqwest::Client::new();
    let tokens = TokenSource::from_env(&env);
    let state = ReporterState {
        ledger: Arc::new(BigQueryClient::new(http.clone(), tokens.clone())),
        store: Arc::new(MonitoringClient::new(http.clone(), tokens)),
        http,
        env: Arc::new(SystemEnvironment),
    };

    // One-shot mode for cron-style schedulers
    if flag_enabled(&env, "RUN_ONCE") {
        let outcome = run_invocation(&state, Utc::now().date_naive()).await;
        info!("{} {}", outcome.status, outcome.body);
        if !outcome.status.is_success() {
            bail!("daily report failed ({}): {}", outcome.status, outcome.body);
        }
        return Ok(());
    }

    let port: u16 = env
        .get_var("PORT")
        .unwrap_or_else(|| "8080".to_string())
        .parse()
        .context("Invalid PORT")?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
