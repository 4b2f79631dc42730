// Main entry point - Dependency injection and scheduling
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{routing::get, Router};
use clap::Parser;
use tower_http::trace::TraceLayer;

use crate::application::evaluation_service::{EvaluationService, EvaluationSettings};
use crate::application::outbox::Outbox;
use crate::application::repository::RenderWindow;
use crate::application::scheduler::CycleScheduler;
use crate::domain::check::ThresholdExtractor;
use crate::infrastructure::config::load_config;
use crate::infrastructure::grafana_repository::GrafanaRepository;
use crate::infrastructure::graphite_repository::GraphiteRepository;
use crate::infrastructure::http_client::build_http_client;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::redis_sink::RedisEventSink;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{cycle_status, health_check};

/// Scan the Grafana boards tagged for alerting, evaluate the thresholds
/// encoded in their targets and push the resulting events to the Flapjack
/// redis queue.
#[derive(Parser, Debug)]
#[command(name = "grafana-alert-receiver", version)]
struct Args {
    /// Keep running and evaluate every `check_interval_secs`
    #[arg(short, long)]
    daemon: bool,

    /// More verbose console output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file, without extension
    #[arg(short, long, default_value = "config/receiver")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args.config)?;
    init_logging(args.verbose, &config.log)?;

    // Create repositories (infrastructure layer)
    let http = build_http_client(config.http.timeout_secs)?;
    let grafana = Arc::new(GrafanaRepository::new(
        http.clone(),
        config.grafana.endpoint.clone(),
        config.grafana.access_token.clone(),
    ));
    let graphite = Arc::new(GraphiteRepository::new(http));
    let sink = Arc::new(RedisEventSink::new(&config.redis)?);

    // Create services (application layer)
    let service = Arc::new(EvaluationService::new(
        grafana,
        graphite,
        ThresholdExtractor::default(),
        EvaluationSettings {
            grafana_endpoint: config.grafana.endpoint.clone(),
            alert_tag: config.grafana.alert_tag.clone(),
            window: RenderWindow {
                from: config.graphite.from.clone(),
                until: config.graphite.until.clone(),
            },
        },
    ));
    let outbox = Arc::new(Outbox::new(sink));
    let scheduler = CycleScheduler::new(
        service,
        outbox.clone(),
        Duration::from_secs(config.check_interval_secs),
    );

    if !args.daemon {
        scheduler.run_once().await?;
        return Ok(());
    }

    if let Some(listen) = &config.status.listen {
        let addr: SocketAddr = listen
            .parse()
            .with_context(|| format!("Invalid status.listen address {}", listen))?;
        let state = Arc::new(AppState {
            report: scheduler.report(),
            outbox,
        });
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind status endpoint on {}", addr))?;
        tokio::spawn(serve_status(listener, state));
    }

    scheduler.run().await;
    Ok(())
}

async fn serve_status(listener: tokio::net::TcpListener, state: Arc<AppState>) {
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/status", get(cycle_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("status endpoint listening on {:?}", listener.local_addr().ok());
    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("status endpoint stopped: {}", e);
    }
}
