//! Payments gateway server binary.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use payments_gateway::adapters::http::{build_router, PaymentsAppState};
use payments_gateway::adapters::{RedisEventPublisher, StripeConfig, StripePaymentAdapter};
use payments_gateway::config::AppConfig;
use payments_gateway::domain::payment::StripeWebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info", false);
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level, config.is_production());

    let stripe_config = StripeConfig::new(config.payment.stripe_secret_key.clone())
        .with_base_url(config.payment.api_base_url.clone())
        .with_timeout(config.payment.request_timeout());
    if config.payment.is_test_mode() {
        tracing::info!("Stripe test mode");
    }
    let payment_processor = Arc::new(StripePaymentAdapter::new(stripe_config)?);

    let event_publisher = Arc::new(RedisEventPublisher::connect(&config.broker.servers).await?);

    let state = PaymentsAppState {
        payment_processor,
        event_publisher,
        webhook_verifier: StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone()),
        success_url: config.payment.success_url.clone(),
        cancel_url: config.payment.cancel_url.clone(),
    };

    let app = build_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "payments gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `RUST_LOG` takes precedence over the configured filter.
fn init_tracing(default_filter: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Grace period for in-flight broker publishes
    tokio::time::sleep(Duration::from_secs(1)).await;
}
