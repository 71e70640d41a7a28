//! Local host for the contact relay function.
//!
//! Serves `POST /.netlify/functions/send-email` with the configuration read
//! from the environment. Listens on `CONTACT_RELAY_ADDR` (default
//! `127.0.0.1:8888`).

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use contact_relay::relay::http::{FUNCTION_PATH, create_router};
use contact_relay::{RelayConfig, ReqwestTransport, SubmissionRelay};

const ADDR_ENV: &str = "CONTACT_RELAY_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:8888";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contact_relay=info".parse()?),
        )
        .init();

    let config = RelayConfig::from_env()?;
    let addr: SocketAddr = std::env::var(ADDR_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .as_deref()
        .unwrap_or(DEFAULT_ADDR)
        .trim()
        .parse()?;

    info!("Starting contact relay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        environment = ?config.environment,
        email_configured = config.resend_api_key.is_some(),
        recaptcha_configured = config.recaptcha_secret.is_some(),
        "relay configuration loaded"
    );

    let http = ReqwestTransport::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(concat!("contact-relay/", env!("CARGO_PKG_VERSION")))
        .build_shared()?;
    let relay = Arc::new(SubmissionRelay::with_transport(config, http));

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}{FUNCTION_PATH}");
    axum::serve(
        listener,
        create_router(relay).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
