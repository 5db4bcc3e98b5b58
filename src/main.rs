use anyhow::Context;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::sync::Arc;
use study_helper::{api, config, logging, processing::StudyService};
use tokio::net::TcpListener;

const PORT_RANGE: RangeInclusive<u16> = 8000..=8099;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::init_config().context("Failed to load configuration")?;
    logging::init_tracing();
    tracing::info!(
        remote_enabled = config.remote_enabled(),
        local_model = %config.local_model,
        "Starting AI Study Helper"
    );

    let service = StudyService::new(config).context("Failed to build study service")?;
    let app = api::create_router(Arc::new(service), config.web_dir.clone());

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("Failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Bind the configured port, or the first free port in [`PORT_RANGE`].
async fn bind_listener(configured: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    if let Some(port) = configured {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => return Ok((listener, port)),
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        format!(
            "No available port found in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ),
    ))
}
