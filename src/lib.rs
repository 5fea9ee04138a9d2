//! Docker State Exporter: exposes the lifecycle state of every container known
//! to a Docker daemon as the Prometheus gauge `container_run_state`.
//!
//! Each scrape of `GET /metrics` lists all containers, including stopped ones,
//! and emits one sample per container. The sample value orders the state:
//!
//! | state        | value |
//! |--------------|-------|
//! | `running`    | 1.0   |
//! | `exited`     | 0.6   |
//! | `restarting` | 0.4   |
//! | `created`    | 0.2   |
//! | other        | 0.1   |
//!
//! Nothing is stored between scrapes. An unreachable runtime produces an
//! empty, valid response instead of an error.
use prometheus::Registry;

pub mod api;
pub mod config;
pub mod container;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod signal;

pub use config::Config;
pub use error::{Error, Result};

/// Runs the exporter until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the collector cannot be registered, the listener cannot
/// be bound, or the server fails before shutdown.
pub async fn run(config: Config) -> Result<()> {
    log::info!("Using container runtime at {}", config.docker_host);
    let gateway = runtime::RuntimeGateway::new(runtime::DockerClient::new(
        config.docker_host.clone(),
    ));
    log::info!("Found {} containers", gateway.list().await.len());

    let collector = metrics::ContainerStateCollector::new(
        gateway,
        container::VersionExtractor::new(config.version_marker.clone()),
        tokio::runtime::Handle::current(),
    )
    .map_err(Error::Registry)?;
    let registry = Registry::new();
    registry
        .register(Box::new(collector))
        .map_err(Error::Registry)?;

    let server = api::MetricsServer::bind(&config.listen_addr(), registry).await?;
    log::info!("Listening on http://{}/metrics", server.local_addr()?);

    server.serve(signal::shutdown_signal()).await
}
