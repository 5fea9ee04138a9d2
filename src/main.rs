use clap::Parser;

/// Entry point for the Docker State Exporter.
///
/// Exits non-zero if the listener cannot be bound or the server fails; a
/// SIGINT or SIGTERM shuts down gracefully with exit status 0.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug docker-state-exporter --listen-address :9417 --docker-host unix:///var/run/docker.sock
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = docker_state_exporter::Config::parse();
    docker_state_exporter::run(config).await?;
    Ok(())
}
