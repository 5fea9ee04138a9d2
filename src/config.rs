use clap::Parser;

use crate::runtime::{DEFAULT_DOCKER_HOST, DockerEndpoint};

/// Exports the lifecycle state of Docker containers as Prometheus metrics.
#[derive(Debug, Clone, Parser)]
#[command(name = "docker-state-exporter", version)]
pub struct Config {
    /// The address to listen on for HTTP requests. `:<port>` listens on all interfaces.
    #[arg(long, env = "LISTEN_ADDRESS", default_value = ":9417")]
    pub listen_address: String,

    /// Container runtime API endpoint (`unix://<path>`, `tcp://<host:port>`).
    #[arg(long, env = "DOCKER_HOST", default_value = DEFAULT_DOCKER_HOST)]
    pub docker_host: DockerEndpoint,

    /// Image repositories containing this marker get a `version` label from their tag.
    #[arg(long, env = "VERSION_MARKER", default_value = "aiforward")]
    pub version_marker: String,
}

impl Config {
    /// The listen address with a bare `:<port>` expanded to `0.0.0.0:<port>`.
    pub fn listen_addr(&self) -> String {
        match self.listen_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.listen_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["docker-state-exporter"]).unwrap();
        if std::env::var_os("LISTEN_ADDRESS").is_none() {
            assert_eq!(config.listen_addr(), "0.0.0.0:9417");
        }
        if std::env::var_os("DOCKER_HOST").is_none() {
            assert_eq!(
                config.docker_host,
                DockerEndpoint::Unix(PathBuf::from("/var/run/docker.sock"))
            );
        }
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "docker-state-exporter",
            "--listen-address",
            "127.0.0.1:9000",
            "--docker-host",
            "tcp://10.100.3.206:2375",
            "--version-marker",
            "internal",
        ])
        .unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:9000");
        assert_eq!(
            config.docker_host,
            DockerEndpoint::Tcp("10.100.3.206:2375".to_owned())
        );
        assert_eq!(config.version_marker, "internal");
    }

    #[test]
    fn test_invalid_docker_host() {
        let err = Config::try_parse_from([
            "docker-state-exporter",
            "--docker-host",
            "ftp://nowhere",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
