use std::fmt;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::str::FromStr;
use std::task::{self, Poll};

use hyper::Uri;
use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::client::legacy::connect::{Connected, Connection};
use hyper_util::rt::TokioIo;

use super::Error;

/// Endpoint of the local Docker daemon.
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

/// Where the container runtime API is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerEndpoint {
    Unix(PathBuf),
    /// `host:port`
    Tcp(String),
}

impl DockerEndpoint {
    /// Authority used to build request URIs.
    pub(super) fn authority(&self) -> &str {
        match self {
            Self::Unix(_) => "localhost",
            Self::Tcp(addr) => addr,
        }
    }
}

impl FromStr for DockerEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(Error::InvalidEndpoint(s.to_owned()));
            }
            return Ok(Self::Unix(PathBuf::from(path)));
        }
        let addr = s
            .strip_prefix("tcp://")
            .or_else(|| s.strip_prefix("http://"))
            .ok_or_else(|| Error::InvalidEndpoint(s.to_owned()))?
            .trim_end_matches('/');
        match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Self::Tcp(addr.to_owned()))
            }
            _ => Err(Error::InvalidEndpoint(s.to_owned())),
        }
    }
}

impl fmt::Display for DockerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}

/// Opens a fresh stream to the configured endpoint, ignoring the request URI.
#[derive(Debug, Clone)]
pub(super) struct DockerConnector {
    endpoint: DockerEndpoint,
}

impl DockerConnector {
    pub(super) fn new(endpoint: DockerEndpoint) -> Self {
        Self { endpoint }
    }
}

impl tower::Service<Uri> for DockerConnector {
    type Response = DockerStream;

    type Error = io::Error;

    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: Uri) -> Self::Future {
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            log::trace!("Connecting to {endpoint}...");
            let stream = match endpoint {
                DockerEndpoint::Unix(path) => {
                    DockerStream::Unix(TokioIo::new(tokio::net::UnixStream::connect(path).await?))
                }
                DockerEndpoint::Tcp(addr) => {
                    let stream = tokio::net::TcpStream::connect(addr).await?;
                    stream.set_nodelay(true)?;
                    DockerStream::Tcp(TokioIo::new(stream))
                }
            };

            Ok(stream)
        })
    }
}

pub(super) enum DockerStream {
    Unix(TokioIo<tokio::net::UnixStream>),
    Tcp(TokioIo<tokio::net::TcpStream>),
}

impl Connection for DockerStream {
    fn connected(&self) -> Connected {
        Connected::new()
    }
}

impl Read for DockerStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl Write for DockerStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Unix(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tcp(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unix_endpoint() {
        let endpoint: DockerEndpoint = DEFAULT_DOCKER_HOST.parse().unwrap();
        assert_eq!(
            endpoint,
            DockerEndpoint::Unix(PathBuf::from("/var/run/docker.sock"))
        );
        assert_eq!(endpoint.authority(), "localhost");
        assert_eq!(endpoint.to_string(), "unix:///var/run/docker.sock");
    }

    #[test]
    fn test_parse_tcp_endpoint() {
        for raw in ["tcp://10.100.3.206:2375", "http://10.100.3.206:2375/"] {
            let endpoint: DockerEndpoint = raw.parse().unwrap();
            assert_eq!(endpoint, DockerEndpoint::Tcp("10.100.3.206:2375".to_owned()));
            assert_eq!(endpoint.authority(), "10.100.3.206:2375");
        }
    }

    #[test]
    fn test_parse_invalid_endpoint() {
        for raw in [
            "",
            "unix://",
            "/var/run/docker.sock",
            "tcp://",
            "tcp://host",
            "tcp://:2375",
            "tcp://host:port",
            "npipe:////./pipe/docker_engine",
        ] {
            let err = raw.parse::<DockerEndpoint>().unwrap_err();
            match err {
                Error::InvalidEndpoint(value) => assert_eq!(value, raw),
                other => panic!("unexpected error: {}", other),
            }
        }
    }
}
