#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("invalid container runtime endpoint `{0}`, expected `unix://<path>`, `tcp://<host:port>` or `http://<host:port>`")]
    InvalidEndpoint(String),
}

impl Error {
    pub fn unavailable(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::RuntimeUnavailable(source.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
