use std::time::Duration;

/// Errors that end (or, for [`Error::ShutdownTimeout`], are reported at the end of) the process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind listener on `{addr}`: {source}")]
    ListenerBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read listener address: {0}")]
    LocalAddr(#[source] std::io::Error),
    #[error("metrics server failed: {0}")]
    Serve(#[source] std::io::Error),
    #[error("metrics server task failed: {0}")]
    ServerTask(#[source] tokio::task::JoinError),
    #[error("failed to gracefully shutdown within {0:?}")]
    ShutdownTimeout(Duration),
    #[error("failed to register collector: {0}")]
    Registry(#[source] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResultOkLogExt<T, E> {
    fn ok_log(self) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }
}
