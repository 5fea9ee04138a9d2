use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus::{Encoder, Registry, TextEncoder};

use crate::error::{Error, Result};

/// How long in-flight requests may run after shutdown was requested.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

async fn metrics(State(registry): State<Registry>) -> Response {
    log::debug!("Scrape started");
    match tokio::task::spawn_blocking(move || encode(&registry)).await {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Ok(Err(err)) => {
            log::error!("Failed to encode metrics: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode metrics",
            )
                .into_response()
        }
        Err(err) => {
            log::error!("Metrics collection task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to collect metrics",
            )
                .into_response()
        }
    }
}

/// Gathers every registered collector; blocks for the duration of the collection passes.
fn encode(registry: &Registry) -> prometheus::Result<Vec<u8>> {
    let families = registry.gather();
    let mut body = Vec::new();
    TextEncoder::new().encode(&families, &mut body)?;
    Ok(body)
}

/// Routes `GET /metrics` to the registry.
pub fn router(registry: Registry) -> axum::Router {
    axum::Router::new()
        .route("/metrics", get(metrics))
        .with_state(registry)
}

/// HTTP endpoint serving the exposition format.
pub struct MetricsServer {
    listener: tokio::net::TcpListener,
    router: axum::Router,
    grace_period: Duration,
}

impl MetricsServer {
    /// Binds the listener.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListenerBind`] if the address cannot be bound.
    pub async fn bind(addr: &str, registry: Registry) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| Error::ListenerBind {
                addr: addr.to_owned(),
                source,
            })?;

        Ok(Self {
            listener,
            router: router(registry),
            grace_period: SHUTDOWN_GRACE_PERIOD,
        })
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Error::LocalAddr)
    }

    /// Serves until `shutdown` completes, then shuts down gracefully.
    ///
    /// After `shutdown` resolves no new connections are accepted and in-flight
    /// requests get the grace period to finish before the server is dropped.
    /// Exceeding the grace period is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails on its own before shutdown was requested.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            });
        let mut task = tokio::spawn(server.into_future());

        tokio::select! {
            res = &mut task => {
                return match res {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(err)) => Err(Error::Serve(err)),
                    Err(err) => Err(Error::ServerTask(err)),
                };
            }
            _ = shutdown => {}
        }

        log::info!("Server shutting down...");
        let _ = stop_tx.send(());
        match tokio::time::timeout(self.grace_period, &mut task).await {
            Ok(Ok(Ok(()))) => log::info!("Server shutdown"),
            Ok(Ok(Err(err))) => return Err(Error::Serve(err)),
            Ok(Err(err)) => return Err(Error::ServerTask(err)),
            Err(_) => {
                task.abort();
                log::error!("{}", Error::ShutdownTimeout(self.grace_period));
            }
        }

        Ok(())
    }
}
