//! Access to the container runtime.
//!
//! A [`ContainerRuntime`] lists containers on demand. The [`RuntimeGateway`]
//! wraps one runtime handle for the lifetime of the process and turns a failed
//! list into an empty one, so a collection pass never fails.
mod connector;
mod docker;
mod error;

use crate::error::ResultOkLogExt;

pub use connector::{DEFAULT_DOCKER_HOST, DockerEndpoint};
pub use docker::{DOCKER_API_VERSION, DockerClient};
pub use error::{Error, Result};

/// One container as reported by the runtime during a single collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    /// Declared names, possibly prefixed with `/`.
    pub names: Vec<String>,
    pub image: String,
    /// Human readable status, e.g. `Up 3 hours`.
    pub status: String,
    /// Lifecycle state, e.g. `running`.
    pub state: String,
}

impl ContainerRecord {
    /// The first declared name without a single leading `/`.
    ///
    /// Empty if the runtime reported no names.
    pub fn display_name(&self) -> &str {
        self.names
            .first()
            .map(|name| name.strip_prefix('/').unwrap_or(name))
            .unwrap_or_default()
    }
}

/// A container runtime that can list its containers.
///
/// Implementations are shared by concurrent scrapes and must be usable through `&self`.
pub trait ContainerRuntime: Send + Sync + 'static {
    /// Lists containers; stopped ones are included when `all` is set.
    fn list_containers(
        &self,
        all: bool,
    ) -> impl Future<Output = Result<Vec<ContainerRecord>>> + Send;
}

/// Owns the runtime handle used by every collection pass.
#[derive(Debug)]
pub struct RuntimeGateway<R> {
    runtime: R,
}

impl<R: ContainerRuntime> RuntimeGateway<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Lists all containers, including stopped ones.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn list(&self) -> Vec<ContainerRecord> {
        self.try_list().await.ok_log().unwrap_or_default()
    }

    /// Lists all containers, including stopped ones, propagating failures.
    pub async fn try_list(&self) -> Result<Vec<ContainerRecord>> {
        self.runtime.list_containers(true).await
    }
}
