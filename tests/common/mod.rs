#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use docker_state_exporter::container::VersionExtractor;
use docker_state_exporter::metrics::ContainerStateCollector;
use docker_state_exporter::runtime::{self, ContainerRecord, ContainerRuntime, RuntimeGateway};
use prometheus::Registry;

pub fn record(id: &str, name: &str, image: &str, status: &str, state: &str) -> ContainerRecord {
    ContainerRecord {
        id: id.to_owned(),
        names: vec![name.to_owned()],
        image: image.to_owned(),
        status: status.to_owned(),
        state: state.to_owned(),
    }
}

pub fn sample_records() -> Vec<ContainerRecord> {
    vec![
        record(
            "a1",
            "/api",
            "org/aiforward-api:v2.3",
            "Up 1 hour",
            "running",
        ),
        record(
            "b2",
            "worker",
            "redis:7",
            "Exited (0) 2 minutes ago",
            "exited",
        ),
    ]
}

/// Returns the same records on every call, optionally after a delay.
#[derive(Clone, Default)]
pub struct StaticRuntime {
    pub records: Vec<ContainerRecord>,
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl StaticRuntime {
    pub fn new(records: Vec<ContainerRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContainerRuntime for StaticRuntime {
    async fn list_containers(&self, _all: bool) -> runtime::Result<Vec<ContainerRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.records.clone())
    }
}

pub struct FailingRuntime;

impl ContainerRuntime for FailingRuntime {
    async fn list_containers(&self, _all: bool) -> runtime::Result<Vec<ContainerRecord>> {
        Err(runtime::Error::unavailable("Cannot connect to the Docker daemon"))
    }
}

/// A registry holding one collector backed by `runtime`.
///
/// Must be called inside a multi-threaded tokio runtime.
pub fn registry<R: ContainerRuntime>(runtime: R) -> Registry {
    let collector = ContainerStateCollector::new(
        RuntimeGateway::new(runtime),
        VersionExtractor::new("aiforward"),
        tokio::runtime::Handle::current(),
    )
    .unwrap();
    let registry = Registry::new();
    registry.register(Box::new(collector)).unwrap();
    registry
}

/// Sample lines of the exposition body, sorted.
pub fn sample_lines(body: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = body
        .lines()
        .filter(|line| line.starts_with("container_run_state{"))
        .collect();
    lines.sort_unstable();
    lines
}
