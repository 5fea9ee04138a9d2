//! The `container_run_state` collector.
//!
//! Every scrape runs one collection pass: the runtime is listed, and each
//! container becomes one gauge sample whose value is the ordinal of its
//! lifecycle state. Nothing is kept between passes.
use std::collections::HashMap;

use prometheus::core::{Collector, Desc};
use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use tokio::runtime::Handle;

use crate::container::{VersionExtractor, state_ordinal};
use crate::runtime::{ContainerRecord, ContainerRuntime, RuntimeGateway};

pub const METRIC_NAME: &str = "container_run_state";
pub const METRIC_HELP: &str = "query container status";
pub const LABEL_NAMES: [&str; 6] = ["name", "id", "image", "status", "state", "version"];

/// Label values of one sample, in the order of [`LABEL_NAMES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleLabels {
    pub name: String,
    pub id: String,
    pub image: String,
    pub status: String,
    pub state: String,
    /// Empty when the image carries no version.
    pub version: String,
}

impl SampleLabels {
    pub fn values(&self) -> [&str; 6] {
        [
            &self.name,
            &self.id,
            &self.image,
            &self.status,
            &self.state,
            &self.version,
        ]
    }
}

/// One container's state during one collection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub value: f64,
    pub labels: SampleLabels,
}

/// Reports the lifecycle state of every container known to the runtime.
pub struct ContainerStateCollector<R> {
    gateway: RuntimeGateway<R>,
    versions: VersionExtractor,
    desc: Desc,
    handle: Handle,
}

impl<R: ContainerRuntime> ContainerStateCollector<R> {
    /// Creates a collector that drives collection passes on `handle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric description is invalid.
    pub fn new(
        gateway: RuntimeGateway<R>,
        versions: VersionExtractor,
        handle: Handle,
    ) -> prometheus::Result<Self> {
        let desc = Desc::new(
            METRIC_NAME.to_owned(),
            METRIC_HELP.to_owned(),
            LABEL_NAMES.iter().map(|label| (*label).to_owned()).collect(),
            HashMap::new(),
        )?;

        Ok(Self {
            gateway,
            versions,
            desc,
            handle,
        })
    }

    pub fn describe(&self) -> &Desc {
        &self.desc
    }

    /// Runs one collection pass.
    ///
    /// Samples follow the order reported by the runtime. A failing runtime
    /// yields no samples.
    pub async fn collect_samples(&self) -> Vec<MetricSample> {
        let records = self.gateway.list().await;
        let samples: Vec<MetricSample> = records.iter().map(|r| self.sample(r)).collect();
        log::debug!("Collected {} container samples", samples.len());
        samples
    }

    fn sample(&self, record: &ContainerRecord) -> MetricSample {
        log::debug!("{record:?}");
        MetricSample {
            value: state_ordinal(&record.state),
            labels: SampleLabels {
                name: record.display_name().to_owned(),
                id: record.id.clone(),
                image: record.image.clone(),
                status: record.status.clone(),
                state: record.state.clone(),
                version: self.versions.label(&record.image).to_owned(),
            },
        }
    }
}

impl MetricSample {
    fn to_metric(&self) -> Metric {
        let mut labels: Vec<LabelPair> = LABEL_NAMES
            .iter()
            .zip(self.labels.values())
            .map(|(name, value)| {
                let mut pair = LabelPair::default();
                pair.set_name((*name).to_owned());
                pair.set_value(value.to_owned());
                pair
            })
            .collect();
        labels.sort_by(|a, b| a.get_name().cmp(b.get_name()));

        let mut gauge = Gauge::default();
        gauge.set_value(self.value);
        let mut metric = Metric::default();
        metric.set_label(labels.into());
        metric.set_gauge(gauge);
        metric
    }
}

/// Renders one metric per sample, even when label sets coincide.
fn render(samples: &[MetricSample]) -> MetricFamily {
    let mut family = MetricFamily::default();
    family.set_name(METRIC_NAME.to_owned());
    family.set_help(METRIC_HELP.to_owned());
    family.set_field_type(MetricType::GAUGE);
    for sample in samples {
        family.mut_metric().push(sample.to_metric());
    }
    family
}

impl<R: ContainerRuntime> Collector for ContainerStateCollector<R> {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.desc]
    }

    /// Blocks on the runtime handle; must not be called from an async worker.
    fn collect(&self) -> Vec<MetricFamily> {
        let samples = self.handle.block_on(self.collect_samples());
        vec![render(&samples)]
    }
}
