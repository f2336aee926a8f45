// Metrics sampling modules
pub mod base;
pub mod sampler;

use async_trait::async_trait;

use crate::error::DataSourceError;

// Re-export commonly used items
pub use base::{DayWindow, ResourceMetric};
pub use sampler::{sample_metric, sample_resource_usage};

/// A time-series store that can list every point of a metric type within a window.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Point values of all series matching `metric`, pooled together.
    async fn list_point_values(
        &self,
        project_id: &str,
        metric: ResourceMetric,
        window: &DayWindow,
    ) -> Result<Vec<f64>, DataSourceError>;
}
