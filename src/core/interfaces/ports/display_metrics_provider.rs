use anyhow::Result;

use crate::core::models::DisplayMetrics;

pub trait DisplayMetricsProvider: Send + Sync {
    fn real_metrics(&self) -> Result<DisplayMetrics>;
}
