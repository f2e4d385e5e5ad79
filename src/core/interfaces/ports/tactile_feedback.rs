use std::time::Duration;

use anyhow::Result;

pub trait TactileFeedback: Send + Sync {
    fn has_vibrate_permission(&self) -> bool;
    fn vibrate(&self, duration: Duration) -> Result<()>;
}
