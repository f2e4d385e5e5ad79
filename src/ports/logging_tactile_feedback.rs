use std::time::Duration;

use anyhow::Result;

use crate::core::interfaces::ports::TactileFeedback;
use crate::global_constants::LOG_TAG_TELESCOPE;

/// Desktop stand-in for a vibrator: records the pulse in the log.
pub struct LoggingTactileFeedback;

impl TactileFeedback for LoggingTactileFeedback {
    fn has_vibrate_permission(&self) -> bool {
        true
    }

    fn vibrate(&self, duration: Duration) -> Result<()> {
        log::info!("{} vibrate for {:?}", LOG_TAG_TELESCOPE, duration);
        Ok(())
    }
}
