use std::f32::consts::PI;
use std::time::{Duration, Instant};

use crate::core::models::ProgressFractions;
use crate::global_constants::LOG_TAG_ANIMATION;

/// Accelerate-decelerate curve, monotonic on `[0, 1]`.
fn ease(progress: f32) -> f32 {
    ((progress + 1.0) * PI).cos() / 2.0 + 0.5
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    started_at: Option<Instant>,
}

impl Tween {
    fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            started_at: None,
        }
    }

    /// Latches the start on the first sample. Returns the value and whether the
    /// tween has reached its end.
    fn sample(&mut self, now: Instant) -> (f32, bool) {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);

        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }

        let linear = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.from + (self.to - self.from) * ease(linear), false)
    }
}

/// Owns the advance, retreat and completion-flash animations. Purely numeric;
/// the host feeds it frame instants while [`ProgressAnimator::is_running`].
#[derive(Debug)]
pub struct ProgressAnimator {
    trigger_duration: Duration,
    cancel_duration: Duration,
    done_duration: Duration,
    fractions: ProgressFractions,
    advance: Option<Tween>,
    retreat: Option<Tween>,
    flash: Option<Tween>,
}

impl ProgressAnimator {
    pub fn build(trigger_duration: Duration, cancel_duration: Duration, done_duration: Duration) -> Self {
        Self {
            trigger_duration,
            cancel_duration,
            done_duration,
            fractions: ProgressFractions::default(),
            advance: None,
            retreat: None,
            flash: None,
        }
    }

    pub fn fractions(&self) -> ProgressFractions {
        self.fractions
    }

    /// Fraction of the progress sweep to draw: whichever of advance and retreat
    /// is active.
    pub fn bar_fraction(&self) -> f32 {
        if self.retreat.is_some() {
            self.fractions.retreat
        } else {
            self.fractions.advance
        }
    }

    pub fn is_running(&self) -> bool {
        self.advance.is_some() || self.retreat.is_some() || self.flash.is_some()
    }

    pub fn begin_advance(&mut self) {
        let from = self.bar_fraction();
        self.retreat = None;
        self.fractions.retreat = 0.0;
        self.fractions.advance = from;
        self.advance = Some(Tween::new(from, 1.0, self.trigger_duration));

        log::debug!("{} advance from {:.3}", LOG_TAG_ANIMATION, from);
    }

    pub fn begin_retreat(&mut self) {
        let from = self.bar_fraction();
        self.advance = None;
        self.fractions.advance = 0.0;
        self.fractions.retreat = from;
        self.retreat = Some(Tween::new(from, 0.0, self.cancel_duration));

        log::debug!("{} retreat from {:.3}", LOG_TAG_ANIMATION, from);
    }

    pub fn begin_flash(&mut self) {
        self.fractions.flash = 0.0;
        self.flash = Some(Tween::new(0.0, 1.0, self.done_duration));

        log::debug!("{} completion flash", LOG_TAG_ANIMATION);
    }

    /// Forces the advance to its end value, then clears it so nothing is left
    /// on screen when capture begins. Returns the value the advance ended at.
    pub fn snap_advance_complete(&mut self) -> f32 {
        self.advance = None;
        self.fractions.advance = 1.0;
        let reached = self.fractions.advance;
        log::debug!("{} advance snapped to {:.3}", LOG_TAG_ANIMATION, reached);

        self.fractions.advance = 0.0;
        reached
    }

    pub fn cancel_all(&mut self) {
        self.advance = None;
        self.retreat = None;
        self.flash = None;
        self.fractions = ProgressFractions::default();
    }

    /// Advances every running animation to `now`. Returns whether any is still
    /// running.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(tween) = self.advance.as_mut() {
            let (value, finished) = tween.sample(now);
            self.fractions.advance = value;
            if finished {
                self.advance = None;
            }
        }

        if let Some(tween) = self.retreat.as_mut() {
            let (value, finished) = tween.sample(now);
            self.fractions.retreat = value;
            if finished {
                self.retreat = None;
            }
        }

        if let Some(tween) = self.flash.as_mut() {
            let (value, finished) = tween.sample(now);
            self.fractions.flash = value;
            if finished {
                self.flash = None;
            }
        }

        self.is_running()
    }

}
