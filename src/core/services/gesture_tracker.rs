use crate::core::models::{GestureState, PointerAction, PointerEvent};
use crate::global_constants::LOG_TAG_GESTURE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureIntent {
    Start,
    Cancel,
}

/// What the tracker decided for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureVerdict {
    pub intent: Option<GestureIntent>,
    /// The event is consumed and must not reach the hosted content.
    pub handled: bool,
    pub needs_redraw: bool,
}

impl GestureVerdict {
    fn passthrough() -> Self {
        Self {
            intent: None,
            handled: false,
            needs_redraw: false,
        }
    }

    fn swallowed() -> Self {
        Self {
            intent: None,
            handled: true,
            needs_redraw: false,
        }
    }

    fn emit(intent: GestureIntent, handled: bool) -> Self {
        Self {
            intent: Some(intent),
            handled,
            needs_redraw: false,
        }
    }
}

/// Turns raw pointer events into start/cancel intents. Holds no press state of
/// its own; the controller passes its current state in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTracker {
    required_pointer_count: usize,
}

impl GestureTracker {
    pub fn with_pointer_count(required_pointer_count: usize) -> Self {
        Self {
            required_pointer_count,
        }
    }

    pub fn required_pointer_count(&self) -> usize {
        self.required_pointer_count
    }

    pub fn interpret(
        &self,
        event: &PointerEvent,
        state: GestureState,
        enabled: bool,
    ) -> GestureVerdict {
        if !enabled {
            return GestureVerdict::passthrough();
        }

        if state.is_busy() {
            return GestureVerdict::swallowed();
        }

        let pressing = state == GestureState::Pressing;
        let exact_count = event.pointer_count == self.required_pointer_count;

        match event.action {
            PointerAction::Cancel | PointerAction::Up | PointerAction::PointerUp => {
                if pressing {
                    log::debug!("{} pointer lifted while pressing", LOG_TAG_GESTURE);
                    GestureVerdict::emit(GestureIntent::Cancel, false)
                } else {
                    GestureVerdict::passthrough()
                }
            }
            PointerAction::Down => {
                if !pressing && exact_count {
                    GestureVerdict::emit(GestureIntent::Start, true)
                } else {
                    GestureVerdict::passthrough()
                }
            }
            PointerAction::PointerDown => {
                if exact_count {
                    if pressing {
                        GestureVerdict::swallowed()
                    } else {
                        GestureVerdict::emit(GestureIntent::Start, true)
                    }
                } else if pressing {
                    log::debug!(
                        "{} pointer count {} overshoots {}, cancelling",
                        LOG_TAG_GESTURE,
                        event.pointer_count,
                        self.required_pointer_count
                    );
                    GestureVerdict::emit(GestureIntent::Cancel, false)
                } else {
                    GestureVerdict::passthrough()
                }
            }
            PointerAction::Move => {
                if pressing {
                    GestureVerdict {
                        intent: None,
                        handled: true,
                        needs_redraw: true,
                    }
                } else {
                    GestureVerdict::passthrough()
                }
            }
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::with_pointer_count(crate::global_constants::DEFAULT_POINTER_COUNT)
    }
}
