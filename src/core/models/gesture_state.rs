use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressing,
    Capturing,
    Saving,
}

impl GestureState {
    /// Capturing and Saving consume every pointer event.
    pub fn is_busy(self) -> bool {
        matches!(self, GestureState::Capturing | GestureState::Saving)
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureState::Idle => write!(f, "Idle"),
            GestureState::Pressing => write!(f, "Pressing"),
            GestureState::Capturing => write!(f, "Capturing"),
            GestureState::Saving => write!(f, "Saving"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_state_default_is_idle() {
        assert_eq!(GestureState::default(), GestureState::Idle);
    }

    #[test]
    fn test_is_busy_only_while_capturing_or_saving() {
        assert!(!GestureState::Idle.is_busy());
        assert!(!GestureState::Pressing.is_busy());
        assert!(GestureState::Capturing.is_busy());
        assert!(GestureState::Saving.is_busy());
    }
}
