#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// First pointer touched down.
    Down,
    /// An additional pointer touched down.
    PointerDown,
    /// A non-final pointer lifted.
    PointerUp,
    /// The final pointer lifted.
    Up,
    Cancel,
    Move,
}

/// One pointer event. `pointer_count` counts every pointer involved in the
/// event, including the one going down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pointer_count: usize,
}

impl PointerEvent {
    pub fn new(action: PointerAction, pointer_count: usize) -> Self {
        Self {
            action,
            pointer_count,
        }
    }
}

/// Pointer bookkeeping for one press. Only exists while the controller is not idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSession {
    pub required_pointers: usize,
    pub current_pointers: usize,
}

impl PointerSession {
    pub fn begin(required_pointers: usize, current_pointers: usize) -> Self {
        Self {
            required_pointers,
            current_pointers,
        }
    }

    pub fn observe(&mut self, event: &PointerEvent) {
        self.current_pointers = match event.action {
            PointerAction::PointerUp | PointerAction::Up => event.pointer_count.saturating_sub(1),
            PointerAction::Cancel => 0,
            _ => event.pointer_count,
        };
    }
}
