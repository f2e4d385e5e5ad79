/// Current values of the three progress animations, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressFractions {
    pub advance: f32,
    pub retreat: f32,
    /// Completion flash. `1.0` means the border is fully undrawn.
    pub flash: f32,
}

impl Default for ProgressFractions {
    fn default() -> Self {
        Self {
            advance: 0.0,
            retreat: 0.0,
            flash: 1.0,
        }
    }
}
