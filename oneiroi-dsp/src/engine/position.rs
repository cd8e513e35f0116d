/// Where the filter sits in the effect chain for the current block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterPosition {
    /// Straight after the sources, before the resonator.
    #[default]
    Position1,
    /// Between resonator and echo.
    Position2,
    /// Between echo and ambience.
    Position3,
    /// After the ambience, at the end of the chain.
    Position4,
}

impl FilterPosition {
    pub const ALL: [FilterPosition; 4] = [
        FilterPosition::Position1,
        FilterPosition::Position2,
        FilterPosition::Position3,
        FilterPosition::Position4,
    ];

    /// Partition `0..1` into four equal bands. Values at or above 0.75
    /// (including anything past 1) select the last position.
    pub fn from_control(x: f32) -> Self {
        if x < 0.25 {
            FilterPosition::Position1
        } else if x < 0.5 {
            FilterPosition::Position2
        } else if x < 0.75 {
            FilterPosition::Position3
        } else {
            FilterPosition::Position4
        }
    }

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        self as usize
    }
}
