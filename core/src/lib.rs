#![no_std]

extern crate alloc;

use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use carver::*;
pub use engine::*;
pub use error::*;
pub use path::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod carver;
mod engine;
mod error;
mod path;
mod session;
mod timer;
mod types;

pub const DEFAULT_SIZE: Coord2 = (7, 9);
pub const DEFAULT_COUNTDOWN: Duration = Duration::from_millis(3000);
pub const DEFAULT_SHRINK: Duration = Duration::from_millis(400);
pub const DEFAULT_ATTEMPTS: u32 = 500;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid dimensions as `(rows, cols)`.
    pub size: Coord2,
    /// Full duration of the repeating countdown.
    pub countdown: Duration,
    /// Duration of the losing shrink animation.
    pub shrink: Duration,
    /// Carve attempts per budget round.
    pub attempts: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, attempts: u32) -> Self {
        Self {
            size,
            countdown: DEFAULT_COUNTDOWN,
            shrink: DEFAULT_SHRINK,
            attempts,
        }
    }

    pub fn new((rows, cols): Coord2) -> Self {
        let rows = rows.clamp(2, Coord::MAX);
        let cols = cols.clamp(2, Coord::MAX);
        Self::new_unchecked((rows, cols), DEFAULT_ATTEMPTS)
    }

    /// Bottom-left corner.
    pub const fn start(&self) -> Coord2 {
        (self.size.0 - 1, 0)
    }

    /// Top-right corner.
    pub const fn goal(&self) -> Coord2 {
        (0, self.size.1 - 1)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_degenerate_axes() {
        let config = GameConfig::new((0, 1));

        assert_eq!(config.size, (2, 2));
    }

    #[test]
    fn fixed_endpoints_sit_in_opposite_corners() {
        let config = GameConfig::new((7, 9));

        assert_eq!(config.start(), (6, 0));
        assert_eq!(config.goal(), (0, 8));
        assert_eq!(config.total_cells(), 63);
    }
}
