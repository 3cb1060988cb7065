use crate::*;
pub use winding::*;

mod winding;

pub trait PathCarver {
    fn carve(self, config: GameConfig) -> Result<CarvedPath>;
}
