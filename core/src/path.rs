use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One carved route from Start to Goal: the ordered cell sequence plus a
/// membership mask for O(1) "is this cell on the route" checks.
///
/// Invariants enforced at construction: all cells distinct and in bounds,
/// consecutive cells orthogonal neighbors, endpoints with exactly one
/// route-neighbor and interior cells with exactly two (a simple path that
/// never touches itself elsewhere).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarvedPath {
    cells: Vec<Coord2>,
    mask: Array2<bool>,
}

impl CarvedPath {
    /// Builds a path from an already-verified carve. The caller guarantees the
    /// mask matches the cell sequence and the simple-path invariants hold.
    pub(crate) fn from_parts(cells: Vec<Coord2>, mask: Array2<bool>) -> Self {
        Self { cells, mask }
    }

    pub fn from_cells(size: Coord2, cells: &[Coord2]) -> Result<Self> {
        if cells.len() < 2 {
            return Err(GameError::DisjointStep);
        }

        let mut mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in cells {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            if mask[coords.to_nd_index()] {
                return Err(GameError::DuplicateCell);
            }
            mask[coords.to_nd_index()] = true;
        }

        for pair in cells.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.0.abs_diff(b.0) + a.1.abs_diff(b.1) != 1 {
                return Err(GameError::DisjointStep);
            }
        }

        for (i, &coords) in cells.iter().enumerate() {
            let expected = if i == 0 || i == cells.len() - 1 { 1 } else { 2 };
            let on_route = mask
                .iter_neighbors(coords)
                .filter(|&pos| mask[pos.to_nd_index()])
                .count();
            if on_route != expected {
                return Err(GameError::SelfTouching);
            }
        }

        Ok(Self {
            cells: cells.to_vec(),
            mask,
        })
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn start(&self) -> Coord2 {
        self.cells[0]
    }

    pub fn goal(&self) -> Coord2 {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn total_cells(&self) -> CellCount {
        self.mask.len().try_into().unwrap()
    }

    pub fn covers_grid(&self) -> bool {
        self.len() == self.total_cells()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols && self.mask[coords.to_nd_index()]
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }
}
