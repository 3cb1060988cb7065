use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Grid axis below the minimum of 2")]
    DegenerateGrid,
    #[error("Path visits the same cell twice")]
    DuplicateCell,
    #[error("Consecutive path cells are not orthogonal neighbors")]
    DisjointStep,
    #[error("Path touches itself outside consecutive cells")]
    SelfTouching,
}

pub type Result<T> = core::result::Result<T, GameError>;
