//! Errors surfaced to callers of the board library.

use crate::graph::{LayoutError, TileSlot};
use crate::pool::PoolError;
use thiserror::Error;

/// Errors that can occur when building or querying a board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Missing board option `{key}`")]
    Configuration { key: &'static str },

    #[error("Board option `{key}` must be true or false")]
    InvalidOption { key: &'static str },

    #[error("Tile {to} is not adjacent to tile {from}")]
    NotAdjacent { from: TileSlot, to: TileSlot },

    #[error("No tile slot {0}")]
    UnknownSlot(TileSlot),

    #[error("Tile at position {position} has id {found}")]
    TileOutOfOrder { position: usize, found: TileSlot },

    #[error("A board holds exactly one desert without a value, found {0}")]
    DesertCount(usize),

    #[error("Pool deals {tiles} tiles and {ports} ports onto a layout with {slots} slots and {anchors} port anchors")]
    ShapeMismatch {
        tiles: usize,
        ports: usize,
        slots: usize,
        anchors: usize,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}
