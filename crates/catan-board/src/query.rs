//! Read-only lookups over a generated board and its layout.

use crate::board::{Board, Port, Tile};
use crate::error::BoardError;
use crate::graph::{AdjacencyGraph, TileSlot};
use crate::hex::CompassDirection;
use serde::Serialize;

/// One hop along the traversal path, from a tile to the next one in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraversalStep<'a> {
    pub from: &'a Tile,
    pub to: &'a Tile,
    pub direction: CompassDirection,
}

/// A board viewed through the adjacency graph it was generated on
#[derive(Debug, Clone, Copy)]
pub struct BoardQuery<'a> {
    board: &'a Board,
    graph: &'a AdjacencyGraph,
}

impl<'a> BoardQuery<'a> {
    pub fn new(board: &'a Board, graph: &'a AdjacencyGraph) -> Self {
        Self { board, graph }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    pub fn graph(&self) -> &'a AdjacencyGraph {
        self.graph
    }

    /// Get a tile by slot id
    pub fn tile(&self, slot: TileSlot) -> Result<&'a Tile, BoardError> {
        self.board.tile(slot).ok_or(BoardError::UnknownSlot(slot))
    }

    /// Compass direction to travel from `from` to its neighbour `to`
    pub fn direction(&self, from: &Tile, to: &Tile) -> Result<CompassDirection, BoardError> {
        self.graph
            .edges_touching(from.id)
            .into_iter()
            .find(|e| e.to == to.id)
            .map(|e| e.direction)
            .ok_or(BoardError::NotAdjacent {
                from: from.id,
                to: to.id,
            })
    }

    /// All tiles sharing a side with `tile`
    pub fn neighbors(&self, tile: &Tile) -> Vec<&'a Tile> {
        self.graph
            .edges_touching(tile.id)
            .into_iter()
            .filter_map(|e| self.board.tile(e.to))
            .collect()
    }

    /// Tiles in slot order. Consecutive tiles are always neighbours, so a
    /// renderer can place each tile relative to the one before it.
    pub fn traversal_order(&self) -> Vec<&'a Tile> {
        self.board.tiles().iter().collect()
    }

    /// The traversal as a chain of single steps
    pub fn steps(&self) -> Result<Vec<TraversalStep<'a>>, BoardError> {
        self.board
            .tiles()
            .windows(2)
            .map(|pair| {
                Ok(TraversalStep {
                    from: &pair[0],
                    to: &pair[1],
                    direction: self.direction(&pair[0], &pair[1])?,
                })
            })
            .collect()
    }

    pub fn desert(&self) -> Option<&'a Tile> {
        self.board.desert()
    }

    /// Tiles carrying a 6 or an 8
    pub fn red_tiles(&self) -> Vec<&'a Tile> {
        self.board.tiles().iter().filter(|t| t.is_red()).collect()
    }

    /// Whether any two neighbouring tiles both carry a 6 or an 8
    pub fn has_red_adjacency(&self) -> bool {
        crate::generator::has_red_adjacency(self.graph, self.board.tiles())
    }

    /// Each port paired with the tile it is attached to
    pub fn port_tiles(&self) -> Vec<(&'a Port, &'a Tile)> {
        self.board
            .ports()
            .iter()
            .filter_map(|port| self.board.tile(port.slot).map(|tile| (port, tile)))
            .collect()
    }
}
