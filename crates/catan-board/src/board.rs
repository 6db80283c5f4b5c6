//! A generated board: tiles in slot order, ports, and the center tile.
//!
//! Boards are immutable once built. Read access beyond the plain accessors
//! lives in [`crate::query`].

use crate::error::BoardError;
use crate::graph::{AdjacencyGraph, PortAnchor, TileSlot};
use crate::hex::CompassDirection;
use crate::pool::{PortKind, Resource, Terrain, RED_VALUES};
use crate::query::BoardQuery;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileSlot,
    pub terrain: Terrain,
    /// Dice number that triggers production (None for the desert)
    pub value: Option<u8>,
}

impl Tile {
    pub fn new(id: TileSlot, terrain: Terrain, value: Option<u8>) -> Self {
        Self { id, terrain, value }
    }

    /// The desert tile for a slot
    pub fn desert(id: TileSlot) -> Self {
        Self::new(id, Terrain::Desert, None)
    }

    pub fn is_desert(&self) -> bool {
        self.terrain == Terrain::Desert
    }

    /// Whether this tile carries a 6 or an 8
    pub fn is_red(&self) -> bool {
        self.value.is_some_and(|v| RED_VALUES.contains(&v))
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        self.terrain.resource()
    }
}

/// Port placement on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Tile the port is attached to
    pub slot: TileSlot,
    /// Side of that tile facing the port
    pub direction: CompassDirection,
    pub kind: PortKind,
}

impl Port {
    pub fn new(anchor: PortAnchor, kind: PortKind) -> Self {
        Self {
            slot: anchor.slot,
            direction: anchor.direction,
            kind,
        }
    }

    pub fn anchor(&self) -> PortAnchor {
        PortAnchor::new(self.slot, self.direction)
    }
}

/// The complete starting board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Tiles in slot order; `tiles[i].id == i + 1`
    tiles: Vec<Tile>,
    ports: Vec<Port>,
    center_tile: Tile,
}

impl Board {
    /// Assemble a board from tiles already numbered in slot order.
    ///
    /// Ids must run 1..=n in order and exactly one tile must be a desert
    /// without a value. Used by the generator and for hand-built test boards.
    pub fn from_parts(
        tiles: Vec<Tile>,
        ports: Vec<Port>,
        center: TileSlot,
    ) -> Result<Self, BoardError> {
        for (position, tile) in tiles.iter().enumerate() {
            if usize::from(tile.id) != position + 1 {
                return Err(BoardError::TileOutOfOrder {
                    position,
                    found: tile.id,
                });
            }
        }

        let deserts = tiles.iter().filter(|t| t.is_desert()).count();
        let valueless = tiles.iter().filter(|t| t.value.is_none()).count();
        let misplaced = tiles.iter().any(|t| t.is_desert() && t.value.is_some());
        if deserts != 1 || valueless != 1 || misplaced {
            return Err(BoardError::DesertCount(deserts));
        }

        let center_tile = center
            .checked_sub(1)
            .and_then(|i| tiles.get(usize::from(i)))
            .copied()
            .ok_or(BoardError::UnknownSlot(center))?;

        Ok(Self::assemble(tiles, ports, center_tile))
    }

    /// Build from parts the generator already knows to be well formed
    pub(crate) fn assemble(tiles: Vec<Tile>, ports: Vec<Port>, center_tile: Tile) -> Self {
        Self {
            tiles,
            ports,
            center_tile,
        }
    }

    /// Tiles in slot order (1..=19)
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// The tile at the board's designated center slot
    pub fn center_tile(&self) -> &Tile {
        &self.center_tile
    }

    /// Get a tile by slot id
    pub fn tile(&self, slot: TileSlot) -> Option<&Tile> {
        slot.checked_sub(1)
            .and_then(|i| self.tiles.get(usize::from(i)))
    }

    /// The single desert tile
    pub fn desert(&self) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.is_desert())
    }

    /// Values of the producing tiles, in slot order
    pub fn value_sequence(&self) -> Vec<u8> {
        self.tiles.iter().filter_map(|t| t.value).collect()
    }

    /// How many tiles of each terrain the board holds
    pub fn terrain_counts(&self) -> HashMap<Terrain, usize> {
        let mut counts = HashMap::new();
        for tile in &self.tiles {
            *counts.entry(tile.terrain).or_insert(0) += 1;
        }
        counts
    }

    /// Read-only queries against the classic layout
    pub fn query(&self) -> BoardQuery<'_> {
        BoardQuery::new(self, AdjacencyGraph::classic())
    }
}
