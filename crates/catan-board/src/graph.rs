//! Fixed adjacency graph of the classic 19-tile layout.
//!
//! Slots are numbered 1..=19 along a connected spiral: the outer ring is
//! 1..=12, the inner ring 13..=18 and the middle hex is 19. Each edge is
//! stored once, in one direction only; the reverse edge is derived through
//! [`CompassDirection::inverse`] and only ever handed out by
//! [`AdjacencyGraph::edges_touching`].

use crate::hex::{CompassDirection, HexCoord};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Identifier of one fixed tile position (1-based)
pub type TileSlot = u8;

/// Directed edge between two neighbouring slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: TileSlot,
    pub to: TileSlot,
    /// Direction of travel from `from` to `to`
    pub direction: CompassDirection,
}

impl Edge {
    pub const fn new(from: TileSlot, to: TileSlot, direction: CompassDirection) -> Self {
        Self { from, to, direction }
    }

    /// The same edge walked the other way
    pub const fn inverted(&self) -> Self {
        Self::new(self.to, self.from, self.direction.inverse())
    }
}

/// Fixed spot on the coast where a port can sit: the side `direction` of `slot`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortAnchor {
    pub slot: TileSlot,
    pub direction: CompassDirection,
}

impl PortAnchor {
    pub const fn new(slot: TileSlot, direction: CompassDirection) -> Self {
        Self { slot, direction }
    }
}

/// Ways a layout definition can be malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Layout has no slots")]
    Empty,

    #[error("Slot {slot} is outside 1..={slot_count}")]
    SlotOutOfRange { slot: TileSlot, slot_count: u8 },

    #[error("Slot {0} is connected to itself")]
    SelfLoop(TileSlot),

    #[error("Slots {0} and {1} are connected more than once")]
    DuplicateEdge(TileSlot, TileSlot),

    #[error("Slot {slot} has more than one neighbour to the {direction}")]
    DirectionClash { slot: TileSlot, direction: CompassDirection },

    #[error("Slot {0} cannot be reached from slot 1")]
    Disconnected(TileSlot),

    #[error("Edge {from} -> {to} ({direction}) does not fit the hex grid")]
    InconsistentGeometry {
        from: TileSlot,
        to: TileSlot,
        direction: CompassDirection,
    },

    #[error("Slots {0} and {1} occupy the same hex")]
    OverlappingSlots(TileSlot, TileSlot),

    #[error("Consecutive slots {0} and {1} are not neighbours")]
    BrokenTraversal(TileSlot, TileSlot),

    #[error("Port anchor on slot {slot} faces {direction}, which is land")]
    LandlockedPort { slot: TileSlot, direction: CompassDirection },
}

const CLASSIC_SLOT_COUNT: u8 = 19;

const CLASSIC_EDGES: [Edge; 42] = {
    use crate::hex::CompassDirection::*;
    [
        Edge::new(1, 2, SouthWest),
        Edge::new(1, 12, East),
        Edge::new(1, 13, SouthEast),
        Edge::new(2, 3, SouthWest),
        Edge::new(2, 13, East),
        Edge::new(2, 14, SouthEast),
        Edge::new(3, 4, SouthEast),
        Edge::new(3, 14, East),
        Edge::new(4, 5, SouthEast),
        Edge::new(4, 14, NorthEast),
        Edge::new(4, 15, East),
        Edge::new(5, 6, East),
        Edge::new(5, 15, NorthEast),
        Edge::new(6, 7, East),
        Edge::new(6, 15, NorthWest),
        Edge::new(6, 16, NorthEast),
        Edge::new(7, 8, NorthEast),
        Edge::new(7, 16, NorthWest),
        Edge::new(8, 9, NorthEast),
        Edge::new(8, 16, West),
        Edge::new(8, 17, NorthWest),
        Edge::new(9, 10, NorthWest),
        Edge::new(9, 17, West),
        Edge::new(10, 11, NorthWest),
        Edge::new(10, 17, SouthWest),
        Edge::new(10, 18, West),
        Edge::new(11, 12, West),
        Edge::new(11, 18, SouthWest),
        Edge::new(12, 13, SouthWest),
        Edge::new(12, 18, SouthEast),
        Edge::new(13, 14, SouthWest),
        Edge::new(13, 18, East),
        Edge::new(13, 19, SouthEast),
        Edge::new(14, 15, SouthEast),
        Edge::new(14, 19, East),
        Edge::new(15, 16, East),
        Edge::new(15, 19, NorthEast),
        Edge::new(16, 17, NorthEast),
        Edge::new(16, 19, NorthWest),
        Edge::new(17, 18, NorthWest),
        Edge::new(17, 19, West),
        Edge::new(18, 19, SouthWest),
    ]
};

const CLASSIC_PORT_ANCHORS: [PortAnchor; 9] = {
    use crate::hex::CompassDirection::*;
    [
        PortAnchor::new(1, NorthWest),
        PortAnchor::new(2, West),
        PortAnchor::new(4, West),
        PortAnchor::new(5, SouthWest),
        PortAnchor::new(6, SouthEast),
        PortAnchor::new(8, SouthEast),
        PortAnchor::new(9, East),
        PortAnchor::new(10, NorthEast),
        PortAnchor::new(12, NorthEast),
    ]
};

static CLASSIC: Lazy<AdjacencyGraph> = Lazy::new(|| match AdjacencyGraph::build_classic() {
    Ok(graph) => graph,
    Err(e) => panic!("classic board layout is malformed: {e}"),
});

/// Which slots touch which, and in what direction, plus where ports may go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph {
    slot_count: u8,
    edges: Vec<Edge>,
    port_anchors: Vec<PortAnchor>,
    /// Axial position of every slot, indexed by `slot - 1`
    embedding: Vec<HexCoord>,
}

impl AdjacencyGraph {
    /// The classic 19-tile layout, validated on first use
    pub fn classic() -> &'static AdjacencyGraph {
        &CLASSIC
    }

    /// Build and validate the classic layout without panicking
    pub fn build_classic() -> Result<Self, LayoutError> {
        Self::new(
            CLASSIC_SLOT_COUNT,
            CLASSIC_EDGES.to_vec(),
            CLASSIC_PORT_ANCHORS.to_vec(),
        )
    }

    /// Build a layout from raw edge data, checking that it describes a
    /// connected patch of hexes whose slot numbering is a walkable path.
    pub fn new(
        slot_count: u8,
        edges: Vec<Edge>,
        port_anchors: Vec<PortAnchor>,
    ) -> Result<Self, LayoutError> {
        if slot_count == 0 {
            return Err(LayoutError::Empty);
        }

        let in_range = |slot: TileSlot| {
            if (1..=slot_count).contains(&slot) {
                Ok(())
            } else {
                Err(LayoutError::SlotOutOfRange { slot, slot_count })
            }
        };

        let mut pairs = HashSet::new();
        for edge in &edges {
            in_range(edge.from)?;
            in_range(edge.to)?;
            if edge.from == edge.to {
                return Err(LayoutError::SelfLoop(edge.from));
            }
            let pair = (edge.from.min(edge.to), edge.from.max(edge.to));
            if !pairs.insert(pair) {
                return Err(LayoutError::DuplicateEdge(pair.0, pair.1));
            }
        }

        let mut graph = Self {
            slot_count,
            edges,
            port_anchors,
            embedding: Vec::new(),
        };

        for slot in graph.slots() {
            let mut seen = HashSet::new();
            for edge in graph.edges_touching(slot) {
                if !seen.insert(edge.direction) {
                    return Err(LayoutError::DirectionClash {
                        slot,
                        direction: edge.direction,
                    });
                }
            }
        }

        graph.embedding = graph.embed()?;

        for slot in 1..slot_count {
            if !graph.are_adjacent(slot, slot + 1) {
                return Err(LayoutError::BrokenTraversal(slot, slot + 1));
            }
        }

        for anchor in &graph.port_anchors {
            in_range(anchor.slot)?;
            if graph
                .edges_touching(anchor.slot)
                .iter()
                .any(|e| e.direction == anchor.direction)
            {
                return Err(LayoutError::LandlockedPort {
                    slot: anchor.slot,
                    direction: anchor.direction,
                });
            }
        }

        Ok(graph)
    }

    /// Place every slot on the axial grid by walking edges out from slot 1,
    /// then check every stored edge agrees with the placement.
    fn embed(&self) -> Result<Vec<HexCoord>, LayoutError> {
        let mut coords: Vec<Option<HexCoord>> = vec![None; usize::from(self.slot_count)];
        coords[0] = Some(HexCoord::new(0, 0));

        let mut queue = VecDeque::from([1]);
        while let Some(slot) = queue.pop_front() {
            let Some(here) = coords[usize::from(slot) - 1] else {
                continue;
            };
            for edge in self.edges_touching(slot) {
                let there = &mut coords[usize::from(edge.to) - 1];
                if there.is_none() {
                    *there = Some(here.neighbor(edge.direction));
                    queue.push_back(edge.to);
                }
            }
        }

        let mut embedding = Vec::with_capacity(coords.len());
        for (slot, coord) in self.slots().zip(coords) {
            embedding.push(coord.ok_or(LayoutError::Disconnected(slot))?);
        }

        for edge in &self.edges {
            let from = embedding[usize::from(edge.from) - 1];
            let to = embedding[usize::from(edge.to) - 1];
            if from.neighbor(edge.direction) != to {
                return Err(LayoutError::InconsistentGeometry {
                    from: edge.from,
                    to: edge.to,
                    direction: edge.direction,
                });
            }
        }

        for (i, a) in embedding.iter().enumerate() {
            if let Some(j) = embedding[i + 1..].iter().position(|b| b == a) {
                return Err(LayoutError::OverlappingSlots(i as u8 + 1, (i + 1 + j) as u8 + 1));
            }
        }

        Ok(embedding)
    }

    /// Number of tile slots in the layout
    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }

    /// All slot ids, in traversal order
    pub fn slots(&self) -> RangeInclusive<TileSlot> {
        1..=self.slot_count
    }

    pub fn contains(&self, slot: TileSlot) -> bool {
        self.slots().contains(&slot)
    }

    /// The stored edges, each undirected connection appearing exactly once
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Every edge incident to `slot`, oriented so that `from == slot`.
    ///
    /// Stored edges leaving `slot` come first, then the inverses of stored
    /// edges arriving at it. Each neighbour appears exactly once.
    pub fn edges_touching(&self, slot: TileSlot) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| e.from == slot)
            .copied()
            .chain(self.edges.iter().filter(|e| e.to == slot).map(Edge::inverted))
            .collect()
    }

    /// Slots sharing a side with `slot`
    pub fn neighbors_of(&self, slot: TileSlot) -> Vec<TileSlot> {
        self.edges_touching(slot).into_iter().map(|e| e.to).collect()
    }

    pub fn are_adjacent(&self, a: TileSlot, b: TileSlot) -> bool {
        self.direction_between(a, b).is_some()
    }

    /// Direction of travel from `from` to `to`, if they are neighbours
    pub fn direction_between(&self, from: TileSlot, to: TileSlot) -> Option<CompassDirection> {
        self.edges_touching(from)
            .into_iter()
            .find(|e| e.to == to)
            .map(|e| e.direction)
    }

    /// The fixed coastal spots where ports are placed
    pub fn port_anchors(&self) -> &[PortAnchor] {
        &self.port_anchors
    }

    /// Axial position of every slot in id order, with slot 1 at the origin
    pub fn embedding(&self) -> &[HexCoord] {
        &self.embedding
    }

    /// Axial position of `slot`
    pub fn coord(&self, slot: TileSlot) -> Option<HexCoord> {
        if self.contains(slot) {
            self.embedding.get(usize::from(slot) - 1).copied()
        } else {
            None
        }
    }
}
