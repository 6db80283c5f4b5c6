//! Randomized starting boards for the classic 19-hex Catan layout.
//!
//! This crate deals terrain, dice values and ports onto a fixed adjacency
//! graph, retrying until no two 6s or 8s share a side. It includes:
//! - Compass directions and axial hex coordinates
//! - The fixed adjacency graph and port anchors
//! - The terrain, value and port pools
//! - The generator and read-only board queries
//!
//! # Architecture
//!
//! Layout and pools are immutable process-wide constants. Each call to
//! [`BoardGenerator::generate`] owns its shuffled copies and returns a fresh
//! [`Board`]. Randomness is always passed in, so a seeded RNG reproduces a
//! board exactly. The crate compiles to native Rust and, behind the `wasm`
//! feature, to WebAssembly.
//!
//! # Modules
//!
//! - [`hex`]: Compass directions and axial coordinates
//! - [`graph`]: Which slots touch which, and where ports go
//! - [`pool`]: Terrain, values and port kinds to deal
//! - [`generator`]: The shuffle-and-check loop
//! - [`board`]: The generated board
//! - [`query`]: Neighbour, direction and traversal lookups

pub mod board;
pub mod error;
pub mod generator;
pub mod graph;
pub mod hex;
pub mod pool;
pub mod query;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{Board, Port, Tile};
pub use error::BoardError;
pub use generator::{
    has_red_adjacency, BoardGenerator, Generation, GeneratorConfig, DEFAULT_CENTER_SLOT,
    RANDOMIZE_PORTS, RANDOMIZE_PRODUCTION,
};
pub use graph::{AdjacencyGraph, Edge, LayoutError, PortAnchor, TileSlot};
pub use hex::{CompassDirection, HexCoord};
pub use pool::{PoolError, PortKind, Resource, ResourcePool, Terrain};
pub use query::{BoardQuery, TraversalStep};

/// Check the built-in layout and pools, returning the first problem found.
///
/// The classic statics panic on malformed data the first time they are used;
/// binaries call this at startup to fail with a readable error instead.
pub fn verify_constants() -> Result<(), BoardError> {
    let graph = AdjacencyGraph::build_classic()?;
    let pool = ResourcePool::build_classic()?;
    BoardGenerator::new(&graph, &pool)?;
    Ok(())
}
