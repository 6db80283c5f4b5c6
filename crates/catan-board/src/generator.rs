//! Randomized board generation with the red-adjacency constraint.
//!
//! Every attempt deals a fresh board: terrain is always shuffled, values and
//! ports are shuffled when the config asks for it, and the desert is dropped
//! in at a random position. When values are shuffled, an attempt that puts
//! two 6s/8s side by side is thrown away and the whole deal starts again.
//! There is no attempt cap; with the classic pool roughly one deal in seven
//! passes, so the loop ends quickly.

use crate::board::{Board, Port, Tile};
use crate::error::BoardError;
use crate::graph::{AdjacencyGraph, TileSlot};
use crate::pool::{ResourcePool, Terrain};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Slot whose tile is reported as the board's center unless overridden
pub const DEFAULT_CENTER_SLOT: TileSlot = 10;

/// Option key toggling value shuffling
pub const RANDOMIZE_PRODUCTION: &str = "randomize_production";

/// Option key toggling port shuffling
pub const RANDOMIZE_PORTS: &str = "randomize_ports";

/// Which parts of the deal are randomized.
///
/// Terrain and the desert position are shuffled regardless of these flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Shuffle the values and enforce the red-adjacency rule
    pub randomize_production: bool,
    /// Shuffle which port kind goes to which anchor
    pub randomize_ports: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            randomize_production: true,
            randomize_ports: true,
        }
    }
}

impl GeneratorConfig {
    /// Values and ports dealt in canonical order
    pub fn fixed() -> Self {
        Self {
            randomize_production: false,
            randomize_ports: false,
        }
    }

    /// Read the config from an untyped option map.
    ///
    /// Both keys must be present and boolean. Unrecognized keys are ignored.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, BoardError> {
        Ok(Self {
            randomize_production: read_flag(options, RANDOMIZE_PRODUCTION)?,
            randomize_ports: read_flag(options, RANDOMIZE_PORTS)?,
        })
    }
}

impl TryFrom<&Value> for GeneratorConfig {
    type Error = BoardError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value.as_object() {
            Some(options) => Self::from_options(options),
            None => Err(BoardError::Configuration {
                key: RANDOMIZE_PRODUCTION,
            }),
        }
    }
}

fn read_flag(options: &Map<String, Value>, key: &'static str) -> Result<bool, BoardError> {
    match options.get(key) {
        None => Err(BoardError::Configuration { key }),
        Some(value) => value.as_bool().ok_or(BoardError::InvalidOption { key }),
    }
}

/// A board together with how many deals it took to find it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub board: Board,
    pub attempts: u64,
}

/// Deals pools onto a layout.
#[derive(Debug, Clone, Copy)]
pub struct BoardGenerator<'a> {
    graph: &'a AdjacencyGraph,
    pool: &'a ResourcePool,
    center: TileSlot,
}

impl BoardGenerator<'static> {
    /// Generator for the classic layout and pool
    pub fn classic() -> Self {
        Self {
            graph: AdjacencyGraph::classic(),
            pool: ResourcePool::classic(),
            center: DEFAULT_CENTER_SLOT,
        }
    }
}

impl<'a> BoardGenerator<'a> {
    /// Pair a layout with a pool. The pool must fill every slot but one
    /// (left for the desert) and every port anchor.
    pub fn new(graph: &'a AdjacencyGraph, pool: &'a ResourcePool) -> Result<Self, BoardError> {
        let tiles = pool.terrain().len();
        let ports = pool.ports().len();
        let slots = usize::from(graph.slot_count());
        let anchors = graph.port_anchors().len();
        if tiles + 1 != slots || ports != anchors {
            return Err(BoardError::ShapeMismatch {
                tiles,
                ports,
                slots,
                anchors,
            });
        }

        let center = if graph.contains(DEFAULT_CENTER_SLOT) {
            DEFAULT_CENTER_SLOT
        } else {
            1
        };
        Ok(Self { graph, pool, center })
    }

    /// Report a different slot as the board's center tile
    pub fn with_center(mut self, slot: TileSlot) -> Result<Self, BoardError> {
        if !self.graph.contains(slot) {
            return Err(BoardError::UnknownSlot(slot));
        }
        self.center = slot;
        Ok(self)
    }

    pub fn graph(&self) -> &'a AdjacencyGraph {
        self.graph
    }

    pub fn pool(&self) -> &'a ResourcePool {
        self.pool
    }

    /// Generate a board. Never fails: rejected deals are retried until one
    /// satisfies the constraints.
    pub fn generate<R: Rng + ?Sized>(&self, config: &GeneratorConfig, rng: &mut R) -> Board {
        self.generate_counted(config, rng).board
    }

    /// Like [`generate`](Self::generate), also reporting the number of deals made
    pub fn generate_counted<R: Rng + ?Sized>(
        &self,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Generation {
        let mut attempts = 0u64;
        loop {
            attempts += 1;
            let (tiles, ports) = self.deal(config, rng);

            if config.randomize_production && has_red_adjacency(self.graph, &tiles) {
                trace!(attempts, "rejected deal with neighbouring red values");
                continue;
            }

            let center_tile = tiles[usize::from(self.center) - 1];
            debug!(
                attempts,
                ?config,
                desert = ?tiles.iter().position(Tile::is_desert).map(|i| i + 1),
                "generated board"
            );
            return Generation {
                board: Board::assemble(tiles, ports, center_tile),
                attempts,
            };
        }
    }

    /// Parse an untyped option map, then generate
    pub fn generate_from_options<R: Rng + ?Sized>(
        &self,
        options: &Map<String, Value>,
        rng: &mut R,
    ) -> Result<Board, BoardError> {
        let config = GeneratorConfig::from_options(options)?;
        Ok(self.generate(&config, rng))
    }

    /// One complete deal of tiles and ports, not yet checked
    fn deal<R: Rng + ?Sized>(&self, config: &GeneratorConfig, rng: &mut R) -> (Vec<Tile>, Vec<Port>) {
        let mut terrain = self.pool.terrain();
        let mut values = self.pool.values();
        let mut kinds = self.pool.ports();

        terrain.shuffle(rng);
        if config.randomize_production {
            values.shuffle(rng);
        }
        if config.randomize_ports {
            kinds.shuffle(rng);
        }

        let ports = self
            .graph
            .port_anchors()
            .iter()
            .zip(kinds)
            .map(|(anchor, kind)| Port::new(*anchor, kind))
            .collect();

        let mut pairs: Vec<(Terrain, Option<u8>)> = terrain
            .into_iter()
            .zip(values.into_iter().map(Some))
            .collect();
        let desert_at = rng.gen_range(0..=pairs.len());
        pairs.insert(desert_at, (Terrain::Desert, None));

        let tiles = pairs
            .into_iter()
            .zip(self.graph.slots())
            .map(|((terrain, value), id)| Tile::new(id, terrain, value))
            .collect();

        (tiles, ports)
    }
}

/// Whether any edge of `graph` joins two tiles that both carry a 6 or an 8.
///
/// `tiles` must be in slot order.
pub fn has_red_adjacency(graph: &AdjacencyGraph, tiles: &[Tile]) -> bool {
    let is_red = |slot: TileSlot| {
        slot.checked_sub(1)
            .and_then(|i| tiles.get(usize::from(i)))
            .is_some_and(Tile::is_red)
    };
    graph.edges().iter().any(|e| is_red(e.from) && is_red(e.to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PortKind;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_config_from_options() {
        let config = GeneratorConfig::from_options(&options(json!({
            "randomize_production": false,
            "randomize_ports": true,
            "theme": "ignored"
        })))
        .unwrap();
        assert_eq!(
            config,
            GeneratorConfig {
                randomize_production: false,
                randomize_ports: true
            }
        );
    }

    #[test]
    fn test_config_missing_key() {
        let err = GeneratorConfig::from_options(&options(json!({ "randomize_production": true })))
            .unwrap_err();
        assert_eq!(err, BoardError::Configuration { key: RANDOMIZE_PORTS });

        let err = GeneratorConfig::from_options(&Map::new()).unwrap_err();
        assert_eq!(err, BoardError::Configuration { key: RANDOMIZE_PRODUCTION });
    }

    #[test]
    fn test_config_rejects_non_boolean() {
        let err = GeneratorConfig::from_options(&options(json!({
            "randomize_production": "yes",
            "randomize_ports": true
        })))
        .unwrap_err();
        assert_eq!(err, BoardError::InvalidOption { key: RANDOMIZE_PRODUCTION });
    }

    #[test]
    fn test_config_from_non_object() {
        let err = GeneratorConfig::try_from(&json!([true, true])).unwrap_err();
        assert!(matches!(err, BoardError::Configuration { .. }));
    }

    #[test]
    fn test_fixed_config_keeps_canonical_values_and_ports() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = BoardGenerator::classic();
        let board = generator.generate(&GeneratorConfig::fixed(), &mut rng);

        assert_eq!(board.value_sequence(), ResourcePool::classic().values());
        let kinds: Vec<PortKind> = board.ports().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, ResourcePool::classic().ports());
    }

    #[test]
    fn test_ports_sit_on_fixed_anchors() {
        let mut rng = StdRng::seed_from_u64(11);
        let board = BoardGenerator::classic().generate(&GeneratorConfig::default(), &mut rng);
        let anchors: Vec<_> = board.ports().iter().map(Port::anchor).collect();
        assert_eq!(anchors, AdjacencyGraph::classic().port_anchors());
    }

    #[test]
    fn test_randomized_boards_have_no_red_neighbours() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = BoardGenerator::classic();
        for _ in 0..200 {
            let board = generator.generate(&GeneratorConfig::default(), &mut rng);
            assert!(!has_red_adjacency(generator.graph(), board.tiles()));
        }
    }

    #[test]
    fn test_center_defaults_to_slot_ten() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = BoardGenerator::classic().generate(&GeneratorConfig::default(), &mut rng);
        assert_eq!(board.center_tile().id, DEFAULT_CENTER_SLOT);
        assert_eq!(board.center_tile(), board.tile(DEFAULT_CENTER_SLOT).unwrap());
    }

    #[test]
    fn test_center_override() {
        let mut rng = StdRng::seed_from_u64(3);
        let generator = BoardGenerator::classic().with_center(19).unwrap();
        let board = generator.generate(&GeneratorConfig::default(), &mut rng);
        assert_eq!(board.center_tile().id, 19);

        let err = BoardGenerator::classic().with_center(20).unwrap_err();
        assert_eq!(err, BoardError::UnknownSlot(20));
    }

    #[test]
    fn test_same_seed_same_board() {
        let generator = BoardGenerator::classic();
        let a = generator.generate(&GeneratorConfig::default(), &mut StdRng::seed_from_u64(99));
        let b = generator.generate(&GeneratorConfig::default(), &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_red_adjacency_detection() {
        let graph = AdjacencyGraph::classic();
        let mut tiles: Vec<Tile> = graph
            .slots()
            .map(|id| Tile::new(id, Terrain::Forest, Some(4)))
            .collect();
        tiles[18] = Tile::desert(19);
        assert!(!has_red_adjacency(graph, &tiles));

        // 6 on slot 3 and 8 on slot 5 do not touch.
        tiles[2].value = Some(6);
        tiles[4].value = Some(8);
        assert!(!has_red_adjacency(graph, &tiles));

        // 8 on slot 14 touches slot 3.
        tiles[13].value = Some(8);
        assert!(has_red_adjacency(graph, &tiles));
    }

    #[test]
    fn test_shape_mismatch() {
        let graph = AdjacencyGraph::new(
            2,
            vec![crate::graph::Edge::new(1, 2, crate::hex::CompassDirection::East)],
            vec![],
        )
        .unwrap();
        let err = BoardGenerator::new(&graph, ResourcePool::classic()).unwrap_err();
        assert!(matches!(err, BoardError::ShapeMismatch { slots: 2, .. }));
    }

    #[test]
    fn test_generate_from_options() {
        let mut rng = StdRng::seed_from_u64(5);
        let generator = BoardGenerator::classic();
        let board = generator
            .generate_from_options(
                &options(json!({ "randomize_production": false, "randomize_ports": false })),
                &mut rng,
            )
            .unwrap();
        assert_eq!(board.value_sequence(), ResourcePool::classic().values());

        let err = generator
            .generate_from_options(&options(json!({ "randomize_ports": false })), &mut rng)
            .unwrap_err();
        assert_eq!(err, BoardError::Configuration { key: RANDOMIZE_PRODUCTION });
    }
}
