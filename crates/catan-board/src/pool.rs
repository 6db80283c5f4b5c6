//! The fixed sets of terrain, dice values and ports dealt onto a board.
//!
//! Pools are immutable. The accessors hand out owned copies so a generator
//! can shuffle its copy without touching the shared definition.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Resources produced by terrain and traded at ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];

    /// Single-letter code used on port markers
    pub const fn code(&self) -> char {
        match self {
            Resource::Brick => 'B',
            Resource::Lumber => 'L',
            Resource::Ore => 'O',
            Resource::Grain => 'G',
            Resource::Wool => 'W',
        }
    }
}

/// Kind of land on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Produces lumber
    Forest,
    /// Produces wool
    Pasture,
    /// Produces grain (coded `H` for harvest)
    Fields,
    /// Produces ore
    Mountains,
    /// Produces brick
    ClayPit,
    /// Produces nothing and never carries a value
    Desert,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Forest,
        Terrain::Pasture,
        Terrain::Fields,
        Terrain::Mountains,
        Terrain::ClayPit,
        Terrain::Desert,
    ];

    /// Single-letter code: F, P, H, M, C or D
    pub const fn code(&self) -> char {
        match self {
            Terrain::Forest => 'F',
            Terrain::Pasture => 'P',
            Terrain::Fields => 'H',
            Terrain::Mountains => 'M',
            Terrain::ClayPit => 'C',
            Terrain::Desert => 'D',
        }
    }

    /// The resource this terrain produces, if any
    pub const fn resource(&self) -> Option<Resource> {
        match self {
            Terrain::Forest => Some(Resource::Lumber),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Fields => Some(Resource::Grain),
            Terrain::Mountains => Some(Resource::Ore),
            Terrain::ClayPit => Some(Resource::Brick),
            Terrain::Desert => None,
        }
    }
}

/// Harbor types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl PortKind {
    /// The exchange rate for this port
    pub fn rate(&self) -> u32 {
        match self {
            PortKind::Generic => 3,
            PortKind::Specific(_) => 2,
        }
    }

    /// Marker code: `?` for generic, the resource letter otherwise
    pub fn code(&self) -> char {
        match self {
            PortKind::Generic => '?',
            PortKind::Specific(resource) => resource.code(),
        }
    }
}

/// Tiles on a board that are not the desert
pub const PRODUCING_TILES: usize = 18;

/// Ports on a board
pub const PORT_COUNT: usize = 9;

/// Values that make a tile "hot": the two most likely rolls besides 7
pub const RED_VALUES: [u8; 2] = [6, 8];

const CLASSIC_TERRAIN: [Terrain; PRODUCING_TILES] = {
    use Terrain::*;
    [
        Forest, Forest, Forest, Forest,
        Pasture, Pasture, Pasture, Pasture,
        Fields, Fields, Fields, Fields,
        Mountains, Mountains, Mountains,
        ClayPit, ClayPit, ClayPit,
    ]
};

const CLASSIC_VALUES: [u8; PRODUCING_TILES] =
    [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];

const CLASSIC_PORTS: [PortKind; PORT_COUNT] = {
    use PortKind::*;
    [
        Generic,
        Specific(Resource::Ore),
        Specific(Resource::Grain),
        Generic,
        Specific(Resource::Lumber),
        Specific(Resource::Brick),
        Generic,
        Generic,
        Specific(Resource::Wool),
    ]
};

static CLASSIC: Lazy<ResourcePool> = Lazy::new(|| match ResourcePool::build_classic() {
    Ok(pool) => pool,
    Err(e) => panic!("classic resource pool is malformed: {e}"),
});

/// Ways a pool definition can be malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("Expected {expected} terrain tiles, found {found}")]
    TerrainCount { expected: usize, found: usize },

    #[error("Expected {expected} values, found {found}")]
    ValueCount { expected: usize, found: usize },

    #[error("Expected {expected} ports, found {found}")]
    PortCount { expected: usize, found: usize },

    #[error("The desert is placed separately and cannot be in the terrain pool")]
    DesertInPool,

    #[error("{0} is not a valid tile value")]
    InvalidValue(u8),

    #[error("Pool does not follow the classic distribution")]
    NotClassic,
}

/// The multisets dealt onto a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    terrain: Vec<Terrain>,
    values: Vec<u8>,
    ports: Vec<PortKind>,
}

impl ResourcePool {
    /// The classic pool, validated on first use
    pub fn classic() -> &'static ResourcePool {
        &CLASSIC
    }

    /// Build and validate the classic pool without panicking
    pub fn build_classic() -> Result<Self, PoolError> {
        let pool = Self::new(
            CLASSIC_TERRAIN.to_vec(),
            CLASSIC_VALUES.to_vec(),
            CLASSIC_PORTS.to_vec(),
        )?;
        if !pool.is_classic_distribution() {
            return Err(PoolError::NotClassic);
        }
        Ok(pool)
    }

    /// Build a pool, checking its shape. Values must lie in 2..=12 and never be 7.
    pub fn new(
        terrain: Vec<Terrain>,
        values: Vec<u8>,
        ports: Vec<PortKind>,
    ) -> Result<Self, PoolError> {
        if terrain.len() != PRODUCING_TILES {
            return Err(PoolError::TerrainCount {
                expected: PRODUCING_TILES,
                found: terrain.len(),
            });
        }
        if terrain.contains(&Terrain::Desert) {
            return Err(PoolError::DesertInPool);
        }
        if values.len() != PRODUCING_TILES {
            return Err(PoolError::ValueCount {
                expected: PRODUCING_TILES,
                found: values.len(),
            });
        }
        if let Some(&bad) = values.iter().find(|v| !(2..=12).contains(*v) || **v == 7) {
            return Err(PoolError::InvalidValue(bad));
        }
        if ports.len() != PORT_COUNT {
            return Err(PoolError::PortCount {
                expected: PORT_COUNT,
                found: ports.len(),
            });
        }
        Ok(Self { terrain, values, ports })
    }

    /// A copy of the terrain pool, in canonical order
    pub fn terrain(&self) -> Vec<Terrain> {
        self.terrain.clone()
    }

    /// A copy of the value list, in canonical order
    pub fn values(&self) -> Vec<u8> {
        self.values.clone()
    }

    /// A copy of the port pool, in canonical order
    pub fn ports(&self) -> Vec<PortKind> {
        self.ports.clone()
    }

    /// Whether the multisets match the classic game: 4/4/4/3/3 terrain, one
    /// each of 2 and 12, two each of 3-6 and 8-11, four generic ports and
    /// one specific port per resource.
    pub fn is_classic_distribution(&self) -> bool {
        let terrain = counts(&self.terrain);
        let terrain_ok = [
            (Terrain::Forest, 4),
            (Terrain::Pasture, 4),
            (Terrain::Fields, 4),
            (Terrain::Mountains, 3),
            (Terrain::ClayPit, 3),
        ]
        .iter()
        .all(|(t, n)| terrain.get(t) == Some(n));

        let values = counts(&self.values);
        let values_ok = (2..=12u8)
            .filter(|v| *v != 7)
            .all(|v| values.get(&v) == Some(&if v == 2 || v == 12 { 1 } else { 2 }));

        let ports = counts(&self.ports);
        let ports_ok = ports.get(&PortKind::Generic) == Some(&4)
            && Resource::ALL
                .iter()
                .all(|r| ports.get(&PortKind::Specific(*r)) == Some(&1));

        terrain_ok && values_ok && ports_ok
    }
}

fn counts<T: Copy + Eq + std::hash::Hash>(items: &[T]) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(*item).or_insert(0) += 1;
    }
    counts
}
