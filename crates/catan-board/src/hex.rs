//! Hex grid primitives for the fixed board.
//!
//! This module provides:
//! - `CompassDirection`: the six directions from a hex to its neighbours
//! - `HexCoord`: axial coordinates used to check the board geometry and to lay
//!   tiles out on screen
//!
//! Directions are listed clockwise starting from East, so a direction's index
//! times 60 is its angle in screen space (y pointing down).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction from a hex to one of its six neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompassDirection {
    /// Right
    #[serde(rename = "E")]
    East,
    /// Bottom-right
    #[serde(rename = "SE")]
    SouthEast,
    /// Bottom-left
    #[serde(rename = "SW")]
    SouthWest,
    /// Left
    #[serde(rename = "W")]
    West,
    /// Top-left
    #[serde(rename = "NW")]
    NorthWest,
    /// Top-right
    #[serde(rename = "NE")]
    NorthEast,
}

impl CompassDirection {
    /// All directions in clockwise order starting from East
    pub const ALL: [CompassDirection; 6] = [
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
        CompassDirection::NorthEast,
    ];

    /// The direction pointing back the other way (E↔W, SE↔NW, SW↔NE)
    pub const fn inverse(self) -> Self {
        match self {
            CompassDirection::East => CompassDirection::West,
            CompassDirection::SouthEast => CompassDirection::NorthWest,
            CompassDirection::SouthWest => CompassDirection::NorthEast,
            CompassDirection::West => CompassDirection::East,
            CompassDirection::NorthWest => CompassDirection::SouthEast,
            CompassDirection::NorthEast => CompassDirection::SouthWest,
        }
    }

    /// Screen angle in degrees, clockwise from East
    pub fn angle_degrees(self) -> f64 {
        self as u8 as f64 * 60.0
    }

    /// Short compass label ("E", "SE", ...)
    pub const fn code(self) -> &'static str {
        match self {
            CompassDirection::East => "E",
            CompassDirection::SouthEast => "SE",
            CompassDirection::SouthWest => "SW",
            CompassDirection::West => "W",
            CompassDirection::NorthWest => "NW",
            CompassDirection::NorthEast => "NE",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: CompassDirection) -> HexCoord {
        match direction {
            CompassDirection::East => HexCoord::new(self.q + 1, self.r),
            CompassDirection::SouthEast => HexCoord::new(self.q, self.r + 1),
            CompassDirection::SouthWest => HexCoord::new(self.q - 1, self.r + 1),
            CompassDirection::West => HexCoord::new(self.q - 1, self.r),
            CompassDirection::NorthWest => HexCoord::new(self.q, self.r - 1),
            CompassDirection::NorthEast => HexCoord::new(self.q + 1, self.r - 1),
        }
    }

    /// The six neighbouring hexes in `CompassDirection::ALL` order
    pub fn neighbors(&self) -> [HexCoord; 6] {
        CompassDirection::ALL.map(|dir| self.neighbor(dir))
    }

    /// Direction from `self` to `other`, if they are neighbours
    pub fn direction_to(&self, other: &HexCoord) -> Option<CompassDirection> {
        CompassDirection::ALL
            .into_iter()
            .find(|dir| self.neighbor(*dir) == *other)
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Convert to pixel coordinates (center of hex)
    /// Uses pointy-top orientation with the given hex size (radius)
    pub fn to_pixel(&self, hex_size: f64) -> (f64, f64) {
        let x = hex_size * (3.0_f64.sqrt() * self.q as f64 + 3.0_f64.sqrt() / 2.0 * self.r as f64);
        let y = hex_size * (3.0 / 2.0 * self.r as f64);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_inverse_is_an_involution() {
        for dir in CompassDirection::ALL {
            assert_ne!(dir, dir.inverse());
            assert_eq!(dir, dir.inverse().inverse());
        }
    }

    #[test]
    fn test_inverse_pairs() {
        assert_eq!(CompassDirection::East.inverse(), CompassDirection::West);
        assert_eq!(CompassDirection::SouthEast.inverse(), CompassDirection::NorthWest);
        assert_eq!(CompassDirection::SouthWest.inverse(), CompassDirection::NorthEast);
    }

    #[test]
    fn test_neighbor_then_inverse_returns_home() {
        let origin = HexCoord::new(2, -1);
        for dir in CompassDirection::ALL {
            assert_eq!(origin.neighbor(dir).neighbor(dir.inverse()), origin);
        }
    }

    #[test]
    fn test_hex_neighbors() {
        let center = HexCoord::new(0, 0);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_direction_to() {
        let a = HexCoord::new(0, 0);
        assert_eq!(
            a.direction_to(&HexCoord::new(0, 1)),
            Some(CompassDirection::SouthEast)
        );
        assert_eq!(a.direction_to(&HexCoord::new(2, 0)), None);
        assert_eq!(a.direction_to(&a), None);
    }

    #[test]
    fn test_hex_distance() {
        let a = HexCoord::new(0, 0);
        assert_eq!(a.distance_to(&HexCoord::new(2, -1)), 2);
        assert_eq!(a.distance_to(&HexCoord::new(-3, 3)), 3);
    }

    #[test]
    fn test_pixel_offset_matches_screen_angle() {
        let origin = HexCoord::new(0, 0);
        for dir in CompassDirection::ALL {
            let (x, y) = origin.neighbor(dir).to_pixel(1.0);
            let mut angle = y.atan2(x).to_degrees();
            if angle < 0.0 {
                angle += 360.0;
            }
            assert!(
                (angle - dir.angle_degrees()).abs() < 1e-9,
                "{dir} drawn at {angle} degrees"
            );
        }
    }

    #[test]
    fn test_direction_serializes_as_code() {
        let json = serde_json::to_string(&CompassDirection::NorthWest).unwrap();
        assert_eq!(json, "\"NW\"");
        let back: CompassDirection = serde_json::from_str("\"SW\"").unwrap();
        assert_eq!(back, CompassDirection::SouthWest);
    }
}
