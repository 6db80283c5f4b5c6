//! Screen positions for a generated board.
//!
//! Tiles are placed by walking the traversal order: the first tile sits at
//! the origin and every following tile is one hex step from its predecessor
//! in the direction between them. Centers are converted to pointy-top pixel
//! coordinates (y pointing down) and shifted so the board's centroid lands on
//! (0, 0). Ports sit one step outward from their tile, facing back toward it.

use catan_board::{BoardError, BoardQuery, HexCoord, PortKind, TileSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Center of one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePosition {
    pub slot: TileSlot,
    pub x: f64,
    pub y: f64,
}

/// Center of one port marker and the angle it points at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortPosition {
    pub slot: TileSlot,
    pub kind: PortKind,
    pub x: f64,
    pub y: f64,
    /// Degrees clockwise from East, pointing from the port toward its tile
    pub angle: f64,
}

/// Where a renderer should draw everything
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub hex_size: f64,
    pub tiles: Vec<TilePosition>,
    pub ports: Vec<PortPosition>,
}

impl BoardLayout {
    pub fn compute(query: &BoardQuery<'_>, hex_size: f64) -> Result<Self, BoardError> {
        let mut coords: HashMap<TileSlot, HexCoord> = HashMap::new();
        let order = query.traversal_order();
        if let Some(first) = order.first() {
            coords.insert(first.id, HexCoord::new(0, 0));
        }
        for step in query.steps()? {
            let here = coord_of(&coords, step.from.id)?;
            coords.insert(step.to.id, here.neighbor(step.direction));
        }

        let pixels = order
            .iter()
            .map(|tile| Ok((tile.id, coord_of(&coords, tile.id)?.to_pixel(hex_size))))
            .collect::<Result<Vec<_>, BoardError>>()?;

        let count = pixels.len().max(1) as f64;
        let cx = pixels.iter().map(|(_, (x, _))| x).sum::<f64>() / count;
        let cy = pixels.iter().map(|(_, (_, y))| y).sum::<f64>() / count;

        let tiles = pixels
            .into_iter()
            .map(|(slot, (x, y))| TilePosition {
                slot,
                x: x - cx,
                y: y - cy,
            })
            .collect();

        let mut ports = Vec::with_capacity(query.board().ports().len());
        for port in query.board().ports() {
            let anchor = coord_of(&coords, port.slot)?;
            let (x, y) = anchor.neighbor(port.direction).to_pixel(hex_size);
            ports.push(PortPosition {
                slot: port.slot,
                kind: port.kind,
                x: x - cx,
                y: y - cy,
                angle: (port.direction.angle_degrees() + 180.0) % 360.0,
            });
        }

        Ok(Self {
            hex_size,
            tiles,
            ports,
        })
    }

    pub fn tile(&self, slot: TileSlot) -> Option<&TilePosition> {
        self.tiles.iter().find(|t| t.slot == slot)
    }
}

fn coord_of(coords: &HashMap<TileSlot, HexCoord>, slot: TileSlot) -> Result<HexCoord, BoardError> {
    coords.get(&slot).copied().ok_or(BoardError::UnknownSlot(slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catan_board::{BoardGenerator, CompassDirection, GeneratorConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f64 = 1e-9;

    fn layout(hex_size: f64) -> BoardLayout {
        let mut rng = StdRng::seed_from_u64(10);
        let board = BoardGenerator::classic().generate(&GeneratorConfig::default(), &mut rng);
        BoardLayout::compute(&board.query(), hex_size).unwrap()
    }

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_every_tile_placed_once() {
        let layout = layout(1.0);
        assert_eq!(layout.tiles.len(), 19);
        assert_eq!(layout.ports.len(), 9);
        for slot in 1..=19 {
            assert!(layout.tile(slot).is_some(), "slot {slot} missing");
        }
    }

    #[test]
    fn test_consecutive_tiles_are_one_step_apart() {
        let hex_size = 50.0;
        let layout = layout(hex_size);
        let step = 3.0_f64.sqrt() * hex_size;
        for pair in layout.tiles.windows(2) {
            let d = distance((pair[0].x, pair[0].y), (pair[1].x, pair[1].y));
            assert!((d - step).abs() < EPSILON, "{} -> {}: {d}", pair[0].slot, pair[1].slot);
        }
    }

    #[test]
    fn test_board_is_centered_on_middle_hex() {
        let layout = layout(1.0);
        let middle = layout.tile(19).unwrap();
        assert!(middle.x.abs() < EPSILON && middle.y.abs() < EPSILON);
    }

    #[test]
    fn test_no_two_tiles_overlap() {
        let layout = layout(1.0);
        for (i, a) in layout.tiles.iter().enumerate() {
            for b in &layout.tiles[i + 1..] {
                assert!(distance((a.x, a.y), (b.x, b.y)) > 1.0);
            }
        }
    }

    #[test]
    fn test_ports_sit_off_the_coast_facing_home() {
        let hex_size = 1.0;
        let layout = layout(hex_size);
        let step = 3.0_f64.sqrt() * hex_size;
        for port in &layout.ports {
            let tile = layout.tile(port.slot).unwrap();
            assert!((distance((port.x, port.y), (tile.x, tile.y)) - step).abs() < EPSILON);

            let toward = (tile.y - port.y).atan2(tile.x - port.x).to_degrees();
            let toward = (toward + 360.0) % 360.0;
            let diff = (toward - port.angle).abs() % 360.0;
            assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "port on {}", port.slot);

            for other in &layout.tiles {
                assert!(distance((port.x, port.y), (other.x, other.y)) > step - EPSILON);
            }
        }
    }

    #[test]
    fn test_port_angle_points_back() {
        let layout = layout(1.0);
        let port = layout.ports.iter().find(|p| p.slot == 9).unwrap();
        // The anchor on slot 9 faces East, so the marker points West.
        assert_eq!(
            port.angle,
            CompassDirection::East.inverse().angle_degrees()
        );
    }
}
