//! Per-connection generator state.

use catan_board::{BoardError, BoardGenerator, GeneratorConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use uuid::Uuid;

use crate::layout::BoardLayout;
use crate::protocol::ServerMessage;

/// One connected client and the RNG its boards are dealt from.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    rng: StdRng,
    boards_generated: u64,
}

impl Session {
    /// Create a session; with a seed, boards are reproducible per session
    pub fn new(id: Uuid, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            id,
            rng,
            boards_generated: 0,
        }
    }

    pub fn boards_generated(&self) -> u64 {
        self.boards_generated
    }

    /// Deal a board for the given options object and lay it out.
    pub fn generate(
        &mut self,
        options: &serde_json::Value,
        tile_spacing: f64,
    ) -> Result<ServerMessage, BoardError> {
        let config = GeneratorConfig::try_from(options)?;
        let generation = BoardGenerator::classic().generate_counted(&config, &mut self.rng);
        let layout = BoardLayout::compute(&generation.board.query(), tile_spacing)?;

        self.boards_generated += 1;
        debug!(
            "Session {} board #{} took {} attempt(s)",
            self.id, self.boards_generated, generation.attempts
        );

        Ok(ServerMessage::BoardGenerated {
            board: generation.board,
            layout,
            attempts: generation.attempts,
        })
    }
}
