use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Invalid input received
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Game is not in a valid state for the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Grid dimensions or scale that can never hold a match
    #[error("Invalid grid: {width}x{height} with tile size {tile_size}")]
    InvalidGrid {
        width: u32,
        height: u32,
        tile_size: f32,
    },
    /// Configuration rejected before setup
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Everything a single simulation step produced for outside collaborators.
#[derive(Debug)]
pub struct TickResult<E> {
    pub events: Vec<E>,
    /// Set on the tick that ended the game
    pub game_over: bool,
}

impl<E> Default for TickResult<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            game_over: false,
        }
    }
}

/// A simulation driven by an external per-tick callback.
pub trait Game: Send + Sync {
    type Event;
    type Participant: Copy;

    /// Advance the simulation by `dt` of simulated time.
    fn tick(&mut self, dt: Duration) -> TickResult<Self::Event>;
    fn handle_input(&mut self, input: &[u8]) -> Result<(), GameError>;
    fn encode_state(&self) -> Vec<u8>;
    fn tick_rate(&self) -> Duration;
    fn is_game_over(&self) -> bool {
        false
    }
    fn get_winners(&self) -> Vec<Self::Participant> {
        Vec::new()
    }
}
