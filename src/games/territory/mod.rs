pub mod agent;
pub mod config;
pub mod countdown;
pub mod decision;
pub mod events;
pub mod motion;
pub mod reachability;
pub mod state;
pub mod systems;
pub mod vec2;

use std::time::Duration;

use prost::Message;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::oneshot;

use crate::game::traits::{Game, GameError, TickResult};
use crate::protocol::territory::{AgentState, ControlInput, TerritorySnapshot};
use crate::storage::HighScoreStore;

pub use agent::{Agent, Mode};
pub use config::{AgentTuning, TerritoryConfig};
pub use countdown::{CountdownCue, TimedSequence};
pub use events::{EndReason, FinalScores, GameEvent};
pub use state::{GridPos, Owner, Tile, TileClaimed, TileGrid};
pub use vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Board reset and agents on their spawns, clock not started
    Setup,
    /// Countdown in progress or match paused; nothing moves
    Paused,
    Running,
    Ended,
}

pub struct TerritoryGame {
    config: TerritoryConfig,
    grid: TileGrid,
    /// Controlled agent first, then the bots in index order
    agents: Vec<Agent>,
    rng: StdRng,
    high_scores: Option<Box<dyn HighScoreStore>>,
    /// Best controlled score for this board size
    high_score: u32,
    countdown: Option<TimedSequence<CountdownCue>>,
    /// Simulated seconds the match has been running
    clock: f32,
    remaining_time: f32,
    running: bool,
    paused: bool,
    ended: bool,
    boxed_in_reported: bool,
    final_scores: Option<FinalScores>,
    pending: Vec<GameEvent>,
}

impl TerritoryGame {
    pub fn new() -> Result<Self, GameError> {
        Self::with_config(TerritoryConfig::default())
    }

    pub fn with_config(config: TerritoryConfig) -> Result<Self, GameError> {
        Self::with_store(config, None)
    }

    /// Build the board and agents, then run setup. The config is validated
    /// before anything is allocated.
    pub fn with_store(
        config: TerritoryConfig,
        high_scores: Option<Box<dyn HighScoreStore>>,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let grid = TileGrid::new(config.grid_size, config.grid_size, config.tile_size)?;
        let agents = systems::create_agents(&grid, &config);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut game = Self {
            remaining_time: config.match_duration_secs,
            config,
            grid,
            agents,
            rng,
            high_scores,
            high_score: 0,
            countdown: None,
            clock: 0.0,
            running: false,
            paused: false,
            ended: false,
            boxed_in_reported: false,
            final_scores: None,
            pending: Vec::new(),
        };
        game.setup();
        Ok(game)
    }

    /// Reset the board, put every agent back on its spawn and load the high
    /// score. Leaves the match in `Setup`.
    pub fn setup(&mut self) {
        self.pending.clear();
        self.grid.reset_all();
        self.clock = 0.0;

        let claims = systems::reset_agents(&mut self.grid, &mut self.agents, &self.config, self.clock);
        self.pending.extend(claims.into_iter().map(GameEvent::TileClaimed));

        self.high_score = self.load_high_score();
        self.countdown = None;
        self.remaining_time = self.config.match_duration_secs;
        self.running = false;
        self.paused = false;
        self.ended = false;
        self.boxed_in_reported = false;
        self.final_scores = None;

        tracing::info!(
            "Match set up on a {}x{} board with {} bots (high score {})",
            self.config.grid_size,
            self.config.grid_size,
            self.number_of_bots(),
            self.high_score
        );
    }

    /// Hold the match paused while the "3, 2, 1, START!" sequence plays. The
    /// match starts on the tick the sequence finishes; the returned receiver
    /// resolves at that point. Only valid from `Setup`.
    pub fn begin_countdown(&mut self) -> Result<oneshot::Receiver<()>, GameError> {
        if self.phase() != MatchPhase::Setup {
            return Err(GameError::InvalidState(format!(
                "Cannot count down in phase {:?}",
                self.phase()
            )));
        }

        let mut sequence =
            countdown::countdown_sequence(self.config.countdown_step_secs, self.config.countdown_start_secs);
        let done = sequence.completion();
        if let Some(cue) = sequence.start() {
            self.pending.push(GameEvent::Countdown(cue));
        }

        self.paused = true;
        self.countdown = Some(sequence);
        Ok(done)
    }

    /// Start the clock immediately, skipping any countdown.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.ended || self.running {
            return Err(GameError::InvalidState(format!(
                "Cannot start a match in phase {:?}",
                self.phase()
            )));
        }

        self.countdown = None;
        self.running = true;
        self.paused = false;
        self.remaining_time = self.config.match_duration_secs;
        self.pending.push(GameEvent::MatchStarted);

        tracing::info!("Match started ({}s)", self.remaining_time);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        if !self.running || self.paused {
            return Err(GameError::InvalidState(format!(
                "Cannot pause in phase {:?}",
                self.phase()
            )));
        }
        self.paused = true;
        self.pending.push(GameEvent::MatchPaused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        if !self.running || !self.paused {
            return Err(GameError::InvalidState(format!(
                "Cannot resume in phase {:?}",
                self.phase()
            )));
        }
        self.paused = false;
        self.pending.push(GameEvent::MatchResumed);
        Ok(())
    }

    /// Abandon the current match and count down into a fresh one.
    pub fn restart(&mut self) -> Result<oneshot::Receiver<()>, GameError> {
        tracing::info!("Restarting match");
        self.setup();
        self.begin_countdown()
    }

    pub fn phase(&self) -> MatchPhase {
        if self.ended {
            MatchPhase::Ended
        } else if self.paused {
            MatchPhase::Paused
        } else if self.running {
            MatchPhase::Running
        } else {
            MatchPhase::Setup
        }
    }

    /// Steer the controlled agent. Takes effect from the next tick.
    pub fn set_control_direction(&mut self, direction: Vec2) {
        if let Some(agent) = self.agents.first_mut() {
            systems::apply_control_input(agent, direction, self.config.input_deadzone);
        }
    }

    pub fn score(&self, owner: Owner) -> usize {
        self.grid.count_by_owner(owner)
    }

    pub fn bot_score(&self, index: usize) -> usize {
        Owner::autonomous(index).map_or(0, |owner| self.score(owner))
    }

    pub fn controlled_score(&self) -> usize {
        self.score(Owner::Controlled)
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn total_tiles(&self) -> usize {
        self.grid.get_total_tiles()
    }

    pub fn grid_dimensions(&self) -> (u32, u32) {
        self.grid.get_grid_dimensions()
    }

    /// Cue currently shown by the pre-match countdown, if one is playing.
    pub fn countdown_cue(&self) -> Option<CountdownCue> {
        self.countdown.as_ref().and_then(|sequence| sequence.current().copied())
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining_time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn number_of_bots(&self) -> usize {
        self.agents.len().saturating_sub(1)
    }

    /// Set once the match has ended, cleared by the next setup.
    pub fn final_scores(&self) -> Option<&FinalScores> {
        self.final_scores.as_ref()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn controlled_agent(&self) -> Option<&Agent> {
        self.agents.first()
    }

    pub fn config(&self) -> &TerritoryConfig {
        &self.config
    }

    pub fn state(&self) -> &TileGrid {
        &self.grid
    }

    pub fn state_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    fn load_high_score(&self) -> u32 {
        let Some(store) = &self.high_scores else {
            return 0;
        };
        match store.load(self.config.grid_size) {
            Ok(score) => score,
            Err(e) => {
                tracing::warn!("Failed to load high score for size {}: {}", self.config.grid_size, e);
                0
            }
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.running = false;
        self.paused = false;
        self.ended = true;

        let scores = systems::tally_scores(&self.grid, &self.agents);
        let controlled = self.controlled_score() as u32;
        let new_high_score = controlled > self.high_score;

        if new_high_score {
            self.high_score = controlled;
            if let Some(store) = self.high_scores.as_mut() {
                if let Err(e) = store.save(self.config.grid_size, controlled) {
                    tracing::warn!("Failed to save high score: {}", e);
                }
            }
            tracing::info!("New high score {} on size {}", controlled, self.config.grid_size);
        }

        let final_scores = FinalScores {
            scores,
            high_score: self.high_score,
            new_high_score,
        };

        tracing::info!("Match ended ({:?}): {:?}", reason, final_scores.scores);

        self.final_scores = Some(final_scores.clone());
        self.pending.push(GameEvent::MatchEnded {
            reason,
            scores: final_scores,
        });
    }

    fn advance_countdown(&mut self, dt: f32) {
        let Some(sequence) = self.countdown.as_mut() else {
            return;
        };

        for cue in sequence.advance(dt) {
            tracing::debug!("Countdown: {}", cue);
            self.pending.push(GameEvent::Countdown(cue));
        }

        if sequence.is_finished() {
            self.countdown = None;
            self.paused = false;
            if let Err(e) = self.start() {
                tracing::warn!("Countdown finished but the match did not start: {}", e);
            }
        }
    }

    fn take_events(&mut self, game_over: bool) -> TickResult<GameEvent> {
        TickResult {
            events: std::mem::take(&mut self.pending),
            game_over,
        }
    }
}

impl Game for TerritoryGame {
    type Event = GameEvent;
    type Participant = Owner;

    fn tick(&mut self, dt: Duration) -> TickResult<GameEvent> {
        let dt = dt.as_secs_f32();

        if self.ended {
            return self.take_events(false);
        }

        if self.countdown.is_some() {
            self.advance_countdown(dt);
            return self.take_events(false);
        }

        if !self.running || self.paused {
            return self.take_events(false);
        }

        self.clock += dt;
        self.remaining_time -= dt;
        if self.remaining_time <= 0.0 {
            self.remaining_time = 0.0;
            self.end(EndReason::Timeout);
            return self.take_events(true);
        }

        if !self.boxed_in_reported && systems::escalate_if_boxed_in(&self.grid, &mut self.agents) {
            self.boxed_in_reported = true;
            self.pending.push(GameEvent::OwnerBoxedIn {
                owner: Owner::Controlled,
            });
        }

        let claims = systems::update_agents(
            &mut self.grid,
            &mut self.agents,
            &self.config,
            self.clock,
            dt,
            &mut self.rng,
        );
        self.pending.extend(claims.into_iter().map(GameEvent::TileClaimed));

        tracing::trace!("t={:.2} remaining={:.2}", self.clock, self.remaining_time);

        if self.grid.count_by_owner(Owner::Empty) == 0 {
            self.end(EndReason::BoardFull);
            return self.take_events(true);
        }

        self.take_events(false)
    }

    fn handle_input(&mut self, input: &[u8]) -> Result<(), GameError> {
        let control = ControlInput::decode(input)
            .map_err(|e| GameError::InvalidInput(format!("Failed to decode input: {}", e)))?;

        if !control.x.is_finite() || !control.y.is_finite() {
            return Err(GameError::InvalidInput(format!(
                "Non-finite direction ({}, {})",
                control.x, control.y
            )));
        }

        self.set_control_direction(Vec2::new(control.x, control.y));
        Ok(())
    }

    fn encode_state(&self) -> Vec<u8> {
        let (width, height) = self.grid.get_grid_dimensions();

        let mut tiles = Vec::with_capacity(self.grid.get_total_tiles());
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let owner = self.grid.owner_at(GridPos::new(x, y)).unwrap_or_default();
                tiles.push(owner.index());
            }
        }

        let agents = self
            .agents
            .iter()
            .map(|agent| AgentState {
                owner: agent.identity().index(),
                x: agent.position.x,
                y: agent.position.y,
                mode: match agent.mode {
                    Mode::Explore => 0,
                    Mode::Pursue => 1,
                },
            })
            .collect();

        TerritorySnapshot {
            width,
            height,
            tiles,
            agents,
            remaining_time: self.remaining_time,
            running: self.running,
            paused: self.paused,
        }
        .encode_to_vec()
    }

    fn tick_rate(&self) -> Duration {
        self.config.tick_duration()
    }

    fn is_game_over(&self) -> bool {
        self.ended
    }

    fn get_winners(&self) -> Vec<Owner> {
        match &self.final_scores {
            Some(scores) => scores.leaders(),
            None => FinalScores {
                scores: systems::tally_scores(&self.grid, &self.agents),
                high_score: self.high_score,
                new_high_score: false,
            }
            .leaders(),
        }
    }
}
