use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::agent::Mode;
use super::reachability::DEFAULT_EXPANSION_CAP;
use crate::config::{MAX_AUTONOMOUS_AGENTS, MAX_TICK_RATE_HZ, SUPPORTED_GRID_SIZES};
use crate::game::traits::GameError;

/// Speed limits and rates for one kind of agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTuning {
    /// Top speed in world units per second while exploring
    pub max_speed: f32,
    /// Top speed while pursuing
    pub pursue_speed: f32,
    /// Velocity change per second while steering
    pub acceleration: f32,
    /// Velocity change per second while coming to rest
    pub deceleration: f32,
}

impl AgentTuning {
    pub fn top_speed(&self, mode: Mode) -> f32 {
        match mode {
            Mode::Explore => self.max_speed,
            Mode::Pursue => self.pursue_speed,
        }
    }

    pub fn bot() -> Self {
        Self {
            max_speed: 4.0,
            pursue_speed: 4.0,
            acceleration: 20.0,
            deceleration: 25.0,
        }
    }

    pub fn player() -> Self {
        Self {
            max_speed: 5.0,
            pursue_speed: 5.0,
            acceleration: 20.0,
            deceleration: 25.0,
        }
    }

    fn validate(&self, who: &str) -> Result<(), GameError> {
        let values = [
            self.max_speed,
            self.pursue_speed,
            self.acceleration,
            self.deceleration,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "{} tuning must be finite and non-negative: {:?}",
                who, self
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryConfig {
    /// Board edge length in tiles (boards are square)
    pub grid_size: u32,
    /// World units per tile
    pub tile_size: f32,
    /// Simulation ticks per second for the runner
    pub tick_rate_hz: u32,
    /// Match length in simulated seconds
    pub match_duration_secs: f32,
    /// Autonomous agents in the match
    pub number_of_bots: usize,
    pub player: AgentTuning,
    pub bot: AgentTuning,
    /// Seconds between autonomous decisions
    pub decision_interval_secs: f32,
    /// Expansion cap for reachability searches
    pub reachability_cap: usize,
    /// Spawn distance from the board corners
    pub spawn_inset: i32,
    /// Spawn inset used on boards smaller than `small_grid_threshold`
    pub small_grid_inset: i32,
    pub small_grid_threshold: u32,
    /// Controlled input magnitudes at or below this count as no input
    pub input_deadzone: f32,
    /// Seconds each countdown number is shown
    pub countdown_step_secs: f32,
    /// Seconds the start cue is shown
    pub countdown_start_secs: f32,
    /// Seed for autonomous choices; entropy when absent
    pub seed: Option<u64>,
}

impl TerritoryConfig {
    pub fn with_grid_size(size: u32) -> Self {
        Self {
            grid_size: size,
            ..Default::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GameError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            GameError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }

    /// Spawn inset for a board of the given dimensions.
    pub fn spawn_inset_for(&self, width: u32, height: u32) -> i32 {
        if width < self.small_grid_threshold || height < self.small_grid_threshold {
            self.small_grid_inset
        } else {
            self.spawn_inset
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !SUPPORTED_GRID_SIZES.contains(&self.grid_size) {
            return Err(GameError::InvalidConfig(format!(
                "Unsupported grid size {} (expected one of {:?})",
                self.grid_size, SUPPORTED_GRID_SIZES
            )));
        }
        if self.number_of_bots > MAX_AUTONOMOUS_AGENTS {
            return Err(GameError::InvalidConfig(format!(
                "At most {} bots are supported, got {}",
                MAX_AUTONOMOUS_AGENTS, self.number_of_bots
            )));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(GameError::InvalidConfig(format!(
                "Tick rate must be between 1 and {} Hz, got {}",
                MAX_TICK_RATE_HZ, self.tick_rate_hz
            )));
        }
        if !self.match_duration_secs.is_finite() || self.match_duration_secs <= 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "Match duration must be positive, got {}",
                self.match_duration_secs
            )));
        }
        if !self.decision_interval_secs.is_finite() || self.decision_interval_secs < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "Decision interval must be non-negative, got {}",
                self.decision_interval_secs
            )));
        }
        if self.spawn_inset < 0 || self.small_grid_inset < 0 {
            return Err(GameError::InvalidConfig("Spawn insets must be non-negative".to_string()));
        }
        self.player.validate("player")?;
        self.bot.validate("bot")?;
        Ok(())
    }
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            tile_size: 1.0,
            tick_rate_hz: 30,
            match_duration_secs: 60.0,
            number_of_bots: 2,
            player: AgentTuning::player(),
            bot: AgentTuning::bot(),
            decision_interval_secs: 0.5,
            reachability_cap: DEFAULT_EXPANSION_CAP,
            spawn_inset: 2,
            small_grid_inset: 1,
            small_grid_threshold: 6,
            input_deadzone: 0.1,
            countdown_step_secs: 1.0,
            countdown_start_secs: 0.5,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TerritoryConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.number_of_bots, 2);
        assert_eq!(config.reachability_cap, 1000);
        assert_eq!(config.tick_duration(), Duration::from_secs_f64(1.0 / 30.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pursuit_speed_matches_normal_by_default() {
        let bot = AgentTuning::bot();
        assert_eq!(bot.top_speed(Mode::Explore), bot.top_speed(Mode::Pursue));
    }

    #[test]
    fn test_rejects_unsupported_sizes() {
        assert!(TerritoryConfig::with_grid_size(15).validate().is_ok());
        assert!(matches!(
            TerritoryConfig::with_grid_size(0).validate(),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(TerritoryConfig::with_grid_size(12).validate().is_err());
    }

    #[test]
    fn test_rejects_too_many_bots() {
        let config = TerritoryConfig {
            number_of_bots: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_rate_bounds() {
        let too_fast = TerritoryConfig {
            tick_rate_hz: 2000,
            ..Default::default()
        };
        assert!(matches!(too_fast.validate(), Err(GameError::InvalidConfig(_))));

        let stopped = TerritoryConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert!(stopped.validate().is_err());

        let fastest = TerritoryConfig {
            tick_rate_hz: MAX_TICK_RATE_HZ,
            ..Default::default()
        };
        assert!(fastest.validate().is_ok());
        assert_eq!(fastest.tick_duration(), Duration::from_millis(1));
    }

    #[test]
    fn test_tick_duration_is_not_truncated() {
        let config = TerritoryConfig {
            tick_rate_hz: 30,
            ..Default::default()
        };
        let rate = 1.0 / config.tick_duration().as_secs_f64();
        assert!((rate - 30.0).abs() < 1e-6, "{}", rate);
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let mut config = TerritoryConfig::default();
        config.bot.acceleration = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TerritoryConfig =
            serde_json::from_str(r#"{ "grid_size": 10, "number_of_bots": 3, "seed": 42 }"#).unwrap();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.number_of_bots, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.match_duration_secs, 60.0);
        assert_eq!(config.bot, AgentTuning::bot());
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join(format!("tile-claim-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "grid_size": 15, "match_duration_secs": 30.0 }"#).unwrap();

        let config = TerritoryConfig::from_json_file(&path).unwrap();
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.match_duration_secs, 30.0);

        std::fs::write(&path, r#"{ "grid_size": 7 }"#).unwrap();
        assert!(TerritoryConfig::from_json_file(&path).is_err());
        assert!(TerritoryConfig::from_json_file(dir.join("missing.json")).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_small_grid_inset() {
        let config = TerritoryConfig::with_grid_size(10);
        assert_eq!(config.spawn_inset_for(10, 10), 2);
        assert_eq!(config.spawn_inset_for(5, 5), 1);
        assert_eq!(config.spawn_inset_for(10, 4), 1);
    }
}
