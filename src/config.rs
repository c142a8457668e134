/// Board edge lengths a match can be played on. Boards are always square.
pub const SUPPORTED_GRID_SIZES: [u32; 3] = [10, 15, 20];

/// Autonomous agent slots available in the owner set
pub const MAX_AUTONOMOUS_AGENTS: usize = 3;

/// Fastest simulation rate the runner's timer can honour (1 ms ticks)
pub const MAX_TICK_RATE_HZ: u32 = 1000;

/// Environment variable naming an optional JSON config file
pub const CONFIG_PATH_ENV: &str = "TILE_CLAIM_CONFIG";

/// Environment variable naming the high score file
pub const HIGH_SCORE_PATH_ENV: &str = "TILE_CLAIM_HIGHSCORES";

pub const DEFAULT_HIGH_SCORE_PATH: &str = "highscores.json";
