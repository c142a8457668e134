use rand::SeedableRng;
use rand::rngs::StdRng;
use tile_claim::config::{CONFIG_PATH_ENV, DEFAULT_HIGH_SCORE_PATH, HIGH_SCORE_PATH_ENV};
use tile_claim::game::traits::Game;
use tile_claim::games::territory::decision::explore_direction;
use tile_claim::games::territory::{GameEvent, Owner, TerritoryConfig, TerritoryGame};
use tile_claim::storage::JsonFileStore;

/// Seconds between steering changes for the controlled agent
const STEER_INTERVAL_SECS: f32 = 0.5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tile_claim=debug".parse()?),
        )
        .init();

    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => {
            tracing::info!("Loading config from {}", path);
            TerritoryConfig::from_json_file(&path)?
        }
        Err(_) => TerritoryConfig::default(),
    };

    let scores_path =
        std::env::var(HIGH_SCORE_PATH_ENV).unwrap_or_else(|_| DEFAULT_HIGH_SCORE_PATH.to_string());
    let store = JsonFileStore::new(scores_path);
    tracing::info!("High scores at {}", store.path().display());

    let mut game = TerritoryGame::with_store(config, Some(Box::new(store)))?;

    let started = game.begin_countdown()?;
    tokio::spawn(async move {
        if started.await.is_ok() {
            tracing::info!("Countdown finished, agents released");
        }
    });

    let dt = game.tick_rate();
    let mut interval = tokio::time::interval(dt);
    let mut steer_rng = StdRng::from_entropy();
    let mut elapsed = 0.0f32;
    let mut next_steer = 0.0f32;
    let mut next_report = 1.0f32;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, abandoning match");
                return Ok(());
            }
        }

        if game.is_running() && !game.is_paused() {
            elapsed += dt.as_secs_f32();

            if elapsed >= next_steer {
                next_steer = elapsed + STEER_INTERVAL_SECS;
                if let Some(agent) = game.controlled_agent() {
                    let direction =
                        explore_direction(game.state(), agent.position, Owner::Controlled, &mut steer_rng);
                    game.set_control_direction(direction);
                }
            }
        }

        let result = game.tick(dt);

        for event in &result.events {
            match event {
                GameEvent::Countdown(cue) => tracing::info!("{}", cue),
                GameEvent::OwnerBoxedIn { owner } => {
                    tracing::info!("{} is boxed in, bots are hunting the last empty tiles", owner)
                }
                GameEvent::MatchEnded { reason, scores } => {
                    tracing::info!("Match over: {:?}", reason);
                    for (owner, score) in &scores.scores {
                        tracing::info!("  {}: {} tiles", owner, score);
                    }
                    if scores.new_high_score {
                        tracing::info!("New high score: {}", scores.high_score);
                    }
                }
                _ => {}
            }
        }

        if game.is_running() && elapsed >= next_report {
            next_report += 1.0;
            let bots: Vec<usize> = (0..game.number_of_bots()).map(|i| game.bot_score(i)).collect();
            tracing::info!(
                "{:>4.1}s left | controlled {} | bots {:?} | empty {}",
                game.remaining_time(),
                game.controlled_score(),
                bots,
                game.score(Owner::Empty)
            );
        }

        if result.game_over {
            break;
        }
    }

    tracing::info!(
        "Winners: {:?} (high score {})",
        game.get_winners(),
        game.high_score()
    );
    Ok(())
}
