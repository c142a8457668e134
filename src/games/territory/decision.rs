use rand::Rng;
use rand::seq::SliceRandom;

use super::agent::{Agent, Mode};
use super::reachability::find_nearest_reachable_empty;
use super::state::{Owner, TileGrid};
use super::vec2::Vec2;

/// Cell offsets probed by Explore: the four orthogonals, then the diagonals.
const PROBE_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (-1, 0),
    (1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

fn probe_direction((dx, dy): (i32, i32)) -> Vec2 {
    Vec2::new(dx as f32, dy as f32).normalized()
}

/// Run one decision step for an autonomous agent and store the chosen
/// direction on it.
pub fn make_decision<R: Rng + ?Sized>(grid: &TileGrid, agent: &mut Agent, cap: usize, rng: &mut R) {
    agent.direction = match agent.mode {
        Mode::Explore => explore_direction(grid, agent.position, agent.identity(), rng),
        Mode::Pursue => pursue_direction(grid, agent, cap),
    };
}

/// Greedy one-step choice: a random adjacent empty tile, else a random
/// adjacent walkable tile, else stand still.
pub fn explore_direction<R: Rng + ?Sized>(
    grid: &TileGrid,
    position: Vec2,
    walker: Owner,
    rng: &mut R,
) -> Vec2 {
    let current = grid.world_to_cell(position);
    let adjacent = |offset: (i32, i32)| current.offset(offset.0, offset.1);

    let empty: Vec<(i32, i32)> = PROBE_OFFSETS
        .iter()
        .copied()
        .filter(|offset| grid.owner_at(adjacent(*offset)) == Some(Owner::Empty))
        .collect();

    if let Some(offset) = empty.choose(rng) {
        return probe_direction(*offset);
    }

    let walkable: Vec<(i32, i32)> = PROBE_OFFSETS
        .iter()
        .copied()
        .filter(|offset| grid.is_walkable(adjacent(*offset), walker))
        .collect();

    walkable
        .choose(rng)
        .map(|offset| probe_direction(*offset))
        .unwrap_or(Vec2::ZERO)
}

/// Goal-directed choice: keep heading for the current target, picking the
/// nearest reachable empty tile whenever there is none or it was taken
/// under us.
pub fn pursue_direction(grid: &TileGrid, agent: &mut Agent, cap: usize) -> Vec2 {
    let current = grid.world_to_cell(agent.position);
    let identity = agent.identity();

    let needs_target = match agent.target {
        None => true,
        Some(target) if target == current && grid.owner_at(target) != Some(Owner::Empty) => {
            tracing::debug!(
                "[{}] Target ({}, {}) was claimed. Finding new target.",
                identity,
                target.x,
                target.y
            );
            true
        }
        Some(_) => false,
    };

    if needs_target {
        agent.target = find_nearest_reachable_empty(grid, current, identity, cap);
        match agent.target {
            Some(target) => tracing::debug!(
                "[{}] New target at ({}, {}), distance {}",
                identity,
                target.x,
                target.y,
                target.distance(&current)
            ),
            None => tracing::debug!("[{}] No reachable empty tiles", identity),
        }
    }

    let Some(target) = agent.target else {
        return Vec2::ZERO;
    };

    let direction = (grid.cell_to_world(target) - agent.position).normalized();

    // Taken while we were on the way; pick again next step
    if grid.owner_at(target) != Some(Owner::Empty) {
        agent.target = None;
    }

    direction
}
