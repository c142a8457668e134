use rand::Rng;

use super::agent::{Agent, Mode};
use super::config::{AgentTuning, TerritoryConfig};
use super::decision::make_decision;
use super::motion::{Motion, integrate};
use super::state::{GridPos, Owner, TileClaimed, TileGrid};
use super::vec2::Vec2;

#[derive(Debug)]
pub struct AgentStep {
    pub identity: Owner,
    pub decided: bool,
    pub motion: Motion,
    pub claim: Option<TileClaimed>,
}

/// Spawn cell for agent slot `index`: the controlled agent bottom-left, then
/// top-right, top-left and bottom-right, each inset from the corner. Extra
/// slots spawn in the centre.
pub fn spawn_cell(index: usize, grid: &TileGrid, config: &TerritoryConfig) -> GridPos {
    let (width, height) = grid.get_grid_dimensions();
    let (w, h) = (width as i32, height as i32);
    let inset = config.spawn_inset_for(width, height);

    let (x, y) = match index {
        0 => (inset, inset),
        1 => (w - 1 - inset, h - 1 - inset),
        2 => (inset, h - 1 - inset),
        3 => (w - 1 - inset, inset),
        _ => (w / 2, h / 2),
    };

    GridPos::new(x.clamp(0, w - 1), y.clamp(0, h - 1))
}

/// The controlled agent followed by `config.number_of_bots` autonomous ones,
/// in tick order.
pub fn create_agents(grid: &TileGrid, config: &TerritoryConfig) -> Vec<Agent> {
    let mut agents = vec![Agent::new(
        Owner::Controlled,
        grid.cell_to_world(spawn_cell(0, grid, config)),
    )];

    for index in 0..config.number_of_bots {
        let Some(identity) = Owner::autonomous(index) else {
            break;
        };
        agents.push(Agent::new(
            identity,
            grid.cell_to_world(spawn_cell(index + 1, grid, config)),
        ));
    }

    agents
}

/// Move every agent back to its spawn corner and claim the tile under it.
pub fn reset_agents(
    grid: &mut TileGrid,
    agents: &mut [Agent],
    config: &TerritoryConfig,
    now: f32,
) -> Vec<TileClaimed> {
    let mut claims = Vec::new();
    for (index, agent) in agents.iter_mut().enumerate() {
        let spawn = grid.cell_to_world(spawn_cell(index, grid, config));
        agent.reset(spawn, now, config.decision_interval_secs);
        claims.extend(claim_current_tile(grid, agent));
    }
    claims
}

/// Claim the tile under the agent if it changed since the last check and
/// the claim rule allows it. The cached tile follows the agent either way.
pub fn claim_current_tile(grid: &mut TileGrid, agent: &mut Agent) -> Option<TileClaimed> {
    let cell = grid.world_to_cell(agent.position);
    if !grid.is_valid(cell) || agent.last_tile == Some(cell) {
        return None;
    }

    let identity = agent.identity();
    let claimable = grid
        .tile_at(cell)
        .is_some_and(|tile| tile.can_be_claimed_by(identity));
    let claim = if claimable { grid.claim(cell, identity) } else { None };

    agent.last_tile = Some(cell);

    if let Some(claim) = &claim {
        if claim.was_fresh() && agent.mode == Mode::Pursue {
            tracing::debug!("[{}] Claimed tile at ({}, {})", identity, cell.x, cell.y);
        }
    }

    claim
}

/// Steer the controlled agent. Input is clamped to unit length and anything
/// inside the deadzone means "stop".
pub fn apply_control_input(agent: &mut Agent, input: Vec2, deadzone: f32) {
    let input = input.clamp_length(1.0);
    agent.direction = if input.length() > deadzone {
        input
    } else {
        Vec2::ZERO
    };
}

/// Switch every autonomous agent to Pursue once the controlled agent can no
/// longer expand. Returns true on the tick the switch happens.
pub fn escalate_if_boxed_in(grid: &TileGrid, agents: &mut [Agent]) -> bool {
    if !grid.is_owner_boxed_in(Owner::Controlled) {
        return false;
    }

    let mut switched = false;
    for agent in agents.iter_mut().filter(|a| !a.is_controlled()) {
        if agent.enter_pursue() {
            tracing::info!("[{}] Pursue mode activated, controlled agent is boxed in", agent.identity());
            switched = true;
        }
    }
    switched
}

/// One agent's share of a tick: decide (autonomous agents, when due), move,
/// then claim.
pub fn update_agent<R: Rng + ?Sized>(
    grid: &mut TileGrid,
    agent: &mut Agent,
    config: &TerritoryConfig,
    now: f32,
    dt: f32,
    rng: &mut R,
) -> AgentStep {
    let mut decided = false;
    if !agent.is_controlled() && agent.decision_due(now) {
        make_decision(grid, agent, config.reachability_cap, rng);
        agent.next_decision_at = now + config.decision_interval_secs;
        decided = true;
    }

    let tuning: &AgentTuning = if agent.is_controlled() {
        &config.player
    } else {
        &config.bot
    };
    let motion = integrate(grid, agent, tuning, dt);
    let claim = claim_current_tile(grid, agent);

    AgentStep {
        identity: agent.identity(),
        decided,
        motion,
        claim,
    }
}

/// Update all agents in slice order. Earlier agents win contested tiles.
pub fn update_agents<R: Rng + ?Sized>(
    grid: &mut TileGrid,
    agents: &mut [Agent],
    config: &TerritoryConfig,
    now: f32,
    dt: f32,
    rng: &mut R,
) -> Vec<TileClaimed> {
    agents
        .iter_mut()
        .filter_map(|agent| update_agent(grid, agent, config, now, dt, rng).claim)
        .collect()
}

/// Tile count per agent identity, in agent order.
pub fn tally_scores(grid: &TileGrid, agents: &[Agent]) -> Vec<(Owner, usize)> {
    agents
        .iter()
        .map(|agent| (agent.identity(), grid.count_by_owner(agent.identity())))
        .collect()
}
