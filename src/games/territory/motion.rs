use super::agent::Agent;
use super::config::AgentTuning;
use super::state::{Owner, TileGrid};
use super::vec2::Vec2;

/// Directions shorter than this count as "no input".
pub const DIRECTION_DEADZONE: f32 = 0.1;

/// Below this speed the agent is considered at rest.
const REST_SPEED: f32 = 0.01;

/// What the last integration step did with the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Too slow to move
    Idle,
    /// Took the full step
    Moved,
    /// Full step blocked; moved along x only
    SlidX,
    /// Full step blocked; moved along y only
    SlidY,
    /// Nothing fit; the agent's direction was cleared
    Blocked,
}

/// The cell under `position` exists and `walker` may stand on it.
pub fn is_position_walkable(grid: &TileGrid, position: Vec2, walker: Owner) -> bool {
    grid.is_walkable(grid.world_to_cell(position), walker)
}

/// Steer the velocity towards `direction * top speed` (or towards rest) at
/// the tuning's rates, then move, sliding along walls when the full step
/// would land on a blocked cell.
pub fn integrate(grid: &TileGrid, agent: &mut Agent, tuning: &AgentTuning, dt: f32) -> Motion {
    let top_speed = tuning.top_speed(agent.mode);

    agent.velocity = if agent.direction.length() > DIRECTION_DEADZONE {
        agent
            .velocity
            .move_towards(agent.direction * top_speed, tuning.acceleration * dt)
    } else {
        agent
            .velocity
            .move_towards(Vec2::ZERO, tuning.deceleration * dt)
    };

    if agent.velocity.length() <= REST_SPEED {
        return Motion::Idle;
    }

    let walker = agent.identity();
    let step = agent.velocity * dt;

    let full = agent.position + step;
    if is_position_walkable(grid, full, walker) {
        agent.position = full;
        return Motion::Moved;
    }

    // A zero component is no slide at all
    if step.x != 0.0 {
        let x_only = agent.position + step.only_x();
        if is_position_walkable(grid, x_only, walker) {
            agent.position = x_only;
            return Motion::SlidX;
        }
    }

    if step.y != 0.0 {
        let y_only = agent.position + step.only_y();
        if is_position_walkable(grid, y_only, walker) {
            agent.position = y_only;
            return Motion::SlidY;
        }
    }

    agent.direction = Vec2::ZERO;
    Motion::Blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::territory::agent::Mode;
    use crate::games::territory::state::GridPos;

    const DT: f32 = 0.05;

    fn tuning() -> AgentTuning {
        AgentTuning {
            max_speed: 4.0,
            pursue_speed: 6.0,
            acceleration: 20.0,
            deceleration: 25.0,
        }
    }

    fn grid() -> TileGrid {
        TileGrid::new(5, 5, 1.0).unwrap()
    }

    #[test]
    fn test_acceleration_is_rate_limited() {
        let grid = grid();
        let mut agent = Agent::new(Owner::AgentA, Vec2::new(1.0, 1.0));
        agent.direction = Vec2::new(1.0, 0.0);

        let motion = integrate(&grid, &mut agent, &tuning(), DT);

        assert_eq!(motion, Motion::Moved);
        assert!((agent.velocity.x - 1.0).abs() < 1e-5);
        assert!((agent.position.x - 1.05).abs() < 1e-5);
    }

    #[test]
    fn test_speed_caps_at_max() {
        let grid = TileGrid::new(20, 20, 1.0).unwrap();
        let mut agent = Agent::new(Owner::AgentA, Vec2::new(0.0, 10.0));
        agent.direction = Vec2::new(1.0, 0.0);

        for _ in 0..10 {
            integrate(&grid, &mut agent, &tuning(), DT);
        }

        assert!((agent.velocity.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_pursue_uses_pursue_speed() {
        let grid = TileGrid::new(20, 20, 1.0).unwrap();
        let mut agent = Agent::new(Owner::AgentB, Vec2::new(0.0, 10.0));
        agent.mode = Mode::Pursue;
        agent.direction = Vec2::new(1.0, 0.0);

        for _ in 0..10 {
            integrate(&grid, &mut agent, &tuning(), DT);
        }

        assert!((agent.velocity.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_deceleration_without_direction() {
        let grid = grid();
        let mut agent = Agent::new(Owner::AgentA, Vec2::new(1.0, 1.0));
        agent.velocity = Vec2::new(4.0, 0.0);

        integrate(&grid, &mut agent, &tuning(), DT);
        assert!((agent.velocity.x - 2.75).abs() < 1e-5);

        for _ in 0..3 {
            integrate(&grid, &mut agent, &tuning(), DT);
        }
        assert_eq!(agent.velocity, Vec2::ZERO);
        assert_eq!(integrate(&grid, &mut agent, &tuning(), DT), Motion::Idle);
    }

    #[test]
    fn test_slides_along_foreign_row() {
        let mut grid = grid();
        for x in 0..5 {
            grid.claim(GridPos::new(x, 2), Owner::AgentB);
        }
        let mut agent = Agent::new(Owner::AgentA, Vec2::new(2.0, 1.45));
        agent.direction = Vec2::new(1.0, 1.0).normalized();
        agent.velocity = agent.direction * 4.0;

        let motion = integrate(&grid, &mut agent, &tuning(), DT);

        assert_eq!(motion, Motion::SlidX);
        assert!(agent.position.x > 2.0);
        assert_eq!(agent.position.y, 1.45);
    }

    #[test]
    fn test_slides_along_board_edge() {
        let grid = grid();
        let mut agent = Agent::new(Owner::AgentA, Vec2::new(-0.45, 2.0));
        agent.direction = Vec2::new(-1.0, 1.0).normalized();
        agent.velocity = agent.direction * 4.0;

        let motion = integrate(&grid, &mut agent, &tuning(), DT);

        assert_eq!(motion, Motion::SlidY);
        assert_eq!(agent.position.x, -0.45);
        assert!(agent.position.y > 2.0);
    }

    #[test]
    fn test_head_on_wall_stops_agent() {
        let mut grid = grid();
        grid.claim(GridPos::new(2, 1), Owner::AgentC);
        let mut agent = Agent::new(Owner::AgentA, Vec2::new(1.45, 1.0));
        agent.direction = Vec2::new(1.0, 0.0);
        agent.velocity = Vec2::new(4.0, 0.0);

        let motion = integrate(&grid, &mut agent, &tuning(), DT);

        assert_eq!(motion, Motion::Blocked);
        assert_eq!(agent.direction, Vec2::ZERO);
        assert_eq!(agent.position, Vec2::new(1.45, 1.0));
    }

    #[test]
    fn test_own_tiles_are_walkable() {
        let mut grid = grid();
        grid.claim(GridPos::new(2, 1), Owner::AgentA);
        assert!(is_position_walkable(&grid, Vec2::new(2.2, 0.8), Owner::AgentA));
        assert!(!is_position_walkable(&grid, Vec2::new(2.2, 0.8), Owner::AgentB));
        assert!(!is_position_walkable(&grid, Vec2::new(4.6, 0.0), Owner::AgentA));
    }
}
