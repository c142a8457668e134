use super::state::{GridPos, Owner};
use super::vec2::Vec2;

/// Decision policy an autonomous agent is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Greedy one-step moves towards adjacent empty tiles
    #[default]
    Explore,
    /// Head for the nearest reachable empty tile
    Pursue,
}

#[derive(Debug, Clone)]
pub struct Agent {
    /// Owner tag this agent claims tiles for; fixed for the match
    identity: Owner,
    /// World position on the ground plane
    pub position: Vec2,
    pub velocity: Vec2,
    /// Direction chosen by the last decision or input (unit or zero)
    pub direction: Vec2,
    pub mode: Mode,
    /// Cell being pursued, if any
    pub target: Option<GridPos>,
    /// Cell under the agent as of its last claim check
    pub last_tile: Option<GridPos>,
    /// Simulated time of the next decision step
    pub next_decision_at: f32,
}

impl Agent {
    pub fn new(identity: Owner, position: Vec2) -> Self {
        Self {
            identity,
            position,
            velocity: Vec2::ZERO,
            direction: Vec2::ZERO,
            mode: Mode::Explore,
            target: None,
            last_tile: None,
            next_decision_at: 0.0,
        }
    }

    pub fn identity(&self) -> Owner {
        self.identity
    }

    /// Steered by input rather than the decision policy.
    pub fn is_controlled(&self) -> bool {
        self.identity == Owner::Controlled
    }

    /// Put the agent back on `position` with no motion, no target and the
    /// Explore policy. The first decision comes one interval after `now`.
    pub fn reset(&mut self, position: Vec2, now: f32, decision_interval: f32) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.direction = Vec2::ZERO;
        self.mode = Mode::Explore;
        self.target = None;
        self.last_tile = None;
        self.next_decision_at = now + decision_interval;
    }

    pub fn decision_due(&self, now: f32) -> bool {
        now >= self.next_decision_at
    }

    /// Switch to Pursue. Returns false if already pursuing; the switch never
    /// reverts on its own.
    pub fn enter_pursue(&mut self) -> bool {
        if self.mode == Mode::Pursue {
            return false;
        }
        self.mode = Mode::Pursue;
        self.target = None;
        true
    }
}
