use std::ops::{Add, Mul, Sub};

/// A vector on the ground plane. `y` is the board's depth axis, so it maps
/// onto grid rows.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, other: f32) -> Vec2 {
        Vec2 {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn length(self) -> f32 {
        ((self.x * self.x) + (self.y * self.y)).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Clamp the magnitude to at most `max`.
    pub fn clamp_length(self, max: f32) -> Vec2 {
        let len = self.length();
        if len > max && len > 0.0 {
            self * (max / len)
        } else {
            self
        }
    }

    /// Step towards `target` by at most `max_delta`, landing on it exactly
    /// once it is within reach.
    pub fn move_towards(self, target: Vec2, max_delta: f32) -> Vec2 {
        let delta = target - self;
        let dist = delta.length();
        if dist == 0.0 || dist <= max_delta {
            target
        } else {
            self + delta * (max_delta / dist)
        }
    }

    pub fn only_x(self) -> Vec2 {
        Vec2 { x: self.x, y: 0.0 }
    }

    pub fn only_y(self) -> Vec2 {
        Vec2 { x: 0.0, y: self.y }
    }
}
