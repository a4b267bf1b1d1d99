//! Vector/Field primitives
//!
//! Field coordinates: x runs goal-to-goal (0..length), y touchline-to-touchline
//! (0..width). Home attacks toward `x = length`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::models::TeamSide;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vector2) -> f32 {
        (*self - other).length()
    }

    /// Unit vector, or zero for a (near) zero vector.
    pub fn normalized(&self) -> Vector2 {
        let len = self.length();
        if len < 1e-6 {
            Vector2::ZERO
        } else {
            Vector2::new(self.x / len, self.y / len)
        }
    }

    /// Left-hand perpendicular.
    pub fn perpendicular(&self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }

    /// Move toward `target` by at most `max_step`.
    pub fn step_toward(&self, target: Vector2, max_step: f32) -> Vector2 {
        let delta = target - *self;
        let dist = delta.length();
        if dist <= max_step || dist < 1e-6 {
            target
        } else {
            *self + delta * (max_step / dist)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

/// Field rectangle. Either scale is supported through [`FieldDims::scale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldDims {
    pub length: f32,
    pub width: f32,
}

impl Default for FieldDims {
    fn default() -> Self {
        Self::legacy()
    }
}

impl FieldDims {
    /// Length of the field every legacy-unit constant was tuned on.
    pub const LEGACY_LENGTH: f32 = 1050.0;

    pub const fn legacy() -> Self {
        Self { length: 1050.0, width: 680.0 }
    }

    pub const fn metric() -> Self {
        Self { length: 104.0, width: 68.0 }
    }

    /// Conversion factor from legacy units to this field's units.
    pub fn scale(&self) -> f32 {
        self.length / Self::LEGACY_LENGTH
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.length / 2.0, self.width / 2.0)
    }

    pub fn contains(&self, p: Vector2) -> bool {
        (0.0..=self.length).contains(&p.x) && (0.0..=self.width).contains(&p.y)
    }

    pub fn clamp(&self, p: Vector2) -> Vector2 {
        Vector2::new(p.x.clamp(0.0, self.length), p.y.clamp(0.0, self.width))
    }

    /// Centre of the goal `side` attacks.
    pub fn target_goal(&self, side: TeamSide) -> Vector2 {
        match side {
            TeamSide::Home => Vector2::new(self.length, self.width / 2.0),
            TeamSide::Away => Vector2::new(0.0, self.width / 2.0),
        }
    }

    /// Centre of the goal `side` defends.
    pub fn own_goal(&self, side: TeamSide) -> Vector2 {
        self.target_goal(side.opponent())
    }

    /// Distance from `p` to the goal line `side` attacks.
    pub fn distance_to_goal_line(&self, p: Vector2, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => self.length - p.x,
            TeamSide::Away => p.x,
        }
    }

    pub fn in_shooting_zone(&self, p: Vector2, side: TeamSide, zone_fraction: f32) -> bool {
        self.distance_to_goal_line(p, side) <= self.length * zone_fraction
    }

    /// Whether `p` lies in the third of the field `side` defends.
    pub fn in_defensive_third(&self, p: Vector2, side: TeamSide) -> bool {
        self.distance_to_goal_line(p, side.opponent()) <= self.length / 3.0
    }

    /// Mirror an x coordinate given in Home's frame into `side`'s frame.
    pub fn oriented_x(&self, home_x: f32, side: TeamSide) -> f32 {
        match side {
            TeamSide::Home => home_x,
            TeamSide::Away => self.length - home_x,
        }
    }
}
