use serde::{Deserialize, Serialize};

use crate::engine::vector::Vector2;

/// The single match ball. Velocity is in field units per tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Sideways curl; positive bends to the left of travel.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spin: Option<f32>,
}

impl Ball {
    pub fn at(position: Vector2) -> Self {
        Self { position, velocity: Vector2::ZERO, spin: None }
    }

    /// Dead ball on `position` (kickoff, pass reception).
    pub fn place(&mut self, position: Vector2) {
        self.position = position;
        self.velocity = Vector2::ZERO;
        self.spin = None;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
