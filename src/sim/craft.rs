//! Player craft
//!
//! The craft holds a fixed screen x and only moves vertically: gravity pulls it down,
//! thrust pushes it up. Its nose tilts along the flight path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Collision hull in local space, nose pointing along +x
pub const CRAFT_HULL: [Vec2; 5] = [
    Vec2::new(15.0, 0.0),
    Vec2::new(-9.0, -10.0),
    Vec2::new(-15.0, -10.0),
    Vec2::new(-15.0, 10.0),
    Vec2::new(-9.0, 10.0),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pub pos: Vec2,
    /// Vertical velocity (units/s, positive is down)
    pub vel_y: f32,
    /// Nose angle in radians (positive tilts the nose down)
    pub angle: f32,
    /// Whether thrust was applied on the last update
    pub thrusting: bool,
}

impl Craft {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel_y: 0.0,
            angle: 0.0,
            thrusting: false,
        }
    }

    /// Place the craft at height `y`, at rest and level
    pub fn respawn(&mut self, y: f32) {
        self.pos.y = y;
        self.vel_y = 0.0;
        self.angle = 0.0;
        self.thrusting = false;
    }

    /// Integrate one step of flight
    pub fn update(&mut self, dt: f32, thrust: bool, scroll_speed: f32) {
        self.thrusting = thrust;
        if thrust {
            self.vel_y -= CRAFT_THRUST * dt;
        }
        self.vel_y += CRAFT_GRAVITY * dt;
        self.vel_y = self.vel_y.clamp(-CRAFT_MAX_SPEED, CRAFT_MAX_SPEED);
        self.pos.y += self.vel_y * dt;

        self.angle = self.vel_y.atan2(scroll_speed.max(1.0)) * CRAFT_TILT;
    }

    /// Collision polygon in screen space
    pub fn polygon(&self) -> Vec<Vec2> {
        let rotation = Vec2::from_angle(self.angle);
        CRAFT_HULL
            .iter()
            .map(|&p| self.pos + rotation.rotate(p))
            .collect()
    }
}
