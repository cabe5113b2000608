//! Per-character movement tuning.
//!
//! Configs are plain data, usually loaded from JSON. Missing fields take their defaults, so a
//! config file only needs the values it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },

    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("`slope_factor` must lie in [-1, 1] (got {0})")]
    SlopeFactorOutOfRange(f32),

    #[error("capsule needs a positive radius and a height of at least twice the radius (height {height}, radius {radius})")]
    InvalidCapsule { height: f32, radius: f32 },

    #[error("invalid movement config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovementConfig {
    /// Top walking speed (meters per second).
    pub max_ground_speed: f32,
    /// Top swimming speed (meters per second).
    pub max_water_speed: f32,
    /// Top ghosting speed (meters per second).
    pub max_ghost_speed: f32,
    /// Speed multiplier while running.
    pub run_factor: f32,
    /// Rate (per second) at which walking velocity approaches the desired velocity.
    pub ground_friction: f32,
    /// Initial upward speed of a jump (meters per second).
    pub jump_speed: f32,
    /// Highest obstacle climbed automatically (meters).
    pub step_height: f32,
    /// Minimum `normal · up` of a walkable surface.
    pub slope_factor: f32,
    /// Character height (meters).
    pub height: f32,
    /// Capsule radius (meters).
    pub radius: f32,
    /// Face the direction of movement instead of the view yaw.
    pub face_movement_direction: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_ground_speed: 5.0,
            max_water_speed: 2.0,
            max_ghost_speed: 5.0,
            run_factor: 1.5,
            ground_friction: 8.0,
            jump_speed: 10.0,
            step_height: 0.35,
            slope_factor: 0.6,
            height: 1.6,
            radius: 0.3,
            face_movement_direction: false,
        }
    }
}

impl MovementConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("max_ground_speed", self.max_ground_speed),
            ("max_water_speed", self.max_water_speed),
            ("max_ghost_speed", self.max_ghost_speed),
            ("run_factor", self.run_factor),
            ("ground_friction", self.ground_friction),
            ("jump_speed", self.jump_speed),
            ("step_height", self.step_height),
            ("height", self.height),
            ("radius", self.radius),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !self.slope_factor.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "slope_factor",
            });
        }
        if !(-1.0..=1.0).contains(&self.slope_factor) {
            return Err(ConfigError::SlopeFactorOutOfRange(self.slope_factor));
        }

        if self.radius <= 0.0 || self.height < 2.0 * self.radius {
            return Err(ConfigError::InvalidCapsule {
                height: self.height,
                radius: self.radius,
            });
        }

        Ok(())
    }
}
