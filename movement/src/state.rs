use serde::{Deserialize, Serialize};

use crate::collision::{Quat, Vec3};

/// Movement behavior currently applied to a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    /// Gravity, ground friction and collision-aware movement.
    #[default]
    Walking,
    /// Buoyant movement with free vertical control inside liquid.
    Swimming,
    /// Free flight through geometry.
    Ghosting,
}

/// Kinematic state of one character; one value per tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Collider center in world space (meters).
    pub position: Vec3,
    /// Meters per second.
    pub velocity: Vec3,
    /// Facing; yaw-only.
    pub rotation: Quat,
    pub mode: MovementMode,
    /// Whether the last move ended on walkable ground.
    pub grounded: bool,
    /// Timestamp of the input that produced this state.
    pub timestamp: u64,
}

impl CharacterState {
    /// Resting, walking state at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            rotation: Quat::identity(),
            mode: MovementMode::Walking,
            grounded: false,
            timestamp: 0,
        }
    }

    #[inline]
    pub fn with_mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

/// Intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementInput {
    /// Desired world-space direction; clamped to unit length when longer.
    ///
    /// `y` is only used while swimming or ghosting.
    pub movement_direction: Vec3,
    /// View yaw in degrees.
    pub yaw_degrees: f32,
    /// Tick length in seconds.
    pub delta_time: f32,
    pub running: bool,
    pub jump_requested: bool,
    pub timestamp: u64,
}
