pub mod bitmask_flags;
pub mod collision;
pub mod config;
pub mod constants;
pub mod modes;
pub mod movement;
pub mod rapier;
pub mod rapier_world;
pub mod state;
pub mod utils;
pub mod voxel;

pub use collision::{
    CharacterCollider, CollisionQuery, Contact, ContactFlag, LiquidProbe, MoveRequest, MoveResult,
    ObjectHandle, Quat, Vec3, move_character,
};
pub use config::{ConfigError, MovementConfig};
pub use constants::{MAX_STEP_DT_S, TICK_HZ, TICK_INTERVAL};
pub use movement::CharacterMovementSystem;
pub use rapier::{ColliderShapeDef, WorldStaticDef, collider_from_def};
pub use rapier_world::RapierQueryWorld;
pub use state::{CharacterState, MovementInput, MovementMode};
pub use voxel::{Block, VoxelGrid};
