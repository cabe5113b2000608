use std::time::Duration;

/// Downward acceleration while walking (meters per second squared, positive value).
pub const GRAVITY: f32 = 28.0;

/// Maximum falling speed while walking (meters per second, positive value).
pub const TERMINAL_VELOCITY: f32 = 64.0;

/// Constant sink applied to the desired swimming velocity (meters per second).
pub const UNDERWATER_GRAVITY: f32 = 0.25;

/// Rate (per second) at which swimming velocity approaches the desired velocity.
pub const UNDERWATER_INERTIA: f32 = 2.0;

/// Rate (per second) at which speed above `max_water_speed` decays while swimming.
pub const WATER_TERMINAL_VELOCITY: f32 = 4.0;

/// Rate (per second) at which ghosting velocity approaches the desired velocity.
pub const GHOST_INERTIA: f32 = 4.0;

/// Multiplier applied to upward velocity when the head hits a ceiling.
pub const CEILING_RESTITUTION: f32 = -0.5;

/// Speed (meters per second) added when leaving water while moving up.
pub const WATER_EXIT_BOOST: f32 = 8.0;

/// Liquid probes are taken this fraction of the character height above and below its center.
pub const LIQUID_PROBE_HEIGHT_FACTOR: f32 = 0.25;

/// Minimum squared planar speed for facing the movement direction.
pub const FACE_MOVEMENT_MIN_SPEED_SQ: f32 = 0.01;

/// Frequency of the fixed-rate simulation tick (Hz).
pub const TICK_HZ: u64 = 30;

/// Interval between simulation ticks.
pub const TICK_INTERVAL: Duration = Duration::from_micros(1_000_000 / TICK_HZ);

/// Max dt (seconds) for a single movement step.
///
/// Keeps a stalled loop from producing one huge step that tunnels through geometry.
pub const MAX_STEP_DT_S: f32 = 0.10;

/// Edge length of one voxel block (meters).
pub const BLOCK_SIZE: f32 = 1.0;
