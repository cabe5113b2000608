/*!
Mover tolerances.

These constants centralize the tolerances used by the vertical and horizontal
movers. They are tuned together; changing one changes how the character feels
against steps, ramps and ceilings.

Notes
- Distances are in meters.
- "Leeway" is extra distance added to a sweep so that contacts just beyond the
  requested move are still seen; it is subtracted again from the achieved travel.
- "Penetration" is the overlap a sweep tolerates before reporting a contact.
*/

/// Extra distance added to vertical sweeps (meters).
pub const VERTICAL_PENETRATION_LEEWAY: f32 = 0.05;

/// Allowed overlap for downward sweeps (meters).
pub const VERTICAL_PENETRATION: f32 = 0.04;

/// Extra distance added to horizontal sweeps (meters).
pub const HORIZONTAL_PENETRATION_LEEWAY: f32 = 0.04;

/// Allowed overlap for horizontal sweeps (meters).
pub const HORIZONTAL_PENETRATION: f32 = 0.03;

/// Forward offset of the step and slope ray probes (meters).
pub const CHECK_FORWARD_DIST: f32 = 0.05;

/// Margin the step probe rays start above the step height and end below the contact (meters).
pub const STEP_PROBE_MARGIN: f32 = 0.05;

/// Half length of the slope re-validation rays cast through a fall contact (meters).
pub const SLOPE_PROBE_HALF_LENGTH: f32 = 0.2;

/// A walkable-ramp redirect only restores the full horizontal travel when at least this share
/// of it survives the projection onto the ramp.
pub const MIN_RAMP_HORIZONTAL_SHARE: f32 = 0.25;

/// Contact normals with a smaller vertical component are treated as vertical walls.
pub const WALL_NORMAL_MAX_Y: f32 = 1.0e-3;

/// Maximum sweep iterations for each of the horizontal and downward loops.
pub const MAX_MOVE_ITERATIONS: u32 = 10;

/// The horizontal loop stops once less than this fraction of the move remains.
pub const MIN_REMAINING_FRACTION: f32 = 0.01;

/// Small threshold for lengths, squared lengths and dot products.
pub const EPSILON: f32 = f32::EPSILON;
