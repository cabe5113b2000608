//! Per-mode movement algorithms.
//!
//! Each mode is a pure function from the previous state and this tick's input to the next
//! state. Walking additionally writes the final position into the collider's world pose.

use log::debug;

use crate::collision::{CharacterCollider, CollisionQuery, MoveRequest, Vec3, move_character};
use crate::config::MovementConfig;
use crate::constants::{
    CEILING_RESTITUTION, GHOST_INERTIA, GRAVITY, TERMINAL_VELOCITY, UNDERWATER_GRAVITY,
    UNDERWATER_INERTIA, WATER_TERMINAL_VELOCITY,
};
use crate::state::{CharacterState, MovementInput};
use crate::utils::{clamp_to_unit, flatten, safe_normalize};

/// Slope factor used underwater: every surface counts as walkable.
const SWIM_SLOPE_FACTOR: f32 = -1.0;

/// Top speed for this tick, including the run multiplier.
#[inline]
fn max_speed(base: f32, input: &MovementInput, config: &MovementConfig) -> f32 {
    if input.running { base * config.run_factor } else { base }
}

/// Fraction of the gap to the desired velocity closed this tick.
#[inline]
fn blend_rate(rate_per_second: f32, dt: f32) -> f32 {
    (rate_per_second * dt).min(1.0)
}

/// Walking: ground friction, gravity and collision-aware movement with stepping.
pub fn walk<Q>(
    query: &Q,
    collider: &mut CharacterCollider,
    config: &MovementConfig,
    state: &CharacterState,
    input: &MovementInput,
) -> CharacterState
where
    Q: CollisionQuery + ?Sized,
{
    let dt = input.delta_time.max(0.0);
    let mut next = *state;

    // 1) Desired planar velocity. Vertical stick input is folded into the planar direction.
    let direction = clamp_to_unit(input.movement_direction);
    let planar = match safe_normalize(flatten(direction)) {
        Some(unit) if direction.y != 0.0 => unit * direction.norm(),
        Some(_) => direction,
        None => Vec3::zeros(),
    };
    let desired = planar * max_speed(config.max_ground_speed, input, config);

    // 2) Horizontal velocity approaches the desired one at the friction rate.
    let diff = (desired - state.velocity) * blend_rate(config.ground_friction, dt);
    next.velocity.x += diff.x;
    next.velocity.z += diff.z;

    // 3) Gravity, capped at terminal velocity.
    next.velocity.y = (next.velocity.y - GRAVITY * dt).max(-TERMINAL_VELOCITY);

    // 4) Move. Stepping is only possible from the ground.
    let result = move_character(
        query,
        collider,
        MoveRequest {
            start: state.position,
            delta: next.velocity * dt,
            step_height: if state.grounded { config.step_height } else { 0.0 },
            slope_factor: config.slope_factor,
        },
    );
    next.position = result.final_position;
    collider.set_world_translation(result.final_position);

    // 5) Ground, jump and ceiling response.
    if result.hit_bottom() {
        if !state.grounded {
            debug!("landed at y={:.3}", next.position.y);
        }
        next.grounded = true;
        next.velocity.y = 0.0;
        if input.jump_requested {
            debug!("jump from y={:.3}", next.position.y);
            next.grounded = false;
            next.velocity.y += config.jump_speed;
        }
    } else {
        if result.hit_top() && next.velocity.y > 0.0 {
            next.velocity.y *= CEILING_RESTITUTION;
        }
        next.grounded = false;
    }

    next
}

/// Swimming: buoyant three-axis movement with water drag, no stepping and no slope limit.
pub fn swim<Q>(
    query: &Q,
    collider: &CharacterCollider,
    config: &MovementConfig,
    state: &CharacterState,
    input: &MovementInput,
) -> CharacterState
where
    Q: CollisionQuery + ?Sized,
{
    let dt = input.delta_time.max(0.0);
    let mut next = *state;

    let mut desired = clamp_to_unit(input.movement_direction)
        * max_speed(config.max_water_speed, input, config);
    desired.y -= UNDERWATER_GRAVITY;

    next.velocity += (desired - state.velocity) * blend_rate(UNDERWATER_INERTIA, dt);

    // Drag back toward the water speed limit.
    let speed = next.velocity.norm();
    if speed > config.max_water_speed {
        let slowed = speed - WATER_TERMINAL_VELOCITY * (speed - config.max_water_speed) * dt;
        next.velocity *= slowed / speed;
    }

    let result = move_character(
        query,
        collider,
        MoveRequest {
            start: state.position,
            delta: next.velocity * dt,
            step_height: 0.0,
            slope_factor: SWIM_SLOPE_FACTOR,
        },
    );
    next.position = result.final_position;
    next.grounded = result.hit_bottom();

    next
}

/// Ghosting: free flight with no collision queries.
pub fn ghost(config: &MovementConfig, state: &CharacterState, input: &MovementInput) -> CharacterState {
    let dt = input.delta_time.max(0.0);
    let mut next = *state;

    let desired = clamp_to_unit(input.movement_direction)
        * max_speed(config.max_ghost_speed, input, config);
    next.velocity += (desired - state.velocity) * blend_rate(GHOST_INERTIA, dt);
    next.position += next.velocity * dt;
    next.grounded = false;

    next
}
