use log::trace;

use super::{
    CharacterCollider, CollisionQuery,
    settings::EPSILON,
    types::{ContactFlag, MoveResult, Vec3},
};
use crate::utils::flatten;

/// Parameters for a single generalized move.
///
/// - `delta` is the world-space displacement requested for this tick (meters).
/// - The move runs in four phases: up, horizontal (with step-up), down, and an automatic
///   step-down probe that keeps the character glued to stairs and gentle descents.
#[derive(Clone, Copy, Debug)]
pub struct MoveRequest {
    /// Starting world position of the collider's center.
    pub start: Vec3,
    /// Desired world-space displacement.
    pub delta: Vec3,
    /// Maximum obstacle height climbed automatically; zero disables stepping and step-down.
    pub step_height: f32,
    /// Minimum `normal · up` of a walkable surface.
    pub slope_factor: f32,
}

/// Move `collider` from `req.start` by `req.delta` against `query`.
///
/// Deterministic for identical inputs and world state. The collider itself is not modified.
pub fn move_character<Q>(query: &Q, collider: &CharacterCollider, req: MoveRequest) -> MoveResult
where
    Q: CollisionQuery + ?Sized,
{
    MoveContext::new(query, collider, req.step_height, req.slope_factor).run(req.start, req.delta)
}

/// State scoped to one `move_character` call.
///
/// Stepping may be attempted at most once per call, and the height it gained must be given
/// back by the downward phase.
pub(super) struct MoveContext<'a, Q: ?Sized> {
    pub(super) query: &'a Q,
    pub(super) collider: &'a CharacterCollider,
    pub(super) step_height: f32,
    pub(super) slope_factor: f32,
    pub(super) stepped_up_dist: f32,
    pub(super) step_attempted: bool,
}

impl<'a, Q> MoveContext<'a, Q>
where
    Q: CollisionQuery + ?Sized,
{
    fn new(query: &'a Q, collider: &'a CharacterCollider, step_height: f32, slope_factor: f32) -> Self {
        Self {
            query,
            collider,
            step_height,
            slope_factor,
            stepped_up_dist: 0.0,
            step_attempted: false,
        }
    }

    fn run(&mut self, start: Vec3, delta: Vec3) -> MoveResult {
        let mut position = start;
        let mut result = MoveResult::at(start);

        if delta.y > 0.0 {
            let risen = self.move_up(delta.y, &mut position);
            result.contacts.set(ContactFlag::Top, delta.y - risen > EPSILON);
        }

        let hit_horizontal = self.move_horizontal(flatten(delta), &mut position);
        result.contacts.set(ContactFlag::Horizontal, hit_horizontal);

        let mut hit_bottom = false;
        if delta.y < 0.0 || self.stepped_up_dist > 0.0 {
            let fall = delta.y.min(0.0) - self.stepped_up_dist;
            hit_bottom = self.move_down(fall, &mut position);
        }

        // Step down: only commit when there is ground within reach.
        if !hit_bottom && self.step_height > 0.0 {
            let mut probe = position;
            if self.move_down(-self.step_height, &mut probe) {
                trace!("step down {:.3} m", position.y - probe.y);
                hit_bottom = true;
                position = probe;
            }
        }
        result.contacts.set(ContactFlag::Bottom, hit_bottom);

        result.final_position = position;
        result
    }
}
