use log::{trace, warn};

use super::{
    CollisionQuery,
    mover::MoveContext,
    settings::{
        CHECK_FORWARD_DIST, EPSILON, HORIZONTAL_PENETRATION, HORIZONTAL_PENETRATION_LEEWAY,
        MAX_MOVE_ITERATIONS, MIN_RAMP_HORIZONTAL_SHARE, MIN_REMAINING_FRACTION,
        STEP_PROBE_MARGIN, WALL_NORMAL_MAX_Y,
    },
    types::{Contact, Vec3},
};
use crate::utils::{extract_residual_movement, flatten, safe_normalize};

impl<Q> MoveContext<'_, Q>
where
    Q: CollisionQuery + ?Sized,
{
    /// Sweep-and-slide along `horizontal_move`, climbing steps and walkable ramps.
    ///
    /// Returns whether a wall (a contact that could not be stepped over) was hit.
    pub(super) fn move_horizontal(&mut self, horizontal_move: Vec3, position: &mut Vec3) -> bool {
        let mut dist = horizontal_move.norm();
        if dist < EPSILON {
            return false;
        }
        let mut direction = horizontal_move / dist;
        let mut target = *position + direction * (dist + HORIZONTAL_PENETRATION_LEEWAY);

        let mut remaining_fraction = 1.0;
        let mut last_wall_normal = Vec3::y();
        let mut hit_wall = false;
        let mut iterations = 0;

        while remaining_fraction >= MIN_REMAINING_FRACTION {
            if iterations == MAX_MOVE_ITERATIONS {
                warn!(
                    "horizontal move gave up after {MAX_MOVE_ITERATIONS} iterations at ({:.3}, {:.3}, {:.3})",
                    position.x, position.y, position.z
                );
                break;
            }
            iterations += 1;

            let Some(contact) = self
                .query
                .sweep(self.collider, position, &target, HORIZONTAL_PENETRATION)
            else {
                *position += direction * dist;
                break;
            };

            let travel = ((dist + HORIZONTAL_PENETRATION_LEEWAY) * contact.fraction
                - HORIZONTAL_PENETRATION_LEEWAY)
                .max(0.0);
            remaining_fraction -= travel / dist;
            if travel > EPSILON {
                *position += direction * travel;
            }
            dist -= travel;

            let mut next = direction * dist;
            let slope = contact.slope();
            if slope < self.slope_factor || 1.0 - slope < EPSILON {
                if !self.check_step(position, next, &contact) {
                    hit_wall = true;
                    let mut slide = flatten(next);
                    if let Some(wall_normal) = safe_normalize(flatten(contact.normal)) {
                        // Same wall twice in a row: nothing left to slide along.
                        if last_wall_normal.dot(&wall_normal) > EPSILON {
                            break;
                        }
                        last_wall_normal = wall_normal;
                        slide = extract_residual_movement(wall_normal, slide);
                    }
                    next = slide;
                }
            } else {
                // Walkable ramp: follow the surface and keep the horizontal speed.
                let normal = ramp_normal(&contact);
                let horizontal_len = flatten(next).norm();
                next = extract_residual_movement(normal, next);
                let redirected_len = flatten(next).norm();
                if redirected_len > EPSILON
                    && redirected_len >= horizontal_len * MIN_RAMP_HORIZONTAL_SHARE
                {
                    next *= horizontal_len / redirected_len;
                }
            }

            let next_len_sq = next.norm_squared();
            if next_len_sq <= EPSILON {
                break;
            }
            let next_len = next_len_sq.sqrt();
            let next_direction = next / next_len;
            if next_direction.dot(&direction) <= 0.0 {
                break;
            }

            dist = next_len;
            direction = next_direction;
            target = *position + direction * (dist + HORIZONTAL_PENETRATION_LEEWAY);
        }

        hit_wall
    }

    /// Try to climb onto the object hit by `contact`, at most once per move.
    ///
    /// Two vertical rays just past the contact look for a walkable top within `step_height`.
    /// On success the character is raised and the height gained is recorded so the downward
    /// phase can give it back.
    fn check_step(&mut self, position: &mut Vec3, direction: Vec3, contact: &Contact) -> bool {
        if self.step_attempted || self.step_height <= EPSILON {
            return false;
        }
        self.step_attempted = true;

        let Some(forward) = safe_normalize(flatten(direction)) else {
            return false;
        };
        let look_ahead = forward * CHECK_FORWARD_DIST;

        let mut from = contact.point + Vec3::y() * (self.step_height + STEP_PROBE_MARGIN);
        let mut to = contact.point - Vec3::y() * STEP_PROBE_MARGIN;
        let mut step_slope: Option<f32> = None;
        for _ in 0..2 {
            from += look_ahead;
            to += look_ahead;
            if let Some(ray) = self.query.ray_cast(&from, &to, Some(contact.object)) {
                step_slope = Some(step_slope.unwrap_or(1.0).min(ray.slope()));
            }
        }

        match step_slope {
            Some(slope) if slope >= self.slope_factor => {
                self.stepped_up_dist = self.move_up(self.step_height, position);
                trace!(
                    "stepped up {:.3} m onto object {:?}",
                    self.stepped_up_dist, contact.object
                );
                true
            }
            _ => false,
        }
    }
}

/// Normal used to redirect along a walkable contact.
///
/// Near-vertical faces are flattened so that noise in the normal cannot turn a wall slide into
/// vertical travel.
fn ramp_normal(contact: &Contact) -> Vec3 {
    if contact.normal.y.abs() < WALL_NORMAL_MAX_Y
        && let Some(wall) = safe_normalize(flatten(contact.normal))
    {
        return wall;
    }
    contact.normal
}
