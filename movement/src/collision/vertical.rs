use log::warn;

use super::{
    CollisionQuery,
    mover::MoveContext,
    settings::{
        CHECK_FORWARD_DIST, EPSILON, HORIZONTAL_PENETRATION_LEEWAY, MAX_MOVE_ITERATIONS,
        SLOPE_PROBE_HALF_LENGTH, VERTICAL_PENETRATION, VERTICAL_PENETRATION_LEEWAY,
    },
    types::{Contact, Vec3},
};
use crate::utils::{extract_residual_movement, flatten, safe_normalize};

impl<Q> MoveContext<'_, Q>
where
    Q: CollisionQuery + ?Sized,
{
    /// Rise by up to `rise` meters and return the height actually gained.
    pub(super) fn move_up(&self, rise: f32, position: &mut Vec3) -> f32 {
        if rise <= EPSILON {
            return 0.0;
        }

        let target = *position + Vec3::y() * (rise + VERTICAL_PENETRATION_LEEWAY);
        let gained = match self.query.sweep(
            self.collider,
            position,
            &target,
            VERTICAL_PENETRATION_LEEWAY,
        ) {
            Some(hit) => ((rise + VERTICAL_PENETRATION_LEEWAY) * hit.fraction
                - VERTICAL_PENETRATION_LEEWAY)
                .max(0.0),
            None => rise,
        };

        position.y += gained;
        gained
    }

    /// Fall by `-dist` meters (`dist <= 0`), sliding down faces too steep to stand on.
    ///
    /// Returns whether the fall ended on walkable ground.
    pub(super) fn move_down(&self, dist: f32, position: &mut Vec3) -> bool {
        let mut remaining = -dist;
        let mut direction = -Vec3::y();
        let mut target = *position + direction * (remaining + VERTICAL_PENETRATION_LEEWAY);
        let mut hit = false;
        let mut iterations = 0;

        while remaining > EPSILON && iterations < MAX_MOVE_ITERATIONS {
            iterations += 1;

            let contact = self
                .query
                .sweep(self.collider, position, &target, VERTICAL_PENETRATION);
            let fraction = contact.as_ref().map_or(1.0, |c| c.fraction);
            let travel = ((remaining + VERTICAL_PENETRATION_LEEWAY) * fraction
                - VERTICAL_PENETRATION_LEEWAY)
                .max(0.0);

            if let Some(expected) = safe_normalize(target - *position) {
                *position += expected * travel;
            }
            remaining -= travel;

            if remaining < EPSILON {
                break;
            }
            let Some(contact) = contact else {
                break;
            };

            if self.landing_slope(&contact) >= self.slope_factor {
                hit = true;
                break;
            }

            // Too steep to stand on: slide down the face.
            remaining -= travel;
            let slide = extract_residual_movement(contact.normal, target - *position);
            let Some(slide_dir) = safe_normalize(slide) else {
                hit = true;
                break;
            };
            if slide_dir.dot(&direction) <= 0.0 || slide_dir.y > -EPSILON {
                hit = true;
                break;
            }

            direction = slide_dir;
            let slide_len = -remaining / slide_dir.y + HORIZONTAL_PENETRATION_LEEWAY;
            target = *position + slide_dir * slide_len;
        }

        if iterations >= MAX_MOVE_ITERATIONS {
            warn!(
                "downward move gave up after {MAX_MOVE_ITERATIONS} iterations at ({:.3}, {:.3}, {:.3})",
                position.x, position.y, position.z
            );
            hit = true;
        }

        hit
    }

    /// Slope of a fall contact, re-validated with short vertical rays through the contact.
    ///
    /// Sweeps against edges report blended normals; the rays see the face actually underneath.
    /// The steepest probed face wins. Without any ray hit, the contact's own slope stands.
    fn landing_slope(&self, contact: &Contact) -> f32 {
        let original = contact.slope();
        if original >= self.slope_factor {
            return original;
        }

        let half = Vec3::y() * SLOPE_PROBE_HALF_LENGTH;
        let mut from = contact.point + half;
        let mut to = contact.point - half;
        let mut probed: Option<f32> = None;

        let mut probe = |from: &Vec3, to: &Vec3| {
            if let Some(ray) = self.query.ray_cast(from, to, Some(contact.object)) {
                probed = Some(probed.unwrap_or(1.0).min(ray.slope()));
            }
        };

        probe(&from, &to);
        if let Some(away) = safe_normalize(flatten(contact.normal)) {
            from += away * CHECK_FORWARD_DIST;
            to += away * CHECK_FORWARD_DIST;
            probe(&from, &to);
        }

        probed.unwrap_or(original)
    }
}
