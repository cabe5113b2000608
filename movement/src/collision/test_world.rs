//! Analytic query world for unit tests.
//!
//! The character is treated as a point and the world as a list of convex blocks, each an
//! intersection of half-spaces. Segment casts are exact (Cyrus-Beck clipping), which keeps
//! expected positions in tests easy to derive by hand.

use rapier3d::prelude::SharedShape;

use super::{CharacterCollider, CollisionQuery, Contact, ObjectHandle, Vec3};

/// Points closer than this to every face count as inside a block.
const INSIDE_TOLERANCE: f32 = 1.0e-5;

/// Convex block: the set of points `x` with `n · x <= d` for every plane `(n, d)`.
#[derive(Clone, Debug)]
pub(crate) struct ConvexBlock {
    planes: Vec<(Vec3, f32)>,
}

enum Cast {
    Miss,
    StartsInside,
    Hit { fraction: f32, normal: Vec3 },
}

impl ConvexBlock {
    /// Everything at or below `height`.
    pub(crate) fn floor(height: f32) -> Self {
        Self {
            planes: vec![(Vec3::y(), height)],
        }
    }

    pub(crate) fn aabb(min: Vec3, max: Vec3) -> Self {
        Self {
            planes: vec![
                (Vec3::x(), max.x),
                (-Vec3::x(), -min.x),
                (Vec3::y(), max.y),
                (-Vec3::y(), -min.y),
                (Vec3::z(), max.z),
                (-Vec3::z(), -min.z),
            ],
        }
    }

    /// Everything below the plane through the origin that rises along +X at `angle_deg`.
    pub(crate) fn ramp_x(angle_deg: f32) -> Self {
        let angle = angle_deg.to_radians();
        Self {
            planes: vec![(Vec3::new(-angle.sin(), angle.cos(), 0.0), 0.0)],
        }
    }

    fn cast(&self, from: &Vec3, to: &Vec3) -> Cast {
        if self
            .planes
            .iter()
            .all(|(n, d)| n.dot(from) - d < -INSIDE_TOLERANCE)
        {
            return Cast::StartsInside;
        }

        let segment = to - from;
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;
        let mut entry_normal = None;

        for (n, d) in &self.planes {
            let dist = d - n.dot(from);
            let denom = n.dot(&segment);
            if denom.abs() < 1.0e-9 {
                if dist < 0.0 {
                    return Cast::Miss;
                }
                continue;
            }
            let t = dist / denom;
            if denom < 0.0 {
                if t >= t_enter {
                    t_enter = t;
                    entry_normal = Some(*n);
                }
            } else if t < t_exit {
                t_exit = t;
            }
        }

        match entry_normal {
            Some(normal) if t_enter <= t_exit => Cast::Hit {
                fraction: t_enter,
                normal,
            },
            _ => Cast::Miss,
        }
    }
}

/// Query world over convex blocks; block `i` has handle `i`.
pub(crate) struct TestWorld {
    blocks: Vec<ConvexBlock>,
}

impl TestWorld {
    pub(crate) fn new(blocks: Vec<ConvexBlock>) -> Self {
        Self { blocks }
    }

    fn closest(
        &self,
        from: &Vec3,
        to: &Vec3,
        restrict_to: Option<ObjectHandle>,
        report_inside: bool,
    ) -> Option<Contact> {
        let mut best: Option<Contact> = None;
        for (index, block) in self.blocks.iter().enumerate() {
            let object = ObjectHandle::from_raw(index as u64);
            if restrict_to.is_some_and(|only| only != object) {
                continue;
            }
            let (fraction, normal) = match block.cast(from, to) {
                Cast::Miss => continue,
                Cast::StartsInside if report_inside => (0.0, Vec3::zeros()),
                Cast::StartsInside => continue,
                Cast::Hit { fraction, normal } => (fraction, normal),
            };
            if best.is_some_and(|b| b.fraction <= fraction) {
                continue;
            }
            best = Some(Contact {
                fraction,
                point: from + (to - from) * fraction,
                normal,
                object,
            });
        }
        best
    }
}

impl CollisionQuery for TestWorld {
    fn sweep(
        &self,
        _collider: &CharacterCollider,
        from: &Vec3,
        to: &Vec3,
        _allowed_penetration: f32,
    ) -> Option<Contact> {
        self.closest(from, to, None, false)
    }

    fn ray_cast(
        &self,
        from: &Vec3,
        to: &Vec3,
        restrict_to: Option<ObjectHandle>,
    ) -> Option<Contact> {
        self.closest(from, to, restrict_to, true)
    }
}

/// Collider whose shape the test world ignores.
pub(crate) fn point_collider() -> CharacterCollider {
    CharacterCollider::new(SharedShape::ball(0.01))
}
