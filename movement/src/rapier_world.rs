//! Rapier-based query world for immutable/static world geometry.
//!
//! Builds an in-memory Rapier scene from a set of [`WorldStaticDef`] records and answers the
//! movement core's sweep and ray queries against it.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics; the world is stepped once to fill the broad phase.
//! - Immutable world: statics do not move after construction, so object handles stay valid.

// Re-export Rapier so downstream crates can use Rapier types without depending on it directly.
pub use rapier3d;

use rapier3d::na::{Point3, Translation3};
use rapier3d::parry::bounding_volume::BoundingVolume;
use rapier3d::parry::query::{self, ShapeCastOptions, ShapeCastStatus};
use rapier3d::prelude::*;

use crate::collision::{
    CharacterCollider, CollisionQuery, Contact, Iso, ObjectHandle, Vec3, settings::EPSILON,
};
use crate::rapier::{WorldStaticDef, collider_from_def, unpack_user_data};

/// In-memory Rapier structures needed for scene queries against a static world.
///
/// This stores:
/// - `RigidBodySet`/`ColliderSet` containing the static world geometry.
/// - `NarrowPhase` and `BroadPhaseBvh` used to create a borrowed `QueryPipeline`.
pub struct RapierQueryWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Any NaN/invalid values should be filtered/validated by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // One fixed rigid-body per static, carrying its pose.
        for def in defs.iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            colliders.insert_with_parent(collider_from_def(def), rb_handle, &mut bodies);
        }

        // Collision detection only, to initialize the broad-phase BVH.
        // Rapier 0.31: step(prediction_distance, broad_phase, narrow_phase, bodies, colliders, hooks, events)
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        log::debug!("built query world with {} static colliders", colliders.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Create a borrowed `QueryPipeline` view for scene queries.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Handle of the collider built from the definition with `id`.
    pub fn handle_of(&self, id: u32) -> Option<ObjectHandle> {
        self.colliders
            .iter()
            .find(|(_, co)| unpack_user_data(co.user_data).0 == id)
            .map(|(handle, _)| object_handle(handle))
    }
}

#[inline]
fn object_handle(handle: ColliderHandle) -> ObjectHandle {
    let (index, generation) = handle.into_raw_parts();
    ObjectHandle::from_raw(((generation as u64) << u32::BITS) | index as u64)
}

#[inline]
fn collider_handle(object: ObjectHandle) -> ColliderHandle {
    let raw = object.raw();
    ColliderHandle::from_raw_parts(raw as u32, (raw >> u32::BITS) as u32)
}

fn sweep_options() -> ShapeCastOptions {
    let mut options = ShapeCastOptions::with_max_time_of_impact(1.0);
    // Shapes already overlapping still report the hit if the motion goes deeper.
    options.stop_at_penetration = false;
    options
}

/// Overlap depth between the character at `pose` and `co`, with the direction that separates
/// the character from it. `None` when they are more than `prediction` apart.
fn penetration(shape: &dyn Shape, pose: &Iso, co: &Collider, prediction: f32) -> Option<(f32, Vec3)> {
    match query::contact(pose, shape, co.position(), co.shape(), prediction) {
        Ok(Some(contact)) => Some(((-contact.dist).max(0.0), -contact.normal1.into_inner())),
        _ => None,
    }
}

impl CollisionQuery for RapierQueryWorld {
    fn sweep(
        &self,
        collider: &CharacterCollider,
        from: &Vec3,
        to: &Vec3,
        allowed_penetration: f32,
    ) -> Option<Contact> {
        let motion = to - from;
        if motion.norm_squared() <= EPSILON {
            return None;
        }

        let shape = collider.shape();
        let start = Iso::translation(from.x, from.y, from.z);
        let end = Iso::translation(to.x, to.y, to.z);
        let swept = shape.compute_aabb(&start).merged(&shape.compute_aabb(&end));

        let mut best: Option<Contact> = None;
        for (handle, co) in self.colliders.iter() {
            let object = object_handle(handle);
            if collider.world_handle == Some(object) {
                continue;
            }
            let (_, group) = unpack_user_data(co.user_data);
            if group & collider.filter_mask == 0 {
                continue;
            }
            if !co.compute_aabb().intersects(&swept) {
                continue;
            }

            let cast = |pose: &Iso| {
                query::cast_shapes(
                    pose,
                    &motion,
                    shape,
                    co.position(),
                    &Vec3::zeros(),
                    co.shape(),
                    sweep_options(),
                )
                .ok()
                .flatten()
            };
            let Some(mut hit) = cast(&start) else {
                continue;
            };

            // A shallow starting overlap may deepen up to the allowance before it blocks.
            if matches!(hit.status, ShapeCastStatus::PenetratingOrWithinTargetDist)
                && let Some((depth, out)) = penetration(shape, &start, co, allowed_penetration)
                && depth <= allowed_penetration
            {
                let backed = from + out * allowed_penetration;
                let Some(backed_hit) = cast(&Iso::translation(backed.x, backed.y, backed.z)) else {
                    continue;
                };
                hit = backed_hit;
            }
            if best.is_some_and(|b| b.fraction <= hit.time_of_impact) {
                continue;
            }

            let pose = co.position();
            let mut normal = pose.rotation * hit.normal2.into_inner();
            if normal.dot(&motion) > 0.0 {
                normal = -normal;
            }
            best = Some(Contact {
                fraction: hit.time_of_impact,
                point: (pose * hit.witness2).coords,
                normal,
                object,
            });
        }

        best
    }

    fn ray_cast(
        &self,
        from: &Vec3,
        to: &Vec3,
        restrict_to: Option<ObjectHandle>,
    ) -> Option<Contact> {
        let segment = to - from;
        let length = segment.norm();
        if length <= EPSILON {
            return None;
        }
        let ray = Ray::new(Point3::from(*from), segment / length);

        let (handle, hit) = match restrict_to {
            Some(object) => {
                let handle = collider_handle(object);
                let co = self.colliders.get(handle)?;
                let hit = co
                    .shape()
                    .cast_ray_and_get_normal(co.position(), &ray, length, true)?;
                (handle, hit)
            }
            None => self
                .query_pipeline(QueryFilter::default())
                .cast_ray_and_get_normal(&ray, length, true)?,
        };

        Some(Contact {
            fraction: hit.time_of_impact / length,
            point: ray.point_at(hit.time_of_impact).coords,
            normal: hit.normal,
            object: object_handle(handle),
        })
    }
}
