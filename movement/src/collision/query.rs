//! Narrow interfaces to the world consumed by the movement core.
//!
//! Both traits take `&self`: queries are read-only and may be issued any number of times
//! within one tick, for any number of characters.

use super::{CharacterCollider, Contact, ObjectHandle, Vec3};

/// Sweep and ray queries against static world geometry.
pub trait CollisionQuery {
    /// Sweep the collider's shape from `from` to `to` (identity rotation) and return the closest
    /// blocking contact.
    ///
    /// The collider's own world object is never reported, and objects outside its filter mask
    /// are ignored. Overlaps shallower than `allowed_penetration` at the start of the sweep do
    /// not block it.
    fn sweep(
        &self,
        collider: &CharacterCollider,
        from: &Vec3,
        to: &Vec3,
        allowed_penetration: f32,
    ) -> Option<Contact>;

    /// Cast a ray along the segment `from -> to` and return the first contact.
    ///
    /// With `restrict_to`, only that object is tested.
    fn ray_cast(&self, from: &Vec3, to: &Vec3, restrict_to: Option<ObjectHandle>)
    -> Option<Contact>;
}

/// Point samples against world volume data.
pub trait LiquidProbe {
    fn is_liquid_at(&self, point: &Vec3) -> bool;
}

impl<F> LiquidProbe for F
where
    F: Fn(&Vec3) -> bool,
{
    fn is_liquid_at(&self, point: &Vec3) -> bool {
        self(point)
    }
}
