/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the collision query interface (sweeps and ray probes against static geometry)
- the vertical and horizontal movers
- the mode algorithms that consume a [`MoveResult`]
*/

use nalgebra as na;

use crate::bitmask_flags::BitmaskFlags;
use crate::define_bitmask_flags;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Opaque, stable handle of a static collision object.
///
/// Secondary probes issued during one move (step and slope validation) are restricted to the
/// object returned by the primary sweep, so the handle must stay valid for the lifetime of the
/// query world. The raw value is owned by the world implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Closest blocking contact reported by a sweep or a ray probe.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Fraction (0..1) of the tested segment where the hit occurred.
    pub fraction: f32,
    /// World-space contact point on the hit object.
    pub point: Vec3,
    /// World-space surface normal of the hit object, facing the query.
    pub normal: Vec3,
    /// The object that was hit.
    pub object: ObjectHandle,
}

impl Contact {
    /// Slope of the contact surface: `normal · up`.
    #[inline]
    pub fn slope(&self) -> f32 {
        self.normal.y
    }
}

define_bitmask_flags!(ContactFlag, u8, {
    Horizontal,
    Bottom,
    Top,
});

/// Result of a generalized move.
#[derive(Clone, Copy, Debug)]
pub struct MoveResult {
    /// Position after all move phases.
    pub final_position: Vec3,
    /// Which sides reported a blocking contact.
    pub contacts: BitmaskFlags<u8>,
}

impl MoveResult {
    #[inline]
    pub fn at(final_position: Vec3) -> Self {
        Self {
            final_position,
            contacts: BitmaskFlags::default(),
        }
    }

    #[inline]
    pub fn hit_horizontal(&self) -> bool {
        self.contacts.has(ContactFlag::Horizontal)
    }

    #[inline]
    pub fn hit_bottom(&self) -> bool {
        self.contacts.has(ContactFlag::Bottom)
    }

    #[inline]
    pub fn hit_top(&self) -> bool {
        self.contacts.has(ContactFlag::Top)
    }
}
