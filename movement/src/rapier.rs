//! Static collider definitions and their Rapier colliders.

use rapier3d::{na::UnitQuaternion, prelude::*};

use crate::collision::DEFAULT_FILTER_GROUP;

/// Canonical definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - `filter_group` is tested against a character's filter mask by sweeps.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
    pub filter_group: u32,
}

impl WorldStaticDef {
    /// Axis-aligned box centered at `center`.
    pub fn cuboid(id: u32, center: Vector<f32>, half_extents: Vector<f32>) -> Self {
        Self {
            id,
            translation: center,
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Cuboid { half_extents },
            filter_group: DEFAULT_FILTER_GROUP,
        }
    }

    /// Horizontal ground plane at `height`, solid below.
    pub fn ground_plane(id: u32, height: f32) -> Self {
        Self {
            id,
            translation: Vector::new(0.0, height, 0.0),
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            filter_group: DEFAULT_FILTER_GROUP,
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_filter_group(mut self, group: u32) -> Self {
        self.filter_group = group;
        self
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space), solid on the side opposite its normal.
    ///
    /// The normal is `rotation * +Y`; the plane passes through the translation offset by
    /// `offset_along_normal` along it.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },
}

/// Packed collider user data.
///
/// # Bit layout
/// - bits 0..=31  : `WorldStaticDef::id`
/// - bits 32..=63 : `WorldStaticDef::filter_group`
/// - bits 64..=127: reserved (zero)
pub type StaticUserData = u128;

pub fn pack_user_data(id: u32, filter_group: u32) -> StaticUserData {
    (id as u128) | ((filter_group as u128) << u32::BITS)
}

/// Returns `(id, filter_group)`.
pub fn unpack_user_data(data: StaticUserData) -> (u32, u32) {
    const WORD: u128 = u32::MAX as u128;
    ((data & WORD) as u32, ((data >> u32::BITS) & WORD) as u32)
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose is stored on the parent rigid-body, so the collider is created in body-local
/// coordinates. The definition's id and filter group are packed into the user data.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => ColliderBuilder::halfspace(Vector::y_axis())
            .translation(Vector::y() * *offset_along_normal),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    };

    builder
        .user_data(pack_user_data(def.id, def.filter_group))
        .build()
}
