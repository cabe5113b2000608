use rapier3d::prelude::{Shape, SharedShape};

use super::{Iso, ObjectHandle, Vec3};
use crate::config::{ConfigError, MovementConfig};

/// Filter group assigned to characters and world statics unless configured otherwise.
pub const DEFAULT_FILTER_GROUP: u32 = 1;

/// Filter mask that accepts every group.
pub const ALL_FILTER_GROUPS: u32 = u32::MAX;

/// The character's convex collision shape and its world placement.
///
/// Sweeps use `shape`, `filter_mask` and `world_handle` (self-exclusion). The world pose is
/// written once per walking tick and read by downstream physics and rendering peers.
#[derive(Clone)]
pub struct CharacterCollider {
    shape: SharedShape,
    pub filter_group: u32,
    pub filter_mask: u32,
    /// The collider's own object in the query world, if it was registered there.
    pub world_handle: Option<ObjectHandle>,
    pose: Iso,
}

impl CharacterCollider {
    pub fn new(shape: SharedShape) -> Self {
        Self {
            shape,
            filter_group: DEFAULT_FILTER_GROUP,
            filter_mask: ALL_FILTER_GROUPS,
            world_handle: None,
            pose: Iso::identity(),
        }
    }

    /// Y-aligned capsule spanning `config.height` with `config.radius`.
    ///
    /// The capsule center is the character position.
    pub fn capsule(config: &MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let half_height = (config.height * 0.5 - config.radius).max(0.0);
        Ok(Self::new(SharedShape::capsule_y(half_height, config.radius)))
    }

    pub fn with_filter(mut self, group: u32, mask: u32) -> Self {
        self.filter_group = group;
        self.filter_mask = mask;
        self
    }

    pub fn with_world_handle(mut self, handle: ObjectHandle) -> Self {
        self.world_handle = Some(handle);
        self
    }

    #[inline]
    pub fn shape(&self) -> &dyn Shape {
        &*self.shape
    }

    #[inline]
    pub fn pose(&self) -> &Iso {
        &self.pose
    }

    /// Place the collider at `translation` with identity rotation.
    #[inline]
    pub fn set_world_translation(&mut self, translation: Vec3) {
        self.pose = Iso::translation(translation.x, translation.y, translation.z);
    }
}

impl std::fmt::Debug for CharacterCollider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterCollider")
            .field("shape_type", &self.shape.shape_type())
            .field("filter_group", &self.filter_group)
            .field("filter_mask", &self.filter_mask)
            .field("world_handle", &self.world_handle)
            .field("pose", &self.pose)
            .finish()
    }
}
