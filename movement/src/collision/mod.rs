/*!
Collision root module.

This module re-exports the submodules that implement the kinematic character
mover. Geometry is reached only through the [`CollisionQuery`] trait, so the
movers run unchanged against the rapier query world or an analytic test world.
The code is split for clarity:

- types:      shared data types (Contact, MoveResult, ContactFlag, handles)
- settings:   mover tolerances
- collider:   the character's shape, filter and world pose
- query:      sweep, ray and liquid query traits
- mover:      generalized move entry point and its per-call context
- vertical:   upward and downward sweeps with slope validation
- horizontal: sweep-and-slide with step-up
*/

pub mod collider;
mod horizontal;
pub mod mover;
pub mod query;
pub mod settings;
pub mod types;
mod vertical;

#[cfg(test)]
pub(crate) mod test_world;

pub use collider::{ALL_FILTER_GROUPS, CharacterCollider, DEFAULT_FILTER_GROUP};
pub use mover::{MoveRequest, move_character};
pub use query::{CollisionQuery, LiquidProbe};
pub use types::{Contact, ContactFlag, Iso, MoveResult, ObjectHandle, Quat, Vec3};
