use log::debug;

use crate::collision::{CharacterCollider, CollisionQuery, LiquidProbe, Vec3};
use crate::config::MovementConfig;
use crate::constants::{FACE_MOVEMENT_MIN_SPEED_SQ, LIQUID_PROBE_HEIGHT_FACTOR, WATER_EXIT_BOOST};
use crate::modes;
use crate::state::{CharacterState, MovementInput, MovementMode};
use crate::utils::{yaw_from_xz, yaw_rotation};

/// Advances characters one tick at a time against a shared, read-only world.
///
/// Holds no per-character state, so one system can step any number of characters.
pub struct CharacterMovementSystem<'w, Q: ?Sized, L: ?Sized> {
    query: &'w Q,
    liquids: &'w L,
}

impl<'w, Q, L> CharacterMovementSystem<'w, Q, L>
where
    Q: CollisionQuery + ?Sized,
    L: LiquidProbe + ?Sized,
{
    pub fn new(query: &'w Q, liquids: &'w L) -> Self {
        Self { query, liquids }
    }

    /// Perform one movement tick.
    ///
    /// Behavior
    /// - Runs the algorithm of the current mode.
    /// - Outside ghosting, re-evaluates liquid immersion and switches between walking and
    ///   swimming, boosting characters that leave the water moving up.
    /// - Updates the facing rotation.
    /// - Stamps the result with the input's timestamp.
    pub fn step(
        &self,
        initial: &CharacterState,
        input: &MovementInput,
        config: &MovementConfig,
        collider: &mut CharacterCollider,
    ) -> CharacterState {
        let mut result = match initial.mode {
            MovementMode::Ghosting => modes::ghost(config, initial, input),
            MovementMode::Swimming => modes::swim(self.query, collider, config, initial, input),
            MovementMode::Walking => modes::walk(self.query, collider, config, initial, input),
        };
        result.timestamp = input.timestamp;

        if result.mode != MovementMode::Ghosting {
            self.update_liquid_mode(config, &mut result);
        }
        update_rotation(config, input, &mut result);

        result
    }

    /// Swimming only when both the upper and the lower probe are in liquid.
    fn update_liquid_mode(&self, config: &MovementConfig, state: &mut CharacterState) {
        let offset = Vec3::y() * (LIQUID_PROBE_HEIGHT_FACTOR * config.height);
        let top = state.position + offset;
        let bottom = state.position - offset;
        let submerged = self.liquids.is_liquid_at(&top) && self.liquids.is_liquid_at(&bottom);

        let mode = if submerged {
            MovementMode::Swimming
        } else {
            MovementMode::Walking
        };

        if mode != state.mode {
            debug!("{:?} -> {:?} at y={:.3}", state.mode, mode, state.position.y);
        }

        if state.mode == MovementMode::Swimming && mode == MovementMode::Walking && state.velocity.y > 0.0 {
            let speed = state.velocity.norm();
            state.velocity *= (speed + WATER_EXIT_BOOST) / speed;
        }
        state.mode = mode;
    }
}

/// Face the planar velocity when configured and moving, otherwise the input yaw.
fn update_rotation(config: &MovementConfig, input: &MovementInput, state: &mut CharacterState) {
    let v = state.velocity;
    let planar_speed_sq = v.x * v.x + v.z * v.z;
    let yaw = if config.face_movement_direction && planar_speed_sq > FACE_MOVEMENT_MIN_SPEED_SQ {
        yaw_from_xz(v.x, v.z)
    } else {
        input.yaw_degrees.to_radians()
    };
    state.rotation = yaw_rotation(yaw);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::test_world::{ConvexBlock, TestWorld, point_collider};
    use crate::constants::GRAVITY;
    use crate::rapier_world::RapierQueryWorld;
    use crate::voxel::{Block, VoxelGrid};

    const DT: f32 = 1.0 / 30.0;

    fn dry(_: &Vec3) -> bool {
        false
    }

    fn tick(direction: Vec3) -> MovementInput {
        MovementInput {
            movement_direction: direction,
            delta_time: DT,
            timestamp: 1234,
            ..MovementInput::default()
        }
    }

    /// Liquid below `surface`.
    fn pool(surface: f32) -> impl Fn(&Vec3) -> bool {
        move |p: &Vec3| p.y < surface
    }

    #[test]
    fn walking_character_falls_and_is_stamped_with_the_input_time() {
        let world = TestWorld::new(Vec::new());
        let system = CharacterMovementSystem::new(&world, &dry);
        let mut collider = point_collider();
        let config = MovementConfig::default();

        let next = system.step(
            &CharacterState::at(Vec3::new(0.0, 10.0, 0.0)),
            &tick(Vec3::zeros()),
            &config,
            &mut collider,
        );
        assert_eq!(next.mode, MovementMode::Walking);
        assert_eq!(next.timestamp, 1234);
        assert!((next.velocity.y + GRAVITY * DT).abs() < 1.0e-4);
        assert!(next.position.y < 10.0);
    }

    #[test]
    fn entering_deep_liquid_switches_to_swimming() {
        let world = TestWorld::new(Vec::new());
        let liquid = pool(100.0);
        let system = CharacterMovementSystem::new(&world, &liquid);
        let mut collider = point_collider();
        let config = MovementConfig::default();

        let next = system.step(
            &CharacterState::at(Vec3::new(0.0, 10.0, 0.0)),
            &tick(Vec3::zeros()),
            &config,
            &mut collider,
        );
        assert_eq!(next.mode, MovementMode::Swimming);
    }

    #[test]
    fn liquid_reaching_only_the_lower_probe_keeps_walking() {
        let world = TestWorld::new(Vec::new());
        // Lower probe at 9.6, upper probe at 10.4 (minus this tick's fall).
        let liquid = pool(10.0);
        let system = CharacterMovementSystem::new(&world, &liquid);
        let mut collider = point_collider();
        let config = MovementConfig::default();

        let next = system.step(
            &CharacterState::at(Vec3::new(0.0, 10.0, 0.0)),
            &tick(Vec3::zeros()),
            &config,
            &mut collider,
        );
        assert_eq!(next.mode, MovementMode::Walking);
    }

    #[test]
    fn leaving_the_water_moving_up_gets_a_boost() {
        let world = TestWorld::new(Vec::new());
        let liquid = pool(0.0);
        let system = CharacterMovementSystem::new(&world, &liquid);
        let mut collider = point_collider();
        let config = MovementConfig::default();
        let state = CharacterState {
            velocity: Vec3::new(0.0, 2.0, 0.0),
            ..CharacterState::at(Vec3::new(0.0, 0.5, 0.0))
        }
        .with_mode(MovementMode::Swimming);

        let up = MovementInput {
            delta_time: DT,
            movement_direction: Vec3::new(0.0, 1.0, 0.0),
            ..MovementInput::default()
        };
        let swum = modes::swim(&world, &collider, &config, &state, &up);
        let next = system.step(&state, &up, &config, &mut collider);

        assert_eq!(next.mode, MovementMode::Walking);
        // Same direction, speed raised by exactly the boost.
        let speed = swum.velocity.norm();
        assert!((next.velocity.norm() - (speed + WATER_EXIT_BOOST)).abs() < 1.0e-4);
        let boosted = swum.velocity * ((speed + WATER_EXIT_BOOST) / speed);
        assert!((next.velocity - boosted).norm() < 1.0e-4);
    }

    #[test]
    fn leaving_the_water_moving_down_gets_no_boost() {
        let world = TestWorld::new(Vec::new());
        let liquid = pool(-10.0);
        let system = CharacterMovementSystem::new(&world, &liquid);
        let mut collider = point_collider();
        let config = MovementConfig::default();
        let state = CharacterState {
            velocity: Vec3::new(0.0, -1.0, 0.0),
            ..CharacterState::at(Vec3::new(0.0, 0.5, 0.0))
        }
        .with_mode(MovementMode::Swimming);

        let next = system.step(&state, &tick(Vec3::zeros()), &config, &mut collider);
        assert_eq!(next.mode, MovementMode::Walking);
        assert!(next.velocity.norm() < 2.0);
    }

    #[test]
    fn ghost_ignores_walls_and_liquid() {
        let world = TestWorld::new(vec![ConvexBlock::aabb(
            Vec3::new(0.5, -5.0, -5.0),
            Vec3::new(1.0, 5.0, 5.0),
        )]);
        let liquid = pool(100.0);
        let system = CharacterMovementSystem::new(&world, &liquid);
        let mut collider = point_collider();
        let config = MovementConfig::default();
        let state = CharacterState {
            velocity: Vec3::new(config.max_ghost_speed, 0.0, 0.0),
            ..CharacterState::at(Vec3::zeros())
        }
        .with_mode(MovementMode::Ghosting);

        let mut next = state;
        for _ in 0..10 {
            next = system.step(&next, &tick(Vec3::new(1.0, 0.0, 0.0)), &config, &mut collider);
        }
        assert_eq!(next.mode, MovementMode::Ghosting);
        assert!(next.position.x > 1.0);
    }

    #[test]
    fn rotation_follows_the_input_yaw_by_default() {
        let world = TestWorld::new(vec![ConvexBlock::floor(0.0)]);
        let system = CharacterMovementSystem::new(&world, &dry);
        let mut collider = point_collider();
        let config = MovementConfig::default();
        let input = MovementInput {
            yaw_degrees: 90.0,
            ..tick(Vec3::new(0.0, 0.0, 1.0))
        };

        let next = system.step(&CharacterState::at(Vec3::new(0.0, 0.05, 0.0)), &input, &config, &mut collider);
        let expected = yaw_rotation(std::f32::consts::FRAC_PI_2);
        assert!(next.rotation.angle_to(&expected) < 1.0e-4);
    }

    #[test]
    fn rotation_faces_the_movement_direction_when_configured() {
        let world = TestWorld::new(vec![ConvexBlock::floor(0.0)]);
        let system = CharacterMovementSystem::new(&world, &dry);
        let mut collider = point_collider();
        let config = MovementConfig {
            face_movement_direction: true,
            ..MovementConfig::default()
        };
        let input = MovementInput {
            yaw_degrees: 90.0,
            delta_time: 1.0,
            ..MovementInput::default()
        };
        let state = CharacterState {
            velocity: Vec3::new(-3.0, 0.0, 0.0),
            grounded: true,
            ..CharacterState::at(Vec3::new(0.0, 0.05, 0.0))
        };

        // Friction stops the character within the tick, so it keeps the input yaw...
        let stopped = system.step(&state, &input, &config, &mut collider);
        assert!(stopped.rotation.angle_to(&yaw_rotation(std::f32::consts::FRAC_PI_2)) < 1.0e-4);

        // ...while a moving one faces its velocity.
        let moving = system.step(
            &state,
            &MovementInput {
                movement_direction: Vec3::new(-1.0, 0.0, 0.0),
                ..input
            },
            &config,
            &mut collider,
        );
        let facing = yaw_rotation(-std::f32::consts::FRAC_PI_2);
        assert!(moving.rotation.angle_to(&facing) < 1.0e-4);
    }

    #[test]
    fn one_system_steps_many_characters_independently() {
        let world = TestWorld::new(vec![ConvexBlock::floor(0.0)]);
        let system = CharacterMovementSystem::new(&world, &dry);
        let config = MovementConfig::default();
        let mut a_collider = point_collider();
        let mut b_collider = point_collider();

        let a = CharacterState::at(Vec3::new(0.0, 0.05, 0.0));
        let b = CharacterState::at(Vec3::new(10.0, 5.0, 0.0));
        let a_next = system.step(&a, &tick(Vec3::new(1.0, 0.0, 0.0)), &config, &mut a_collider);
        let b_next = system.step(&b, &tick(Vec3::zeros()), &config, &mut b_collider);

        assert!(a_next.grounded);
        assert!(!b_next.grounded);
        assert_eq!(a_collider.pose().translation.vector, a_next.position);
        assert_eq!(b_collider.pose().translation.vector, b_next.position);
    }

    #[test]
    fn swimming_into_a_pool_corner_stays_in_the_pool() {
        // Pool spans x -2..1, y -2..0, z -2..1 inside solid ground.
        let mut grid = VoxelGrid::new(Vec3::new(-4.0, -3.0, -4.0), [8, 6, 8]);
        grid.fill([0, 0, 0], [8, 3, 8], Block::Solid);
        grid.fill([2, 1, 2], [5, 3, 5], Block::Liquid);
        let world = RapierQueryWorld::build(grid.static_defs());
        let system = CharacterMovementSystem::new(&world, &grid);
        let config = MovementConfig::default();
        let mut collider = CharacterCollider::capsule(&config).unwrap();

        let mut state =
            CharacterState::at(Vec3::new(-0.5, -1.0, -0.5)).with_mode(MovementMode::Swimming);
        let into_corner = tick(Vec3::new(1.0, 0.0, 1.0));
        for _ in 0..120 {
            let next = system.step(&state, &into_corner, &config, &mut collider);
            assert!((next.position - state.position).norm() < 0.5);
            assert!(next.position.y < 0.0);
            assert!(next.position.x < 1.0 && next.position.z < 1.0);
            state = next;
        }
        assert_eq!(state.mode, MovementMode::Swimming);
    }
}
