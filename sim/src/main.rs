//! Headless movement sim.
//!
//! Drives one character through a demo voxel scene at a fixed tick rate with a scripted input
//! sequence, then prints the final state as JSON.
//!
//! Usage: `sim [config.json]`

use std::error::Error;
use std::time::Instant;

use log::{debug, info};
use movement::{
    Block, CharacterCollider, CharacterMovementSystem, CharacterState, MAX_STEP_DT_S,
    MovementConfig, MovementInput, MovementMode, RapierQueryWorld, TICK_HZ, TICK_INTERVAL, Vec3,
    VoxelGrid, WorldStaticDef,
};

/// Length of the scripted run.
const TOTAL_TICKS: u64 = 12 * TICK_HZ;

/// Id of the step slab; above every block index of the demo grid.
const STEP_SLAB_ID: u32 = 1_000_000;

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading movement config from {path}");
            MovementConfig::from_json_str(&std::fs::read_to_string(path)?)?
        }
        None => MovementConfig::default(),
    };
    let mut collider = CharacterCollider::capsule(&config)?;

    let grid = demo_grid();
    let mut statics = grid.static_defs();
    // Blocks are a meter tall; the slab is low enough to step onto.
    statics.push(WorldStaticDef::cuboid(
        STEP_SLAB_ID,
        Vec3::new(-3.0, 0.125, 0.0),
        Vec3::new(1.0, 0.125, 2.0),
    ));
    let world = RapierQueryWorld::build(statics);
    let system = CharacterMovementSystem::new(&world, &grid);

    let standing_height = config.height * 0.5 + 0.05;
    let mut state = CharacterState::at(Vec3::new(-6.0, standing_height, 0.0));
    info!(
        "starting at ({:.2}, {:.2}, {:.2}), {TOTAL_TICKS} ticks at {TICK_HZ} Hz",
        state.position.x, state.position.y, state.position.z
    );

    let started = Instant::now();
    let mut last_tick = started;
    for tick in 0..TOTAL_TICKS {
        let now = Instant::now();
        let real_dt = (now - last_tick).as_secs_f32();
        last_tick = now;
        let dt = if tick == 0 {
            TICK_INTERVAL.as_secs_f32()
        } else {
            real_dt.clamp(0.0, MAX_STEP_DT_S)
        };

        let (input, forced_mode) = scripted_input(tick, dt, started.elapsed().as_millis() as u64);
        if let Some(mode) = forced_mode
            && mode != state.mode
        {
            info!("tick {tick}: switching to {mode:?}");
            state.mode = mode;
        }

        let previous_mode = state.mode;
        state = system.step(&state, &input, &config, &mut collider);
        if state.mode != previous_mode {
            info!("tick {tick}: {previous_mode:?} -> {:?}", state.mode);
        }
        debug!(
            "tick {tick}: pos=({:.3}, {:.3}, {:.3}) vel=({:.2}, {:.2}, {:.2}) grounded={} mode={:?}",
            state.position.x,
            state.position.y,
            state.position.z,
            state.velocity.x,
            state.velocity.y,
            state.velocity.z,
            state.grounded,
            state.mode
        );

        if let Some(rest) = TICK_INTERVAL.checked_sub(now.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Ground at y = 0 with a two meter deep pool and a wall behind it.
fn demo_grid() -> VoxelGrid {
    let mut grid = VoxelGrid::new(Vec3::new(-8.0, -3.0, -8.0), [16, 6, 16]);
    // Bedrock and ground.
    grid.fill([0, 0, 0], [16, 3, 16], Block::Solid);
    // Pool: x 2..6, z -2..2.
    grid.fill([10, 1, 6], [14, 3, 10], Block::Liquid);
    // Wall on the far side: x 6..7, three blocks high.
    grid.fill([14, 3, 0], [15, 6, 16], Block::Solid);
    grid
}

/// Input for `tick`, plus a mode assigned from outside the movement system.
fn scripted_input(tick: u64, dt: f32, timestamp: u64) -> (MovementInput, Option<MovementMode>) {
    let second = tick / TICK_HZ;
    let forward = Vec3::new(1.0, 0.0, 0.0);
    let mut input = MovementInput {
        movement_direction: forward,
        yaw_degrees: 90.0,
        delta_time: dt,
        timestamp,
        ..MovementInput::default()
    };
    let mut mode = None;

    match second {
        // Walk over the slab.
        0..=1 => {}
        // Run and jump once.
        2 => {
            input.running = true;
            input.jump_requested = tick % TICK_HZ == 0;
        }
        // Walk into the pool.
        3..=6 => {}
        // Swim up and out against the wall.
        7..=8 => input.movement_direction = Vec3::new(0.5, 1.0, 0.0),
        // Fly through the wall.
        9..=10 => {
            mode = Some(MovementMode::Ghosting);
            input.movement_direction = Vec3::new(1.0, 0.3, 0.0);
        }
        // Land again.
        _ => {
            mode = Some(MovementMode::Walking);
            input.movement_direction = Vec3::zeros();
        }
    }

    (input, mode)
}
