//! Slingshot headless driver
//!
//! Loads a level file (and optional settings override), then plays the
//! campaign with a scripted player that lobs every bird at the nearest
//! pig. Progress is reported through the log; set `RUST_LOG=info` to see it.
//!
//! Usage: `slingshot [levels.json] [settings.json]`

use glam::Vec2;

use slingshot::sim::{Campaign, CollisionClass, GamePhase, GameState, TickInput, tick};
use slingshot::{GameResult, Settings};

/// Frames before the driver gives up
const MAX_FRAMES: u64 = 30 * 60 * 10;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> GameResult<()> {
    let mut args = std::env::args().skip(1);
    let levels_path = args.next().unwrap_or_else(|| "levels/levels.json".to_string());
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let campaign = Campaign::load(&levels_path)?;
    let mut state = GameState::new(settings, campaign)?;
    log::info!("Slingshot starting with {} levels", state.total_levels());

    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    )?;

    let mut frames = 0;
    while state.running && state.phase == GamePhase::Playing && frames < MAX_FRAMES {
        let input = scripted_input(&state);
        tick(&mut state, &input)?;
        frames += 1;
    }

    match state.final_time() {
        Some((minutes, secs)) => println!("Campaign complete in {}m {:.1}s", minutes, secs),
        None => println!(
            "Stopped on level {} with {} pigs left after {} frames",
            state.level_number(),
            state.pigs_remaining(),
            frames
        ),
    }
    Ok(())
}

/// Grab the bird and release it aimed at the nearest pig on the next frame
fn scripted_input(state: &GameState) -> TickInput {
    if state.bird_shot {
        return TickInput::default();
    }
    let Some(bird) = state.world.position(state.bird.body()) else {
        return TickInput::default();
    };
    let target = state
        .world
        .bodies()
        .filter(|b| b.class == CollisionClass::Pig)
        .map(|b| b.position)
        .min_by(|a, b| {
            a.distance_squared(bird)
                .partial_cmp(&b.distance_squared(bird))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let Some(target) = target else {
        return TickInput::default();
    };

    if !state.launcher.is_grabbed() {
        return TickInput {
            pointer: Some(bird),
            pointer_pressed: true,
            ..Default::default()
        };
    }

    // Lob toward the target: 45° up in its horizontal direction
    let toward = Vec2::new((target.x - bird.x).signum(), 1.0).normalize_or_zero();
    let pull = state.settings.aiming_range * drag_fraction(state, bird, target);
    TickInput {
        pointer: Some(bird - toward * pull),
        pointer_released: true,
        ..Default::default()
    }
}

/// Fraction of the full drag needed to land a 45° lob on `target`
fn drag_fraction(state: &GameState, bird: Vec2, target: Vec2) -> f32 {
    let g = -state.settings.gravity.y;
    let range = (target.x - bird.x).abs();
    if g <= 0.0 {
        return 1.0;
    }
    // Flat-ground range of a 45° lob: v² / g
    let speed = (range * g).sqrt();
    (speed / state.settings.max_speed()).clamp(0.05, 1.0)
}
