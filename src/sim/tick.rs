//! Fixed timestep simulation tick
//!
//! One call = one frame: input, exactly one physics step, collision rules,
//! rolling resistance, then progression.

use glam::Vec2;

use super::aim::{AimInput, AimKeys, LaunchPhase};
use super::collision::resolve_contacts;
use super::progression::{Decision, sweep_out_of_bounds};
use super::resistance::apply_rolling_resistance;
use super::state::{GamePhase, GameState};
use super::trajectory::Trajectory;
use crate::error::GameResult;

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in world coordinates
    pub pointer: Option<Vec2>,
    /// Primary button went down this frame
    pub pointer_pressed: bool,
    /// Primary button went up this frame
    pub pointer_released: bool,
    /// Secondary button went up this frame (cancels the aim)
    pub secondary_released: bool,
    /// Held aim keys
    pub keys: AimKeys,
    /// Launch key (space)
    pub launch: bool,
    /// Reload the current level
    pub restart: bool,
    /// Leave the title or end screen
    pub start: bool,
    pub quit: bool,
}

impl TickInput {
    fn aim(&self) -> AimInput {
        AimInput {
            pointer: self.pointer,
            pressed: self.pointer_pressed,
            released: self.pointer_released,
            cancel: self.secondary_released,
            keys: self.keys,
            launch: self.launch,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> GameResult<()> {
    if input.quit {
        log::info!("Quit requested");
        state.running = false;
        return Ok(());
    }

    match state.phase {
        GamePhase::Title => {
            if input.start {
                state.load_level(0)?;
                state.time_ticks = 0;
                state.stopwatch = None;
                state.phase = GamePhase::Playing;
                log::info!("Campaign started");
            }
            return Ok(());
        }
        GamePhase::Finished => {
            if input.start {
                state.load_level(0)?;
                state.phase = GamePhase::Title;
            }
            return Ok(());
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    if input.restart {
        return state.restart_level();
    }

    handle_launch(state, input)?;
    update_trajectory(state);

    // Physics
    let contacts = state.world.step();
    let resolution = resolve_contacts(&mut state.world, &contacts, &state.settings.thresholds);
    if !resolution.removed.is_empty() {
        log::debug!(
            "{} bodies removed, {} pigs left",
            resolution.removed.len(),
            state.pigs_remaining()
        );
    }
    apply_rolling_resistance(&mut state.world, state.settings.rolling_deceleration);

    if state.launcher.phase() == LaunchPhase::Launched {
        state.launcher.set_phase(LaunchPhase::Resolving);
    }

    // Progression
    sweep_out_of_bounds(&mut state.world, state.settings.offscreen_margin);
    let outlook = state.outlook();
    let decision = state.progression.evaluate(&state.world, &outlook);
    state.last_decision = decision;
    apply_decision(state, decision)
}

/// Aim, launch, or skip ahead to the next attempt
fn handle_launch(state: &mut GameState, input: &TickInput) -> GameResult<()> {
    if state.bird_shot {
        if input.launch && state.level.attempts() > 0 {
            log::debug!("Skipping to the next attempt");
            state.load_bird()?;
        }
        return Ok(());
    }

    let Some(position) = state.world.position(state.bird.body()) else {
        return Ok(());
    };
    let radius = state.bird.radius();
    let fire = state.launcher.update(
        &mut state.bird.aim,
        position,
        radius,
        &input.aim(),
        &state.settings,
    );
    if fire {
        state.shoot_bird();
    }
    Ok(())
}

fn update_trajectory(state: &mut GameState) {
    if state.bird_shot {
        state.trajectory.clear();
        return;
    }
    let Some(start) = state.world.position(state.bird.body()) else {
        return;
    };
    let settings = &state.settings;
    state.trajectory = Trajectory::preview(
        start,
        state.bird.aim.velocity(),
        settings.gravity,
        settings.dt(),
        settings.floor_height,
        state.world.playfield(),
    );
}

fn apply_decision(state: &mut GameState, decision: Decision) -> GameResult<()> {
    match decision {
        Decision::Settling => {}
        Decision::Hold => {
            if state.level.attempts() == 0 && state.pigs_remaining() > 0 && state.bird_shot {
                state.launcher.set_phase(LaunchPhase::LevelFailed);
            }
        }
        Decision::NextAttempt => state.load_bird()?,
        Decision::Restart => state.restart_level()?,
        Decision::Advance => {
            log::info!("Level {} cleared", state.level.number());
            state.load_level(state.level.index() + 1)?;
        }
        Decision::CampaignComplete => {
            state.launcher.set_phase(LaunchPhase::LevelCleared);
            state.stopwatch = Some(state.time_ticks);
            state.phase = GamePhase::Finished;
            if let Some((minutes, secs)) = state.final_time() {
                log::info!("Campaign complete in {}m {:.1}s", minutes, secs);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::level::Campaign;

    const LEVELS: &str = r#"{ "levels": [
        { "level": 1, "objects": { "birds": { "amount": 2 },
          "pigs": [ { "x_position": 1113, "y_position": 20, "radius": 20 } ] } }
    ] }"#;

    fn playing() -> GameState {
        let mut state =
            GameState::new(Settings::default(), Campaign::from_json_str(LEVELS).unwrap()).unwrap();
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start).unwrap();
        state
    }

    #[test]
    fn test_title_waits_for_start() {
        let mut state =
            GameState::new(Settings::default(), Campaign::from_json_str(LEVELS).unwrap()).unwrap();
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.world.steps(), 0);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_stops_running() {
        let mut state = playing();
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        tick(&mut state, &quit).unwrap();
        assert!(!state.running);
    }

    #[test]
    fn test_key_aim_updates_trajectory() {
        let mut state = playing();
        let input = TickInput {
            keys: AimKeys {
                up: true,
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..45 {
            tick(&mut state, &input).unwrap();
        }
        assert_eq!(state.bird.aim.angle, 45.0);
        assert_eq!(state.bird.aim.speed, 450.0);
        assert_eq!(state.launcher.phase(), LaunchPhase::Armed);
        assert!(!state.trajectory.is_empty());
        assert!(!state.bird_shot);
    }

    #[test]
    fn test_slow_shot_leads_to_next_attempt() {
        let mut state = playing();
        let first_bird = state.bird.body();
        state.bird.aim.speed = 10.0;
        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch).unwrap();
        assert!(state.bird_shot);
        assert_eq!(state.attempts(), 1);
        assert_eq!(state.launcher.phase(), LaunchPhase::Resolving);

        let mut respawned = false;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default()).unwrap();
            if state.bird.body() != first_bird {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert!(!state.bird_shot);
        assert_eq!(state.launcher.phase(), LaunchPhase::Idle);
        assert_eq!(state.pigs_remaining(), 1);
    }

    #[test]
    fn test_launch_key_skips_flying_bird() {
        let mut state = playing();
        state.bird.aim = crate::sim::aim::Aim::new(80.0, 900.0);
        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch).unwrap();
        let flying = state.bird.body();

        tick(&mut state, &launch).unwrap();
        assert_ne!(state.bird.body(), flying);
        assert!(!state.world.contains(flying));
        assert_eq!(state.attempts(), 1);
    }

    #[test]
    fn test_manual_restart_resets_attempts() {
        let mut state = playing();
        state.bird.aim.speed = 10.0;
        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch).unwrap();
        assert_eq!(state.attempts(), 1);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart).unwrap();
        assert_eq!(state.attempts(), 2);
        assert!(!state.bird_shot);
    }
}
