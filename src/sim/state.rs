//! Game state
//!
//! One owned record threaded through every tick: the physics world, the
//! loaded level, the current bird and its launch state, plus campaign-wide
//! bookkeeping. Only the frame loop mutates it.

use serde::{Deserialize, Serialize};

use super::aim::{LaunchPhase, Launcher};
use super::entity::Bird;
use super::level::{Campaign, Level};
use super::progression::{Decision, Outlook, Progression};
use super::trajectory::Trajectory;
use super::world::PhysicsWorld;
use crate::error::GameResult;
use crate::settings::Settings;

/// Top-level screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level 1 shown, waiting for the start input
    Title,
    /// Campaign in progress
    Playing,
    /// Every level cleared
    Finished,
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    pub campaign: Campaign,
    pub world: PhysicsWorld,
    pub level: Level,
    /// The one bird of the current attempt
    pub bird: Bird,
    pub launcher: Launcher,
    pub trajectory: Trajectory,
    pub progression: Progression,
    pub phase: GamePhase,
    /// Bird launched during the current attempt
    pub bird_shot: bool,
    /// Simulation tick counter since the campaign started
    pub time_ticks: u64,
    /// Campaign time in ticks, frozen when the last level is cleared
    pub stopwatch: Option<u64>,
    /// Outcome of the last progression check
    pub last_decision: Decision,
    /// Cleared by the quit input
    pub running: bool,
}

impl GameState {
    /// Validate the campaign and load its first level on the title screen
    pub fn new(settings: Settings, campaign: Campaign) -> GameResult<Self> {
        settings.validate()?;
        campaign.validate(&settings)?;

        let mut world = PhysicsWorld::from_settings(&settings);
        let level = Level::populate(&mut world, &campaign, 0, &settings)?;
        let bird = Bird::new(&mut world, settings.bird_position, settings.bird_radius)?;
        let progression = Progression::new(settings.restart_grace_ticks());

        Ok(Self {
            settings,
            campaign,
            world,
            level,
            bird,
            launcher: Launcher::new(),
            trajectory: Trajectory::default(),
            progression,
            phase: GamePhase::Title,
            bird_shot: false,
            time_ticks: 0,
            stopwatch: None,
            last_decision: Decision::Hold,
            running: true,
        })
    }

    /// Clear the world and load level `index` with a fresh bird
    pub fn load_level(&mut self, index: usize) -> GameResult<()> {
        let mut world = PhysicsWorld::from_settings(&self.settings);
        let level = Level::populate(&mut world, &self.campaign, index, &self.settings)?;
        self.world = world;
        self.level = level;
        self.spawn_bird()?;
        log::info!(
            "Level {} ({}/{}) loaded with {} birds",
            self.level.number(),
            index + 1,
            self.level.total(),
            self.level.attempts()
        );
        Ok(())
    }

    /// Reload the current level from scratch; attempts reset
    pub fn restart_level(&mut self) -> GameResult<()> {
        log::info!("Restarting level {}", self.level.number());
        self.load_level(self.level.index())
    }

    /// Replace the bird with a fresh one at the launch position
    pub fn load_bird(&mut self) -> GameResult<()> {
        self.world.remove_body(self.bird.body());
        self.spawn_bird()?;
        log::debug!("Attempt ready, {} birds left", self.level.attempts());
        Ok(())
    }

    fn spawn_bird(&mut self) -> GameResult<()> {
        self.bird = Bird::new(
            &mut self.world,
            self.settings.bird_position,
            self.settings.bird_radius,
        )?;
        self.bird_shot = false;
        self.launcher.reset();
        self.trajectory.clear();
        self.progression.reset();
        Ok(())
    }

    /// Hand the aimed velocity to the bird and spend an attempt
    pub fn shoot_bird(&mut self) {
        let velocity = self.bird.aim.velocity();
        self.world.set_velocity(self.bird.body(), velocity);
        self.level.reduce_attempts();
        self.bird_shot = true;
        self.launcher.set_phase(LaunchPhase::Launched);
        self.trajectory.clear();
        log::info!(
            "Bird launched at {:.0}° with speed {:.1} ({} left)",
            self.bird.aim.angle,
            self.bird.aim.speed,
            self.level.attempts()
        );
    }

    /// Progression inputs for the current frame
    pub fn outlook(&self) -> Outlook {
        Outlook {
            pigs: self.pigs_remaining(),
            bird_launched: self.bird_shot,
            attempts: self.level.attempts(),
            level_index: self.level.index(),
            level_count: self.campaign.len(),
        }
    }

    // === HUD ===

    pub fn attempts(&self) -> u32 {
        self.level.attempts()
    }

    pub fn level_number(&self) -> u32 {
        self.level.number()
    }

    pub fn total_levels(&self) -> usize {
        self.campaign.len()
    }

    pub fn pigs_remaining(&self) -> usize {
        Level::live_pigs(&self.world)
    }

    /// Simulated seconds since the campaign started
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 / self.settings.fps as f32
    }

    /// Final campaign time as (minutes, seconds)
    pub fn final_time(&self) -> Option<(u64, f32)> {
        self.stopwatch.map(|ticks| {
            let secs = ticks as f32 / self.settings.fps as f32;
            let minutes = (secs / 60.0).floor();
            (minutes as u64, secs - minutes * 60.0)
        })
    }
}
