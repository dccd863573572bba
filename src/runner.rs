//! Fixed-rate frame loop
//!
//! One thread, one loop: wait for the frame, poll quit, tick, draw, present.
//! When the match is decided and the burst has faded, the winner banner is
//! held on screen before the loop returns.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{TARGET_FPS, WIN_MESSAGE_HOLD};
use crate::platform::{Clock, InputSource, Surface};
use crate::renderer::{draw_frame, draw_win_message};
use crate::sim::{GameEvent, GameState, Side, tick};

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Winner(Side),
    /// The input source asked to stop first
    Quit,
}

/// What a finished run reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub frames: u64,
    pub red_health: i32,
    pub blue_health: i32,
    /// Clock milliseconds at which the deciding hit landed
    pub game_over_at_ms: Option<u64>,
    /// Clock milliseconds when the loop returned
    pub ended_at_ms: u64,
}

pub struct Runner<C, S, I, R> {
    clock: C,
    surface: S,
    input: I,
    rng: R,
    state: GameState,
    show_hud: bool,
    game_over_at_ms: Option<u64>,
}

impl<C, S, I, R> Runner<C, S, I, R>
where
    C: Clock,
    S: Surface,
    I: InputSource,
    R: Rng,
{
    /// New match with randomly launched balls
    pub fn new(clock: C, surface: S, input: I, mut rng: R) -> Self {
        let state = GameState::new(&mut rng, clock.now());
        Self::with_state(clock, surface, input, rng, state)
    }

    /// Run from a prepared state
    pub fn with_state(clock: C, surface: S, input: I, rng: R, state: GameState) -> Self {
        Self {
            clock,
            surface,
            input,
            rng,
            state,
            show_hud: true,
            game_over_at_ms: None,
        }
    }

    pub fn show_hud(mut self, show: bool) -> Self {
        self.show_hud = show;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Run until someone wins or quit is requested
    pub fn run(&mut self) -> RunSummary {
        log::info!("Match started");
        loop {
            self.clock.tick_wait(TARGET_FPS);

            if self.input.poll_quit_requested() {
                log::info!("Quit requested after {} frames", self.state.frame);
                return self.summary(RunOutcome::Quit);
            }

            let was_over = self.state.game_over;
            tick(&mut self.state, self.clock.now(), &mut self.rng);
            for event in &self.state.events {
                log_event(event);
            }
            if self.state.game_over && !was_over {
                self.game_over_at_ms = Some(self.clock.ticks_since_start());
            }

            draw_frame(&self.state, &mut self.surface, self.show_hud);

            if self.state.is_finished() {
                if let Some(winner) = self.state.winner {
                    return self.finish(winner);
                }
            }

            self.surface.present();
        }
    }

    /// Put up the banner, hold it, and report
    fn finish(&mut self, winner: Side) -> RunSummary {
        draw_win_message(winner, &mut self.surface);
        self.surface.present();

        if let Some(at) = self.game_over_at_ms {
            log::info!(
                "{} wins; burst faded {} ms after the final hit",
                winner.label(),
                self.clock.ticks_since_start().saturating_sub(at)
            );
        }
        self.clock.sleep(WIN_MESSAGE_HOLD);
        self.summary(RunOutcome::Winner(winner))
    }

    fn summary(&self, outcome: RunOutcome) -> RunSummary {
        RunSummary {
            outcome,
            frames: self.state.frame,
            red_health: self.state.ball(Side::Red).health,
            blue_health: self.state.ball(Side::Blue).health,
            game_over_at_ms: self.game_over_at_ms,
            ended_at_ms: self.clock.ticks_since_start(),
        }
    }
}

fn log_event(event: &GameEvent) {
    match *event {
        GameEvent::Bounce => log::trace!("Balls bounced"),
        GameEvent::BladeStrike {
            attacker,
            victim,
            health_left,
        } => log::info!(
            "{} struck {} with a blade ({} health left)",
            attacker.label(),
            victim.label(),
            health_left
        ),
        GameEvent::BladeExpired { side } => log::debug!("{} blade expired", side.label()),
        GameEvent::PowerUpSpawned { id, kind } => {
            log::debug!("Spawned {} power-up #{}", kind.label(), id)
        }
        GameEvent::PowerUpCollected { id, kind, by } => {
            log::info!("{} collected {} power-up #{}", by.label(), kind.label(), id)
        }
        GameEvent::BallDestroyed { side } => log::info!("{} ball destroyed", side.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::{FrameBudget, ManualClock, NeverQuit};
    use crate::renderer::{DrawCommand, DrawList};
    use crate::sim::Ball;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::time::Duration;

    /// Blue one hit from defeat, Red armed and overlapping it
    fn final_blow() -> GameState {
        let mut red = Ball::new(Side::Red, Vec2::new(300.0, 300.0), Vec2::ZERO);
        red.apply_blade(Duration::ZERO);
        let mut blue = Ball::new(Side::Blue, Vec2::new(340.0, 300.0), Vec2::ZERO);
        blue.health = 1;
        GameState::with_balls(red, blue, Duration::ZERO)
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut runner = Runner::new(
            ManualClock::new(),
            DrawList::new(),
            FrameBudget::new(5),
            Pcg32::seed_from_u64(1),
        );

        let summary = runner.run();

        assert_eq!(summary.outcome, RunOutcome::Quit);
        assert_eq!(summary.frames, 5);
        assert_eq!(runner.surface().frames_presented(), 5);
        assert_eq!(summary.game_over_at_ms, None);
    }

    #[test]
    fn test_finished_match_shows_banner_and_holds() {
        let mut runner = Runner::with_state(
            ManualClock::new(),
            DrawList::new(),
            NeverQuit,
            Pcg32::seed_from_u64(1),
            final_blow(),
        );

        let summary = runner.run();

        assert_eq!(summary.outcome, RunOutcome::Winner(Side::Red));
        assert_eq!(summary.blue_health, 0);
        assert_eq!(summary.red_health, STARTING_HEALTH);
        // Deciding frame plus the burst's remaining life
        assert_eq!(summary.frames, u64::from(PARTICLE_LIFE));
        assert_eq!(summary.game_over_at_ms, Some(16));

        let banner = DrawCommand::Text {
            text: "Red Wins!".to_string(),
            pos: Vec2::new(WIDTH / 2.0 - 50.0, HEIGHT / 2.0),
            color: crate::colors::BLACK,
        };
        assert_eq!(runner.surface().last_frame().last(), Some(&banner));
        assert_eq!(runner.surface().frames_presented(), summary.frames);

        // The banner hold is spent on the clock, not skipped
        let frames_time = Duration::from_secs(1) / TARGET_FPS * summary.frames as u32;
        let expected_end = (frames_time + WIN_MESSAGE_HOLD).as_millis() as u64;
        assert_eq!(summary.ended_at_ms, expected_end);
    }

    #[test]
    fn test_same_seed_same_match() {
        let play = || {
            let mut runner = Runner::new(
                ManualClock::new(),
                DrawList::new(),
                FrameBudget::new(3000),
                Pcg32::seed_from_u64(2024),
            )
            .show_hud(false);
            let summary = runner.run();
            (summary, runner.state().power_ups.len())
        };

        assert_eq!(play(), play());
    }

    #[test]
    fn test_hud_toggle() {
        let mut runner = Runner::new(
            ManualClock::new(),
            DrawList::new(),
            FrameBudget::new(1),
            Pcg32::seed_from_u64(3),
        )
        .show_hud(false);
        runner.run();

        let has_text = runner
            .surface()
            .last_frame()
            .iter()
            .any(|cmd| matches!(cmd, DrawCommand::Text { .. }));
        assert!(!has_text);
    }
}
