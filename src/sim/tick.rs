//! Per-frame simulation step
//!
//! Advances the match by one frame: motion, the ball-ball clash, power-up
//! spawning and pickup, defeat detection and the death burst.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use super::collision::{Clash, resolve_clash};
use super::state::{GameEvent, GameState, Particle, PowerUp, PowerUpKind};
use crate::Color;
use crate::consts::*;

/// Advance the game state by one frame.
///
/// `now` is monotonic time since the match started; blade expiry and the
/// spawn gate are measured against it, never against the frame count.
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, now: Duration, rng: &mut R) {
    state.events.clear();
    state.frame += 1;

    if !state.game_over {
        advance_balls(state, now);
        collide_balls(state);
        roll_power_up_spawn(state, now, rng);
        collect_power_ups(state, now);
        check_defeat(state, rng);
    }

    // Particles keep animating after the match is decided
    for particle in state.particles.iter_mut() {
        particle.update();
    }
    state.particles.retain(Particle::is_alive);
}

fn advance_balls(state: &mut GameState, now: Duration) {
    for ball in state.balls.iter_mut() {
        if ball.advance(now) {
            state.events.push(GameEvent::BladeExpired { side: ball.side });
        }
    }
}

fn collide_balls(state: &mut GameState) {
    let [red, blue] = &mut state.balls;
    if !red.collides_with(blue) {
        return;
    }

    match resolve_clash(red, blue) {
        Clash::Bounce => state.events.push(GameEvent::Bounce),
        Clash::Strike { attacker, victim } => {
            let health_left = state.ball(victim).health;
            log::debug!(
                "{} blade hit {}, {} health left",
                attacker.label(),
                victim.label(),
                health_left
            );
            state.events.push(GameEvent::BladeStrike {
                attacker,
                victim,
                health_left,
            });
        }
    }
}

/// At most one roll per spawn interval
fn roll_power_up_spawn<R: Rng + ?Sized>(state: &mut GameState, now: Duration, rng: &mut R) {
    if now < state.next_power_up_roll_at {
        return;
    }
    state.next_power_up_roll_at = now + POWERUP_SPAWN_INTERVAL;

    if rng.random_bool(POWERUP_SPAWN_CHANCE) {
        let id = state.next_entity_id();
        let power_up = PowerUp::random(id, rng);
        state.events.push(GameEvent::PowerUpSpawned {
            id,
            kind: power_up.kind,
        });
        state.power_ups.push(power_up);
    }
}

/// Red scans first and takes what it touches before Blue gets a look
fn collect_power_ups(state: &mut GameState, now: Duration) {
    for ball in state.balls.iter_mut() {
        let bounds = ball.bounds();
        state.power_ups.retain(|power_up| {
            if !bounds.intersects(&power_up.bounds()) {
                return true;
            }
            match power_up.kind {
                PowerUpKind::Health => ball.health += 1,
                PowerUpKind::Blade => ball.apply_blade(now),
            }
            state.events.push(GameEvent::PowerUpCollected {
                id: power_up.id,
                kind: power_up.kind,
                by: ball.side,
            });
            false
        });
    }
}

/// Red is checked first, so a double knockout counts as a Red loss
fn check_defeat<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let Some(loser) = state.balls.iter().find(|ball| ball.health <= 0) else {
        return;
    };
    let (side, origin, color) = (loser.side, loser.pos, loser.color());

    state.particles.extend(spawn_burst(origin, color, rng));
    state.winner = Some(side.other());
    state.game_over = true;
    state.events.push(GameEvent::BallDestroyed { side });
    log::info!("{} destroyed, {} wins", side.label(), side.other().label());
}

/// Debris for a destroyed ball
pub fn spawn_burst<R: Rng + ?Sized>(origin: Vec2, color: Color, rng: &mut R) -> Vec<Particle> {
    (0..PARTICLE_BURST_COUNT)
        .map(|_| Particle::random(origin, color, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::sim::{Ball, Side};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Half a second in: the spawn gate (first roll at 1s) stays shut
    const EARLY: Duration = Duration::from_millis(500);

    fn still_ball(side: Side, x: f32, y: f32) -> Ball {
        Ball::new(side, Vec2::new(x, y), Vec2::ZERO)
    }

    fn quiet_state() -> GameState {
        GameState::with_balls(
            still_ball(Side::Red, 100.0, 100.0),
            still_ball(Side::Blue, 700.0, 500.0),
            Duration::ZERO,
        )
    }

    fn power_up(state: &mut GameState, kind: PowerUpKind, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            kind,
            pos: Vec2::new(x, y),
        });
        id
    }

    #[test]
    fn test_health_pickup() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = quiet_state();
        let id = power_up(&mut state, PowerUpKind::Health, 110.0, 110.0);

        tick(&mut state, EARLY, &mut rng);

        assert_eq!(state.ball(Side::Red).health, STARTING_HEALTH + 1);
        assert!(state.power_ups.is_empty());
        assert!(state.events.contains(&GameEvent::PowerUpCollected {
            id,
            kind: PowerUpKind::Health,
            by: Side::Red,
        }));

        // Gone for good
        tick(&mut state, EARLY, &mut rng);
        assert_eq!(state.ball(Side::Red).health, STARTING_HEALTH + 1);
    }

    #[test]
    fn test_blade_pickup_arms_from_now() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = quiet_state();
        power_up(&mut state, PowerUpKind::Blade, 680.0, 480.0);

        tick(&mut state, EARLY, &mut rng);

        let blue = state.ball(Side::Blue);
        assert!(blue.has_blade());
        assert_eq!(blue.blade_expires_at, Some(EARLY + BLADE_DURATION));
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_shared_power_up_goes_to_red() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::with_balls(
            still_ball(Side::Red, 300.0, 300.0),
            still_ball(Side::Blue, 360.0, 300.0),
            Duration::ZERO,
        );
        // Straddles both balls' squares
        power_up(&mut state, PowerUpKind::Health, 315.0, 290.0);

        tick(&mut state, EARLY, &mut rng);

        assert_eq!(state.ball(Side::Red).health, STARTING_HEALTH + 1);
        assert_eq!(state.ball(Side::Blue).health, STARTING_HEALTH);
        let collected = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerUpCollected { .. }))
            .count();
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_untouched_power_ups_persist() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = quiet_state();
        power_up(&mut state, PowerUpKind::Blade, 400.0, 300.0);

        for _ in 0..10 {
            tick(&mut state, EARLY, &mut rng);
        }
        assert_eq!(state.power_ups.len(), 1);
    }

    #[test]
    fn test_spawn_gate_rolls_once_per_interval() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();

        // Many frames inside the first second: no roll
        for ms in (0..1000).step_by(16) {
            tick(&mut state, Duration::from_millis(ms), &mut rng);
        }
        assert!(state.power_ups.is_empty());
        assert_eq!(state.next_power_up_roll_at, POWERUP_SPAWN_INTERVAL);

        tick(&mut state, Duration::from_millis(1000), &mut rng);
        assert_eq!(state.next_power_up_roll_at, Duration::from_millis(2000));

        // Frames before the next gate never change it
        tick(&mut state, Duration::from_millis(1500), &mut rng);
        assert_eq!(state.next_power_up_roll_at, Duration::from_millis(2000));
    }

    #[test]
    fn test_spawn_rate_over_many_rolls() {
        let mut rng = Pcg32::seed_from_u64(11);
        // Balls parked in corners where power-ups rarely land
        let mut state = GameState::with_balls(
            still_ball(Side::Red, 30.0, 30.0),
            still_ball(Side::Blue, 770.0, 570.0),
            Duration::ZERO,
        );

        let mut spawned = 0;
        for second in 1..=1000u64 {
            tick(&mut state, Duration::from_secs(second), &mut rng);
            spawned += state
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::PowerUpSpawned { .. }))
                .count();
        }
        // Expected 320
        assert!((260..380).contains(&spawned), "spawned = {spawned}");
    }

    #[test]
    fn test_blade_expiry_reported() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = quiet_state();
        state.ball_mut(Side::Red).apply_blade(Duration::ZERO);
        state.next_power_up_roll_at = Duration::from_secs(3600);

        tick(&mut state, Duration::from_millis(4900), &mut rng);
        assert!(state.ball(Side::Red).has_blade());

        tick(&mut state, Duration::from_millis(5100), &mut rng);
        assert!(!state.ball(Side::Red).has_blade());
        assert_eq!(state.events, vec![GameEvent::BladeExpired { side: Side::Red }]);
    }

    #[test]
    fn test_bounce_reverses_both_balls() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::with_balls(
            Ball::new(Side::Red, Vec2::new(300.0, 300.0), Vec2::new(4.0, 4.0)),
            Ball::new(Side::Blue, Vec2::new(350.0, 300.0), Vec2::new(-4.0, 4.0)),
            Duration::ZERO,
        );

        tick(&mut state, EARLY, &mut rng);

        assert_eq!(state.events, vec![GameEvent::Bounce]);
        assert_eq!(state.ball(Side::Red).vel, Vec2::new(-4.0, -4.0));
        assert_eq!(state.ball(Side::Blue).vel, Vec2::new(4.0, -4.0));
        let gap = state.ball(Side::Red).pos.distance(state.ball(Side::Blue).pos);
        assert!(gap >= 2.0 * BALL_RADIUS - 1e-3);
    }

    #[test]
    fn test_three_blade_strikes_end_the_match() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = quiet_state();

        for strike in 1..=3 {
            let red = state.ball_mut(Side::Red);
            red.pos = Vec2::new(300.0, 300.0);
            red.apply_blade(EARLY);
            state.ball_mut(Side::Blue).pos = Vec2::new(340.0, 300.0);

            tick(&mut state, EARLY, &mut rng);

            assert_eq!(state.ball(Side::Blue).health, STARTING_HEALTH - strike);
            assert!(!state.ball(Side::Red).has_blade());
            assert!(state.events.contains(&GameEvent::BladeStrike {
                attacker: Side::Red,
                victim: Side::Blue,
                health_left: STARTING_HEALTH - strike,
            }));
        }

        assert!(state.game_over);
        assert_eq!(state.winner, Some(Side::Red));
        assert_eq!(state.particles.len(), PARTICLE_BURST_COUNT);
        assert!(state.events.contains(&GameEvent::BallDestroyed { side: Side::Blue }));

        // The burst started at Blue's final position in Blue's colour and has
        // already taken its first step
        let blue_pos = state.ball(Side::Blue).pos;
        for p in &state.particles {
            assert_eq!(p.color, colors::BLUE);
            assert_eq!(p.life, PARTICLE_LIFE - 1);
            assert!((p.pos - p.vel - blue_pos).length() < 1e-3);
        }
        assert!(!state.is_finished());

        for _ in 0..PARTICLE_LIFE - 2 {
            tick(&mut state, EARLY, &mut rng);
        }
        assert_eq!(state.particles.len(), PARTICLE_BURST_COUNT);
        tick(&mut state, EARLY, &mut rng);
        assert!(state.particles.is_empty());
        assert!(state.is_finished());
    }

    #[test]
    fn test_game_over_freezes_gameplay() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = GameState::with_balls(
            Ball::new(Side::Red, Vec2::new(300.0, 300.0), Vec2::new(4.0, 4.0)),
            still_ball(Side::Blue, 600.0, 300.0),
            Duration::ZERO,
        );
        state.ball_mut(Side::Blue).health = 0;
        tick(&mut state, EARLY, &mut rng);
        assert!(state.game_over);

        let red_pos = state.ball(Side::Red).pos;
        power_up(&mut state, PowerUpKind::Health, red_pos.x, red_pos.y);
        for second in 1..30 {
            tick(&mut state, Duration::from_secs(second), &mut rng);
        }

        assert_eq!(state.ball(Side::Red).pos, red_pos);
        assert_eq!(state.ball(Side::Red).health, STARTING_HEALTH);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.winner, Some(Side::Red));
    }

    #[test]
    fn test_double_knockout_counts_as_red_loss() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = quiet_state();
        state.ball_mut(Side::Red).health = 0;
        state.ball_mut(Side::Blue).health = -1;

        tick(&mut state, EARLY, &mut rng);

        assert_eq!(state.winner, Some(Side::Blue));
        assert!(state.particles.iter().all(|p| p.color == colors::RED));
        let destroyed = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BallDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = GameState::new(&mut rng1, Duration::ZERO);
        let mut state2 = GameState::new(&mut rng2, Duration::ZERO);

        for frame in 1..=1200u64 {
            let now = Duration::from_millis(frame * 1000 / 60);
            tick(&mut state1, now, &mut rng1);
            tick(&mut state2, now, &mut rng2);
            assert_eq!(state1.events, state2.events);
        }

        for (a, b) in state1.balls.iter().zip(&state2.balls) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.health, b.health);
        }
        assert_eq!(state1.power_ups.len(), state2.power_ups.len());
    }
}
