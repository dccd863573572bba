//! Frame rendering
//!
//! Turns a `GameState` into draw calls on any `Surface`. Two surfaces ship
//! with the crate: a recorder for headless runs and tests, and a terminal
//! rasterizer.

pub mod draw_list;
pub mod terminal;

pub use draw_list::{DrawCommand, DrawList};
pub use terminal::TerminalSurface;

use glam::Vec2;

use crate::colors;
use crate::consts::*;
use crate::platform::{Stroke, Surface};
use crate::sim::{Ball, GameState, PowerUp, Side};

/// Label sits this far above its power-up box
const LABEL_OFFSET: f32 = 20.0;

/// Draw one frame of the match (without presenting it)
pub fn draw_frame<S: Surface + ?Sized>(state: &GameState, surface: &mut S, show_hud: bool) {
    surface.clear(colors::WHITE);

    if !state.game_over {
        for ball in &state.balls {
            draw_ball(ball, surface);
        }
        for power_up in &state.power_ups {
            draw_power_up(power_up, surface);
        }
        if show_hud {
            draw_hud(state, surface);
        }
    }

    for particle in state.particles.iter().filter(|p| p.is_alive()) {
        surface.draw_circle(particle.pos, particle.radius, particle.color, Stroke::Filled);
    }
}

/// The closing banner, e.g. "Red Wins!"
pub fn draw_win_message<S: Surface + ?Sized>(winner: Side, surface: &mut S) {
    surface.draw_text(
        &format!("{} Wins!", winner.label()),
        Vec2::new(WIDTH / 2.0 - 50.0, HEIGHT / 2.0),
        colors::BLACK,
    );
}

fn draw_ball<S: Surface + ?Sized>(ball: &Ball, surface: &mut S) {
    surface.draw_circle(ball.pos, ball.radius, ball.color(), Stroke::Filled);
    if ball.has_blade() {
        for i in 0..BLADE_RING_COUNT {
            surface.draw_circle(
                ball.pos,
                ball.radius + BLADE_RING_OFFSET + i as f32,
                colors::ORANGE,
                Stroke::Width(BLADE_RING_WIDTH),
            );
        }
    }
}

fn draw_power_up<S: Surface + ?Sized>(power_up: &PowerUp, surface: &mut S) {
    surface.draw_rect(power_up.bounds(), power_up.kind.color());
    surface.draw_text(
        power_up.kind.label(),
        power_up.pos - Vec2::new(0.0, LABEL_OFFSET),
        colors::BLACK,
    );
}

fn draw_hud<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    for (row, side) in [Side::Red, Side::Blue].into_iter().enumerate() {
        let text = format!("{} Health: {}", side.label(), state.ball(side).health);
        surface.draw_text(&text, Vec2::new(10.0, 10.0 + 30.0 * row as f32), side.color());
    }
}
