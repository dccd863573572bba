//! Recording surface
//!
//! Keeps draw calls as data instead of pixels. Headless runs use it to go
//! through the full render path, and tests inspect what a frame drew.

use glam::Vec2;

use crate::Color;
use crate::platform::{Stroke, Surface};
use crate::sim::Aabb;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        stroke: Stroke,
    },
    Rect {
        rect: Aabb,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pending: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands drawn since the last present
    pub fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    /// Commands of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for DrawList {
    fn clear(&mut self, color: Color) {
        self.pending.clear();
        self.pending.push(DrawCommand::Clear(color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, stroke: Stroke) {
        self.pending.push(DrawCommand::Circle {
            center,
            radius,
            color,
            stroke,
        });
    }

    fn draw_rect(&mut self, rect: Aabb, color: Color) {
        self.pending.push(DrawCommand::Rect { rect, color });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color) {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            color,
        });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
    }
}
