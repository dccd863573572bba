//! Drawing surface abstraction
//!
//! Coordinates are arena units with the origin at the top-left corner.

use glam::Vec2;

use crate::Color;
use crate::sim::Aabb;

/// Circle fill mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    Filled,
    /// Outline of the given width
    Width(f32),
}

/// Something frames can be drawn onto. Drawing is infallible by contract;
/// implementations deal with their own output errors.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, stroke: Stroke);
    fn draw_rect(&mut self, rect: Aabb, color: Color);
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color);
    /// Show everything drawn since the last present
    fn present(&mut self);
}
