//! Character-grid rasterizer
//!
//! Samples shapes at cell centers onto a fixed grid of characters and writes
//! the grid to a terminal, homing the cursor each frame.

use std::io::{Stdout, Write};

use glam::Vec2;

use crate::consts::{HEIGHT, WIDTH};
use crate::platform::{Stroke, Surface};
use crate::sim::Aabb;
use crate::{Color, colors};

const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";

/// Character used for a colour
fn glyph(color: Color) -> char {
    match color {
        colors::WHITE => ' ',
        colors::BLACK => '#',
        colors::RED => 'R',
        colors::BLUE => 'B',
        colors::GREEN => '+',
        colors::YELLOW => '*',
        colors::ORANGE => 'o',
        _ => '.',
    }
}

pub struct TerminalSurface<W: Write = Stdout> {
    columns: usize,
    rows: usize,
    /// Arena units per cell
    cell: Vec2,
    cells: Vec<char>,
    out: W,
    first_frame: bool,
    /// Set after the first failed write so a closed terminal logs once
    write_failed: bool,
}

impl TerminalSurface<Stdout> {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self::with_writer(columns, rows, std::io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn with_writer(columns: u16, rows: u16, out: W) -> Self {
        let columns = usize::from(columns.max(1));
        let rows = usize::from(rows.max(1));
        Self {
            columns,
            rows,
            cell: Vec2::new(WIDTH / columns as f32, HEIGHT / rows as f32),
            cells: vec![' '; columns * rows],
            out,
            first_frame: true,
            write_failed: false,
        }
    }

    /// Current grid contents, one string per row
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Cell containing an arena point, if it is on the grid
    fn cell_at(&self, pos: Vec2) -> Option<(usize, usize)> {
        let col = (pos.x / self.cell.x).floor();
        let row = (pos.y / self.cell.y).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.columns && row < self.rows).then_some((col, row))
    }

    fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new((col as f32 + 0.5) * self.cell.x, (row as f32 + 0.5) * self.cell.y)
    }

    fn plot(&mut self, col: usize, row: usize, ch: char) {
        self.cells[row * self.columns + col] = ch;
    }

    /// Grid cells overlapping an arena-space box, clamped to the grid
    fn cell_span(&self, min: Vec2, max: Vec2) -> (usize, usize, usize, usize) {
        let clamp_col = |x: f32| ((x / self.cell.x).floor().max(0.0) as usize).min(self.columns - 1);
        let clamp_row = |y: f32| ((y / self.cell.y).floor().max(0.0) as usize).min(self.rows - 1);
        (clamp_col(min.x), clamp_row(min.y), clamp_col(max.x), clamp_row(max.y))
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self, color: Color) {
        self.cells.fill(glyph(color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, stroke: Stroke) {
        let ch = glyph(color);
        let reach = match stroke {
            Stroke::Filled => radius,
            Stroke::Width(w) => radius + w,
        };
        let (c0, r0, c1, r1) = self.cell_span(center - Vec2::splat(reach), center + Vec2::splat(reach));
        let half_cell = self.cell.min_element() / 2.0;

        for row in r0..=r1 {
            for col in c0..=c1 {
                let dist = self.cell_center(col, row).distance(center);
                let hit = match stroke {
                    Stroke::Filled => dist <= radius,
                    Stroke::Width(w) => (dist - radius).abs() <= (w / 2.0).max(half_cell),
                };
                if hit {
                    self.plot(col, row, ch);
                }
            }
        }

        // Shapes smaller than a cell still leave a mark
        if stroke == Stroke::Filled {
            if let Some((col, row)) = self.cell_at(center) {
                self.plot(col, row, ch);
            }
        }
    }

    fn draw_rect(&mut self, rect: Aabb, color: Color) {
        let ch = glyph(color);
        let max = rect.max();
        let (c0, r0, c1, r1) = self.cell_span(rect.min, max);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let p = self.cell_center(col, row);
                if p.x >= rect.min.x && p.x <= max.x && p.y >= rect.min.y && p.y <= max.y {
                    self.plot(col, row, ch);
                }
            }
        }
        if let Some((col, row)) = self.cell_at(rect.min) {
            self.plot(col, row, ch);
        }
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, _color: Color) {
        let Some((col, row)) = self.cell_at(pos) else {
            return;
        };
        for (offset, ch) in text.chars().enumerate() {
            if col + offset >= self.columns {
                break;
            }
            self.plot(col + offset, row, ch);
        }
    }

    fn present(&mut self) {
        if self.write_failed {
            return;
        }

        let mut frame = String::with_capacity(self.cells.len() + 2 * self.rows + 8);
        if self.first_frame {
            frame.push_str(CLEAR_SCREEN);
            self.first_frame = false;
        }
        frame.push_str(CURSOR_HOME);
        for line in self.lines() {
            frame.push_str(&line);
            // Raw mode turns off the implicit carriage return
            frame.push_str("\r\n");
        }

        if let Err(e) = self.out.write_all(frame.as_bytes()).and_then(|_| self.out.flush()) {
            log::warn!("Terminal write failed, no further frames will be shown: {}", e);
            self.write_failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 80x30 grid: cells are 10 wide and 20 tall
    fn surface() -> TerminalSurface<Vec<u8>> {
        TerminalSurface::with_writer(80, 30, Vec::new())
    }

    #[test]
    fn test_filled_circle_covers_center_cells() {
        let mut s = surface();
        s.clear(colors::WHITE);
        s.draw_circle(Vec2::new(100.0, 100.0), 30.0, colors::RED, Stroke::Filled);

        let lines = s.lines();
        assert_eq!(lines[5].chars().nth(10), Some('R'));
        assert_eq!(lines[5].chars().nth(9), Some('R'));
        // Far corner untouched
        assert_eq!(lines[0].chars().next(), Some(' '));
        assert_eq!(lines[29].chars().nth(79), Some(' '));
    }

    #[test]
    fn test_tiny_circle_still_plotted() {
        let mut s = surface();
        s.clear(colors::WHITE);
        s.draw_circle(Vec2::new(401.0, 301.0), 2.0, colors::BLUE, Stroke::Filled);
        assert_eq!(s.lines()[15].chars().nth(40), Some('B'));
    }

    #[test]
    fn test_text_is_clipped_at_the_right_edge() {
        let mut s = surface();
        s.clear(colors::WHITE);
        s.draw_text("Red Wins!", Vec2::new(350.0, 300.0), colors::BLACK);
        s.draw_text("overflow", Vec2::new(780.0, 0.0), colors::BLACK);

        let lines = s.lines();
        assert_eq!(&lines[15][35..44], "Red Wins!");
        assert!(lines[0].ends_with("ov"));
    }

    #[test]
    fn test_off_grid_shapes_are_ignored() {
        let mut s = surface();
        s.clear(colors::WHITE);
        s.draw_circle(Vec2::new(-500.0, -500.0), 5.0, colors::RED, Stroke::Filled);
        s.draw_text("nope", Vec2::new(900.0, 10.0), colors::BLACK);
        assert!(s.lines().iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_present_writes_grid() {
        let mut s = surface();
        s.clear(colors::WHITE);
        s.draw_rect(Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(30.0)), colors::GREEN);
        s.present();
        s.present();

        let written = String::from_utf8(s.writer().clone()).unwrap_or_default();
        assert_eq!(written.matches(CLEAR_SCREEN).count(), 1);
        assert_eq!(written.matches(CURSOR_HOME).count(), 2);
        assert!(written.contains("+++"));
        assert_eq!(written.lines().count(), 60);
    }
}
