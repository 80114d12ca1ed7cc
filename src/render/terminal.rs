//! Terminal backend
//!
//! Rasterizes a [`DrawList`] into a character grid and writes it with
//! crossterm. Logical coordinates are scaled to the viewport, so a cell
//! covers many arena units and fine detail is lost.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use super::{DrawCommand, DrawList, Rgba};
use crate::error::GameResult;

/// Viewport used when not running fullscreen
pub const WINDOWED_COLUMNS: u16 = 100;
pub const WINDOWED_ROWS: u16 = 38;
/// Commands fainter than this are not drawn
pub const MIN_ALPHA: u8 = 32;

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Rgba,
}

/// Character grid covering the logical arena
#[derive(Debug, Clone)]
pub struct Canvas {
    columns: u16,
    rows: u16,
    /// Logical units per cell
    scale: Vec2,
    cells: Vec<Option<Cell>>,
}

impl Canvas {
    pub fn new(columns: u16, rows: u16, logical: Vec2) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            scale: logical / Vec2::new(f32::from(columns), f32::from(rows)),
            cells: vec![None; usize::from(columns) * usize::from(rows)],
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn get(&self, column: u16, row: u16) -> Option<Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[usize::from(row) * usize::from(self.columns) + usize::from(column)]
    }

    /// Cell-space position of a logical point
    fn to_grid(&self, p: Vec2) -> Vec2 {
        p / self.scale
    }

    fn put(&mut self, column: i32, row: i32, ch: char, color: Rgba) {
        let inside = (0..i32::from(self.columns)).contains(&column)
            && (0..i32::from(self.rows)).contains(&row);
        if !inside {
            return;
        }
        let index = row as usize * usize::from(self.columns) + column as usize;
        self.cells[index] = Some(Cell { ch, color });
    }

    fn plot(&mut self, p: Vec2, ch: char, color: Rgba) {
        let g = self.to_grid(p).floor();
        self.put(g.x as i32, g.y as i32, ch, color);
    }

    /// DDA between the cells holding `a` and `b`
    fn line(&mut self, a: Vec2, b: Vec2, ch: char, color: Rgba) {
        let (ga, gb) = (self.to_grid(a).floor(), self.to_grid(b).floor());
        let delta = gb - ga;
        let steps = delta.abs().max_element().max(1.0);
        for i in 0..=steps as i32 {
            let g = ga + (delta * i as f32 / steps).round();
            self.put(g.x as i32, g.y as i32, ch, color);
        }
    }

    /// Draw every visible command in submission order
    pub fn rasterize(&mut self, list: &DrawList) {
        for command in &list.commands {
            match command {
                DrawCommand::Polyline {
                    points,
                    color,
                    width,
                } => {
                    if color.a < MIN_ALPHA {
                        continue;
                    }
                    for pair in points.windows(2) {
                        let ch = segment_glyph(pair[0], pair[1], *width);
                        self.line(pair[0], pair[1], ch, *color);
                    }
                }
                DrawCommand::Pixel { point, color } => {
                    if color.a >= MIN_ALPHA {
                        self.plot(*point, '.', *color);
                    }
                }
                DrawCommand::Rect { min, max, color } => {
                    if color.a < MIN_ALPHA {
                        continue;
                    }
                    let (a, b) = (self.to_grid(*min).floor(), self.to_grid(*max).floor());
                    for row in a.y as i32..=b.y as i32 {
                        for column in a.x as i32..=b.x as i32 {
                            self.put(column, row, '█', *color);
                        }
                    }
                }
                DrawCommand::Text {
                    text,
                    position,
                    color,
                } => {
                    if color.a < MIN_ALPHA {
                        continue;
                    }
                    let g = self.to_grid(*position).floor();
                    for (i, ch) in text.chars().enumerate() {
                        self.put(g.x as i32 + i as i32, g.y as i32, ch, *color);
                    }
                }
                DrawCommand::Icon { kind, position } => {
                    self.plot(*position, kind.glyph(), Rgba::YELLOW);
                }
            }
        }
    }
}

/// Glyph for a polyline segment
fn segment_glyph(a: Vec2, b: Vec2, width: f32) -> char {
    let heavy = width >= 2.0;
    match (a.y == b.y, a.x == b.x, heavy) {
        (true, _, false) => '─',
        (true, _, true) => '━',
        (_, true, false) => '│',
        (_, true, true) => '┃',
        _ => '*',
    }
}

/// Terminal colour for an `Rgba`, with alpha folded into brightness
pub fn terminal_color(color: Rgba) -> Color {
    let scale = |c: u8| (u16::from(c) * u16::from(color.a) / 255) as u8;
    Color::Rgb {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Viewport size for a terminal of `size` cells
pub fn viewport(size: (u16, u16), fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        size
    } else {
        (size.0.min(WINDOWED_COLUMNS), size.1.min(WINDOWED_ROWS))
    }
}

/// Writes rasterized frames to a terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
    fullscreen: bool,
    /// Logical size of the incoming draw lists
    logical: Vec2,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, fullscreen: bool, logical: Vec2) -> Self {
        Self {
            out,
            fullscreen,
            logical,
        }
    }

    /// Draw one frame, centred in the terminal
    pub fn present(&mut self, list: &DrawList) -> GameResult<()> {
        let size = terminal::size()?;
        let (columns, rows) = viewport(size, self.fullscreen);
        let mut canvas = Canvas::new(columns, rows, self.logical);
        canvas.rasterize(list);

        let left = size.0.saturating_sub(columns) / 2;
        let top = size.1.saturating_sub(rows) / 2;

        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        for row in 0..canvas.rows() {
            self.out.queue(cursor::MoveTo(left, top + row))?;
            for column in 0..canvas.columns() {
                match canvas.get(column, row) {
                    Some(cell) => {
                        self.out.queue(style::SetForegroundColor(terminal_color(cell.color)))?;
                        self.out.queue(Print(cell.ch))?;
                    }
                    None => {
                        self.out.queue(Print(' '))?;
                    }
                }
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerupKind;

    fn canvas() -> Canvas {
        // 10 units per cell
        Canvas::new(80, 60, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_text_lands_in_cells() {
        let mut c = canvas();
        let mut list = DrawList::new();
        list.text("00120", Vec2::new(10.0, 10.0), Rgba::WHITE);
        c.rasterize(&list);
        assert_eq!(c.get(1, 1).map(|cell| cell.ch), Some('0'));
        assert_eq!(c.get(3, 1).map(|cell| cell.ch), Some('1'));
        assert_eq!(c.get(6, 1), None);
    }

    #[test]
    fn test_faint_commands_are_skipped() {
        let mut c = canvas();
        let mut list = DrawList::new();
        list.pixel(Vec2::new(55.0, 55.0), Rgba::WHITE.with_alpha(10));
        list.polyline(
            &[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)],
            Rgba::WHITE.with_alpha(MIN_ALPHA - 1),
            3.0,
        );
        c.rasterize(&list);
        assert_eq!(c.get(5, 5), None);
        assert_eq!(c.get(5, 0), None);
    }

    #[test]
    fn test_polyline_is_continuous() {
        let mut c = canvas();
        let mut list = DrawList::new();
        list.polyline(
            &[Vec2::new(100.0, 100.0), Vec2::new(300.0, 100.0), Vec2::new(300.0, 200.0)],
            Rgba::WHITE,
            3.0,
        );
        c.rasterize(&list);
        for column in 10..=30 {
            assert!(c.get(column, 10).is_some(), "gap at column {}", column);
        }
        for row in 10..=20 {
            assert!(c.get(30, row).is_some(), "gap at row {}", row);
        }
        assert_eq!(c.get(15, 10).map(|cell| cell.ch), Some('━'));
        assert_eq!(c.get(30, 15).map(|cell| cell.ch), Some('┃'));
    }

    #[test]
    fn test_out_of_range_is_clipped() {
        let mut c = canvas();
        let mut list = DrawList::new();
        list.pixel(Vec2::new(-20.0, 50.0), Rgba::WHITE);
        list.pixel(Vec2::new(5000.0, 50.0), Rgba::WHITE);
        list.text("LONG TEXT", Vec2::new(790.0, 590.0), Rgba::WHITE);
        c.rasterize(&list);
        assert_eq!(c.get(79, 59).map(|cell| cell.ch), Some('L'));
    }

    #[test]
    fn test_icon_glyph() {
        let mut c = canvas();
        let mut list = DrawList::new();
        list.icon(PowerupKind::Coin, Vec2::new(400.0, 300.0));
        c.rasterize(&list);
        assert_eq!(c.get(40, 30).map(|cell| cell.ch), Some(PowerupKind::Coin.glyph()));
    }

    #[test]
    fn test_viewport() {
        assert_eq!(viewport((200, 60), true), (200, 60));
        assert_eq!(viewport((200, 60), false), (WINDOWED_COLUMNS, WINDOWED_ROWS));
        assert_eq!(viewport((80, 24), false), (80, 24));
    }

    #[test]
    fn test_alpha_dims_colour() {
        assert_eq!(
            terminal_color(Rgba::rgb(255, 100, 0).with_alpha(0)),
            Color::Rgb { r: 0, g: 0, b: 0 }
        );
        assert_eq!(
            terminal_color(Rgba::rgb(255, 100, 0)),
            Color::Rgb {
                r: 255,
                g: 100,
                b: 0,
            }
        );
    }
}
