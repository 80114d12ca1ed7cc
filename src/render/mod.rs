//! Rendering boundary
//!
//! Phases never draw directly. Each frame they describe what to show as a
//! [`DrawList`] in logical (landscape) arena coordinates; a backend such as
//! [`terminal::TerminalRenderer`] turns the list into output.

pub mod terminal;

use glam::Vec2;

use crate::sim::PowerupKind;

pub use terminal::TerminalRenderer;

/// 8-bit colour with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const GREY: Rgba = Rgba::rgb(128, 128, 128);
    pub const YELLOW: Rgba = Rgba::rgb(255, 220, 0);

    /// Opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// A single draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Connected line strip (trails, boundary)
    Polyline {
        points: Vec<Vec2>,
        color: Rgba,
        width: f32,
    },
    /// Single pixel (sparks)
    Pixel { point: Vec2, color: Rgba },
    /// Filled axis-aligned rectangle (cycle heads)
    Rect { min: Vec2, max: Vec2, color: Rgba },
    /// Bitmap-font text with its top-left corner at `position`
    Text {
        text: String,
        position: Vec2,
        color: Rgba,
    },
    /// Powerup icon centred at `position`
    Icon { kind: PowerupKind, position: Vec2 },
}

/// Everything to draw for one frame, in submission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polyline(&mut self, points: &[Vec2], color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    pub fn pixel(&mut self, point: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Pixel { point, color });
    }

    pub fn rect(&mut self, min: Vec2, max: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Rect { min, max, color });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            position,
            color,
        });
    }

    pub fn icon(&mut self, kind: PowerupKind, position: Vec2) {
        self.commands.push(DrawCommand::Icon { kind, position });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply the 90° cabinet transform `(x, y) -> (y, logical_width - x)`
    ///
    /// The output surface is `logical_height` wide and `logical_width` tall.
    pub fn rotated(self, logical_width: f32) -> Self {
        let rotate = |p: Vec2| Vec2::new(p.y, logical_width - p.x);
        let commands = self
            .commands
            .into_iter()
            .map(|command| match command {
                DrawCommand::Polyline {
                    points,
                    color,
                    width,
                } => DrawCommand::Polyline {
                    points: points.into_iter().map(rotate).collect(),
                    color,
                    width,
                },
                DrawCommand::Pixel { point, color } => DrawCommand::Pixel {
                    point: rotate(point),
                    color,
                },
                DrawCommand::Rect { min, max, color } => {
                    let (a, b) = (rotate(min), rotate(max));
                    DrawCommand::Rect {
                        min: a.min(b),
                        max: a.max(b),
                        color,
                    }
                }
                DrawCommand::Text {
                    text,
                    position,
                    color,
                } => DrawCommand::Text {
                    text,
                    position: rotate(position),
                    color,
                },
                DrawCommand::Icon { kind, position } => DrawCommand::Icon {
                    kind,
                    position: rotate(position),
                },
            })
            .collect();
        Self { commands }
    }
}
