// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use crate::graph::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GREY: Color = Color::rgb(211, 211, 211);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Highlight for selected primitives.
    pub const SELECTION_BLUE: Color = Color::rgb(0x44, 0x44, 0xdd);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Same color with opacity `alpha` in [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Self {
        Color {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// CSS notation: `#rrggbb` when opaque, `rgba(...)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = (self.a as f64 / 255.0 * 100.0).round() / 100.0;
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, alpha)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Font {
            family: family.into(),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("Arial", 12.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
    Circle { radius: f64 },
    /// Axis-aligned square with side `size`, centered on the node.
    Square { size: f64 },
}

impl ShapeKind {
    /// Half-extent used for bounds.
    pub fn half_extent(&self) -> f64 {
        match *self {
            ShapeKind::Circle { radius } => radius,
            ShapeKind::Square { size } => size / 2.0,
        }
    }
}

/// Which node payloads a `NodeStyle` applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    Reaction,
    Molecule,
    Conjunction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
    pub shape: ShapeKind,
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: f64,
    /// Label anchor relative to the shape center.
    pub label_offset: Position,
    /// Overrides the scene font for this role's labels.
    pub label_font: Option<Font>,
    pub label_background: Option<Color>,
    /// When set, dragging the label moves the shape.
    pub label_drags_shape: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
    pub stroke: Color,
    pub stroke_width: f64,
    /// Dash and gap lengths for catalyst and inhibitor paths.
    pub dash: (f64, f64),
    pub handle_radius: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        EdgeStyle {
            stroke: Color::BLACK,
            stroke_width: 2.0,
            dash: (2.0, 4.0),
            handle_radius: 3.0,
        }
    }
}

/// Visual configuration for a scene. Updated through narrow setters on the
/// scene so that only affected primitives are touched.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStyle {
    pub reaction: NodeStyle,
    pub molecule: NodeStyle,
    /// Molecule stroke width when the molecule is food.
    pub food_stroke_width: f64,
    pub conjunction: NodeStyle,
    pub edge: EdgeStyle,
    /// Stroke of inhibition paths and bars.
    pub inhibitor_color: Color,
    pub font: Font,
    pub selection_color: Color,
    /// Margin added around the bounding box when rendering.
    pub margin: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        let label_background = Some(Color::WHITE.with_alpha(0.7));
        SceneStyle {
            reaction: NodeStyle {
                shape: ShapeKind::Circle { radius: 10.0 },
                stroke: Color::BLACK,
                fill: Color::WHITE,
                stroke_width: 2.0,
                label_offset: Position::new(10.0, 0.0),
                label_font: None,
                label_background,
                label_drags_shape: false,
            },
            molecule: NodeStyle {
                shape: ShapeKind::Square { size: 10.0 },
                stroke: Color::BLACK,
                fill: Color::WHITE,
                stroke_width: 2.0,
                label_offset: Position::new(10.0, 0.0),
                label_font: None,
                label_background,
                label_drags_shape: false,
            },
            food_stroke_width: 4.0,
            conjunction: NodeStyle {
                shape: ShapeKind::Circle { radius: 10.0 },
                stroke: Color::TRANSPARENT,
                fill: Color::WHITE,
                stroke_width: 1.0,
                label_offset: Position::new(-4.0, -8.0),
                label_font: Some(Font::new("Courier New", 8.0)),
                label_background: None,
                label_drags_shape: true,
            },
            edge: EdgeStyle::default(),
            inhibitor_color: Color::LIGHT_GREY,
            font: Font::default(),
            selection_color: Color::SELECTION_BLUE,
            margin: 20.0,
        }
    }
}

impl SceneStyle {
    pub fn node_style(&self, role: NodeRole) -> &NodeStyle {
        match role {
            NodeRole::Reaction => &self.reaction,
            NodeRole::Molecule => &self.molecule,
            NodeRole::Conjunction => &self.conjunction,
        }
    }

    pub fn node_style_mut(&mut self, role: NodeRole) -> &mut NodeStyle {
        match role {
            NodeRole::Reaction => &mut self.reaction,
            NodeRole::Molecule => &mut self.molecule,
            NodeRole::Conjunction => &mut self.conjunction,
        }
    }

    /// Repair negative or non-finite sizes.
    pub fn validate(&mut self) {
        let defaults = SceneStyle::default();
        fn fix(value: &mut f64, fallback: f64) {
            if !value.is_finite() || *value < 0.0 {
                *value = fallback;
            }
        }
        fix(&mut self.food_stroke_width, defaults.food_stroke_width);
        fix(&mut self.edge.stroke_width, defaults.edge.stroke_width);
        fix(&mut self.edge.handle_radius, defaults.edge.handle_radius);
        fix(&mut self.margin, defaults.margin);
        if !self.font.size.is_finite() || self.font.size <= 0.0 {
            self.font.size = defaults.font.size;
        }
        for role in [NodeRole::Reaction, NodeRole::Molecule, NodeRole::Conjunction] {
            let fallback = defaults.node_style(role).clone();
            let style = self.node_style_mut(role);
            fix(&mut style.stroke_width, fallback.stroke_width);
            match &mut style.shape {
                ShapeKind::Circle { radius } => fix(radius, fallback.shape.half_extent()),
                ShapeKind::Square { size } => fix(size, 2.0 * fallback.shape.half_extent()),
            }
        }
    }
}
