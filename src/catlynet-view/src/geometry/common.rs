// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::f64::consts::PI;

use serde::Serialize;

use crate::graph::Position;

/// Axis-aligned rectangle in scene coordinates; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Square of half-width `r` around `center`.
    pub fn around(center: Position, r: f64) -> Self {
        Rect {
            left: center.x - r,
            top: center.y - r,
            right: center.x + r,
            bottom: center.y + r,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn padded(self, margin: f64) -> Rect {
        Rect {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Union of all rectangles, `None` if there are none.
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(Rect::union)
}

fn escape_xml(s: &str, quote: bool) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quote => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape element text content.
pub fn escape_xml_text(s: &str) -> String {
    escape_xml(s, false)
}

/// Escape a double-quoted attribute value.
pub fn escape_xml_attr(s: &str) -> String {
    escape_xml(s, true)
}

/// Shortest decimal rendering of `n`: integral values have no fractional
/// part and negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return if n.is_nan() {
            "NaN".to_string()
        } else if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if n == n.trunc() && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    // keep SVG output compact; sub-micro precision is noise
    let rounded = (n * 1e6).round() / 1e6;
    if rounded == rounded.trunc() {
        return format!("{}", rounded as i64);
    }
    format!("{rounded}")
}

pub fn deg_to_rad(d: f64) -> f64 {
    (d / 180.0) * PI
}

pub fn rad_to_deg(r: f64) -> f64 {
    (r * 180.0) / PI
}

/// Direction of `v` in degrees, normalized to [0, 360). The zero vector
/// points along +x.
pub fn direction_deg(v: Position) -> f64 {
    let deg = rad_to_deg(v.y.atan2(v.x)).rem_euclid(360.0);
    if deg >= 360.0 { 0.0 } else { deg }
}
