// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::Serialize;

use crate::geometry::common::{direction_deg, format_number};
use crate::graph::{EdgeKind, Position};

/// Length of the straight stubs leaving and entering the endpoints.
pub const STRAIGHT_SEGMENT_LENGTH: f64 = 25.0;
/// Perpendicular offset of the default bend center, as a fraction of the
/// endpoint distance.
pub const LIFT_FACTOR: f64 = 0.2;

/// Placement of an arrowhead: translation plus rotation in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ArrowTransform {
    pub position: Position,
    pub angle: f64,
}

/// Connector from `start` to `end`: a stub to `stub_start`, a quadratic
/// curve through `control` to `stub_end`, then a line to `end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EdgePath {
    pub start: Position,
    pub stub_start: Position,
    pub control: Position,
    pub stub_end: Position,
    pub end: Position,
    pub arrow: ArrowTransform,
    /// Bend center, `None` for a degenerate connector.
    pub center: Option<Position>,
}

impl EdgePath {
    pub fn is_degenerate(&self) -> bool {
        self.center.is_none()
    }

    /// SVG path data (`M L Q L`).
    pub fn to_svg_data(&self) -> String {
        let n = format_number;
        format!(
            "M{},{}L{},{}Q{},{} {},{}L{},{}",
            n(self.start.x),
            n(self.start.y),
            n(self.stub_start.x),
            n(self.stub_start.y),
            n(self.control.x),
            n(self.control.y),
            n(self.stub_end.x),
            n(self.stub_end.y),
            n(self.end.x),
            n(self.end.y),
        )
    }
}

/// Per-edge bend state. Endpoint moves recompute the default center until the
/// user drags the bend handle, after which the dragged center is reapplied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BendState {
    #[default]
    Default,
    UserOverridden(Position),
}

impl BendState {
    pub fn center_override(self) -> Option<Position> {
        match self {
            BendState::Default => None,
            BendState::UserOverridden(center) => Some(center),
        }
    }
}

/// Step `length` from `from` toward `toward`. Coincident points step along +x.
fn step_toward(from: Position, toward: Position, length: f64) -> Position {
    let d = toward - from;
    let theta = d.y.atan2(d.x);
    from + Position::new(theta.cos(), theta.sin()) * length
}

/// Default bend center: the midpoint lifted perpendicular to `b - a`, to the
/// other side when `second_of_pair` so parallel edges don't overlap.
pub fn default_center(a: Position, b: Position, second_of_pair: bool) -> Position {
    let d = b - a;
    let distance = d.length();
    let alpha = d.y.atan2(d.x);
    let lift = Position::new(-alpha.sin(), alpha.cos()) * (LIFT_FACTOR * distance);
    let m = a.midpoint(b);
    if second_of_pair { m - lift } else { m + lift }
}

/// Compute the connector between endpoint centers `a` and `b`.
pub fn compute_path(
    a: Position,
    b: Position,
    kind: EdgeKind,
    center_override: Option<Position>,
    second_of_pair: bool,
) -> EdgePath {
    let distance = a.distance(b);

    let (stub_start, control, stub_end, arrow_position, center) =
        if distance <= 2.0 * STRAIGHT_SEGMENT_LENGTH {
            (a, a, a, a.midpoint(b), None)
        } else {
            let center = center_override.unwrap_or_else(|| default_center(a, b, second_of_pair));
            let stub_start = step_toward(a, center, STRAIGHT_SEGMENT_LENGTH);
            let stub_end = step_toward(b, center, STRAIGHT_SEGMENT_LENGTH);
            let arrow = stub_end * 0.75 + b * 0.25;
            (stub_start, center, stub_end, arrow, Some(center))
        };

    // inhibition lines stop at the bar
    let end = if kind == EdgeKind::Inhibitor {
        arrow_position
    } else {
        b
    };

    EdgePath {
        start: a,
        stub_start,
        control,
        stub_end,
        end,
        arrow: ArrowTransform {
            position: arrow_position,
            angle: direction_deg(end - stub_end),
        },
        center,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn close(a: Position, b: Position) -> bool {
        approx_eq!(f64, a.x, b.x, epsilon = 1e-9) && approx_eq!(f64, a.y, b.y, epsilon = 1e-9)
    }

    #[test]
    fn test_degenerate_below_threshold() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(40.0, 0.0);
        let path = compute_path(a, b, EdgeKind::Reactant, None, false);
        assert!(path.is_degenerate());
        assert_eq!(path.stub_start, a);
        assert_eq!(path.control, a);
        assert_eq!(path.stub_end, a);
        assert_eq!(path.end, b);
        assert!(close(path.arrow.position, Position::new(20.0, 0.0)));
        assert!(approx_eq!(f64, path.arrow.angle, 0.0));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let path = compute_path(
            Position::ORIGIN,
            Position::new(50.0, 0.0),
            EdgeKind::Product,
            None,
            false,
        );
        assert!(path.is_degenerate());
        let path = compute_path(
            Position::ORIGIN,
            Position::new(50.1, 0.0),
            EdgeKind::Product,
            None,
            false,
        );
        assert!(!path.is_degenerate());
    }

    #[test]
    fn test_bent_path_offset_sign() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(100.0, 0.0);

        let first = compute_path(a, b, EdgeKind::Reactant, None, false);
        let center = first.center.unwrap();
        assert!(close(center, Position::new(50.0, 20.0)));

        let second = compute_path(a, b, EdgeKind::Reactant, None, true);
        let mirrored = second.center.unwrap();
        assert!(close(mirrored, Position::new(50.0, -20.0)));
    }

    #[test]
    fn test_bent_path_stubs() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(100.0, 0.0);
        let path = compute_path(a, b, EdgeKind::Catalyst, None, false);

        assert!(approx_eq!(f64, a.distance(path.stub_start), 25.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, b.distance(path.stub_end), 25.0, epsilon = 1e-9));
        // both stubs lean toward the center at (50, 20)
        assert!(path.stub_start.y > 0.0 && path.stub_end.y > 0.0);
        assert_eq!(path.control, path.center.unwrap());
        assert_eq!(path.end, b);

        let expected_arrow = path.stub_end * 0.75 + b * 0.25;
        assert!(close(path.arrow.position, expected_arrow));
        let expected_angle = direction_deg(b - path.stub_end);
        assert!(approx_eq!(f64, path.arrow.angle, expected_angle, epsilon = 1e-9));
        assert!(path.arrow.angle >= 0.0 && path.arrow.angle < 360.0);
    }

    #[test]
    fn test_inhibitor_ends_at_bar() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 200.0);
        let path = compute_path(a, b, EdgeKind::Inhibitor, None, false);
        assert_eq!(path.end, path.arrow.position);
        assert!(path.end.distance(b) > 1.0);

        let short = compute_path(a, Position::new(0.0, 10.0), EdgeKind::Inhibitor, None, false);
        assert_eq!(short.end, short.arrow.position);
        assert!(approx_eq!(f64, short.arrow.angle, 90.0, epsilon = 1e-9));
    }

    #[test]
    fn test_override_replaces_default_center() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(100.0, 0.0);
        let user = Position::new(30.0, -70.0);
        let path = compute_path(a, b, EdgeKind::Product, Some(user), true);
        assert_eq!(path.center, Some(user));
        assert_eq!(path.control, user);
        assert!(path.stub_start.y < 0.0);

        assert_eq!(BendState::UserOverridden(user).center_override(), Some(user));
        assert_eq!(BendState::default().center_override(), None);
    }

    #[test]
    fn test_svg_path_data() {
        let path = compute_path(
            Position::ORIGIN,
            Position::new(10.0, 0.0),
            EdgeKind::Reactant,
            None,
            false,
        );
        assert_eq!(path.to_svg_data(), "M0,0L0,0Q0,0 0,0L10,0");
    }
}
