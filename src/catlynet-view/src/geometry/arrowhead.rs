// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::geometry::common::{escape_xml_attr, format_number};
use crate::geometry::path::ArrowTransform;
use crate::graph::EdgeKind;

const CHEVRON: &[(f64, f64)] = &[(-5.0, -3.0), (5.0, 0.0), (-5.0, 3.0)];
const DIAMOND: &[(f64, f64)] = &[(-6.0, 0.0), (0.0, 4.0), (6.0, 0.0), (0.0, -4.0)];
const BAR: &[(f64, f64)] = &[(0.0, -5.0), (0.0, 5.0)];

/// Outline of an arrowhead in local coordinates, pointing along +x.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowheadShape {
    /// Open polyline `>`.
    Chevron,
    /// Closed triangle with the chevron's outline.
    Triangle,
    Diamond,
    /// Perpendicular bar.
    Bar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowheadFill {
    None,
    White,
    LightGrey,
}

impl ArrowheadShape {
    pub fn points(self) -> &'static [(f64, f64)] {
        match self {
            ArrowheadShape::Chevron | ArrowheadShape::Triangle => CHEVRON,
            ArrowheadShape::Diamond => DIAMOND,
            ArrowheadShape::Bar => BAR,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, ArrowheadShape::Triangle | ArrowheadShape::Diamond)
    }
}

pub fn arrowhead_for(kind: EdgeKind) -> (ArrowheadShape, ArrowheadFill) {
    match kind {
        EdgeKind::Catalyst => (ArrowheadShape::Chevron, ArrowheadFill::None),
        EdgeKind::Reactant => (ArrowheadShape::Triangle, ArrowheadFill::White),
        EdgeKind::ReactantReversible => (ArrowheadShape::Diamond, ArrowheadFill::White),
        EdgeKind::Product => (ArrowheadShape::Triangle, ArrowheadFill::LightGrey),
        EdgeKind::ProductReversible => (ArrowheadShape::Diamond, ArrowheadFill::LightGrey),
        EdgeKind::Inhibitor => (ArrowheadShape::Bar, ArrowheadFill::None),
    }
}

/// SVG element for an arrowhead at `transform`, styled by `class`.
pub fn render_arrowhead(shape: ArrowheadShape, transform: &ArrowTransform, class: &str) -> String {
    let points = shape
        .points()
        .iter()
        .map(|&(x, y)| format!("{},{}", format_number(x), format_number(y)))
        .collect::<Vec<_>>()
        .join(" ");
    let element = if shape.is_closed() {
        "polygon"
    } else {
        "polyline"
    };
    let placement = format!(
        "translate({},{}) rotate({})",
        format_number(transform.position.x),
        format_number(transform.position.y),
        format_number(transform.angle)
    );

    format!(
        "<{element} points=\"{}\" class=\"{}\" transform=\"{}\"></{element}>",
        escape_xml_attr(&points),
        escape_xml_attr(class),
        escape_xml_attr(&placement)
    )
}
