// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use float_cmp::approx_eq;
use smallvec::SmallVec;

use crate::common::Result;
use crate::geometry::common::{Rect, union_all};
use crate::geometry::path::{BendState, EdgePath, compute_path};
use crate::graph::{
    CoordinateMap, EdgeId, EdgeKind, FoodSet, NodeId, NodePayload, Position, ReactionGraph,
};
use crate::scene::style::{Color, EdgeStyle, Font, NodeRole, NodeStyle, SceneStyle};
use crate::selection::SelectionChange;
use crate::view_err;

/// Rough glyph advance as a fraction of the font size, used to size labels
/// without a text shaper.
const GLYPH_WIDTH_FACTOR: f64 = 0.6;
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Visual effect applied to a primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    None,
    Selected,
}

/// Shape plus label for one node. The label position is derived from the
/// shape position, so moving the shape moves the label.
#[cfg_attr(feature = "debug-derive", derive(Debug))]
#[derive(Clone)]
pub struct NodeVisual {
    pub node: NodeId,
    pub role: NodeRole,
    pub text: String,
    pub is_food: bool,
    pub position: Position,
    /// User adjustment of the label relative to its styled offset.
    pub label_shift: Position,
    pub shape_effect: Effect,
    pub label_effect: Effect,
}

impl NodeVisual {
    pub fn label_position(&self, style: &SceneStyle) -> Position {
        self.position + style.node_style(self.role).label_offset + self.label_shift
    }

    pub fn stroke_width(&self, style: &SceneStyle) -> f64 {
        if self.role == NodeRole::Molecule && self.is_food {
            style.food_stroke_width
        } else {
            style.node_style(self.role).stroke_width
        }
    }

    pub fn font<'a>(&self, style: &'a SceneStyle) -> &'a Font {
        style
            .node_style(self.role)
            .label_font
            .as_ref()
            .unwrap_or(&style.font)
    }

    fn shape_bounds(&self, style: &SceneStyle) -> Rect {
        let half = style.node_style(self.role).shape.half_extent() + self.stroke_width(style) / 2.0;
        Rect::around(self.position, half)
    }

    /// Label rectangle with its top-left corner at the label position.
    pub fn label_bounds(&self, style: &SceneStyle) -> Rect {
        let font = self.font(style);
        let origin = self.label_position(style);
        let width = self.text.chars().count() as f64 * font.size * GLYPH_WIDTH_FACTOR;
        Rect {
            left: origin.x,
            top: origin.y,
            right: origin.x + width,
            bottom: origin.y + font.size * LINE_HEIGHT_FACTOR,
        }
    }
}

/// Path, arrowhead and bend handle for one edge.
#[cfg_attr(feature = "debug-derive", derive(Debug))]
#[derive(Clone)]
pub struct EdgeVisual {
    pub edge: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub second_of_pair: bool,
    pub bend: BendState,
    pub path: EdgePath,
    pub path_effect: Effect,
    pub arrow_effect: Effect,
    pub handle_effect: Effect,
}

impl EdgeVisual {
    /// The handle sits at the bend center; degenerate connectors fall back to
    /// the arrowhead.
    pub fn handle_position(&self) -> Position {
        self.path.center.unwrap_or(self.path.arrow.position)
    }

    pub fn stroke(&self, style: &SceneStyle) -> Color {
        if self.kind == EdgeKind::Inhibitor {
            style.inhibitor_color
        } else {
            style.edge.stroke
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.kind.is_dashed()
    }

    fn reroute(&mut self, a: Position, b: Position) {
        self.path = compute_path(
            a,
            b,
            self.kind,
            self.bend.center_override(),
            self.second_of_pair,
        );
    }

    fn bounds(&self) -> Rect {
        let p = &self.path;
        [p.start, p.stub_start, p.control, p.stub_end, p.end]
            .into_iter()
            .map(|q| Rect::around(q, 0.0))
            .fold(Rect::around(p.arrow.position, 6.0), Rect::union)
    }
}

/// Retained visual state for a laid-out graph.
#[cfg_attr(feature = "debug-derive", derive(Debug))]
#[derive(Clone)]
pub struct Scene {
    style: SceneStyle,
    /// Indexed by `NodeId`.
    nodes: Vec<NodeVisual>,
    /// Indexed by `EdgeId`.
    edges: Vec<EdgeVisual>,
    /// Edges touching each node, for rerouting after a move.
    incidence: Vec<SmallVec<[EdgeId; 4]>>,
}

fn role_of(payload: &NodePayload) -> NodeRole {
    match payload {
        NodePayload::Reaction { .. } => NodeRole::Reaction,
        NodePayload::Molecule(_) => NodeRole::Molecule,
        NodePayload::Conjunction(_) => NodeRole::Conjunction,
    }
}

impl Scene {
    pub fn empty(style: SceneStyle) -> Self {
        Scene {
            style,
            nodes: Vec::new(),
            edges: Vec::new(),
            incidence: Vec::new(),
        }
    }

    /// Create one visual record per node and per edge. Nodes missing from
    /// `coordinates` are placed at the origin.
    pub fn build(
        graph: &ReactionGraph,
        foods: &FoodSet,
        coordinates: &CoordinateMap,
        style: SceneStyle,
    ) -> Self {
        let mut scene = Scene::empty(style);

        for node in graph.nodes() {
            let position = match coordinates.get(&node.id) {
                Some(p) => *p,
                None => {
                    log::warn!("no coordinate for node {}, placing at origin", node.id);
                    Position::ORIGIN
                }
            };
            scene.nodes.push(NodeVisual {
                node: node.id,
                role: role_of(&node.payload),
                text: node.payload.label().to_string(),
                is_food: foods.contains(&node.id),
                position,
                label_shift: Position::ORIGIN,
                shape_effect: Effect::None,
                label_effect: Effect::None,
            });
            scene.incidence.push(graph.incident_edges(node.id).collect());
        }

        for edge in graph.edges() {
            let a = scene.nodes[edge.source.0].position;
            let b = scene.nodes[edge.target.0].position;
            let second_of_pair = graph.is_second_of_pair(edge.id);
            scene.edges.push(EdgeVisual {
                edge: edge.id,
                source: edge.source,
                target: edge.target,
                kind: edge.kind,
                second_of_pair,
                bend: BendState::Default,
                path: compute_path(a, b, edge.kind, None, second_of_pair),
                path_effect: Effect::None,
                arrow_effect: Effect::None,
                handle_effect: Effect::None,
            });
        }

        scene
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    /// Number of visual records (nodes plus edges).
    pub fn visual_count(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeVisual] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeVisual] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeVisual> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeVisual> {
        self.edges.get(id.0)
    }

    /// Current shape positions.
    pub fn coordinates(&self) -> CoordinateMap {
        self.nodes.iter().map(|n| (n.node, n.position)).collect()
    }

    /// Move a node's shape; its label follows and incident paths are
    /// rerouted.
    pub fn move_node(&mut self, id: NodeId, to: Position) -> Result<()> {
        let Some(visual) = self.nodes.get_mut(id.0) else {
            return view_err!(UnknownNode, id.to_string());
        };
        if approx_eq!(f64, visual.position.x, to.x) && approx_eq!(f64, visual.position.y, to.y) {
            return Ok(());
        }
        visual.position = to;

        for &edge in &self.incidence[id.0] {
            let visual = &mut self.edges[edge.0];
            let a = self.nodes[visual.source.0].position;
            let b = self.nodes[visual.target.0].position;
            visual.reroute(a, b);
        }
        Ok(())
    }

    pub fn translate_node(&mut self, id: NodeId, by: Position) -> Result<()> {
        let Some(visual) = self.nodes.get(id.0) else {
            return view_err!(UnknownNode, id.to_string());
        };
        let to = visual.position + by;
        self.move_node(id, to)
    }

    /// Shift a label away from its styled offset without moving the shape.
    pub fn shift_label(&mut self, id: NodeId, by: Position) -> Result<()> {
        let Some(visual) = self.nodes.get_mut(id.0) else {
            return view_err!(UnknownNode, id.to_string());
        };
        visual.label_shift = visual.label_shift + by;
        Ok(())
    }

    /// Drag an edge's bend handle. The edge keeps the dragged center through
    /// later endpoint moves.
    pub fn drag_bend_handle(&mut self, id: EdgeId, to: Position) -> Result<()> {
        let Some(visual) = self.edges.get_mut(id.0) else {
            return view_err!(UnknownEdge, id.to_string());
        };
        visual.bend = BendState::UserOverridden(to);
        let a = self.nodes[visual.source.0].position;
        let b = self.nodes[visual.target.0].position;
        visual.reroute(a, b);
        Ok(())
    }

    /// Go back to the computed default bend.
    pub fn reset_bend(&mut self, id: EdgeId) -> Result<()> {
        let Some(visual) = self.edges.get_mut(id.0) else {
            return view_err!(UnknownEdge, id.to_string());
        };
        visual.bend = BendState::Default;
        let a = self.nodes[visual.source.0].position;
        let b = self.nodes[visual.target.0].position;
        visual.reroute(a, b);
        Ok(())
    }

    /// Union of shape, label and path bounds; each axis is taken
    /// independently. `None` for an empty scene.
    pub fn bounding_box(&self) -> Option<Rect> {
        let style = &self.style;
        let nodes = self
            .nodes
            .iter()
            .flat_map(|n| [n.shape_bounds(style), n.label_bounds(style)]);
        let edges = self.edges.iter().map(EdgeVisual::bounds);
        union_all(nodes.chain(edges))
    }

    pub fn inhibitor_color(&self) -> Color {
        self.style.inhibitor_color
    }

    pub fn set_inhibitor_color(&mut self, color: Color) {
        self.style.inhibitor_color = color;
    }

    pub fn set_font(&mut self, font: Font) {
        self.style.font = font;
        self.style.validate();
    }

    pub fn set_node_style(&mut self, role: NodeRole, node_style: NodeStyle) {
        *self.style.node_style_mut(role) = node_style;
        self.style.validate();
    }

    pub fn set_edge_style(&mut self, edge_style: EdgeStyle) {
        self.style.edge = edge_style;
        self.style.validate();
    }

    /// Apply or remove the selection effect on shape and label.
    pub fn apply_node_selection(&mut self, change: &SelectionChange<NodeId>) {
        for (ids, effect) in [
            (&change.added, Effect::Selected),
            (&change.removed, Effect::None),
        ] {
            for id in ids {
                if let Some(visual) = self.nodes.get_mut(id.0) {
                    visual.shape_effect = effect;
                    visual.label_effect = effect;
                }
            }
        }
    }

    /// Apply or remove the selection effect on path, arrowhead and handle.
    pub fn apply_edge_selection(&mut self, change: &SelectionChange<EdgeId>) {
        for (ids, effect) in [
            (&change.added, Effect::Selected),
            (&change.removed, Effect::None),
        ] {
            for id in ids {
                if let Some(visual) = self.edges.get_mut(id.0) {
                    visual.path_effect = effect;
                    visual.arrow_effect = effect;
                    visual.handle_effect = effect;
                }
            }
        }
    }
}
