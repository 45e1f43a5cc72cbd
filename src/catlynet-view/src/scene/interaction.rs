// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Toolkit-independent press/drag/release handling.

use crate::common::Result;
use crate::graph::{EdgeId, NodeId, Position};
use crate::scene::visual::Scene;

/// What a pointer gesture started on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    NodeShape(NodeId),
    NodeLabel(NodeId),
    /// Dragging an edge path drags its bend handle.
    EdgePath(EdgeId),
}

/// Selection request produced by a click (a release without movement).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
    /// Clear both selections, then select the target.
    Replace(HitTarget),
    /// Toggle the target's membership, leaving the rest alone.
    Toggle(HitTarget),
}

impl Click {
    pub fn target(self) -> HitTarget {
        match self {
            Click::Replace(t) | Click::Toggle(t) => t,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    target: HitTarget,
    last: Position,
    moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Interaction {
    active: Option<Gesture>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn press(&mut self, target: HitTarget, at: Position) {
        self.active = Some(Gesture {
            target,
            last: at,
            moved: false,
        });
    }

    /// Apply the pointer delta since the previous event to the scene.
    pub fn drag(&mut self, scene: &mut Scene, at: Position) -> Result<()> {
        let Some(gesture) = self.active.as_mut() else {
            return Ok(());
        };
        let delta = at - gesture.last;
        gesture.last = at;
        gesture.moved = true;

        match gesture.target {
            HitTarget::NodeShape(node) => scene.translate_node(node, delta),
            HitTarget::NodeLabel(node) => {
                let drags_shape = scene
                    .node(node)
                    .is_some_and(|n| scene.style().node_style(n.role).label_drags_shape);
                if drags_shape {
                    scene.translate_node(node, delta)
                } else {
                    scene.shift_label(node, delta)
                }
            }
            HitTarget::EdgePath(edge) => {
                let handle = scene
                    .edge(edge)
                    .map_or(at, |visual| visual.handle_position() + delta);
                scene.drag_bend_handle(edge, handle)
            }
        }
    }

    /// Finish the gesture. Returns a click when the pointer never moved.
    pub fn release(&mut self, shift: bool) -> Option<Click> {
        let gesture = self.active.take()?;
        if gesture.moved {
            return None;
        }
        Some(if shift {
            Click::Toggle(gesture.target)
        } else {
            Click::Replace(gesture.target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CoordinateMap, ReactionGraph};
    use crate::model::{Reaction, ReactionSystem};
    use crate::scene::style::SceneStyle;

    fn scene() -> Scene {
        let system = ReactionSystem {
            name: "and".to_string(),
            reactions: vec![
                Reaction::new("R")
                    .with_reactants(&["X"])
                    .with_catalysts(&["A&B"]),
            ],
            foods: Default::default(),
        };
        let (graph, foods) = ReactionGraph::build(&system);
        let coords: CoordinateMap = graph
            .nodes()
            .map(|n| (n.id, Position::new(100.0 * n.id.0 as f64, 0.0)))
            .collect();
        Scene::build(&graph, &foods, &coords, SceneStyle::default())
    }

    #[test]
    fn test_click_without_movement() {
        let mut interaction = Interaction::new();
        let target = HitTarget::NodeShape(NodeId(1));
        interaction.press(target, Position::new(5.0, 5.0));
        assert!(interaction.is_active());
        assert_eq!(interaction.release(false), Some(Click::Replace(target)));
        assert!(!interaction.is_active());

        interaction.press(target, Position::new(5.0, 5.0));
        assert_eq!(interaction.release(true), Some(Click::Toggle(target)));
        assert_eq!(interaction.release(true), None);
    }

    #[test]
    fn test_drag_moves_shape_and_suppresses_click() {
        let mut scene = scene();
        let mut interaction = Interaction::new();
        interaction.press(HitTarget::NodeShape(NodeId(1)), Position::new(100.0, 0.0));
        interaction.drag(&mut scene, Position::new(110.0, 5.0)).unwrap();
        interaction.drag(&mut scene, Position::new(120.0, 10.0)).unwrap();
        assert_eq!(scene.node(NodeId(1)).unwrap().position, Position::new(120.0, 10.0));
        assert_eq!(interaction.release(false), None);
    }

    #[test]
    fn test_label_drag_depends_on_role() {
        let mut scene = scene();
        let mut interaction = Interaction::new();

        // plain molecule label moves on its own
        interaction.press(HitTarget::NodeLabel(NodeId(1)), Position::ORIGIN);
        interaction.drag(&mut scene, Position::new(0.0, 7.0)).unwrap();
        interaction.release(false);
        let x = scene.node(NodeId(1)).unwrap();
        assert_eq!(x.position, Position::new(100.0, 0.0));
        assert_eq!(x.label_shift, Position::new(0.0, 7.0));

        // conjunction label drags the shape
        interaction.press(HitTarget::NodeLabel(NodeId(2)), Position::ORIGIN);
        interaction.drag(&mut scene, Position::new(3.0, 4.0)).unwrap();
        interaction.release(false);
        let marker = scene.node(NodeId(2)).unwrap();
        assert_eq!(marker.position, Position::new(203.0, 4.0));
        assert_eq!(marker.label_shift, Position::ORIGIN);
    }

    #[test]
    fn test_edge_drag_moves_bend_handle() {
        let mut scene = scene();
        let mut interaction = Interaction::new();
        let edge = scene.edges()[0].edge;
        let before = scene.edge(edge).unwrap().handle_position();

        interaction.press(HitTarget::EdgePath(edge), Position::ORIGIN);
        interaction.drag(&mut scene, Position::new(0.0, 30.0)).unwrap();
        let visual = scene.edge(edge).unwrap();
        assert_eq!(visual.handle_position(), before + Position::new(0.0, 30.0));
        assert_eq!(interaction.release(false), None);
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut scene = scene();
        let mut interaction = Interaction::new();
        interaction.drag(&mut scene, Position::new(1.0, 1.0)).unwrap();
        assert_eq!(scene.node(NodeId(0)).unwrap().position, Position::ORIGIN);
    }
}
