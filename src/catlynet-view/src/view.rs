// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::sync::Arc;

use crate::common::Result;
use crate::geometry::Rect;
use crate::graph::{CoordinateMap, EdgeId, FoodSet, NodeId, Position, ReactionGraph};
use crate::layout::LayoutConfig;
use crate::model::ReactionSystem;
use crate::orchestrator::{LayoutCompletion, LayoutService, LayoutState, Notifier, StatusDisplay};
use crate::scene::{
    Click, Color, EdgeStyle, Font, HitTarget, Interaction, NodeRole, NodeStyle, Scene, SceneStyle,
    render_svg,
};
use crate::selection::{SelectionChange, SelectionModel};

const LAYOUT_TASK: &str = "Computing layout";

/// Configuration for a `ReactionGraphView`.
#[derive(Clone, Debug, Default)]
pub struct ViewConfig {
    pub layout: LayoutConfig,
    pub style: SceneStyle,
}

type EmptyListener = Box<dyn FnMut(bool)>;

/// Interactive view of a reaction system: owns the graph, the layout run,
/// the scene and both selections.
pub struct ReactionGraphView {
    config: ViewConfig,
    notifier: Box<dyn Notifier>,
    status: Box<dyn StatusDisplay>,
    graph: Arc<ReactionGraph>,
    foods: FoodSet,
    scene: Scene,
    node_selection: SelectionModel<NodeId>,
    edge_selection: SelectionModel<EdgeId>,
    service: LayoutService,
    interaction: Interaction,
    empty: bool,
    empty_listeners: Vec<EmptyListener>,
}

impl ReactionGraphView {
    pub fn new(
        mut config: ViewConfig,
        notifier: Box<dyn Notifier>,
        status: Box<dyn StatusDisplay>,
    ) -> Self {
        config.layout.validate();
        config.style.validate();
        let scene = Scene::empty(config.style.clone());
        ReactionGraphView {
            config,
            notifier,
            status,
            graph: Arc::new(ReactionGraph::new()),
            foods: FoodSet::new(),
            scene,
            node_selection: SelectionModel::new(),
            edge_selection: SelectionModel::new(),
            service: LayoutService::new(),
            interaction: Interaction::new(),
            empty: true,
            empty_listeners: Vec::new(),
        }
    }

    /// Rebuild everything from `system` and start a background layout. The
    /// scene appears once `poll()` or `wait_for_layout()` sees the result.
    pub fn update(&mut self, system: &ReactionSystem) -> Result<()> {
        self.clear();

        let (graph, foods) = ReactionGraph::build(system);
        log::debug!(
            "built reaction graph '{}': {} nodes, {} edges",
            system.name,
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = Arc::new(graph);
        self.foods = foods;

        if self.graph.is_empty() {
            return Ok(());
        }

        self.status.set_task(LAYOUT_TASK);
        self.service
            .start(self.graph.clone(), self.config.layout.clone())
    }

    /// Drop all graph and visual state. Any running layout is abandoned.
    pub fn clear(&mut self) {
        self.service.abandon();
        self.interaction = Interaction::new();
        self.node_selection.clear();
        self.edge_selection.clear();
        self.graph = Arc::new(ReactionGraph::new());
        self.foods.clear();
        self.scene = Scene::empty(self.config.style.clone());
        self.set_empty(true);
    }

    /// Apply a finished layout if one is ready. Never blocks.
    pub fn poll(&mut self) -> Option<LayoutState> {
        let completion = self.service.poll(self.status.as_ref())?;
        self.apply_completion(completion);
        Some(self.service.state())
    }

    /// Block until the running layout ends and apply it.
    pub fn wait_for_layout(&mut self) -> Option<LayoutState> {
        let completion = self.service.wait(self.status.as_ref())?;
        self.apply_completion(completion);
        Some(self.service.state())
    }

    pub fn cancel_layout(&self) {
        self.service.cancel();
    }

    pub fn is_layout_running(&self) -> bool {
        self.service.is_running()
    }

    fn apply_completion(&mut self, completion: LayoutCompletion) {
        match completion {
            LayoutCompletion::Succeeded(coords) => self.show(&coords),
            LayoutCompletion::Cancelled(Some(partial)) => {
                self.notifier
                    .warning("Layout computation was cancelled, showing partial result");
                self.show(&partial);
            }
            LayoutCompletion::Cancelled(None) => {
                self.notifier.warning("Layout computation was cancelled");
            }
            LayoutCompletion::Failed(err) => {
                self.notifier
                    .error(&format!("Layout computation failed: {err}"));
            }
        }
    }

    fn show(&mut self, coords: &CoordinateMap) {
        self.scene = Scene::build(&self.graph, &self.foods, coords, self.config.style.clone());
        self.set_empty(self.graph.node_count() == 0);
    }

    fn set_empty(&mut self, empty: bool) {
        if self.empty != empty {
            self.empty = empty;
            for listener in &mut self.empty_listeners {
                listener(empty);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Register a callback invoked whenever emptiness flips.
    pub fn on_empty_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.empty_listeners.push(Box::new(listener));
    }

    pub fn graph(&self) -> &ReactionGraph {
        &self.graph
    }

    pub fn foods(&self) -> &FoodSet {
        &self.foods
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn coordinates(&self) -> CoordinateMap {
        self.scene.coordinates()
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        self.scene.bounding_box()
    }

    pub fn inhibitor_color(&self) -> Color {
        self.config.style.inhibitor_color
    }

    pub fn set_inhibitor_color(&mut self, color: Color) {
        self.config.style.inhibitor_color = color;
        self.scene.set_inhibitor_color(color);
    }

    pub fn set_font(&mut self, font: Font) {
        self.config.style.font = font.clone();
        self.config.style.validate();
        self.scene.set_font(font);
    }

    pub fn set_node_style(&mut self, role: NodeRole, style: NodeStyle) {
        *self.config.style.node_style_mut(role) = style.clone();
        self.config.style.validate();
        self.scene.set_node_style(role, style);
    }

    pub fn set_edge_style(&mut self, style: EdgeStyle) {
        self.config.style.edge = style.clone();
        self.config.style.validate();
        self.scene.set_edge_style(style);
    }

    pub fn node_selection(&self) -> &SelectionModel<NodeId> {
        &self.node_selection
    }

    pub fn edge_selection(&self) -> &SelectionModel<EdgeId> {
        &self.edge_selection
    }

    /// Mutate the node selection and mirror the change onto the scene.
    pub fn update_node_selection<F>(&mut self, f: F) -> SelectionChange<NodeId>
    where
        F: FnOnce(&mut SelectionModel<NodeId>) -> SelectionChange<NodeId>,
    {
        let change = f(&mut self.node_selection);
        self.scene.apply_node_selection(&change);
        change
    }

    /// Mutate the edge selection and mirror the change onto the scene.
    pub fn update_edge_selection<F>(&mut self, f: F) -> SelectionChange<EdgeId>
    where
        F: FnOnce(&mut SelectionModel<EdgeId>) -> SelectionChange<EdgeId>,
    {
        let change = f(&mut self.edge_selection);
        self.scene.apply_edge_selection(&change);
        change
    }

    pub fn press(&mut self, target: HitTarget, at: Position) {
        self.interaction.press(target, at);
    }

    pub fn drag(&mut self, at: Position) -> Result<()> {
        self.interaction.drag(&mut self.scene, at)
    }

    /// End a gesture; a click updates the selections.
    pub fn release(&mut self, shift: bool) {
        let Some(click) = self.interaction.release(shift) else {
            return;
        };
        match click {
            Click::Replace(target) => {
                self.update_node_selection(|s| s.clear());
                self.update_edge_selection(|s| s.clear());
                self.toggle_target(target);
            }
            Click::Toggle(target) => self.toggle_target(target),
        }
    }

    fn toggle_target(&mut self, target: HitTarget) {
        match target {
            HitTarget::NodeShape(node) | HitTarget::NodeLabel(node) => {
                self.update_node_selection(|s| s.toggle(node));
            }
            HitTarget::EdgePath(edge) => {
                self.update_edge_selection(|s| s.toggle(edge));
            }
        }
    }

    pub fn render_svg(&self) -> String {
        render_svg(&self.scene)
    }
}
