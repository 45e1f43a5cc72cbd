// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{MoleculeType, Reaction, ReactionSystem};

/// 2D position/vector used throughout the layout and scene pipeline.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Position::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Position {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Dense node ordinal, assigned in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Dense edge ordinal, assigned in creation order. Used as the stable
/// tie-break between parallel edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Maps nodes to positions.
pub type CoordinateMap = BTreeMap<NodeId, Position>;

/// Nodes standing for externally supplied molecules.
pub type FoodSet = BTreeSet<NodeId>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodePayload {
    /// Index into the reaction list plus the reaction's display name.
    Reaction { index: usize, name: String },
    Molecule(MoleculeType),
    /// Synthetic AND-combination of catalysts.
    Conjunction(MoleculeType),
}

impl NodePayload {
    pub fn label(&self) -> &str {
        match self {
            NodePayload::Reaction { name, .. } => name,
            NodePayload::Molecule(m) => m.name(),
            NodePayload::Conjunction(_) => "&",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Reactant,
    ReactantReversible,
    Product,
    ProductReversible,
    Catalyst,
    Inhibitor,
}

impl EdgeKind {
    pub fn is_dashed(self) -> bool {
        matches!(self, EdgeKind::Catalyst | EdgeKind::Inhibitor)
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub payload: NodePayload,
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    second_of_pair: bool,
}

type EdgeList = SmallVec<[EdgeId; 4]>;

/// Directed multigraph of reactions, molecules and conjunction markers.
/// Use `ReactionGraph::build` to construct.
#[derive(Clone, Debug, Default)]
pub struct ReactionGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    out_edges: Vec<EdgeList>,
    in_edges: Vec<EdgeList>,
    molecules: HashMap<MoleculeType, NodeId>,
}

impl ReactionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a reaction system: nodes first, then edges, then
    /// the AND-node food inference. Returns the graph together with its food
    /// set.
    pub fn build(system: &ReactionSystem) -> (ReactionGraph, FoodSet) {
        let mut graph = ReactionGraph::new();
        let mut foods = FoodSet::new();

        let mut reaction_nodes = Vec::with_capacity(system.reactions.len());
        for (index, reaction) in system.reactions.iter().enumerate() {
            let reaction_node = graph.add_node(NodePayload::Reaction {
                index,
                name: reaction.name.clone(),
            });
            reaction_nodes.push(reaction_node);

            for molecule in participants(reaction) {
                graph.ensure_molecule(system, molecule, &mut foods);
            }
        }

        for (reaction, &reaction_node) in system.reactions.iter().zip(reaction_nodes.iter()) {
            graph.wire_reaction(reaction, reaction_node);
        }

        graph.mark_second_edges();
        graph.infer_conjunction_foods(&mut foods);

        let components = graph.connected_components();
        if components > 1 {
            log::info!("Reaction graph has {components} connected components");
        }

        (graph, foods)
    }

    fn add_node(&mut self, payload: NodePayload) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { id, payload });
        self.out_edges.push(EdgeList::new());
        self.in_edges.push(EdgeList::new());
        id
    }

    fn add_edge(&mut self, source: NodeId, target: NodeId, kind: EdgeKind) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            id,
            source,
            target,
            kind,
            second_of_pair: false,
        });
        self.out_edges[source.0].push(id);
        self.in_edges[target.0].push(id);
        id
    }

    /// Lookup-or-insert for a molecule reference. Conjunctions get a marker
    /// node and their constituents are inserted as plain molecules.
    fn ensure_molecule(
        &mut self,
        system: &ReactionSystem,
        molecule: &MoleculeType,
        foods: &mut FoodSet,
    ) {
        if self.molecules.contains_key(molecule) {
            return;
        }
        if molecule.is_conjunction() {
            let marker = self.add_node(NodePayload::Conjunction(molecule.clone()));
            self.molecules.insert(molecule.clone(), marker);
            for constituent in molecule.constituents() {
                self.ensure_plain_molecule(system, constituent, foods);
            }
        } else if !molecule.name().trim().is_empty() {
            self.ensure_plain_molecule(system, molecule.clone(), foods);
        }
    }

    fn ensure_plain_molecule(
        &mut self,
        system: &ReactionSystem,
        molecule: MoleculeType,
        foods: &mut FoodSet,
    ) {
        if self.molecules.contains_key(&molecule) {
            return;
        }
        let is_food = system.is_food(&molecule);
        let node = self.add_node(NodePayload::Molecule(molecule.clone()));
        self.molecules.insert(molecule, node);
        if is_food {
            foods.insert(node);
        }
    }

    fn wire_reaction(
        &mut self,
        reaction: &Reaction,
        reaction_node: NodeId,
    ) {
        let (reactant_kind, product_kind) = if reaction.is_reversible() {
            (EdgeKind::ReactantReversible, EdgeKind::ProductReversible)
        } else {
            (EdgeKind::Reactant, EdgeKind::Product)
        };

        for molecule in &reaction.reactants {
            if let Some(node) = self.resolve(molecule, &reaction.name) {
                self.add_edge(node, reaction_node, reactant_kind);
            }
        }
        for molecule in &reaction.products {
            if let Some(node) = self.resolve(molecule, &reaction.name) {
                self.add_edge(reaction_node, node, product_kind);
            }
        }
        for molecule in &reaction.catalysts {
            let Some(node) = self.resolve(molecule, &reaction.name) else {
                continue;
            };
            // every reaction using a conjunction wires its constituents again
            if molecule.is_conjunction() {
                for constituent in molecule.constituents() {
                    if let Some(source) = self.resolve(&constituent, &reaction.name) {
                        self.add_edge(source, node, EdgeKind::Catalyst);
                    }
                }
            }
            self.add_edge(node, reaction_node, EdgeKind::Catalyst);
        }
        for molecule in &reaction.inhibitions {
            if let Some(node) = self.resolve(molecule, &reaction.name) {
                self.add_edge(node, reaction_node, EdgeKind::Inhibitor);
            }
        }
    }

    fn resolve(&self, molecule: &MoleculeType, reaction: &str) -> Option<NodeId> {
        let node = self.molecules.get(molecule).copied();
        if node.is_none() {
            log::debug!("reaction '{reaction}': skipping unresolved molecule '{molecule}'");
        }
        node
    }

    fn mark_second_edges(&mut self) {
        for i in 0..self.edges.len() {
            let edge = &self.edges[i];
            let second = self.out_edges[edge.source.0]
                .iter()
                .any(|&f| f < edge.id && self.edges[f.0].target == edge.target);
            self.edges[i].second_of_pair = second;
        }
    }

    /// A conjunction marker's single-degree inputs can only be supplied from
    /// outside, so they are treated as food.
    fn infer_conjunction_foods(&self, foods: &mut FoodSet) {
        for node in &self.nodes {
            if !matches!(node.payload, NodePayload::Conjunction(_)) {
                continue;
            }
            for &edge in &self.in_edges[node.id.0] {
                let source = self.edges[edge.0].source;
                if self.degree(source) == 1 {
                    foods.insert(source);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn payload(&self, id: NodeId) -> Option<&NodePayload> {
        self.node(id).map(|n| &n.payload)
    }

    pub fn molecule_node(&self, name: &str) -> Option<NodeId> {
        self.molecules.get(&MoleculeType::new(name)).copied()
    }

    pub fn reaction_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| matches!(&n.payload, NodePayload::Reaction { name: r, .. } if r == name))
            .map(|n| n.id)
    }

    pub fn out_edges(&self, id: NodeId) -> &[EdgeId] {
        self.out_edges
            .get(id.0)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    pub fn in_edges(&self, id: NodeId) -> &[EdgeId] {
        self.in_edges
            .get(id.0)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Incoming and outgoing edges; a self-loop appears twice.
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(id)
            .iter()
            .chain(self.in_edges(id).iter())
            .copied()
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.out_edges(id).len() + self.in_edges(id).len()
    }

    /// True if another edge with the same source and target and a smaller
    /// ordinal exists. Such edges get their bend flipped.
    pub fn is_second_of_pair(&self, id: EdgeId) -> bool {
        self.edge(id).is_some_and(|e| e.second_of_pair)
    }

    /// Edges between `source` and `target` in that direction.
    pub fn edges_between(&self, source: NodeId, target: NodeId) -> Vec<EdgeId> {
        self.out_edges(source)
            .iter()
            .copied()
            .filter(|&e| self.edges[e.0].target == target)
            .collect()
    }

    /// Number of weakly connected components.
    pub fn connected_components(&self) -> usize {
        let mut parent: Vec<usize> = (0..self.nodes.len()).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for edge in &self.edges {
            let a = find(&mut parent, edge.source.0);
            let b = find(&mut parent, edge.target.0);
            if a != b {
                parent[a.max(b)] = a.min(b);
            }
        }

        (0..self.nodes.len())
            .filter(|&i| find(&mut parent, i) == i)
            .count()
    }
}

fn participants(reaction: &Reaction) -> impl Iterator<Item = &MoleculeType> {
    reaction
        .reactants
        .iter()
        .chain(reaction.products.iter())
        .chain(reaction.catalysts.iter())
        .chain(reaction.inhibitions.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn system(reactions: Vec<Reaction>, foods: &[&str]) -> ReactionSystem {
        ReactionSystem {
            name: "test".to_string(),
            reactions,
            foods: foods.iter().map(|f| MoleculeType::new(*f)).collect(),
        }
    }

    fn edge_tuple(g: &ReactionGraph, e: &Edge) -> (String, String, EdgeKind) {
        let label = |id: NodeId| g.payload(id).unwrap().label().to_string();
        (label(e.source), label(e.target), e.kind)
    }

    #[test]
    fn test_single_reaction_with_catalyst() {
        let r1 = Reaction::new("R1")
            .with_reactants(&["F"])
            .with_products(&["P"])
            .with_catalysts(&["C"]);
        let (g, foods) = ReactionGraph::build(&system(vec![r1], &["F"]));

        assert_eq!(g.node_count(), 4);
        let labels: Vec<&str> = g.nodes().map(|n| n.payload.label()).collect();
        assert_eq!(labels, vec!["R1", "F", "P", "C"]);

        let edges: Vec<_> = g.edges().map(|e| edge_tuple(&g, e)).collect();
        assert_eq!(
            edges,
            vec![
                ("F".to_string(), "R1".to_string(), EdgeKind::Reactant),
                ("R1".to_string(), "P".to_string(), EdgeKind::Product),
                ("C".to_string(), "R1".to_string(), EdgeKind::Catalyst),
            ]
        );

        let f = g.molecule_node("F").unwrap();
        assert_eq!(foods.iter().copied().collect::<Vec<_>>(), vec![f]);
        assert_eq!(g.connected_components(), 1);
    }

    #[test]
    fn test_conjunction_catalyst_expands_to_marker() {
        let r = Reaction::new("R")
            .with_reactants(&["X"])
            .with_products(&["Y"])
            .with_catalysts(&["A & B"]);
        let (g, foods) = ReactionGraph::build(&system(vec![r], &[]));

        let a = g.molecule_node("A").unwrap();
        let b = g.molecule_node("B").unwrap();
        let marker = g.molecule_node("A & B").unwrap();
        let reaction = g.reaction_node("R").unwrap();
        assert!(matches!(g.payload(marker), Some(NodePayload::Conjunction(_))));

        assert_eq!(g.edges_between(a, marker).len(), 1);
        assert_eq!(g.edges_between(b, marker).len(), 1);
        assert_eq!(g.edges_between(marker, reaction).len(), 1);

        // A and B only feed the marker, so both are inferred food.
        assert!(foods.contains(&a));
        assert!(foods.contains(&b));
    }

    #[test]
    fn test_conjunction_inference_requires_degree_one() {
        let r1 = Reaction::new("R1")
            .with_reactants(&["X"])
            .with_products(&["Y"])
            .with_catalysts(&["A&B"]);
        let r2 = Reaction::new("R2").with_reactants(&["B"]).with_products(&["Z"]);
        let (g, foods) = ReactionGraph::build(&system(vec![r1, r2], &[]));

        let a = g.molecule_node("A").unwrap();
        let b = g.molecule_node("B").unwrap();
        assert_eq!(g.degree(a), 1);
        assert_eq!(g.degree(b), 2);
        assert!(foods.contains(&a));
        assert!(!foods.contains(&b));
    }

    #[test]
    fn test_shared_conjunction_wired_per_reaction() {
        let r1 = Reaction::new("R1").with_reactants(&["X"]).with_catalysts(&["A&B"]);
        let r2 = Reaction::new("R2").with_reactants(&["X"]).with_catalysts(&["A&B"]);
        let (g, foods) = ReactionGraph::build(&system(vec![r1, r2], &[]));

        let a = g.molecule_node("A").unwrap();
        let marker = g.molecule_node("A&B").unwrap();
        let parallel = g.edges_between(a, marker);
        assert_eq!(parallel.len(), 2);
        assert!(!g.is_second_of_pair(parallel[0]));
        assert!(g.is_second_of_pair(parallel[1]));
        assert_eq!(g.degree(a), 2);
        assert_eq!(g.out_edges(marker).len(), 2);
        // two feeding edges, so A is not inferred as food
        assert!(!foods.contains(&a));
    }

    #[test]
    fn test_molecule_created_once() {
        let r1 = Reaction::new("R1").with_reactants(&["A"]).with_products(&["B"]);
        let r2 = Reaction::new("R2").with_reactants(&["B"]).with_products(&["A"]);
        let (g, _) = ReactionGraph::build(&system(vec![r1, r2], &[]));
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_reversible_kinds() {
        let r = Reaction::new("R")
            .with_reactants(&["A"])
            .with_products(&["B"])
            .with_direction(Direction::Both);
        let (g, _) = ReactionGraph::build(&system(vec![r], &[]));
        let kinds: Vec<EdgeKind> = g.edges().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EdgeKind::ReactantReversible, EdgeKind::ProductReversible]
        );
    }

    #[test]
    fn test_second_of_pair_is_antisymmetric() {
        // A is both reactant and catalyst: two edges A -> R.
        let r = Reaction::new("R")
            .with_reactants(&["A"])
            .with_catalysts(&["A"])
            .with_inhibitions(&["I"]);
        let (g, _) = ReactionGraph::build(&system(vec![r], &[]));

        let a = g.molecule_node("A").unwrap();
        let reaction = g.reaction_node("R").unwrap();
        let pair = g.edges_between(a, reaction);
        assert_eq!(pair.len(), 2);
        let flags: Vec<bool> = pair.iter().map(|&e| g.is_second_of_pair(e)).collect();
        assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
        assert!(!g.is_second_of_pair(pair[0]));
        assert!(g.is_second_of_pair(pair[1]));

        let i = g.molecule_node("I").unwrap();
        assert!(!g.is_second_of_pair(g.edges_between(i, reaction)[0]));
    }

    #[test]
    fn test_second_of_pair_stable_across_rebuilds() {
        let r = Reaction::new("R").with_reactants(&["A"]).with_catalysts(&["A"]);
        let sys = system(vec![r], &[]);
        let (g1, _) = ReactionGraph::build(&sys);
        let (g2, _) = ReactionGraph::build(&sys);
        let flags1: Vec<bool> = g1.edges().map(|e| g1.is_second_of_pair(e.id)).collect();
        let flags2: Vec<bool> = g2.edges().map(|e| g2.is_second_of_pair(e.id)).collect();
        assert_eq!(flags1, flags2);
    }

    #[test]
    fn test_unresolvable_names_are_skipped() {
        let r = Reaction::new("R")
            .with_reactants(&["", "A"])
            .with_catalysts(&["&"]);
        let (g, _) = ReactionGraph::build(&system(vec![r], &[]));
        // The "&" marker exists but has no constituents; the empty name is skipped.
        assert!(g.molecule_node("").is_none());
        assert_eq!(g.edges_between(g.molecule_node("A").unwrap(), NodeId(0)).len(), 1);
        assert_eq!(g.in_edges(g.molecule_node("&").unwrap()).len(), 0);
    }

    #[test]
    fn test_connected_components() {
        let r1 = Reaction::new("R1").with_reactants(&["A"]);
        let r2 = Reaction::new("R2").with_reactants(&["B"]);
        let (g, _) = ReactionGraph::build(&system(vec![r1, r2], &[]));
        assert_eq!(g.connected_components(), 2);
        assert_eq!(ReactionGraph::new().connected_components(), 0);
    }

    #[test]
    fn test_empty_system() {
        let (g, foods) = ReactionGraph::build(&ReactionSystem::default());
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(foods.is_empty());
    }

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(1.0, 2.0);
        let b = Position::new(4.0, 6.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), Position::new(2.5, 4.0));
        assert_eq!((b - a) * 2.0, Position::new(6.0, 8.0));
        assert_eq!(a.dot(b), 16.0);
    }
}
