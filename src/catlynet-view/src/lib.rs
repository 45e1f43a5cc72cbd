// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Layout and view engine for reaction graphs: builds a bipartite
//! reaction/molecule graph from a reaction system, places it with a
//! parallel Fruchterman–Reingold simulation on a background thread, and
//! maintains a toolkit-independent scene with curved, re-routable edges.

#![forbid(unsafe_code)]

pub mod common;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod model;
pub mod orchestrator;
pub mod scene;
pub mod selection;
pub mod view;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::graph::{
    CoordinateMap, EdgeId, EdgeKind, FoodSet, NodeId, NodePayload, Position, ReactionGraph,
};
pub use self::layout::{LayoutConfig, LayoutOutcome, ProgressListener, compute_layout};
pub use self::model::{Direction, MoleculeType, Reaction, ReactionSystem};
pub use self::orchestrator::{
    LayoutCompletion, LayoutService, LayoutState, LogNotifier, LogStatus, Notifier, StatusDisplay,
};
pub use self::scene::{Scene, SceneStyle, render_svg};
pub use self::selection::{SelectionChange, SelectionModel};
pub use self::view::{ReactionGraphView, ViewConfig};
