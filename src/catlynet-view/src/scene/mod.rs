// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod interaction;
pub mod render;
pub mod style;
pub mod visual;

pub use interaction::{Click, HitTarget, Interaction};
pub use render::render_svg;
pub use style::{Color, EdgeStyle, Font, NodeRole, NodeStyle, SceneStyle, ShapeKind};
pub use visual::{EdgeVisual, Effect, NodeVisual, Scene};
