// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Connector geometry between moving node shapes.

pub mod arrowhead;
pub mod common;
pub mod path;

pub use arrowhead::{ArrowheadFill, ArrowheadShape, arrowhead_for};
pub use common::Rect;
pub use path::{ArrowTransform, BendState, EdgePath, compute_path};
