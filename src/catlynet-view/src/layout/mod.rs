// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Force-directed placement of reaction graph nodes.

pub mod config;
pub mod fruchterman_reingold;

pub use config::LayoutConfig;
pub use fruchterman_reingold::{LayoutOutcome, NoProgress, ProgressListener, compute_layout};
