// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Fruchterman–Reingold layout configuration.
///
/// All dimensions are in scene units (the units node shapes are drawn in).
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Number of force iterations. There is no early exit.
    pub iterations: usize,
    /// Worker threads for the repulsion pass. Zero means one per available
    /// core.
    pub threads: usize,
    /// Side length of the square working frame nodes are clamped to. The
    /// frame is centered on the origin.
    pub frame_size: f64,
    /// Starting temperature as a fraction of `frame_size`. The temperature
    /// decays linearly to zero over `iterations`.
    pub initial_temperature_factor: f64,
    /// Seed for the random initial placement.
    pub seed: u64,
    /// Enable verbose debug logging.
    pub debug: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            threads: 0,
            frame_size: 1000.0,
            initial_temperature_factor: 0.1,
            seed: 42,
            debug: false,
        }
    }
}

impl LayoutConfig {
    /// Clamp values that would make the simulation meaningless.
    pub fn validate(&mut self) {
        if !self.frame_size.is_finite() || self.frame_size <= 0.0 {
            self.frame_size = Self::default().frame_size;
        }
        if !self.initial_temperature_factor.is_finite() || self.initial_temperature_factor <= 0.0
        {
            self.initial_temperature_factor = Self::default().initial_temperature_factor;
        }
    }

    /// Thread count with the zero default resolved.
    pub fn effective_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        }
    }

    pub fn initial_temperature(&self) -> f64 {
        self.frame_size * self.initial_temperature_factor
    }
}
