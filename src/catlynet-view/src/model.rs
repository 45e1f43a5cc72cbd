// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Read-only view of the reaction system consumed by the graph adapter.
//!
//! The reaction system itself (parsing, editing, closure computations) lives
//! outside this crate; these types only carry what the view needs: the
//! ordered reactions, their participant lists, the direction flag and the
//! declared food set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::model_err;

/// Separator used inside catalyst names to express an AND-combination,
/// e.g. `"A & B"` means both A and B must be present.
pub const CONJUNCTION_MARKER: char = '&';

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoleculeType(String);

impl MoleculeType {
    pub fn new(name: impl Into<String>) -> Self {
        MoleculeType(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_conjunction(&self) -> bool {
        self.0.contains(CONJUNCTION_MARKER)
    }

    /// Trimmed, non-empty constituents of an AND-combined name. A plain
    /// molecule yields itself.
    pub fn constituents(&self) -> Vec<MoleculeType> {
        self.0
            .split(CONJUNCTION_MARKER)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(MoleculeType::new)
            .collect()
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MoleculeType {
    fn from(name: &str) -> Self {
        MoleculeType::new(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
    Both,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    pub name: String,
    pub reactants: Vec<MoleculeType>,
    pub products: Vec<MoleculeType>,
    /// Catalyst conjunctions; an entry may be an AND-combination.
    pub catalysts: Vec<MoleculeType>,
    pub inhibitions: Vec<MoleculeType>,
    pub direction: Direction,
}

impl Reaction {
    pub fn new(name: impl Into<String>) -> Self {
        Reaction {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_reactants(mut self, names: &[&str]) -> Self {
        self.reactants = names.iter().map(|n| MoleculeType::new(*n)).collect();
        self
    }

    pub fn with_products(mut self, names: &[&str]) -> Self {
        self.products = names.iter().map(|n| MoleculeType::new(*n)).collect();
        self
    }

    pub fn with_catalysts(mut self, names: &[&str]) -> Self {
        self.catalysts = names.iter().map(|n| MoleculeType::new(*n)).collect();
        self
    }

    pub fn with_inhibitions(mut self, names: &[&str]) -> Self {
        self.inhibitions = names.iter().map(|n| MoleculeType::new(*n)).collect();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn is_reversible(&self) -> bool {
        self.direction == Direction::Both
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionSystem {
    pub name: String,
    pub reactions: Vec<Reaction>,
    pub foods: BTreeSet<MoleculeType>,
}

impl ReactionSystem {
    pub fn new(name: impl Into<String>) -> Self {
        ReactionSystem {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let system: ReactionSystem = serde_json::from_str(contents)?;
        system.check()?;
        Ok(system)
    }

    /// Reaction names label graph nodes and must be unique.
    pub fn check(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for reaction in &self.reactions {
            if !seen.insert(reaction.name.as_str()) {
                return model_err!(
                    BadModel,
                    format!("duplicate reaction name '{}'", reaction.name)
                );
            }
        }
        Ok(())
    }

    pub fn is_food(&self, molecule: &MoleculeType) -> bool {
        self.foods.contains(molecule)
    }

    pub fn size(&self) -> usize {
        self.reactions.len()
    }
}
