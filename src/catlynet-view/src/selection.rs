// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeSet;

/// Net effect of one selection mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChange<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> SelectionChange<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<T> Default for SelectionChange<T> {
    fn default() -> Self {
        SelectionChange {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// Ordered set of selected items. Every mutation returns what changed so
/// callers can update only the affected visuals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionModel<T: Ord + Copy> {
    selected: BTreeSet<T>,
}

impl<T: Ord + Copy> Default for SelectionModel<T> {
    fn default() -> Self {
        SelectionModel {
            selected: BTreeSet::new(),
        }
    }
}

impl<T: Ord + Copy> SelectionModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, item: T) -> bool {
        self.selected.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.selected.iter().copied()
    }

    pub fn select(&mut self, item: T) -> SelectionChange<T> {
        let mut change = SelectionChange::default();
        if self.selected.insert(item) {
            change.added.push(item);
        }
        change
    }

    pub fn deselect(&mut self, item: T) -> SelectionChange<T> {
        let mut change = SelectionChange::default();
        if self.selected.remove(&item) {
            change.removed.push(item);
        }
        change
    }

    pub fn toggle(&mut self, item: T) -> SelectionChange<T> {
        if self.is_selected(item) {
            self.deselect(item)
        } else {
            self.select(item)
        }
    }

    pub fn select_all(&mut self, items: impl IntoIterator<Item = T>) -> SelectionChange<T> {
        let mut change = SelectionChange::default();
        for item in items {
            if self.selected.insert(item) {
                change.added.push(item);
            }
        }
        change
    }

    pub fn clear(&mut self) -> SelectionChange<T> {
        let removed = std::mem::take(&mut self.selected);
        SelectionChange {
            added: Vec::new(),
            removed: removed.into_iter().collect(),
        }
    }

    /// Make `items` the whole selection. Items kept across the replacement
    /// appear in neither list.
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) -> SelectionChange<T> {
        let next: BTreeSet<T> = items.into_iter().collect();
        let change = SelectionChange {
            added: next.difference(&self.selected).copied().collect(),
            removed: self.selected.difference(&next).copied().collect(),
        };
        self.selected = next;
        change
    }

    /// Drop items rejected by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(T) -> bool) -> SelectionChange<T> {
        let removed: Vec<T> = self.selected.iter().copied().filter(|&t| !keep(t)).collect();
        for item in &removed {
            self.selected.remove(item);
        }
        SelectionChange {
            added: Vec::new(),
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_deselect_report_changes() {
        let mut sel = SelectionModel::new();
        assert_eq!(sel.select(3).added, vec![3]);
        assert!(sel.select(3).is_empty());
        assert!(sel.is_selected(3));
        assert_eq!(sel.deselect(3).removed, vec![3]);
        assert!(sel.deselect(3).is_empty());
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut sel = SelectionModel::new();
        assert_eq!(sel.toggle(1).added, vec![1]);
        assert_eq!(sel.toggle(1).removed, vec![1]);
    }

    #[test]
    fn test_replace_reports_difference() {
        let mut sel = SelectionModel::new();
        sel.select_all([1, 2, 3]);
        let change = sel.replace([3, 4]);
        assert_eq!(change.added, vec![4]);
        assert_eq!(change.removed, vec![1, 2]);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_clear_and_retain() {
        let mut sel = SelectionModel::new();
        sel.select_all([5, 6, 7]);
        let change = sel.retain(|x| x != 6);
        assert_eq!(change.removed, vec![6]);
        assert_eq!(sel.len(), 2);
        let change = sel.clear();
        assert_eq!(change.removed, vec![5, 7]);
        assert!(sel.is_empty());
    }
}
