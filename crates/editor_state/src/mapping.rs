// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Position mapping through document changes.

/// The position change caused by a single step: `old_size` positions at
/// `start` were replaced by `new_size` positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepMap {
    start: usize,
    old_size: usize,
    new_size: usize,
}

/// Result of mapping a single position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapResult {
    pub pos: usize,
    /// The content around the position was deleted.
    pub deleted: bool,
}

impl StepMap {
    pub fn new(start: usize, old_size: usize, new_size: usize) -> Self {
        Self {
            start,
            old_size,
            new_size,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn old_end(&self) -> usize {
        self.start + self.old_size
    }

    /// Map `pos`. `assoc` decides which side a position at an insertion
    /// point sticks to: negative keeps it before the inserted content,
    /// positive moves it after.
    pub fn map(&self, pos: usize, assoc: i8) -> usize {
        self.map_result(pos, assoc).pos
    }

    pub fn map_result(&self, pos: usize, assoc: i8) -> MapResult {
        let end = self.old_end();
        if pos < self.start {
            return MapResult {
                pos,
                deleted: false,
            };
        }
        if pos > end {
            return MapResult {
                pos: pos + self.new_size - self.old_size,
                deleted: false,
            };
        }
        let side = if self.old_size == 0 {
            assoc
        } else if pos == self.start {
            -1
        } else if pos == end {
            1
        } else {
            assoc
        };
        let mapped = self.start + if side < 0 { 0 } else { self.new_size };
        MapResult {
            pos: mapped,
            deleted: self.old_size > 0 && pos > self.start && pos < end,
        }
    }

    /// Whether this step deleted any content inside `[from, to)`.
    pub fn deletes_within(&self, from: usize, to: usize) -> bool {
        self.old_size > 0 && self.start < to && self.old_end() > from
    }
}

/// A sequence of step maps, applied in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn append(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    pub fn map(&self, pos: usize, assoc: i8) -> usize {
        self.map_result(pos, assoc).pos
    }

    pub fn map_result(&self, pos: usize, assoc: i8) -> MapResult {
        let mut deleted = false;
        let mut pos = pos;
        for map in &self.maps {
            let result = map.map_result(pos, assoc);
            deleted |= result.deleted;
            pos = result.pos;
        }
        MapResult { pos, deleted }
    }

    /// Whether any step deleted content originally inside `[from, to)`.
    pub fn touches_deleted(&self, from: usize, to: usize) -> bool {
        let (mut from, mut to) = (from, to);
        for map in &self.maps {
            if from >= to {
                return false;
            }
            if map.deletes_within(from, to) {
                return true;
            }
            from = map.map(from, 1);
            to = map.map(to, -1);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_respects_assoc() {
        let map = StepMap::new(5, 0, 3);
        assert_eq!(map.map(5, -1), 5);
        assert_eq!(map.map(5, 1), 8);
        assert_eq!(map.map(4, 1), 4);
        assert_eq!(map.map(6, -1), 9);
    }

    #[test]
    fn deletion_collapses_range() {
        let map = StepMap::new(5, 2, 0);
        assert_eq!(map.map(5, 1), 5);
        assert_eq!(map.map(7, -1), 5);
        assert_eq!(map.map(9, 1), 7);
        assert!(map.map_result(6, 1).deleted);
        assert!(!map.map_result(5, 1).deleted);
    }

    #[test]
    fn mapping_composes_steps() {
        let mut mapping = Mapping::new();
        mapping.append(StepMap::new(1, 0, 2));
        mapping.append(StepMap::new(1, 1, 0));
        assert_eq!(mapping.map(4, 1), 5);
    }

    #[test]
    fn touches_deleted_tracks_shifted_ranges() {
        let mut mapping = Mapping::new();
        mapping.append(StepMap::new(1, 0, 2));
        mapping.append(StepMap::new(6, 1, 0));
        assert!(mapping.touches_deleted(4, 5));
        assert!(!mapping.touches_deleted(1, 2));
    }
}
