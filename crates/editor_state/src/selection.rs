// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::mapping::Mapping;

/// A text selection. `anchor` stays put while `head` moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    anchor: usize,
    head: usize,
}

impl Selection {
    pub fn range(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection.
    pub fn cursor(pos: usize) -> Self {
        Self::range(pos, pos)
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn empty(&self) -> bool {
        self.anchor == self.head
    }

    pub(crate) fn map(&self, mapping: &Mapping) -> Self {
        Self {
            anchor: mapping.map(self.anchor, 1),
            head: mapping.map(self.head, 1),
        }
    }

    pub(crate) fn clamp(&self, size: usize) -> Self {
        Self {
            anchor: self.anchor.min(size),
            head: self.head.min(size),
        }
    }
}
