// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Persisted markers that stop suggesters from matching at a position.

use editor_state::utf16::utf16_len;
use editor_state::{Decoration, DecorationAttrs, DecorationSet, Mapping};

const IGNORED: &str = "ignored";
const NAME: &str = "name";
const SPECIFIC: &str = "specific";
const CHAR: &str = "char";

/// Ignored regions, stored as inline decorations over the trigger
/// character so they render and map like any other decoration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnoredRegions {
    set: DecorationSet,
}

impl IgnoredRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore `[from, from + char)` for the suggester `name`. Re-adding an
    /// existing region replaces it.
    pub(crate) fn add(
        &mut self,
        from: usize,
        name: &str,
        char: &str,
        specific: bool,
        attrs: DecorationAttrs,
    ) {
        self.remove(from, name);
        let decoration = Decoration::inline(from, from + utf16_len(char), attrs)
            .with_spec(IGNORED, "true")
            .with_spec(NAME, name)
            .with_spec(SPECIFIC, specific.to_string())
            .with_spec(CHAR, char);
        self.set = self.set.add(vec![decoration]);
    }

    pub(crate) fn remove(&mut self, from: usize, name: &str) {
        self.set = self.set.remove_where(|decoration| {
            decoration.from() == from && decoration.spec_value(NAME) == Some(name)
        });
    }

    /// Remove every region for `name`, or every region at all.
    pub(crate) fn clear(&mut self, name: Option<&str>) {
        self.set = match name {
            Some(name) => self
                .set
                .remove_where(|decoration| decoration.spec_value(NAME) == Some(name)),
            None => DecorationSet::empty(),
        };
    }

    /// Whether the suggester `name` is blocked from matching at `from`.
    pub fn is_ignored(&self, from: usize, name: &str) -> bool {
        !self
            .set
            .find(from, from, |decoration| {
                decoration.from() == from
                    && (decoration.spec_value(SPECIFIC) != Some("true")
                        || decoration.spec_value(NAME) == Some(name))
            })
            .is_empty()
    }

    /// Map through a document change. A region survives only while it
    /// still spans exactly its trigger character; pasting into it or
    /// deleting it drops the region.
    pub(crate) fn map(&mut self, mapping: &Mapping) {
        let kept = self
            .set
            .iter()
            .filter_map(|decoration| {
                let (from, to) = decoration.map_range(mapping);
                let expected =
                    utf16_len(decoration.spec_value(CHAR).unwrap_or_default());
                (to >= from && to - from == expected)
                    .then(|| decoration.with_range(from, to))
            })
            .collect();
        self.set = DecorationSet::create(kept);
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.set
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
