// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline decorations: styling attached to a range of the document without
//! being part of its content.

use std::collections::BTreeMap;

use crate::mapping::Mapping;

/// How a decoration renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecorationAttrs {
    /// Wrapping element name, e.g. `"span"`.
    pub node_name: String,
    pub class: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl DecorationAttrs {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: Option<String>) -> Self {
        self.class = class;
        self
    }

    pub fn with_attr(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoration {
    from: usize,
    to: usize,
    attrs: DecorationAttrs,
    spec: BTreeMap<String, String>,
}

impl Decoration {
    pub fn inline(from: usize, to: usize, attrs: DecorationAttrs) -> Self {
        Self {
            from,
            to,
            attrs,
            spec: BTreeMap::new(),
        }
    }

    /// Attach a key/value to the decoration's spec. The spec is metadata
    /// for whoever created the decoration and is not rendered.
    pub fn with_spec(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.spec.insert(key.into(), value.into());
        self
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn attrs(&self) -> &DecorationAttrs {
        &self.attrs
    }

    pub fn spec(&self) -> &BTreeMap<String, String> {
        &self.spec
    }

    pub fn spec_value(&self, key: &str) -> Option<&str> {
        self.spec.get(key).map(String::as_str)
    }

    /// Map through a change. Inline decorations do not grow at their
    /// edges, so the start sticks forward and the end sticks backward.
    pub fn map_range(&self, mapping: &Mapping) -> (usize, usize) {
        (mapping.map(self.from, 1), mapping.map(self.to, -1))
    }

    pub fn with_range(&self, from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            ..self.clone()
        }
    }
}

/// An ordered collection of decorations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn create(decorations: Vec<Decoration>) -> Self {
        Self::empty().add(decorations)
    }

    /// A new set with `decorations` added.
    pub fn add(&self, decorations: Vec<Decoration>) -> Self {
        let mut all = self.decorations.clone();
        all.extend(decorations);
        all.sort_by_key(|decoration| (decoration.from, decoration.to));
        Self { decorations: all }
    }

    /// A new set without the decorations matching `predicate`.
    pub fn remove_where(
        &self,
        predicate: impl Fn(&Decoration) -> bool,
    ) -> Self {
        Self {
            decorations: self
                .decorations
                .iter()
                .filter(|decoration| !predicate(decoration))
                .cloned()
                .collect(),
        }
    }

    /// Decorations touching `[from, to]` that match `predicate`.
    pub fn find(
        &self,
        from: usize,
        to: usize,
        predicate: impl Fn(&Decoration) -> bool,
    ) -> Vec<&Decoration> {
        self.decorations
            .iter()
            .filter(|decoration| {
                decoration.from <= to && decoration.to >= from
            })
            .filter(|decoration| predicate(decoration))
            .collect()
    }

    /// Map every decoration through `mapping`, dropping the ones whose
    /// range collapsed.
    pub fn map(&self, mapping: &Mapping) -> Self {
        Self {
            decorations: self
                .decorations
                .iter()
                .filter_map(|decoration| {
                    let (from, to) = decoration.map_range(mapping);
                    (from < to).then(|| decoration.with_range(from, to))
                })
                .collect(),
        }
    }

    pub fn merge(&self, other: &DecorationSet) -> Self {
        self.add(other.decorations.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StepMap;

    fn deco(from: usize, to: usize, name: &str) -> Decoration {
        Decoration::inline(from, to, DecorationAttrs::new("span"))
            .with_spec("name", name)
    }

    #[test]
    fn add_keeps_decorations_sorted() {
        let set = DecorationSet::create(vec![deco(5, 6, "b"), deco(1, 2, "a")]);
        let names: Vec<_> =
            set.iter().filter_map(|d| d.spec_value("name")).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn find_matches_touching_ranges() {
        let set = DecorationSet::create(vec![deco(1, 3, "a"), deco(5, 6, "b")]);
        assert_eq!(set.find(3, 3, |_| true).len(), 1);
        assert_eq!(set.find(4, 4, |_| true).len(), 0);
        assert_eq!(
            set.find(0, 10, |d| d.spec_value("name") == Some("b")).len(),
            1
        );
    }

    #[test]
    fn map_drops_collapsed_decorations() {
        let set = DecorationSet::create(vec![deco(1, 3, "a"), deco(5, 6, "b")]);
        let mut mapping = Mapping::new();
        mapping.append(StepMap::new(4, 3, 0));
        let mapped = set.map(&mapping);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped.iter().next().map(Decoration::from), Some(1));
    }

    #[test]
    fn remove_where_filters() {
        let set = DecorationSet::create(vec![deco(1, 3, "a"), deco(5, 6, "b")]);
        let set = set.remove_where(|d| d.spec_value("name") == Some("a"));
        assert_eq!(set.len(), 1);
    }
}
