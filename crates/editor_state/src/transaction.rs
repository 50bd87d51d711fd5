// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use crate::doc::Doc;
use crate::mapping::Mapping;
use crate::selection::Selection;
use crate::utf16::utf16_len;
use crate::{EditorState, StepError};

/// A batch of document changes and/or a selection change, built from an
/// [`EditorState`] and applied with [`EditorState::apply`].
#[derive(Clone, Debug)]
pub struct Transaction {
    before: Doc,
    doc: Doc,
    selection: Selection,
    selection_set: bool,
    mapping: Mapping,
    meta: HashMap<String, String>,
}

impl Transaction {
    pub(crate) fn new(state: &EditorState) -> Self {
        Self {
            before: state.doc().clone(),
            doc: state.doc().clone(),
            selection: state.selection(),
            selection_set: false,
            mapping: Mapping::new(),
            meta: HashMap::new(),
        }
    }

    /// The document the transaction started from.
    pub fn before(&self) -> &Doc {
        &self.before
    }

    /// The document after all steps so far.
    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    pub fn doc_changed(&self) -> bool {
        !self.mapping.is_empty()
    }

    /// Whether the selection was explicitly set.
    pub fn selection_set(&self) -> bool {
        self.selection_set
    }

    /// Replace `[from, to)` (inside one textblock) with `text`.
    pub fn replace_text(
        &mut self,
        from: usize,
        to: usize,
        text: &str,
    ) -> Result<&mut Self, StepError> {
        let map = self.doc.replace_text(from, to, text)?;
        self.push_map(map);
        Ok(self)
    }

    pub fn insert_text(
        &mut self,
        pos: usize,
        text: &str,
    ) -> Result<&mut Self, StepError> {
        self.replace_text(pos, pos, text)
    }

    pub fn delete(
        &mut self,
        from: usize,
        to: usize,
    ) -> Result<&mut Self, StepError> {
        self.replace_text(from, to, "")
    }

    /// Replace the selection with `text` and put the cursor after it.
    pub fn replace_selection_with_text(
        &mut self,
        text: &str,
    ) -> Result<&mut Self, StepError> {
        let from = self.selection.from();
        let to = self.selection.to();
        self.replace_text(from, to, text)?;
        Ok(self.set_selection(Selection::cursor(from + utf16_len(text))))
    }

    pub fn split_block(&mut self, pos: usize) -> Result<&mut Self, StepError> {
        let map = self.doc.split_block(pos)?;
        self.push_map(map);
        Ok(self)
    }

    pub fn set_selection(&mut self, selection: Selection) -> &mut Self {
        self.selection = selection.clamp(self.doc.content_size());
        self.selection_set = true;
        self
    }

    pub fn set_meta(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    fn push_map(&mut self, map: crate::StepMap) {
        let mut single = Mapping::new();
        single.append(map);
        self.selection = self.selection.map(&single);
        self.mapping.append(map);
    }
}

#[cfg(test)]
mod tests {
    use crate::{EditorState, Selection};

    #[test]
    fn fresh_transaction_changes_nothing() {
        let state = EditorState::from_text("abc");
        let tr = state.tr();
        assert!(!tr.doc_changed());
        assert!(!tr.selection_set());
    }

    #[test]
    fn typing_moves_the_cursor() {
        let state = EditorState::from_text("ac").with_selection(Selection::cursor(2));
        let mut tr = state.tr();
        tr.replace_selection_with_text("b").unwrap();
        assert!(tr.doc_changed());
        assert!(tr.selection_set());
        assert_eq!(tr.doc().text_content(), "abc");
        assert_eq!(tr.selection(), Selection::cursor(3));
    }

    #[test]
    fn unset_selection_is_mapped() {
        let state = EditorState::from_text("abc").with_selection(Selection::cursor(3));
        let mut tr = state.tr();
        tr.delete(1, 2).unwrap();
        assert!(!tr.selection_set());
        assert_eq!(tr.selection(), Selection::cursor(2));
    }

    #[test]
    fn meta_round_trips() {
        let state = EditorState::from_text("");
        let mut tr = state.tr();
        tr.set_meta("origin", "test");
        assert_eq!(tr.get_meta("origin"), Some("test"));
        assert_eq!(tr.get_meta("other"), None);
    }
}
