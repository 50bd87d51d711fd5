// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::doc::Doc;
use crate::selection::Selection;
use crate::transaction::Transaction;

/// An immutable snapshot of the document and selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    doc: Doc,
    selection: Selection,
}

impl EditorState {
    pub fn new(doc: Doc, selection: Selection) -> Self {
        let selection = selection.clamp(doc.content_size());
        Self { doc, selection }
    }

    /// A state with one paragraph per line of `text` and the cursor at the
    /// end of the last paragraph.
    pub fn from_text(text: &str) -> Self {
        let doc = Doc::from_text(text);
        let end = doc.content_size() - 1;
        Self::new(doc, Selection::cursor(end))
    }

    pub fn with_selection(self, selection: Selection) -> Self {
        Self::new(self.doc, selection)
    }

    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Start a transaction from this state.
    pub fn tr(&self) -> Transaction {
        Transaction::new(self)
    }

    /// The state produced by `tr`.
    pub fn apply(&self, tr: &Transaction) -> EditorState {
        #[cfg(any(test, feature = "assert-invariants"))]
        assert_eq!(
            tr.before(),
            self.doc(),
            "transaction was started from a different document"
        );
        EditorState::new(tr.doc().clone(), tr.selection())
    }
}
