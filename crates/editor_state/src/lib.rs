// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The document-engine boundary consumed by the suggestion state machine
//! and the extension manager.
//!
//! A [`Doc`] is a flat list of textblocks addressed by UTF-16 positions.
//! Changes are expressed as [`Transaction`]s built from an [`EditorState`];
//! every step records a [`StepMap`] so positions held elsewhere (matches,
//! decorations) can be mapped forward. An [`EditorView`] owns the current
//! state and drives a list of [`Plugin`]s through `apply`, view updates and
//! input handling.

mod decoration;
mod doc;
mod mapping;
mod plugin;
mod selection;
mod state;
mod transaction;
pub mod utf16;
mod view;

pub use decoration::{Decoration, DecorationAttrs, DecorationSet};
pub use doc::{Block, Doc, ResolvedPos, PARAGRAPH};
pub use mapping::{MapResult, Mapping, StepMap};
pub use plugin::{HandlerOutcome, KeyEvent, Plugin};
pub use selection::Selection;
pub use state::EditorState;
pub use transaction::Transaction;
pub use view::EditorView;

/// A step could not be applied to the document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("Position {pos} is outside the document (size {size})")]
    OutOfRange { pos: usize, size: usize },

    #[error("Position {pos} is not inside a textblock")]
    OutsideTextblock { pos: usize },

    #[error("Range {from}..{to} spans more than one textblock")]
    CrossBlockRange { from: usize, to: usize },

    #[error("Invalid range {from}..{to}")]
    InvalidRange { from: usize, to: usize },
}
