// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The plugin contract through which extensions hook into the view.

use std::fmt;

use crate::decoration::DecorationSet;
use crate::state::EditorState;
use crate::transaction::Transaction;

/// A key press, described by its key name and modifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Normalised binding name: modifiers in `Ctrl-Alt-Shift-Meta` order
    /// followed by the key, e.g. `"Ctrl-Shift-Enter"`.
    pub fn binding_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.ctrl, "Ctrl-"),
            (self.alt, "Alt-"),
            (self.shift, "Shift-"),
            (self.meta, "Meta-"),
        ];
        for (active, prefix) in modifiers {
            if active {
                f.write_str(prefix)?;
            }
        }
        f.write_str(&self.key)
    }
}

/// What a plugin did with an input event.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// Not handled; the next plugin gets a chance.
    Ignored,
    /// Handled without changes.
    Handled,
    /// Handled; the transaction is dispatched once the handler loop ends.
    Dispatch(Transaction),
}

impl HandlerOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, HandlerOutcome::Ignored)
    }
}

/// A view plugin.
///
/// All hooks run synchronously on the dispatching call stack. A hook must
/// never dispatch directly; it returns [`HandlerOutcome::Dispatch`] so the
/// view can dispatch once the current pass is complete.
pub trait Plugin {
    /// Unique key identifying the plugin.
    fn key(&self) -> &str;

    /// Update plugin state for a transaction. `new_state` already contains
    /// the transaction's document and selection.
    fn apply(
        &mut self,
        _tr: &Transaction,
        _old_state: &EditorState,
        _new_state: &EditorState,
    ) {
    }

    fn decorations(&self, _state: &EditorState) -> Option<DecorationSet> {
        None
    }

    fn handle_key_down(
        &mut self,
        _state: &EditorState,
        _key: &KeyEvent,
    ) -> HandlerOutcome {
        HandlerOutcome::Ignored
    }

    fn handle_text_input(
        &mut self,
        _state: &EditorState,
        _from: usize,
        _to: usize,
        _text: &str,
    ) -> HandlerOutcome {
        HandlerOutcome::Ignored
    }

    /// Called once per view update, after every plugin has applied the
    /// transaction.
    fn update_view(&mut self, _state: &EditorState, _prev_state: &EditorState) {
    }

    fn destroy(&mut self) {}
}
