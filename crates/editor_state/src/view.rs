// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A headless editor view: owns the current state and drives the plugins.

use std::fmt;

use log::{debug, trace};

use crate::decoration::DecorationSet;
use crate::plugin::{HandlerOutcome, KeyEvent, Plugin};
use crate::selection::Selection;
use crate::state::EditorState;
use crate::transaction::Transaction;
use crate::utf16::{char_len_before, utf16_len};
use crate::StepError;

pub struct EditorView {
    state: EditorState,
    plugins: Vec<Box<dyn Plugin>>,
    /// Bumped on every dispatch and state replacement.
    updates: u64,
    destroyed: bool,
}

impl EditorView {
    pub fn new(state: EditorState, plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self {
            state,
            plugins,
            updates: 0,
            destroyed: false,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn plugin_keys(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.key()).collect()
    }

    /// How many times the state has been set, whether or not it changed.
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Apply `tr`: every plugin sees the transaction, then every plugin
    /// gets a view update.
    pub fn dispatch(&mut self, tr: Transaction) {
        trace!(
            "dispatch: doc_changed={} selection_set={}",
            tr.doc_changed(),
            tr.selection_set()
        );
        let new_state = self.state.apply(&tr);
        for plugin in self.plugins.iter_mut() {
            plugin.apply(&tr, &self.state, &new_state);
        }
        let prev_state = std::mem::replace(&mut self.state, new_state);
        self.update_plugin_views(&prev_state);
    }

    /// Replace the state without a transaction. Plugins only get a view
    /// update.
    pub fn update_state(&mut self, state: EditorState) {
        let prev_state = std::mem::replace(&mut self.state, state);
        self.update_plugin_views(&prev_state);
    }

    fn update_plugin_views(&mut self, prev_state: &EditorState) {
        self.updates += 1;
        for plugin in self.plugins.iter_mut() {
            plugin.update_view(&self.state, prev_state);
        }
    }

    /// Offer a key press to the plugins. Returns whether one handled it.
    pub fn key_down(&mut self, key: &KeyEvent) -> bool {
        let mut outcome = HandlerOutcome::Ignored;
        for plugin in self.plugins.iter_mut() {
            outcome = plugin.handle_key_down(&self.state, key);
            if outcome.is_handled() {
                debug!("key {key} handled by {}", plugin.key());
                break;
            }
        }
        self.finish(outcome)
    }

    /// Text typed over `[from, to)`. Plugins may intercept it; otherwise the
    /// text is inserted and the cursor placed after it.
    pub fn text_input(
        &mut self,
        from: usize,
        to: usize,
        text: &str,
    ) -> Result<(), StepError> {
        let mut outcome = HandlerOutcome::Ignored;
        for plugin in self.plugins.iter_mut() {
            outcome = plugin.handle_text_input(&self.state, from, to, text);
            if outcome.is_handled() {
                break;
            }
        }
        if self.finish(outcome) {
            return Ok(());
        }
        let mut tr = self.state.tr();
        tr.replace_text(from, to, text)?
            .set_selection(Selection::cursor(from + utf16_len(text)));
        self.dispatch(tr);
        Ok(())
    }

    /// Type `text` one char at a time at the selection, the way a user
    /// would, producing one transaction per char.
    pub fn type_text(&mut self, text: &str) -> Result<(), StepError> {
        for ch in text.chars() {
            let selection = self.state.selection();
            let mut buffer = [0; 4];
            self.text_input(
                selection.from(),
                selection.to(),
                ch.encode_utf8(&mut buffer),
            )?;
        }
        Ok(())
    }

    /// Delete the selection, or the char before the cursor. Does nothing
    /// at the start of a textblock.
    pub fn backspace(&mut self) -> Result<bool, StepError> {
        let selection = self.state.selection();
        let (from, to) = if selection.empty() {
            let resolved = self.state.doc().resolve(selection.from());
            let len = char_len_before(
                resolved.parent().map_or("", |block| block.text()),
                resolved.parent_offset(),
            );
            if len == 0 {
                return Ok(false);
            }
            (selection.from() - len, selection.from())
        } else {
            (selection.from(), selection.to())
        };
        let mut tr = self.state.tr();
        tr.delete(from, to)?.set_selection(Selection::cursor(from));
        self.dispatch(tr);
        Ok(true)
    }

    /// Split the textblock at the cursor (the enter key).
    pub fn split_block(&mut self) -> Result<(), StepError> {
        let selection = self.state.selection();
        let mut tr = self.state.tr();
        if !selection.empty() {
            tr.delete(selection.from(), selection.to())?;
        }
        tr.split_block(selection.from())?;
        tr.set_selection(Selection::cursor(selection.from() + 2));
        self.dispatch(tr);
        Ok(())
    }

    pub fn select(&mut self, selection: Selection) {
        let mut tr = self.state.tr();
        tr.set_selection(selection);
        self.dispatch(tr);
    }

    /// Decorations from every plugin, merged.
    pub fn decorations(&self) -> DecorationSet {
        self.plugins
            .iter()
            .filter_map(|plugin| plugin.decorations(&self.state))
            .fold(DecorationSet::empty(), |all, set| all.merge(&set))
    }

    /// Destroy every plugin. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for plugin in self.plugins.iter_mut() {
            plugin.destroy();
        }
    }

    fn finish(&mut self, outcome: HandlerOutcome) -> bool {
        match outcome {
            HandlerOutcome::Ignored => false,
            HandlerOutcome::Handled => true,
            HandlerOutcome::Dispatch(tr) => {
                self.dispatch(tr);
                true
            }
        }
    }
}

impl fmt::Debug for EditorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorView")
            .field("state", &self.state)
            .field("plugins", &self.plugin_keys())
            .field("updates", &self.updates)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
