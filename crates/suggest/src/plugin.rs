// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use editor_state::{
    DecorationSet, EditorState, HandlerOutcome, KeyEvent, Plugin, Transaction,
};

use crate::actions::SuggestActions;
use crate::suggester::SuggestInputProps;
use crate::{SuggestMatch, SuggestResult, SuggestState, Suggester};

pub const SUGGEST_PLUGIN_KEY: &str = "suggest";

/// Shared access to a [`SuggestState`] owned jointly with its plugin.
///
/// Callbacks run with no borrow held, so a callback that holds a handle
/// may read the state. Mutations from inside a callback should go through
/// [`SuggestActions`].
#[derive(Clone, Debug)]
pub struct SuggestHandle(Rc<RefCell<SuggestState>>);

impl SuggestHandle {
    pub fn new(state: SuggestState) -> Self {
        Self(Rc::new(RefCell::new(state)))
    }

    pub fn borrow(&self) -> Ref<'_, SuggestState> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, SuggestState> {
        self.0.borrow_mut()
    }

    pub fn current_match(&self) -> Option<SuggestMatch> {
        self.borrow().current_match().cloned()
    }

    pub fn add_suggester(&self, suggester: Suggester) -> SuggestResult<()> {
        self.borrow_mut().add_suggester(suggester)
    }

    pub fn remove_suggester(&self, name: &str) -> bool {
        self.borrow_mut().remove_suggester(name)
    }

    pub fn ignore_next_exit(&self) {
        self.borrow_mut().ignore_next_exit();
    }

    pub fn set_mark_removed(&self) {
        self.borrow_mut().set_mark_removed();
    }

    pub fn add_ignored(&self, from: usize, name: &str, specific: bool) {
        self.borrow_mut().add_ignored(from, name, specific);
    }

    pub fn remove_ignored(&self, from: usize, name: &str) {
        self.borrow_mut().remove_ignored(from, name);
    }

    pub fn clear_ignored(&self, name: Option<&str>) {
        self.borrow_mut().clear_ignored(name);
    }

    pub fn decoration_set(&self) -> DecorationSet {
        self.borrow().decoration_set().clone()
    }

    pub fn create_decorations(&self, state: &EditorState) -> DecorationSet {
        self.borrow().create_decorations(state)
    }

    /// Run the pending callbacks, releasing the borrow around each one.
    pub fn on_view_update(&self) {
        let calls = self.borrow_mut().take_pending_calls();
        for call in calls {
            let actions = call.run();
            self.borrow_mut().apply_actions(actions);
        }
    }

    fn run_input(
        &self,
        handler: impl FnOnce(&mut SuggestActions) -> HandlerOutcome,
    ) -> HandlerOutcome {
        let mut actions = SuggestActions::new();
        let outcome = handler(&mut actions);
        if !actions.is_empty() {
            self.borrow_mut().apply_actions(actions);
        }
        outcome
    }

    pub fn handle_key_down(
        &self,
        state: &EditorState,
        key: &KeyEvent,
    ) -> HandlerOutcome {
        let Some((handler, matched)) = self.borrow().key_binding(key) else {
            return HandlerOutcome::Ignored;
        };
        let props = SuggestInputProps {
            matched: &matched,
            state,
        };
        self.run_input(|actions| handler(&props, key, actions))
    }

    pub fn handle_text_input(
        &self,
        state: &EditorState,
        from: usize,
        to: usize,
        text: &str,
    ) -> HandlerOutcome {
        let Some((handler, matched)) = self.borrow().text_input_handler()
        else {
            return HandlerOutcome::Ignored;
        };
        let props = SuggestInputProps {
            matched: &matched,
            state,
        };
        self.run_input(|actions| handler(&props, from, to, text, actions))
    }
}

/// Drives a [`SuggestState`] from an editor view.
#[derive(Debug)]
pub struct SuggestPlugin {
    handle: SuggestHandle,
}

impl SuggestPlugin {
    pub fn new(handle: SuggestHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &SuggestHandle {
        &self.handle
    }
}

impl Plugin for SuggestPlugin {
    fn key(&self) -> &str {
        SUGGEST_PLUGIN_KEY
    }

    fn apply(
        &mut self,
        tr: &Transaction,
        old_state: &EditorState,
        new_state: &EditorState,
    ) {
        self.handle.borrow_mut().apply(tr, old_state, new_state);
    }

    fn decorations(&self, state: &EditorState) -> Option<DecorationSet> {
        Some(self.handle.create_decorations(state))
    }

    fn handle_key_down(
        &mut self,
        state: &EditorState,
        key: &KeyEvent,
    ) -> HandlerOutcome {
        self.handle.handle_key_down(state, key)
    }

    fn handle_text_input(
        &mut self,
        state: &EditorState,
        from: usize,
        to: usize,
        text: &str,
    ) -> HandlerOutcome {
        self.handle.handle_text_input(state, from, to, text)
    }

    fn update_view(&mut self, _state: &EditorState, _prev: &EditorState) {
        self.handle.on_view_update();
    }

    fn destroy(&mut self) {
        self.handle.borrow_mut().destroy();
    }
}

/// Create the suggest plugin for `suggesters`, and a handle to its state.
pub fn suggest(
    suggesters: Vec<Suggester>,
) -> SuggestResult<(SuggestPlugin, SuggestHandle)> {
    let handle = SuggestHandle::new(SuggestState::new(suggesters)?);
    Ok((SuggestPlugin::new(handle.clone()), handle))
}
