// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use editor_state::{EditorState, HandlerOutcome, KeyEvent, Plugin, Transaction};
use log::debug;

pub const KEYMAP_PLUGIN_KEY: &str = "keymap";

pub type KeyHandler = Rc<dyn Fn(&EditorState) -> Option<Transaction>>;

/// A key binding contributed by an extension. The key is a
/// [`KeyEvent::binding_name`], e.g. `"Ctrl-b"`.
#[derive(Clone)]
pub struct KeyBinding {
    pub key: String,
    pub handler: KeyHandler,
}

impl KeyBinding {
    pub fn new(
        key: impl Into<String>,
        handler: impl Fn(&EditorState) -> Option<Transaction> + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            handler: Rc::new(handler),
        }
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding").field("key", &self.key).finish()
    }
}

/// Routes key presses to bindings. When several extensions bind the same
/// key, the one loaded first is tried first; a handler returning `None`
/// passes the key on to the next one.
#[derive(Default)]
pub struct KeymapPlugin {
    bindings: HashMap<String, Vec<KeyHandler>>,
}

impl KeymapPlugin {
    pub fn new(bindings: impl IntoIterator<Item = KeyBinding>) -> Self {
        let mut keymap = Self::default();
        for binding in bindings {
            keymap
                .bindings
                .entry(binding.key)
                .or_default()
                .push(binding.handler);
        }
        keymap
    }

    pub fn is_bound(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }
}

impl fmt::Debug for KeymapPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.bindings.keys().collect();
        keys.sort();
        f.debug_struct("KeymapPlugin").field("keys", &keys).finish()
    }
}

impl Plugin for KeymapPlugin {
    fn key(&self) -> &str {
        KEYMAP_PLUGIN_KEY
    }

    fn handle_key_down(
        &mut self,
        state: &EditorState,
        key: &KeyEvent,
    ) -> HandlerOutcome {
        let name = key.binding_name();
        let Some(handlers) = self.bindings.get(&name) else {
            return HandlerOutcome::Ignored;
        };
        for handler in handlers {
            if let Some(tr) = handler(state) {
                debug!("keymap: {name} handled");
                return HandlerOutcome::Dispatch(tr);
            }
        }
        HandlerOutcome::Ignored
    }
}
