// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The extension contract and the contexts handed to lifecycle callbacks.

use std::any::Any;

use editor_state::{EditorState, EditorView, Plugin};
use strum_macros::{AsRefStr, Display, EnumIter};
use suggest::Suggester;

use crate::store::{ExtensionStore, ManagerStore};
use crate::{
    CommandSpec, Disposer, KeyBinding, ManagerPhase, ManagerResult,
    StateUpdateProps,
};

/// Priority given to extensions that do not choose one. Lower loads
/// first.
pub const DEFAULT_PRIORITY: i32 = 100;

/// What an extension contributes to the schema. Node and mark names live
/// in their own namespaces, as do plain extensions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ExtensionKind {
    #[default]
    Plain,
    Node,
    Mark,
}

/// A named unit of editor behaviour.
///
/// Lifecycle callbacks run in load order: `on_create` while the manager is
/// constructed, `on_view` when a view is attached, `on_state_update` on
/// every state change and `on_destroy` once at the end. `on_create` and
/// `on_view` may return a [`Disposer`] that runs when the manager is
/// destroyed.
pub trait Extension: Any {
    /// Unique within the extension's [`ExtensionKind`].
    fn name(&self) -> &str;

    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Plain
    }

    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn on_create(
        &mut self,
        _ctx: &mut CreateContext<'_>,
    ) -> ManagerResult<Option<Disposer>> {
        Ok(None)
    }

    fn on_view(
        &mut self,
        _ctx: &mut ViewContext<'_>,
    ) -> ManagerResult<Option<Disposer>> {
        Ok(None)
    }

    fn on_state_update(&mut self, _props: &StateUpdateProps) {}

    fn on_destroy(&mut self) {}

    fn create_plugins(&self) -> Vec<Box<dyn Plugin>> {
        Vec::new()
    }

    fn create_commands(&self) -> Vec<CommandSpec> {
        Vec::new()
    }

    fn create_keymap(&self) -> Vec<KeyBinding> {
        Vec::new()
    }

    fn create_suggesters(&self) -> Vec<Suggester> {
        Vec::new()
    }

    /// A fresh instance with the same options, as it was before any
    /// lifecycle callback ran.
    fn clone_extension(&self) -> Box<dyn Extension>;
}

/// What `on_create` may touch.
pub struct CreateContext<'a> {
    pub(crate) phase: ManagerPhase,
    pub(crate) store: &'a mut ManagerStore,
    pub(crate) extension_store: &'a mut ExtensionStore,
}

impl CreateContext<'_> {
    pub fn store(&self) -> &ManagerStore {
        self.store
    }

    pub fn set_store_key<T: Any>(&mut self, key: &str, value: T) {
        self.store.set_store_key(key, value);
    }

    pub fn get_store_key<T: Any>(&self, key: &str) -> ManagerResult<&T> {
        self.store.get_store_key(key)
    }

    pub fn set_extension_store<T: Any>(
        &mut self,
        key: &str,
        value: T,
    ) -> ManagerResult<()> {
        self.extension_store.set(self.phase, key, value)
    }
}

/// What `on_view` may touch.
pub struct ViewContext<'a> {
    pub(crate) phase: ManagerPhase,
    pub(crate) view: &'a EditorView,
    pub(crate) store: &'a ManagerStore,
    pub(crate) extension_store: &'a mut ExtensionStore,
}

impl ViewContext<'_> {
    pub fn view(&self) -> &EditorView {
        self.view
    }

    pub fn state(&self) -> &EditorState {
        self.view.state()
    }

    pub fn store(&self) -> &ManagerStore {
        self.store
    }

    pub fn set_extension_store<T: Any>(
        &mut self,
        key: &str,
        value: T,
    ) -> ManagerResult<()> {
        self.extension_store.set(self.phase, key, value)
    }
}
