// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The manager store and the extension store.
//!
//! Both are read freely through shared references. Writes go through the
//! manager (or the contexts it hands to lifecycle callbacks), which
//! enforces the phase rules.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use editor_state::EditorState;

use crate::{ManagerError, ManagerPhase, ManagerResult, ManagerSettings};

/// Names and settings gathered at construction, plus custom entries set
/// by extensions while they are created.
#[derive(Default)]
pub struct ManagerStore {
    pub(crate) node_names: Vec<String>,
    pub(crate) mark_names: Vec<String>,
    pub(crate) plain_names: Vec<String>,
    pub(crate) extension_names: Vec<String>,
    pub(crate) preset_names: Vec<String>,
    pub(crate) command_names: Vec<String>,
    pub(crate) settings: ManagerSettings,
    custom: HashMap<String, Box<dyn Any>>,
}

impl ManagerStore {
    pub(crate) fn new(settings: ManagerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    pub fn mark_names(&self) -> &[String] {
        &self.mark_names
    }

    pub fn plain_names(&self) -> &[String] {
        &self.plain_names
    }

    /// Every extension name, in load order.
    pub fn extension_names(&self) -> &[String] {
        &self.extension_names
    }

    pub fn preset_names(&self) -> &[String] {
        &self.preset_names
    }

    pub fn command_names(&self) -> &[String] {
        &self.command_names
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub(crate) fn set_store_key<T: Any>(&mut self, key: &str, value: T) {
        self.custom.insert(key.to_owned(), Box::new(value));
    }

    /// Read a custom entry. Reading a key that was never set is a
    /// programming error.
    pub fn get_store_key<T: Any>(&self, key: &str) -> ManagerResult<&T> {
        let value = self
            .custom
            .get(key)
            .ok_or_else(|| ManagerError::StoreKeyNotSet(key.to_owned()))?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| ManagerError::StoreKeyType {
                key: key.to_owned(),
                expected: type_name::<T>(),
            })
    }

    pub fn has_store_key(&self, key: &str) -> bool {
        self.custom.contains_key(key)
    }
}

impl fmt::Debug for ManagerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.custom.keys().collect();
        keys.sort();
        f.debug_struct("ManagerStore")
            .field("node_names", &self.node_names)
            .field("mark_names", &self.mark_names)
            .field("plain_names", &self.plain_names)
            .field("preset_names", &self.preset_names)
            .field("command_names", &self.command_names)
            .field("settings", &self.settings)
            .field("custom", &keys)
            .finish()
    }
}

/// State tracking and custom entries for extensions.
#[derive(Default)]
pub struct ExtensionStore {
    pub(crate) current_state: Option<EditorState>,
    pub(crate) previous_state: Option<EditorState>,
    entries: HashMap<String, Box<dyn Any>>,
}

impl ExtensionStore {
    /// The state passed to the latest state update.
    pub fn current_state(&self) -> Option<&EditorState> {
        self.current_state.as_ref()
    }

    pub fn previous_state(&self) -> Option<&EditorState> {
        self.previous_state.as_ref()
    }

    /// Set a custom entry. Only allowed up to the editor view phase.
    pub(crate) fn set<T: Any>(
        &mut self,
        phase: ManagerPhase,
        key: &str,
        value: T,
    ) -> ManagerResult<()> {
        if phase > ManagerPhase::EditorView {
            return Err(ManagerError::ManagerPhase {
                operation: "set_extension_store",
                phase,
            });
        }
        self.entries.insert(key.to_owned(), Box::new(value));
        Ok(())
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }
}

impl fmt::Debug for ExtensionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("ExtensionStore")
            .field("current_state", &self.current_state)
            .field("previous_state", &self.previous_state)
            .field("entries", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;
    use crate::ManagerErrorCode;

    // ===================================================================
    // Manager store
    // ===================================================================

    #[test]
    fn reading_an_unset_key_fails() {
        let store = ManagerStore::default();
        let err = store.get_store_key::<u32>("limit").unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::StoreKeyNotSet);
    }

    #[test]
    fn reading_with_the_wrong_type_fails() {
        let mut store = ManagerStore::default();
        store.set_store_key("limit", 3_u32);
        assert_that!(store.get_store_key::<u32>("limit").ok())
            .is_equal_to(Some(&3));
        let err = store.get_store_key::<String>("limit").unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::StoreKeyType);
    }

    // ===================================================================
    // Extension store
    // ===================================================================

    #[test]
    fn extension_store_is_writable_until_the_view_phase() {
        let mut store = ExtensionStore::default();
        store.set(ManagerPhase::Create, "a", 1_i32).unwrap();
        store.set(ManagerPhase::EditorView, "b", 2_i32).unwrap();
        let err = store.set(ManagerPhase::Runtime, "c", 3_i32).unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::ManagerPhase);
        assert_eq!(store.get::<i32>("b"), Some(&2));
        assert_eq!(store.get::<i32>("c"), None);
    }
}
