// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

/// Manager-wide configuration, fixed at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Priority overrides by extension name. Lower loads first.
    pub priority: HashMap<String, i32>,
    /// Skip creating the suggest plugin.
    pub exclude_suggesters: bool,
}

impl ManagerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority(
        mut self,
        name: impl Into<String>,
        priority: i32,
    ) -> Self {
        self.priority.insert(name.into(), priority);
        self
    }

    pub fn with_exclude_suggesters(mut self, exclude: bool) -> Self {
        self.exclude_suggesters = exclude;
        self
    }

    pub(crate) fn priority_for(&self, name: &str, default: i32) -> i32 {
        self.priority.get(name).copied().unwrap_or(default)
    }
}
