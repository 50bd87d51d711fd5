// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumIter};

/// The manager's lifecycle stage. Phases only ever move forward.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ManagerPhase {
    /// Before construction has run.
    #[default]
    None,
    /// Running `on_create` inside the constructor.
    Create,
    /// A view has been attached.
    EditorView,
    /// The first state update after the view was attached has happened.
    Runtime,
    /// Terminal.
    Destroy,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn phases_are_ordered() {
        let phases: Vec<_> = ManagerPhase::iter().collect();
        let mut sorted = phases.clone();
        sorted.sort();
        assert_eq!(phases, sorted);
        assert!(ManagerPhase::EditorView < ManagerPhase::Runtime);
    }

    #[test]
    fn phase_names() {
        assert_eq!(ManagerPhase::EditorView.to_string(), "editor_view");
        assert_eq!(ManagerPhase::None.as_ref(), "none");
    }
}
