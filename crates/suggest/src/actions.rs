// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! What callbacks receive, and what they may ask of the state machine.

use crate::{ChangeReason, ExitReason, Reason, SuggestMatch};

/// Arguments to a suggester's `on_change` callback.
#[derive(Clone, Copy, Debug)]
pub struct SuggestChangeHandlerProps<'a> {
    pub matched: &'a SuggestMatch,
    pub reason: Reason,
}

impl SuggestChangeHandlerProps<'_> {
    /// A new match was entered.
    pub fn is_entry(&self) -> bool {
        self.reason == Reason::Change(ChangeReason::Start)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.reason, Reason::Exit(_))
    }

    pub fn change_reason(&self) -> Option<ChangeReason> {
        match self.reason {
            Reason::Change(reason) => Some(reason),
            Reason::Exit(_) => None,
        }
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self.reason {
            Reason::Exit(reason) => Some(reason),
            Reason::Change(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum IgnoreCommand {
    Add {
        from: usize,
        name: String,
        specific: bool,
    },
    Remove {
        from: usize,
        name: String,
    },
    Clear(Option<String>),
}

/// Requests collected while a callback runs. They are applied to the
/// state machine as soon as the callback returns.
#[derive(Debug, Default)]
pub struct SuggestActions {
    pub(crate) ignore_next_exit: bool,
    pub(crate) mark_removed: bool,
    pub(crate) commands: Vec<IgnoreCommand>,
}

impl SuggestActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the next exit notification.
    pub fn ignore_next_exit(&mut self) {
        self.ignore_next_exit = true;
    }

    /// Force the next transaction to be re-evaluated even if it changes
    /// neither the document nor the selection.
    pub fn set_mark_removed(&mut self) {
        self.mark_removed = true;
    }

    /// Stop suggesters from matching at `from`. With `specific` only the
    /// suggester called `name` is blocked, otherwise all of them are.
    pub fn add_ignored(
        &mut self,
        from: usize,
        name: impl Into<String>,
        specific: bool,
    ) {
        self.commands.push(IgnoreCommand::Add {
            from,
            name: name.into(),
            specific,
        });
    }

    pub fn remove_ignored(&mut self, from: usize, name: impl Into<String>) {
        self.commands.push(IgnoreCommand::Remove {
            from,
            name: name.into(),
        });
    }

    /// Clear ignored regions for one suggester, or all when `name` is
    /// `None`.
    pub fn clear_ignored(&mut self, name: Option<&str>) {
        self.commands
            .push(IgnoreCommand::Clear(name.map(str::to_owned)));
    }

    pub fn is_empty(&self) -> bool {
        !self.ignore_next_exit && !self.mark_removed && self.commands.is_empty()
    }
}
