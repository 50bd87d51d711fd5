// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Classification of the transition between two consecutive matches.

use strum_macros::{AsRefStr, Display, EnumIter};

use crate::SuggestMatch;

/// Why an active match changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
pub enum ChangeReason {
    /// A new match was entered (the entry transition).
    #[strum(serialize = "start")]
    Start,
    /// The query text changed.
    #[strum(serialize = "change-character")]
    Text,
    /// The cursor moved within the match.
    #[strum(serialize = "move")]
    Move,
    /// A non-empty selection now sits within the match.
    #[strum(serialize = "selection-inside")]
    SelectionInside,
    /// Jumped from an earlier match into a later one.
    #[strum(serialize = "jump-forward-change")]
    JumpForward,
    /// Jumped from a later match into an earlier one.
    #[strum(serialize = "jump-backward-change")]
    JumpBackward,
}

/// Why a match was left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
pub enum ExitReason {
    /// A character the suggester does not support was typed at the end.
    #[strum(serialize = "exit-end")]
    End,
    /// The cursor moved past the end of the match.
    #[strum(serialize = "move-end")]
    MoveEnd,
    /// The cursor moved to or before the trigger character.
    #[strum(serialize = "move-start")]
    MoveStart,
    /// The selection now covers text outside the match.
    #[strum(serialize = "selection-outside")]
    SelectionOutside,
    #[strum(serialize = "jump-forward-exit")]
    JumpForward,
    #[strum(serialize = "jump-backward-exit")]
    JumpBackward,
    /// An edit inside the match split it; the part before the split is
    /// still a valid match.
    #[strum(serialize = "exit-split")]
    Split,
    /// An edit inside the match split it and left no valid match behind.
    #[strum(serialize = "invalid-exit-split")]
    InvalidSplit,
    /// The trigger character was deleted, or the match vanished in place.
    #[strum(serialize = "delete")]
    Removed,
}

impl ChangeReason {
    pub fn is_jump(self) -> bool {
        matches!(self, ChangeReason::JumpForward | ChangeReason::JumpBackward)
    }
}

impl ExitReason {
    pub fn is_jump(self) -> bool {
        matches!(self, ExitReason::JumpForward | ExitReason::JumpBackward)
    }
}

/// Either kind of reason, as handed to `on_change` callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reason {
    Change(ChangeReason),
    Exit(ExitReason),
}

/// A match paired with the reason it is being reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReasonMatch<R> {
    pub matched: SuggestMatch,
    pub reason: R,
}

pub type ChangeMatch = ReasonMatch<ChangeReason>;
pub type ExitMatch = ReasonMatch<ExitReason>;

/// The transitions computed for one transaction. A jump fills both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuggestReasonMap {
    pub change: Option<ChangeMatch>,
    pub exit: Option<ExitMatch>,
}

impl SuggestReasonMap {
    pub fn is_empty(&self) -> bool {
        self.change.is_none() && self.exit.is_none()
    }

    /// Both an exit and a change caused by a jump between matches.
    pub fn is_jump(&self) -> bool {
        match (&self.change, &self.exit) {
            (Some(change), Some(exit)) => {
                change.reason.is_jump() && exit.reason.is_jump()
            }
            _ => false,
        }
    }

    pub(crate) fn change(matched: SuggestMatch, reason: ChangeReason) -> Self {
        Self {
            change: Some(ReasonMatch { matched, reason }),
            exit: None,
        }
    }

    pub(crate) fn exit(matched: SuggestMatch, reason: ExitReason) -> Self {
        Self {
            change: None,
            exit: Some(ReasonMatch { matched, reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_stable_names() {
        assert_eq!(ChangeReason::Start.to_string(), "start");
        assert_eq!(ExitReason::Removed.as_ref(), "delete");
        assert_eq!(ExitReason::InvalidSplit.to_string(), "invalid-exit-split");
    }

    #[test]
    fn only_jump_variants_are_jumps() {
        use strum::IntoEnumIterator;

        let jumps: Vec<_> =
            ExitReason::iter().filter(|reason| reason.is_jump()).collect();
        assert_eq!(jumps, vec![ExitReason::JumpForward, ExitReason::JumpBackward]);
        assert!(!ChangeReason::Text.is_jump());
    }
}
