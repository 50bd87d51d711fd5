// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use editor_state::utf16::utf16_len;
use editor_state::Mapping;

/// Document range of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchRange {
    /// Position of the trigger character.
    pub from: usize,
    /// End of the matched text.
    pub to: usize,
    /// Cursor position when the match was found, `from < cursor <= to`.
    pub cursor: usize,
}

impl MatchRange {
    /// Map the range through a document change.
    pub fn map(&self, mapping: &Mapping) -> Self {
        let from = mapping.map(self.from, 1);
        let to = mapping.map(self.to, -1).max(from);
        let cursor = mapping.map(self.cursor, -1).clamp(from, to);
        Self { from, to, cursor }
    }
}

/// A matched value, both in full and up to the cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchValue {
    pub full: String,
    pub partial: String,
}

/// The active suggestion candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestMatch {
    pub range: MatchRange,
    /// Text after the trigger character.
    pub query: MatchValue,
    /// Text including the trigger character.
    pub text: MatchValue,
    /// Remaining text of the textblock after the match.
    pub text_after: String,
    /// Name of the suggester that produced the match.
    pub suggester: String,
}

impl SuggestMatch {
    /// Length of the full query in chars.
    pub fn query_len(&self) -> usize {
        self.query.full.chars().count()
    }

    /// UTF-16 length of the trigger text as it appears in the document.
    pub fn trigger_len(&self) -> usize {
        utf16_len(&self.text.full).saturating_sub(utf16_len(&self.query.full))
    }

    /// A copy with its range mapped through `mapping`.
    pub fn mapped(&self, mapping: &Mapping) -> Self {
        Self {
            range: self.range.map(mapping),
            ..self.clone()
        }
    }
}
