// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Helpers for converting between UTF-16 code unit offsets (the unit used
//! for every document position) and byte offsets into Rust strings.

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Convert a byte offset into `text` to a UTF-16 offset.
///
/// `byte_offset` must lie on a char boundary.
pub fn utf16_offset(text: &str, byte_offset: usize) -> usize {
    utf16_len(&text[..byte_offset])
}

/// Convert a UTF-16 offset into `text` to a byte offset, clamping to the
/// end of the string. An offset pointing into the middle of a surrogate
/// pair resolves to the start of the following char.
pub fn byte_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (index, ch) in text.char_indices() {
        if units >= utf16_offset {
            return index;
        }
        units += ch.len_utf16();
    }
    text.len()
}

/// Slice `text` between two UTF-16 offsets.
pub fn slice(text: &str, from: usize, to: usize) -> &str {
    let start = byte_offset(text, from);
    let end = byte_offset(text, to.max(from));
    &text[start..end]
}

/// UTF-16 length of the char immediately before `utf16_offset`, or 0 at
/// the start of the string.
pub fn char_len_before(text: &str, utf16_offset: usize) -> usize {
    let end = byte_offset(text, utf16_offset);
    text[..end].chars().next_back().map_or(0, char::len_utf16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_match_bytes() {
        assert_eq!(utf16_len("hello"), 5);
        assert_eq!(byte_offset("hello", 3), 3);
        assert_eq!(utf16_offset("hello", 3), 3);
    }

    #[test]
    fn astral_chars_take_two_units() {
        let text = "a😀b";
        assert_eq!(utf16_len(text), 4);
        assert_eq!(byte_offset(text, 1), 1);
        assert_eq!(byte_offset(text, 3), 5);
        assert_eq!(slice(text, 1, 3), "😀");
        assert_eq!(char_len_before(text, 3), 2);
    }

    #[test]
    fn offsets_past_the_end_clamp() {
        assert_eq!(byte_offset("abc", 10), 3);
        assert_eq!(slice("abc", 1, 10), "bc");
        assert_eq!(char_len_before("", 0), 0);
    }
}
