// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The document: a flat list of textblocks.
//!
//! Positions follow the usual token scheme: each block occupies
//! `1 + text_len + 1` positions (opening token, content, closing token), so
//! the content of the first block starts at position 1.
//!
//! ```text
//!   0   1 2 3   4   5 6 7   8
//!   <p> a b c </p> <p> d e </p>
//! ```

use crate::mapping::StepMap;
use crate::utf16::{byte_offset, slice, utf16_len};
use crate::StepError;

pub const PARAGRAPH: &str = "paragraph";

/// A single textblock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    kind: String,
    text: String,
}

impl Block {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(PARAGRAPH, text)
    }

    /// The node type name, e.g. `"paragraph"` or `"code_block"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content length in UTF-16 code units.
    pub fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of positions the block takes up, including both tokens.
    pub fn node_size(&self) -> usize {
        self.len() + 2
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Doc {
    blocks: Vec<Block>,
}

impl Doc {
    /// Create a document from blocks. A document always holds at least one
    /// block, so an empty list yields a single empty paragraph.
    pub fn new(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self { blocks }
    }

    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::paragraph("")],
        }
    }

    /// One paragraph per line of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\n').map(Block::paragraph).collect())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Total number of positions in the document.
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(Block::node_size).sum()
    }

    /// Position of the first content code unit of block `index`.
    pub fn block_start(&self, index: usize) -> usize {
        self.blocks[..index]
            .iter()
            .map(Block::node_size)
            .sum::<usize>()
            + 1
    }

    /// Plain text of the document, blocks joined by `\n`.
    pub fn text_content(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve `pos` (clamped to the document) into its block context.
    pub fn resolve(&self, pos: usize) -> ResolvedPos<'_> {
        let pos = pos.min(self.content_size());
        let mut start = 1;
        for (index, block) in self.blocks.iter().enumerate() {
            let end = start + block.len();
            if pos < start {
                break;
            }
            if pos <= end {
                return ResolvedPos {
                    doc: self,
                    pos,
                    block: Some(index),
                    parent_offset: pos - start,
                };
            }
            start = end + 2;
        }
        ResolvedPos {
            doc: self,
            pos,
            block: None,
            parent_offset: pos,
        }
    }

    /// Text between two positions, with `block_separator` inserted wherever
    /// the range crosses from one block into the next.
    pub fn text_between(
        &self,
        from: usize,
        to: usize,
        block_separator: &str,
    ) -> String {
        let mut out = String::new();
        let mut first = true;
        for (index, block) in self.blocks.iter().enumerate() {
            let start = self.block_start(index);
            let end = start + block.len();
            if end < from || start > to {
                continue;
            }
            if !first {
                out.push_str(block_separator);
            }
            first = false;
            let local_from = from.saturating_sub(start);
            let local_to = to.min(end) - start;
            out.push_str(slice(block.text(), local_from, local_to));
        }
        out
    }

    /// Replace the content between `from` and `to`, which must both lie in
    /// the same textblock.
    pub(crate) fn replace_text(
        &mut self,
        from: usize,
        to: usize,
        text: &str,
    ) -> Result<StepMap, StepError> {
        if from > to {
            return Err(StepError::InvalidRange { from, to });
        }
        let (index, local_from) = self.textblock_at(from)?;
        let (end_index, local_to) = self.textblock_at(to)?;
        if index != end_index {
            return Err(StepError::CrossBlockRange { from, to });
        }
        let block = &mut self.blocks[index];
        let start = byte_offset(&block.text, local_from);
        let end = byte_offset(&block.text, local_to);
        block.text.replace_range(start..end, text);
        Ok(StepMap::new(from, to - from, utf16_len(text)))
    }

    /// Split the textblock containing `pos` in two. The new block keeps the
    /// kind of the original.
    pub(crate) fn split_block(
        &mut self,
        pos: usize,
    ) -> Result<StepMap, StepError> {
        let (index, offset) = self.textblock_at(pos)?;
        let block = &mut self.blocks[index];
        let at = byte_offset(&block.text, offset);
        let tail = block.text.split_off(at);
        let kind = block.kind.clone();
        self.blocks.insert(index + 1, Block::new(kind, tail));
        Ok(StepMap::new(pos, 0, 2))
    }

    fn textblock_at(&self, pos: usize) -> Result<(usize, usize), StepError> {
        if pos > self.content_size() {
            return Err(StepError::OutOfRange {
                pos,
                size: self.content_size(),
            });
        }
        let resolved = self.resolve(pos);
        match resolved.block_index() {
            Some(index) => Ok((index, resolved.parent_offset())),
            None => Err(StepError::OutsideTextblock { pos }),
        }
    }
}

impl Default for Doc {
    fn default() -> Self {
        Self::empty()
    }
}

/// A position resolved against a document.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedPos<'a> {
    doc: &'a Doc,
    pos: usize,
    block: Option<usize>,
    parent_offset: usize,
}

impl<'a> ResolvedPos<'a> {
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn doc(&self) -> &'a Doc {
        self.doc
    }

    /// 1 when the position is inside a textblock, 0 between blocks.
    pub fn depth(&self) -> usize {
        usize::from(self.block.is_some())
    }

    pub fn block_index(&self) -> Option<usize> {
        self.block
    }

    /// The textblock containing the position.
    pub fn parent(&self) -> Option<&'a Block> {
        self.block.map(|index| &self.doc.blocks[index])
    }

    /// Offset into the parent's content.
    pub fn parent_offset(&self) -> usize {
        self.parent_offset
    }

    /// Start of the parent's content.
    pub fn start(&self) -> usize {
        self.pos - self.parent_offset
    }

    /// End of the parent's content.
    pub fn end(&self) -> usize {
        match self.parent() {
            Some(block) => self.start() + block.len(),
            None => self.doc.content_size(),
        }
    }

    /// Position directly before the parent block.
    pub fn before(&self) -> usize {
        self.start().saturating_sub(self.depth())
    }

    /// Position directly after the parent block.
    pub fn after(&self) -> usize {
        self.end() + self.depth()
    }

    /// The parent's text up to this position.
    pub fn text_before(&self) -> &'a str {
        self.parent()
            .map_or("", |block| slice(block.text(), 0, self.parent_offset))
    }

    /// The parent's text from this position to its end.
    pub fn text_after(&self) -> &'a str {
        self.parent().map_or("", |block| {
            slice(block.text(), self.parent_offset, block.len())
        })
    }
}
