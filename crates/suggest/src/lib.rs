// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Trigger-character suggestions (mentions, tags, commands).
//!
//! A [`Suggester`] describes a trigger such as `@` and the characters a
//! query may contain. A [`SuggestState`] tracks the registered suggesters
//! against a changing document, classifies every transition of the active
//! [`SuggestMatch`] and reports it through the suggester's `on_change`
//! callback.

mod actions;
mod error;
mod ignored;
pub mod matcher;
mod plugin;
mod reason;
mod state;
mod suggest_match;
mod suggester;

pub use actions::{SuggestActions, SuggestChangeHandlerProps};
pub use error::{SuggestError, SuggestErrorCode, SuggestResult};
pub use ignored::IgnoredRegions;
pub use plugin::{suggest, SuggestHandle, SuggestPlugin, SUGGEST_PLUGIN_KEY};
pub use reason::{
    ChangeMatch, ChangeReason, ExitMatch, ExitReason, Reason, ReasonMatch,
    SuggestReasonMap,
};
pub use state::SuggestState;
pub use suggest_match::{MatchRange, MatchValue, SuggestMatch};
pub use suggester::{
    ChangeHandler, CompiledSuggester, DisableDecorations, KeyBindingHandler,
    PositionValidator, SuggestInputProps, Suggester, TextInputHandler,
    DEFAULT_SUGGESTER_PRIORITY, DEFAULT_SUPPORTED_CHARACTERS,
    DEFAULT_VALID_PREFIX_CHARACTERS,
};
