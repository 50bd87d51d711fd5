// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumIter};

/// Stable, discriminated codes for suggest errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestErrorCode {
    DuplicateSuggester,
    InvalidPattern,
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("A suggester named '{0}' is already registered")]
    DuplicateSuggester(String),

    #[error("Suggester '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

impl SuggestError {
    pub fn code(&self) -> SuggestErrorCode {
        match self {
            SuggestError::DuplicateSuggester(_) => {
                SuggestErrorCode::DuplicateSuggester
            }
            SuggestError::InvalidPattern { .. } => {
                SuggestErrorCode::InvalidPattern
            }
        }
    }
}

pub type SuggestResult<T> = Result<T, SuggestError>;
