// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumIter};
use suggest::SuggestError;

use crate::ManagerPhase;

/// Stable, discriminated codes for manager errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ManagerErrorCode {
    DuplicateName,
    DuplicateCommand,
    ManagerPhase,
    MissingExtension,
    MissingPreset,
    StoreKeyNotSet,
    StoreKeyType,
    MissingView,
    MissingCommand,
    Suggest,
}

/// Contract violations. These are programming errors: they are raised
/// as soon as they are detected and never recovered from internally.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Duplicate {namespace} name '{name}'")]
    DuplicateName { name: String, namespace: String },

    #[error("Command '{0}' is provided by more than one extension")]
    DuplicateCommand(String),

    #[error("'{operation}' is not allowed in the {phase} phase")]
    ManagerPhase {
        operation: &'static str,
        phase: ManagerPhase,
    },

    #[error("Extension {0} is not registered")]
    MissingExtension(String),

    #[error("Preset {0} is not registered")]
    MissingPreset(String),

    #[error("Store key '{0}' was read before being set")]
    StoreKeyNotSet(String),

    #[error("Store key '{key}' does not hold a {expected}")]
    StoreKeyType { key: String, expected: &'static str },

    #[error("No editor view has been attached")]
    MissingView,

    #[error("No command named '{0}'")]
    MissingCommand(String),

    #[error(transparent)]
    Suggest(#[from] SuggestError),
}

impl ManagerError {
    pub fn code(&self) -> ManagerErrorCode {
        match self {
            ManagerError::DuplicateName { .. } => ManagerErrorCode::DuplicateName,
            ManagerError::DuplicateCommand(_) => {
                ManagerErrorCode::DuplicateCommand
            }
            ManagerError::ManagerPhase { .. } => ManagerErrorCode::ManagerPhase,
            ManagerError::MissingExtension(_) => {
                ManagerErrorCode::MissingExtension
            }
            ManagerError::MissingPreset(_) => ManagerErrorCode::MissingPreset,
            ManagerError::StoreKeyNotSet(_) => ManagerErrorCode::StoreKeyNotSet,
            ManagerError::StoreKeyType { .. } => ManagerErrorCode::StoreKeyType,
            ManagerError::MissingView => ManagerErrorCode::MissingView,
            ManagerError::MissingCommand(_) => ManagerErrorCode::MissingCommand,
            ManagerError::Suggest(_) => ManagerErrorCode::Suggest,
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
