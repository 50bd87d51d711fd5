// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::any::Any;

use crate::Extension;

/// A named bundle of extensions.
pub trait Preset: Any {
    fn name(&self) -> &str;

    /// The extensions this preset expands to, in order.
    fn create_extensions(&self) -> Vec<Box<dyn Extension>>;

    fn clone_preset(&self) -> Box<dyn Preset>;
}

/// One entry of the list a manager is built from.
pub enum Combined {
    Extension(Box<dyn Extension>),
    Preset(Box<dyn Preset>),
}

impl Combined {
    pub fn extension(extension: impl Extension) -> Self {
        Combined::Extension(Box::new(extension))
    }

    pub fn preset(preset: impl Preset) -> Self {
        Combined::Preset(Box::new(preset))
    }

    pub fn name(&self) -> &str {
        match self {
            Combined::Extension(extension) => extension.name(),
            Combined::Preset(preset) => preset.name(),
        }
    }

    /// A fresh copy with the same options.
    pub fn clone_combined(&self) -> Combined {
        match self {
            Combined::Extension(extension) => {
                Combined::Extension(extension.clone_extension())
            }
            Combined::Preset(preset) => Combined::Preset(preset.clone_preset()),
        }
    }
}

impl std::fmt::Debug for Combined {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combined::Extension(extension) => {
                f.debug_tuple("Extension").field(&extension.name()).finish()
            }
            Combined::Preset(preset) => {
                f.debug_tuple("Preset").field(&preset.name()).finish()
            }
        }
    }
}

impl<E: Extension> From<E> for Combined {
    fn from(extension: E) -> Self {
        Combined::Extension(Box::new(extension))
    }
}

impl From<Box<dyn Extension>> for Combined {
    fn from(extension: Box<dyn Extension>) -> Self {
        Combined::Extension(extension)
    }
}

impl From<Box<dyn Preset>> for Combined {
    fn from(preset: Box<dyn Preset>) -> Self {
        Combined::Preset(preset)
    }
}
