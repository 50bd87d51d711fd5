// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Extension lifecycle management.
//!
//! A [`Manager`] is built from a list of [`Extension`]s and [`Preset`]s.
//! It validates and orders them, runs their lifecycle callbacks through
//! the [`ManagerPhase`]s, and exposes the shared stores, the editor view
//! and the suggest state they contribute to.

mod commands;
mod disposer;
mod error;
mod events;
mod extension;
mod keymap;
mod manager;
mod phase;
mod preset;
mod registry;
mod settings;
mod store;

pub use commands::{CommandFn, CommandSpec};
pub use disposer::{Disposer, DisposerList};
pub use error::{ManagerError, ManagerErrorCode, ManagerResult};
pub use events::{FrameworkAdapter, ListenerId, StateUpdateProps};
pub use extension::{
    CreateContext, Extension, ExtensionKind, ViewContext, DEFAULT_PRIORITY,
};
pub use keymap::{KeyBinding, KeyHandler, KeymapPlugin, KEYMAP_PLUGIN_KEY};
pub use manager::{Lookup, Manager};
pub use phase::ManagerPhase;
pub use preset::{Combined, Preset};
pub use registry::{RegisteredExtension, Registry};
pub use settings::ManagerSettings;
pub use store::{ExtensionStore, ManagerStore};
