// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use editor_state::{EditorState, Transaction};

use crate::{ManagerError, ManagerResult};

/// Builds the transaction for a command, or returns `None` when the
/// command cannot run in `state`.
pub type CommandFn = Rc<dyn Fn(&EditorState) -> Option<Transaction>>;

/// A named command contributed by an extension.
#[derive(Clone)]
pub struct CommandSpec {
    pub name: String,
    pub run: CommandFn,
}

impl CommandSpec {
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(&EditorState) -> Option<Transaction> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Rc::new(run),
        }
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Every command of a manager, by name.
#[derive(Default)]
pub(crate) struct Commands {
    by_name: HashMap<String, CommandFn>,
    names: Vec<String>,
}

impl Commands {
    /// Gather commands in load order. Command names must be unique.
    pub(crate) fn collect(
        specs: impl IntoIterator<Item = CommandSpec>,
    ) -> ManagerResult<Self> {
        let mut commands = Self::default();
        for spec in specs {
            if commands.by_name.contains_key(&spec.name) {
                return Err(ManagerError::DuplicateCommand(spec.name));
            }
            commands.names.push(spec.name.clone());
            commands.by_name.insert(spec.name, spec.run);
        }
        Ok(commands)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&CommandFn> {
        self.by_name.get(name)
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.names).finish()
    }
}
