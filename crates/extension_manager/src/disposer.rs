// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

/// A cleanup handle returned by a lifecycle callback. Runs at most once.
pub struct Disposer(Option<Box<dyn FnOnce()>>);

impl Disposer {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(dispose)))
    }

    /// Run the cleanup. Returns false if it had already run.
    pub fn dispose(&mut self) -> bool {
        match self.0.take() {
            Some(dispose) => {
                dispose();
                true
            }
            None => false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Disposer")
            .field(&if self.is_disposed() { "disposed" } else { "pending" })
            .finish()
    }
}

/// Disposers collected across lifecycle phases.
#[derive(Debug, Default)]
pub struct DisposerList {
    disposers: Vec<Disposer>,
}

impl DisposerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `disposer` if there is one.
    pub fn push(&mut self, disposer: Option<Disposer>) {
        self.disposers.extend(disposer);
    }

    /// Run every pending disposer, in the order they were collected.
    /// Returns how many ran.
    pub fn dispose_all(&mut self) -> usize {
        self.disposers
            .iter_mut()
            .map(Disposer::dispose)
            .filter(|ran| *ran)
            .count()
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.disposers
            .iter()
            .filter(|disposer| !disposer.is_disposed())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn disposers_run_once_in_order() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let mut list = DisposerList::new();
        for name in ["a", "b"] {
            let ran = ran.clone();
            list.push(Some(Disposer::new(move || ran.borrow_mut().push(name))));
        }
        list.push(None);
        assert_eq!(list.len(), 2);

        assert_eq!(list.dispose_all(), 2);
        assert_eq!(list.dispose_all(), 0);
        assert_eq!(*ran.borrow(), vec!["a", "b"]);
        assert_eq!(list.pending(), 0);
    }
}
