// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use editor_state::EditorState;

/// A state change flowing through [`crate::Manager::on_state_update`].
#[derive(Clone, Debug)]
pub struct StateUpdateProps {
    pub previous_state: EditorState,
    pub state: EditorState,
    /// The first update after the view was attached.
    pub first_update: bool,
}

/// A UI framework driving the manager. Receives every state update and is
/// detached when the manager is destroyed.
pub trait FrameworkAdapter {
    /// The state to report before a view exists.
    fn initial_state(&self) -> Option<EditorState> {
        None
    }

    fn on_state_update(&mut self, props: &StateUpdateProps);

    fn destroy(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type StateUpdateListener = Box<dyn FnMut(&StateUpdateProps)>;
type DestroyListener = Box<dyn FnMut()>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: usize,
    state_update: Vec<(ListenerId, StateUpdateListener)>,
    destroy: Vec<(ListenerId, DestroyListener)>,
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub(crate) fn add_state_update(
        &mut self,
        listener: StateUpdateListener,
    ) -> ListenerId {
        let id = self.next_id();
        self.state_update.push((id, listener));
        id
    }

    pub(crate) fn add_destroy(&mut self, listener: DestroyListener) -> ListenerId {
        let id = self.next_id();
        self.destroy.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.len();
        self.state_update.retain(|(listener, _)| *listener != id);
        self.destroy.retain(|(listener, _)| *listener != id);
        self.len() != before
    }

    pub(crate) fn emit_state_update(&mut self, props: &StateUpdateProps) {
        for (_, listener) in self.state_update.iter_mut() {
            listener(props);
        }
    }

    pub(crate) fn emit_destroy(&mut self) {
        for (_, listener) in self.destroy.iter_mut() {
            listener();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.state_update.clear();
        self.destroy.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.state_update.len() + self.destroy.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn removed_listeners_stop_hearing_events() {
        let heard = Rc::new(Cell::new(0));
        let mut listeners = Listeners::default();
        let counter = heard.clone();
        let id = listeners.add_destroy(Box::new(move || {
            counter.set(counter.get() + 1)
        }));

        listeners.emit_destroy();
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.emit_destroy();
        assert_eq!(heard.get(), 1);
    }
}
