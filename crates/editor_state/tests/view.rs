// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::RefCell;
use std::rc::Rc;

use editor_state::{
    Decoration, DecorationAttrs, DecorationSet, EditorState, EditorView,
    HandlerOutcome, KeyEvent, Plugin, Selection, Transaction,
};
use indoc::indoc;
use speculoos::prelude::*;

/// Records every hook invocation into a shared log.
struct RecordingPlugin {
    key: &'static str,
    log: Rc<RefCell<Vec<String>>>,
    swallow_key: Option<&'static str>,
}

impl RecordingPlugin {
    fn boxed(
        key: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
    ) -> Box<dyn Plugin> {
        Box::new(Self {
            key,
            log: Rc::clone(log),
            swallow_key: None,
        })
    }
}

impl Plugin for RecordingPlugin {
    fn key(&self) -> &str {
        self.key
    }

    fn apply(
        &mut self,
        tr: &Transaction,
        _old_state: &EditorState,
        _new_state: &EditorState,
    ) {
        self.log
            .borrow_mut()
            .push(format!("{}:apply:{}", self.key, tr.doc_changed()));
    }

    fn decorations(&self, _state: &EditorState) -> Option<DecorationSet> {
        Some(DecorationSet::create(vec![Decoration::inline(
            1,
            2,
            DecorationAttrs::new("span"),
        )
        .with_spec("plugin", self.key)]))
    }

    fn handle_key_down(
        &mut self,
        state: &EditorState,
        key: &KeyEvent,
    ) -> HandlerOutcome {
        if self.swallow_key != Some(key.key.as_str()) {
            return HandlerOutcome::Ignored;
        }
        let mut tr = state.tr();
        tr.replace_selection_with_text("!").unwrap();
        HandlerOutcome::Dispatch(tr)
    }

    fn update_view(&mut self, _state: &EditorState, _prev: &EditorState) {
        self.log.borrow_mut().push(format!("{}:view", self.key));
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(format!("{}:destroy", self.key));
    }
}

fn log() -> Rc<RefCell<Vec<String>>> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn dispatch_applies_every_plugin_before_view_updates() {
    let log = log();
    let mut view = EditorView::new(
        EditorState::from_text(""),
        vec![RecordingPlugin::boxed("a", &log), RecordingPlugin::boxed("b", &log)],
    );
    view.type_text("x").unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["a:apply:true", "b:apply:true", "a:view", "b:view"]
    );
    assert_eq!(view.state().doc().text_content(), "x");
}

#[test]
fn typing_places_cursor_after_each_char() {
    let mut view = EditorView::new(EditorState::from_text(""), Vec::new());
    view.type_text("Hello").unwrap();
    assert_that(&view.state().selection()).is_equal_to(Selection::cursor(6));
    assert_that(&view.state().doc().text_content())
        .is_equal_to("Hello".to_string());
}

#[test]
fn backspace_deletes_astral_chars_whole() {
    let mut view = EditorView::new(EditorState::from_text(""), Vec::new());
    view.type_text("a😀").unwrap();
    assert!(view.backspace().unwrap());
    assert_eq!(view.state().doc().text_content(), "a");
    assert!(view.backspace().unwrap());
    assert!(!view.backspace().unwrap());
}

#[test]
fn split_block_moves_cursor_into_new_block() {
    let mut view =
        EditorView::new(EditorState::from_text("abcd"), Vec::new());
    view.select(Selection::cursor(3));
    view.split_block().unwrap();
    assert_eq!(
        view.state().doc().text_content(),
        indoc! {"
            ab
            cd"}
    );
    assert_eq!(view.state().selection(), Selection::cursor(5));
}

#[test]
fn key_handler_dispatch_is_deferred_until_loop_ends() {
    let log = log();
    let swallowing = RecordingPlugin {
        key: "a",
        log: Rc::clone(&log),
        swallow_key: Some("Enter"),
    };
    let mut view = EditorView::new(
        EditorState::from_text(""),
        vec![Box::new(swallowing), RecordingPlugin::boxed("b", &log)],
    );
    assert!(view.key_down(&KeyEvent::new("Enter")));
    assert!(!view.key_down(&KeyEvent::new("Tab")));
    assert_eq!(view.state().doc().text_content(), "!");
}

#[test]
fn decorations_are_merged_across_plugins() {
    let log = log();
    let view = EditorView::new(
        EditorState::from_text("abc"),
        vec![RecordingPlugin::boxed("a", &log), RecordingPlugin::boxed("b", &log)],
    );
    assert_eq!(view.decorations().len(), 2);
}

#[test]
fn destroy_runs_once() {
    let log = log();
    let mut view = EditorView::new(
        EditorState::from_text(""),
        vec![RecordingPlugin::boxed("a", &log)],
    );
    view.destroy();
    view.destroy();
    assert!(view.is_destroyed());
    assert_eq!(*log.borrow(), vec!["a:destroy"]);
}

#[test]
fn update_count_bumps_even_when_the_state_is_unchanged() {
    let mut view = EditorView::new(EditorState::from_text("ab"), Vec::new());
    assert_eq!(view.update_count(), 0);

    let selection = view.state().selection();
    view.select(selection);
    assert_eq!(view.update_count(), 1);

    let state = view.state().clone();
    view.update_state(state);
    assert_eq!(view.update_count(), 2);
    assert_that(&view.state().doc().text_content()).is_equal_to("ab".to_string());
}
