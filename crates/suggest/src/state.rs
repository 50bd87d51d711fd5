// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The suggest state machine.
//!
//! Driven in two passes per transaction: [`SuggestState::apply`] computes
//! the new match and the reasons for the transition, then
//! [`SuggestHandle::on_view_update`](crate::SuggestHandle::on_view_update)
//! reports them to the suggesters' `on_change` callbacks. Callbacks never see the state machine itself;
//! they record requests in [`SuggestActions`], which are applied once the
//! callback returns.

use std::cmp::Reverse;

use editor_state::{
    Decoration, DecorationAttrs, DecorationSet, EditorState, KeyEvent,
    Transaction,
};
use log::{debug, trace, warn};

use crate::actions::{IgnoreCommand, SuggestActions, SuggestChangeHandlerProps};
use crate::ignored::IgnoredRegions;
use crate::matcher::{find_from_suggesters, find_reason, FindProps, ReasonProps};
use crate::suggester::{
    ChangeHandler, CompiledSuggester, KeyBindingHandler, TextInputHandler,
};
use crate::{
    ExitReason, Reason, SuggestError, SuggestMatch, SuggestReasonMap, SuggestResult,
    Suggester,
};

/// A callback due to be invoked by the view update.
pub(crate) struct PendingCall {
    pub(crate) handler: ChangeHandler,
    pub(crate) matched: SuggestMatch,
    pub(crate) reason: Reason,
}

impl PendingCall {
    pub(crate) fn run(&self) -> SuggestActions {
        let mut actions = SuggestActions::new();
        let props = SuggestChangeHandlerProps {
            matched: &self.matched,
            reason: self.reason,
        };
        (self.handler)(&props, &mut actions);
        actions
    }
}

#[derive(Debug, Default)]
pub struct SuggestState {
    /// Sorted by descending priority, then registration order.
    suggesters: Vec<CompiledSuggester>,
    next_order: usize,
    prev: Option<SuggestMatch>,
    next: Option<SuggestMatch>,
    handler_matches: SuggestReasonMap,
    pending: bool,
    ignored: IgnoredRegions,
    ignore_next_exit: bool,
    removed: bool,
}

impl SuggestState {
    pub fn new(suggesters: Vec<Suggester>) -> SuggestResult<Self> {
        let mut state = Self::default();
        for suggester in suggesters {
            state.add_suggester(suggester)?;
        }
        Ok(state)
    }

    // ─── Suggesters ───────────────────────────────────────────────────

    /// Register a suggester. Names must be unique.
    pub fn add_suggester(&mut self, suggester: Suggester) -> SuggestResult<()> {
        if self.suggester(&suggester.name).is_some() {
            return Err(SuggestError::DuplicateSuggester(suggester.name));
        }
        debug!("Adding suggester '{}'", suggester.name);
        let compiled = CompiledSuggester::compile(suggester, self.next_order)?;
        self.next_order += 1;
        self.suggesters.push(compiled);
        self.suggesters.sort_by_key(|suggester| {
            (Reverse(suggester.options.priority), suggester.order)
        });
        Ok(())
    }

    /// Unregister a suggester, dropping its ignored regions and its match.
    /// Returns whether it was registered.
    pub fn remove_suggester(&mut self, name: &str) -> bool {
        let before = self.suggesters.len();
        self.suggesters.retain(|suggester| suggester.name() != name);
        if self.suggesters.len() == before {
            return false;
        }
        debug!("Removed suggester '{name}'");
        self.ignored.clear(Some(name));
        let owned = |matched: &Option<SuggestMatch>| {
            matched.as_ref().is_some_and(|m| m.suggester == name)
        };
        if owned(&self.next) || owned(&self.prev) {
            self.reset();
        }
        true
    }

    pub fn suggester(&self, name: &str) -> Option<&Suggester> {
        self.compiled(name).map(CompiledSuggester::options)
    }

    /// Registered suggesters in matching order.
    pub fn suggesters(&self) -> impl Iterator<Item = &Suggester> {
        self.suggesters.iter().map(CompiledSuggester::options)
    }

    fn compiled(&self, name: &str) -> Option<&CompiledSuggester> {
        self.suggesters
            .iter()
            .find(|suggester| suggester.name() == name)
    }

    // ─── Accessors ────────────────────────────────────────────────────

    /// The active match, if any.
    pub fn current_match(&self) -> Option<&SuggestMatch> {
        self.next.as_ref()
    }

    /// The reasons computed by the last `apply`.
    pub fn handler_matches(&self) -> &SuggestReasonMap {
        &self.handler_matches
    }

    /// The persisted ignored-region decorations.
    pub fn decoration_set(&self) -> &DecorationSet {
        self.ignored.decorations()
    }

    pub fn ignored(&self) -> &IgnoredRegions {
        &self.ignored
    }

    // ─── Commands ─────────────────────────────────────────────────────

    /// Suppress the next exit notification.
    pub fn ignore_next_exit(&mut self) {
        self.ignore_next_exit = true;
    }

    /// Re-evaluate on the next transaction even if it changes neither the
    /// document nor the selection.
    pub fn set_mark_removed(&mut self) {
        self.removed = true;
    }

    /// Ignore the trigger at `from` for `name` (or for every suggester
    /// when not `specific`).
    pub fn add_ignored(&mut self, from: usize, name: &str, specific: bool) {
        let Some(suggester) = self.suggester(name) else {
            warn!("Cannot ignore unknown suggester '{name}'");
            return;
        };
        let attrs = DecorationAttrs::new(suggester.ignored_tag.clone())
            .with_class(suggester.ignored_class_name.clone());
        let char = suggester.char.clone();
        self.ignored.add(from, name, &char, specific, attrs);
    }

    pub fn remove_ignored(&mut self, from: usize, name: &str) {
        self.ignored.remove(from, name);
    }

    pub fn clear_ignored(&mut self, name: Option<&str>) {
        self.ignored.clear(name);
    }

    /// Apply the requests a callback recorded.
    pub fn apply_actions(&mut self, actions: SuggestActions) {
        if actions.ignore_next_exit {
            self.ignore_next_exit();
        }
        if actions.mark_removed {
            self.set_mark_removed();
        }
        for command in actions.commands {
            match command {
                IgnoreCommand::Add {
                    from,
                    name,
                    specific,
                } => self.add_ignored(from, &name, specific),
                IgnoreCommand::Remove { from, name } => {
                    self.remove_ignored(from, &name)
                }
                IgnoreCommand::Clear(name) => {
                    self.clear_ignored(name.as_deref())
                }
            }
        }
    }

    // ─── Transactions ─────────────────────────────────────────────────

    /// Compute the match after `tr` and the reasons for the transition.
    /// `new_state` is the state with `tr` applied.
    pub fn apply(
        &mut self,
        tr: &Transaction,
        old_state: &EditorState,
        new_state: &EditorState,
    ) {
        if !tr.doc_changed() && !tr.selection_set() && !self.removed {
            return;
        }
        self.removed = false;

        if tr.doc_changed() {
            self.ignored.map(tr.mapping());
        }

        let exited = self.handler_matches.exit.is_some()
            && self.handler_matches.change.is_none();
        if exited {
            self.reset();
        }

        self.prev = self.next.take();
        self.next = find_from_suggesters(&FindProps {
            suggesters: &self.suggesters,
            state: new_state,
            doc_changed: tr.doc_changed(),
            active: self.prev.as_ref().map(|m| m.suggester.as_str()),
            ignored: &self.ignored,
        });
        self.handler_matches = find_reason(&ReasonProps {
            prev: self.prev.as_ref(),
            next: self.next.as_ref(),
            tr,
            state: new_state,
            prev_selection: old_state.selection(),
            suggesters: &self.suggesters,
        });
        self.pending = true;
        trace!("suggest apply: {:?}", self.handler_matches);

        #[cfg(any(test, feature = "assert-invariants"))]
        self.assert_invariants();
    }

    /// The callbacks the view update should run, in order. A jump reports
    /// the exit before the change whatever its direction.
    pub(crate) fn take_pending_calls(&mut self) -> Vec<PendingCall> {
        if !std::mem::take(&mut self.pending) {
            return Vec::new();
        }
        let reasons = self.handler_matches.clone();
        if reasons.is_empty() {
            return Vec::new();
        }

        let below_offset = |matched: &SuggestMatch| {
            self.compiled(&matched.suggester).map_or(true, |suggester| {
                matched.query_len() < suggester.options.match_offset
            })
        };
        let candidate = match (&reasons.change, &reasons.exit) {
            (Some(change), _) => &change.matched,
            (None, Some(exit)) => &exit.matched,
            (None, None) => return Vec::new(),
        };
        if below_offset(candidate) {
            return Vec::new();
        }

        let mut calls = Vec::new();
        if let Some(exit) = &reasons.exit {
            if std::mem::take(&mut self.ignore_next_exit) {
                debug!("Skipping ignored exit of '{}'", exit.matched.suggester);
            } else if let Some(suggester) = self.compiled(&exit.matched.suggester)
            {
                calls.push(PendingCall {
                    handler: suggester.options.on_change.clone(),
                    matched: exit.matched.clone(),
                    reason: Reason::Exit(exit.reason),
                });
            }
        }
        if let Some(change) = &reasons.change {
            if let Some(suggester) = self.compiled(&change.matched.suggester) {
                calls.push(PendingCall {
                    handler: suggester.options.on_change.clone(),
                    matched: change.matched.clone(),
                    reason: Reason::Change(change.reason),
                });
            }
        }
        if reasons.change.is_none()
            && reasons
                .exit
                .as_ref()
                .is_some_and(|exit| exit.reason == ExitReason::InvalidSplit)
        {
            self.reset();
        }
        for call in &calls {
            debug!("suggest '{}': {:?}", call.matched.suggester, call.reason);
        }
        calls
    }

    fn reset(&mut self) {
        self.prev = None;
        self.next = None;
        self.handler_matches = SuggestReasonMap::default();
        self.removed = false;
    }

    // ─── Decorations ──────────────────────────────────────────────────

    /// Decorations for the active match, merged with the ignored regions.
    /// Pure: calling it again without an `apply` gives the same set.
    pub fn create_decorations(&self, state: &EditorState) -> DecorationSet {
        let ignored = self.ignored.decorations();
        let Some(matched) = &self.next else {
            return ignored.clone();
        };
        let Some(suggester) = self.suggester(&matched.suggester) else {
            return ignored.clone();
        };
        if suggester.disable_decorations.applies(state, matched) {
            return ignored.clone();
        }
        let mut class = suggester.suggest_class_name.clone();
        if matched.query.full.is_empty() {
            class.push(' ');
            class.push_str(&suggester.empty_class_name);
        }
        let attrs = DecorationAttrs::new(suggester.suggest_tag.clone())
            .with_class(Some(class));
        let decoration =
            Decoration::inline(matched.range.from, matched.range.to, attrs)
                .with_spec("suggester", matched.suggester.clone());
        ignored.add(vec![decoration])
    }

    // ─── Input ────────────────────────────────────────────────────────

    pub(crate) fn key_binding(
        &self,
        key: &KeyEvent,
    ) -> Option<(KeyBindingHandler, SuggestMatch)> {
        let matched = self.next.as_ref()?;
        let suggester = self.compiled(&matched.suggester)?;
        let handler = suggester.options.key_bindings.get(&key.binding_name())?;
        Some((handler.clone(), matched.clone()))
    }

    pub(crate) fn text_input_handler(
        &self,
    ) -> Option<(TextInputHandler, SuggestMatch)> {
        let matched = self.next.as_ref()?;
        let suggester = self.compiled(&matched.suggester)?;
        let handler = suggester.options.on_text_input.clone()?;
        Some((handler, matched.clone()))
    }

    /// Drop every suggester, match and ignored region.
    pub fn destroy(&mut self) {
        debug!("Destroying suggest state");
        *self = Self::default();
    }

    #[cfg(any(test, feature = "assert-invariants"))]
    pub fn assert_invariants(&self) {
        let mut names: Vec<_> =
            self.suggesters.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(
            names.len(),
            self.suggesters.len(),
            "suggester names must be unique"
        );
        assert!(
            self.suggesters.windows(2).all(|pair| {
                (Reverse(pair[0].options.priority), pair[0].order)
                    <= (Reverse(pair[1].options.priority), pair[1].order)
            }),
            "suggesters must stay sorted by priority"
        );
        if let Some(matched) = &self.next {
            assert!(
                self.compiled(&matched.suggester).is_some(),
                "active match belongs to unknown suggester '{}'",
                matched.suggester
            );
            let range = matched.range;
            assert!(range.from < range.cursor && range.cursor <= range.to);
        }
    }
}
