// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Pure matching functions: find the active match at a position and
//! classify the transition from the previous one.

use editor_state::utf16::{byte_offset, utf16_offset};
use editor_state::{EditorState, ResolvedPos, Selection, Transaction};
use log::trace;

use crate::ignored::IgnoredRegions;
use crate::suggester::{CompiledSuggester, QUERY_GROUP};
use crate::{
    ChangeReason, ExitReason, MatchRange, MatchValue, ReasonMatch,
    SuggestMatch, SuggestReasonMap,
};

/// Find the match of a single suggester around `pos`, if any.
///
/// The match must contain the cursor: `from < cursor <= to`.
pub fn find_match(
    pos: &ResolvedPos<'_>,
    suggester: &CompiledSuggester,
) -> Option<SuggestMatch> {
    let block = pos.parent()?;
    let text = block.text();
    let start = pos.start();
    let cursor = pos.pos();

    for captures in suggester.regex.captures_iter(text) {
        let Some(found) = captures.get(0) else {
            continue;
        };
        let query_start = captures
            .name(QUERY_GROUP)
            .map_or(found.end(), |query| query.start());
        let from = start + utf16_offset(text, found.start());
        let to = start + utf16_offset(text, found.end());
        if from >= cursor {
            break;
        }
        if cursor > to {
            continue;
        }
        let prefix = text[..found.start()]
            .chars()
            .next_back()
            .map(String::from)
            .unwrap_or_default();
        if !suggester.prefix.is_match(&prefix) {
            trace!(
                "{}: prefix {prefix:?} rejected at {from}",
                suggester.name()
            );
            continue;
        }

        let partial_end = byte_offset(text, cursor - start);
        return Some(SuggestMatch {
            range: MatchRange { from, to, cursor },
            query: MatchValue {
                full: text[query_start..found.end()].to_owned(),
                partial: text[query_start..partial_end.max(query_start)]
                    .to_owned(),
            },
            text: MatchValue {
                full: found.as_str().to_owned(),
                partial: text[found.start()..partial_end.max(found.start())]
                    .to_owned(),
            },
            text_after: text[found.end()..].to_owned(),
            suggester: suggester.name().to_owned(),
        });
    }
    None
}

/// Inputs to [`find_from_suggesters`].
pub struct FindProps<'a> {
    /// Suggesters in matching order.
    pub suggesters: &'a [CompiledSuggester],
    pub state: &'a EditorState,
    pub doc_changed: bool,
    /// Name of the suggester whose match was active before this change.
    pub active: Option<&'a str>,
    pub ignored: &'a IgnoredRegions,
}

/// The single active match for the state's selection. Suggesters are
/// tried in order and the first valid match wins.
pub fn find_from_suggesters(props: &FindProps<'_>) -> Option<SuggestMatch> {
    let selection = props.state.selection();
    let doc = props.state.doc();
    let pos = doc.resolve(selection.from());
    if pos.depth() == 0 {
        return None;
    }
    let kind = pos.parent().map(|block| block.kind()).unwrap_or_default();

    for suggester in props.suggesters {
        let options = &suggester.options;
        if options.empty_selections_only && !selection.empty() {
            continue;
        }
        if !options.is_valid_node(kind) {
            continue;
        }
        if !options.match_on_selection
            && !props.doc_changed
            && props.active != Some(options.name.as_str())
        {
            continue;
        }
        let Some(matched) = find_match(&pos, suggester) else {
            continue;
        };
        if selection.to() > matched.range.to {
            continue;
        }
        if props.ignored.is_ignored(matched.range.from, &options.name) {
            trace!("{}: ignored at {}", options.name, matched.range.from);
            continue;
        }
        if let Some(is_valid) = &options.is_valid_position {
            if !is_valid(&pos, &matched) {
                continue;
            }
        }
        return Some(matched);
    }
    None
}

/// Inputs to [`find_reason`].
pub struct ReasonProps<'a> {
    pub prev: Option<&'a SuggestMatch>,
    pub next: Option<&'a SuggestMatch>,
    pub tr: &'a Transaction,
    /// The state after `tr`.
    pub state: &'a EditorState,
    /// The selection before `tr`.
    pub prev_selection: Selection,
    pub suggesters: &'a [CompiledSuggester],
}

/// Classify the transition from `prev` to `next`. `prev` is mapped
/// through the transaction before any comparison.
pub fn find_reason(props: &ReasonProps<'_>) -> SuggestReasonMap {
    let mapping = props.tr.mapping();
    match (props.prev, props.next) {
        (None, None) => SuggestReasonMap::default(),
        (None, Some(next)) => {
            SuggestReasonMap::change(next.clone(), ChangeReason::Start)
        }
        (Some(prev), None) => {
            let mapped = prev.mapped(mapping);
            let reason = exit_reason(prev, &mapped, props);
            SuggestReasonMap::exit(mapped, reason)
        }
        (Some(prev), Some(next)) => {
            let mapped = prev.mapped(mapping);
            if mapped.range.from != next.range.from
                || mapped.suggester != next.suggester
            {
                let forward = next.range.from >= mapped.range.from;
                let (exit, change) = if forward {
                    (ExitReason::JumpForward, ChangeReason::JumpForward)
                } else {
                    (ExitReason::JumpBackward, ChangeReason::JumpBackward)
                };
                return SuggestReasonMap {
                    change: Some(ReasonMatch {
                        matched: next.clone(),
                        reason: change,
                    }),
                    exit: Some(ReasonMatch {
                        matched: mapped,
                        reason: exit,
                    }),
                };
            }
            if mapped.query.full != next.query.full
                || mapped.text.full != next.text.full
            {
                return SuggestReasonMap::change(next.clone(), ChangeReason::Text);
            }
            let selection = props.state.selection();
            if !selection.empty() && selection != props.prev_selection {
                return SuggestReasonMap::change(
                    next.clone(),
                    ChangeReason::SelectionInside,
                );
            }
            if mapped.range.cursor != next.range.cursor {
                return SuggestReasonMap::change(next.clone(), ChangeReason::Move);
            }
            SuggestReasonMap::default()
        }
    }
}

fn exit_reason(
    prev: &SuggestMatch,
    mapped: &SuggestMatch,
    props: &ReasonProps<'_>,
) -> ExitReason {
    let selection = props.state.selection();
    let cursor = selection.from();
    let range = mapped.range;

    if !selection.empty()
        && (selection.from() < range.from || selection.to() > range.to)
    {
        return ExitReason::SelectionOutside;
    }

    if !props.tr.doc_changed() {
        return if cursor > range.to {
            ExitReason::MoveEnd
        } else if cursor <= range.from {
            ExitReason::MoveStart
        } else {
            // Still inside the old range, but no longer matching: the
            // match was ignored or invalidated in place.
            ExitReason::Removed
        };
    }

    let trigger_end = prev.range.from + prev.trigger_len();
    if props
        .tr
        .mapping()
        .touches_deleted(prev.range.from, trigger_end)
    {
        return ExitReason::Removed;
    }

    let doc = props.state.doc();
    let start_block = doc.resolve(range.from).block_index();
    if start_block != doc.resolve(range.to).block_index()
        || start_block != doc.resolve(cursor).block_index()
    {
        return if is_valid_split(mapped, props) {
            ExitReason::Split
        } else {
            ExitReason::InvalidSplit
        };
    }

    if cursor > range.to {
        ExitReason::End
    } else if cursor <= range.from {
        ExitReason::MoveStart
    } else {
        ExitReason::Removed
    }
}

/// Whether the text left at the start of the old match still forms a
/// valid query for its suggester after a split.
fn is_valid_split(mapped: &SuggestMatch, props: &ReasonProps<'_>) -> bool {
    let Some(suggester) = props
        .suggesters
        .iter()
        .find(|suggester| suggester.name() == mapped.suggester)
    else {
        return false;
    };
    let pos = props.state.doc().resolve(mapped.range.from);
    let rest = pos.text_after();
    let Some(captures) = suggester.regex.captures(rest) else {
        return false;
    };
    let starts_block = captures.get(0).is_some_and(|found| found.start() == 0);
    starts_block
        && captures.name(QUERY_GROUP).is_some_and(|query| {
            query.as_str().chars().count() >= suggester.options.match_offset
        })
}

#[cfg(test)]
mod tests {
    use editor_state::{Doc, Selection};
    use speculoos::prelude::*;

    use super::*;
    use crate::Suggester;

    fn compiled(suggesters: Vec<Suggester>) -> Vec<CompiledSuggester> {
        suggesters
            .into_iter()
            .enumerate()
            .map(|(order, options)| CompiledSuggester::compile(options, order))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    fn at() -> Suggester {
        Suggester::new("at", "@", |_, _| {})
    }

    fn state_at(text: &str, cursor: usize) -> EditorState {
        EditorState::new(Doc::from_text(text), Selection::cursor(cursor))
    }

    fn find(
        suggesters: &[CompiledSuggester],
        state: &EditorState,
    ) -> Option<SuggestMatch> {
        find_from_suggesters(&FindProps {
            suggesters,
            state,
            doc_changed: true,
            active: None,
            ignored: &IgnoredRegions::new(),
        })
    }

    // ===================================================================
    // find_match
    // ===================================================================

    #[test]
    fn match_covers_trigger_and_query() {
        let suggesters = compiled(vec![at()]);
        // "Hi @bob": '@' is at 4, the text ends at 8.
        let matched = find(&suggesters, &state_at("Hi @bob", 6)).unwrap();
        assert_eq!(
            matched.range,
            MatchRange {
                from: 4,
                to: 8,
                cursor: 6
            }
        );
        assert_eq!(matched.query.full, "bob");
        assert_eq!(matched.query.partial, "b");
        assert_eq!(matched.text.full, "@bob");
        assert_eq!(matched.text.partial, "@b");
        assert_eq!(matched.suggester, "at");
    }

    #[test]
    fn cursor_on_trigger_does_not_match() {
        let suggesters = compiled(vec![at()]);
        assert_that!(find(&suggesters, &state_at("Hi @bob", 4))).is_none();
    }

    #[test]
    fn text_after_is_the_rest_of_the_block() {
        let suggesters = compiled(vec![at()]);
        let matched = find(&suggesters, &state_at("@al, hi", 3)).unwrap();
        assert_eq!(matched.query.full, "al");
        assert_eq!(matched.text_after, ", hi");
    }

    #[test]
    fn trigger_needs_a_valid_prefix() {
        let suggesters = compiled(vec![at()]);
        assert_that!(find(&suggesters, &state_at("mail@bob", 8))).is_none();
        assert_that!(find(&suggesters, &state_at("a @bob", 7))).is_some();
    }

    #[test]
    fn positions_are_utf16() {
        let suggesters = compiled(vec![at()]);
        // "😀 " is three code units.
        let matched = find(&suggesters, &state_at("😀 @x", 6)).unwrap();
        assert_eq!(matched.range.from, 4);
        assert_eq!(matched.range.to, 6);
    }

    #[test]
    fn match_offset_requires_a_minimum_query() {
        let suggesters = compiled(vec![at().match_offset(2)]);
        assert_that!(find(&suggesters, &state_at("@b", 3))).is_none();
        assert_that!(find(&suggesters, &state_at("@bo", 4))).is_some();
    }

    #[test]
    fn start_of_line_only_matches_at_block_start() {
        let suggesters = compiled(vec![at().start_of_line(true)]);
        assert_that!(find(&suggesters, &state_at("x @b", 5))).is_none();
        assert_that!(find(&suggesters, &state_at("@b", 3))).is_some();
    }

    // ===================================================================
    // find_from_suggesters
    // ===================================================================

    #[test]
    fn higher_priority_wins() {
        let low = Suggester::new("low", "@", |_, _| {}).priority(5);
        let high = Suggester::new("high", "@", |_, _| {}).priority(10);
        let mut suggesters = compiled(vec![low, high]);
        suggesters.sort_by_key(|s| std::cmp::Reverse(s.options.priority));
        let matched = find(&suggesters, &state_at("@query", 7)).unwrap();
        assert_eq!(matched.suggester, "high");
    }

    #[test]
    fn ignored_suggester_falls_through_to_the_next() {
        let suggesters = compiled(vec![
            Suggester::new("first", "@", |_, _| {}),
            Suggester::new("second", "@", |_, _| {}),
        ]);
        let mut ignored = IgnoredRegions::new();
        ignored.add(
            1,
            "first",
            "@",
            true,
            editor_state::DecorationAttrs::new("span"),
        );
        let state = state_at("@q", 3);
        let matched = find_from_suggesters(&FindProps {
            suggesters: &suggesters,
            state: &state,
            doc_changed: true,
            active: None,
            ignored: &ignored,
        })
        .unwrap();
        assert_eq!(matched.suggester, "second");
    }

    #[test]
    fn empty_selections_only_skips_ranges() {
        let suggesters = compiled(vec![at().empty_selections_only(true)]);
        let state = EditorState::new(
            Doc::from_text("@bob"),
            Selection::range(3, 5),
        );
        assert_that!(find(&suggesters, &state)).is_none();
    }

    #[test]
    fn selection_running_past_the_match_does_not_match() {
        let suggesters = compiled(vec![at()]);
        let state = EditorState::new(
            Doc::from_text("@bob and"),
            Selection::range(3, 8),
        );
        assert_that!(find(&suggesters, &state)).is_none();
    }

    #[test]
    fn invalid_nodes_are_skipped() {
        let suggesters = compiled(vec![at().invalid_nodes(&["paragraph"])]);
        assert_that!(find(&suggesters, &state_at("@bob", 3))).is_none();
    }

    #[test]
    fn selection_moves_only_match_when_allowed() {
        let suggesters = compiled(vec![at().match_on_selection(false)]);
        let state = state_at("@bob", 3);
        let ignored = IgnoredRegions::new();
        let inactive = find_from_suggesters(&FindProps {
            suggesters: &suggesters,
            state: &state,
            doc_changed: false,
            active: None,
            ignored: &ignored,
        });
        assert_that!(inactive).is_none();

        let active = find_from_suggesters(&FindProps {
            suggesters: &suggesters,
            state: &state,
            doc_changed: false,
            active: Some("at"),
            ignored: &ignored,
        });
        assert_that!(active).is_some();
    }

    #[test]
    fn position_validator_can_reject() {
        let suggesters =
            compiled(vec![at().is_valid_position(|_, m| m.query_len() < 3)]);
        assert_that!(find(&suggesters, &state_at("@bo", 4))).is_some();
        assert_that!(find(&suggesters, &state_at("@bob", 5))).is_none();
    }

    // ===================================================================
    // find_reason
    // ===================================================================

    fn reason_for(
        before: &EditorState,
        build: impl FnOnce(&mut Transaction),
    ) -> SuggestReasonMap {
        let suggesters =
            compiled(vec![at(), Suggester::new("tag", "#", |_, _| {})]);
        let prev = find(&suggesters, before);
        let mut tr = before.tr();
        build(&mut tr);
        let after = before.apply(&tr);
        let next = find(&suggesters, &after);
        find_reason(&ReasonProps {
            prev: prev.as_ref(),
            next: next.as_ref(),
            tr: &tr,
            state: &after,
            prev_selection: before.selection(),
            suggesters: &suggesters,
        })
    }

    fn exit_of(reasons: &SuggestReasonMap) -> Option<ExitReason> {
        reasons.exit.as_ref().map(|exit| exit.reason)
    }

    fn change_of(reasons: &SuggestReasonMap) -> Option<ChangeReason> {
        reasons.change.as_ref().map(|change| change.reason)
    }

    #[test]
    fn typing_the_trigger_is_an_entry() {
        let reasons = reason_for(&state_at("a ", 3), |tr| {
            tr.replace_selection_with_text("@").unwrap();
        });
        assert_eq!(change_of(&reasons), Some(ChangeReason::Start));
        assert_eq!(exit_of(&reasons), None);
    }

    #[test]
    fn typing_into_the_query_is_a_text_change() {
        let reasons = reason_for(&state_at("@b", 3), |tr| {
            tr.replace_selection_with_text("o").unwrap();
        });
        assert_eq!(change_of(&reasons), Some(ChangeReason::Text));
        assert_eq!(reasons.change.unwrap().matched.query.full, "bo");
    }

    #[test]
    fn moving_within_the_query_is_a_move() {
        let reasons = reason_for(&state_at("@bob", 5), |tr| {
            tr.set_selection(Selection::cursor(3));
        });
        assert_eq!(change_of(&reasons), Some(ChangeReason::Move));
    }

    #[test]
    fn selecting_within_the_query_is_selection_inside() {
        let reasons = reason_for(&state_at("@bob", 5), |tr| {
            tr.set_selection(Selection::range(3, 5));
        });
        assert_eq!(change_of(&reasons), Some(ChangeReason::SelectionInside));
    }

    #[test]
    fn moving_past_either_end_exits() {
        let reasons = reason_for(&state_at("@bob x", 3), |tr| {
            tr.set_selection(Selection::cursor(7));
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::MoveEnd));

        let reasons = reason_for(&state_at("@bob x", 3), |tr| {
            tr.set_selection(Selection::cursor(1));
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::MoveStart));
    }

    #[test]
    fn selecting_beyond_the_match_is_selection_outside() {
        let reasons = reason_for(&state_at("@bob x", 3), |tr| {
            tr.set_selection(Selection::range(3, 7));
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::SelectionOutside));
    }

    #[test]
    fn typing_an_unsupported_char_at_the_end_exits_at_end() {
        let reasons = reason_for(&state_at("@bob", 5), |tr| {
            tr.replace_selection_with_text(" ").unwrap();
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::End));
        assert_eq!(reasons.exit.unwrap().matched.query.full, "bob");
    }

    #[test]
    fn deleting_the_trigger_is_removed() {
        let reasons = reason_for(&state_at("@", 2), |tr| {
            tr.delete(1, 2).unwrap();
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::Removed));
    }

    #[test]
    fn splitting_inside_the_query() {
        let reasons = reason_for(&state_at("@bob", 4), |tr| {
            tr.split_block(4).unwrap();
            tr.set_selection(Selection::cursor(6));
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::Split));
    }

    #[test]
    fn splitting_right_after_the_trigger_is_an_invalid_split_with_offset() {
        let suggesters = compiled(vec![at().match_offset(1)]);
        let before = state_at("@bob", 3);
        let prev = find(&suggesters, &before);
        let mut tr = before.tr();
        tr.split_block(2).unwrap().set_selection(Selection::cursor(4));
        let after = before.apply(&tr);
        let next = find(&suggesters, &after);
        let reasons = find_reason(&ReasonProps {
            prev: prev.as_ref(),
            next: next.as_ref(),
            tr: &tr,
            state: &after,
            prev_selection: before.selection(),
            suggesters: &suggesters,
        });
        assert_eq!(exit_of(&reasons), Some(ExitReason::InvalidSplit));
    }

    #[test]
    fn moving_between_matches_is_a_jump() {
        // "@ab #cd": '@' at 1, '#' at 5.
        let forward = reason_for(&state_at("@ab #cd", 3), |tr| {
            tr.set_selection(Selection::cursor(7));
        });
        assert!(forward.is_jump());
        assert_eq!(exit_of(&forward), Some(ExitReason::JumpForward));
        assert_eq!(change_of(&forward), Some(ChangeReason::JumpForward));
        assert_eq!(forward.exit.unwrap().matched.suggester, "at");
        assert_eq!(forward.change.unwrap().matched.suggester, "tag");

        let backward = reason_for(&state_at("@ab #cd", 7), |tr| {
            tr.set_selection(Selection::cursor(3));
        });
        assert_eq!(exit_of(&backward), Some(ExitReason::JumpBackward));
        assert_eq!(change_of(&backward), Some(ChangeReason::JumpBackward));
    }

    #[test]
    fn unchanged_match_reports_nothing() {
        let reasons = reason_for(&state_at("@bob", 3), |tr| {
            tr.set_selection(Selection::cursor(3));
        });
        assert!(reasons.is_empty());
    }
}
