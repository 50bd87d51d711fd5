// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Suggester options and their compiled form.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use editor_state::{EditorState, HandlerOutcome, KeyEvent, ResolvedPos};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::actions::{SuggestActions, SuggestChangeHandlerProps};
use crate::{SuggestError, SuggestMatch, SuggestResult};

pub const DEFAULT_SUGGESTER_PRIORITY: i32 = 50;
pub const DEFAULT_SUPPORTED_CHARACTERS: &str = r"[\w\d_]+";
/// The char before a match must be whitespace, a NUL leaf placeholder, or
/// the start of the textblock.
pub const DEFAULT_VALID_PREFIX_CHARACTERS: &str = r"^[\s\x00]?$";

static DEFAULT_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_VALID_PREFIX_CHARACTERS)
        .expect("default prefix pattern is valid")
});

pub type ChangeHandler =
    Rc<dyn Fn(&SuggestChangeHandlerProps<'_>, &mut SuggestActions)>;

/// Props for key bindings and text input hooks on the active match.
pub struct SuggestInputProps<'a> {
    pub matched: &'a SuggestMatch,
    pub state: &'a EditorState,
}

pub type KeyBindingHandler = Rc<
    dyn Fn(&SuggestInputProps<'_>, &KeyEvent, &mut SuggestActions) -> HandlerOutcome,
>;

pub type TextInputHandler = Rc<
    dyn Fn(
        &SuggestInputProps<'_>,
        usize,
        usize,
        &str,
        &mut SuggestActions,
    ) -> HandlerOutcome,
>;

pub type PositionValidator =
    Rc<dyn Fn(&ResolvedPos<'_>, &SuggestMatch) -> bool>;

/// Whether decorations are drawn for a suggester's active match.
#[derive(Clone, Default)]
pub enum DisableDecorations {
    #[default]
    Never,
    Always,
    When(Rc<dyn Fn(&EditorState, &SuggestMatch) -> bool>),
}

impl DisableDecorations {
    pub fn applies(&self, state: &EditorState, matched: &SuggestMatch) -> bool {
        match self {
            DisableDecorations::Never => false,
            DisableDecorations::Always => true,
            DisableDecorations::When(predicate) => predicate(state, matched),
        }
    }
}

/// A trigger-character pattern matcher, e.g. `@` for mentions.
///
/// Build with [`Suggester::new`] and the builder methods:
///
/// ```
/// use suggest::Suggester;
///
/// let tags = Suggester::new("tag", "#", |props, _actions| {
///     println!("{:?}: {}", props.reason, props.matched.query.full);
/// })
/// .priority(5)
/// .match_offset(1);
/// assert_eq!(tags.name, "tag");
/// ```
#[derive(Clone)]
pub struct Suggester {
    pub name: String,
    pub char: String,
    /// Higher priorities are matched first.
    pub priority: i32,
    /// Minimum query length before a match is reported.
    pub match_offset: usize,
    pub start_of_line: bool,
    /// Regex fragment for the characters allowed in a query.
    pub supported_characters: String,
    /// Regex tested against the char before the trigger.
    pub valid_prefix_characters: String,
    pub case_insensitive: bool,
    /// Block kinds the suggester is limited to, when set.
    pub valid_nodes: Option<Vec<String>>,
    /// Block kinds where the suggester never matches.
    pub invalid_nodes: Vec<String>,
    /// Only match when the selection is empty.
    pub empty_selections_only: bool,
    /// When false, moving the selection into matching text does not start
    /// a match; only edits do.
    pub match_on_selection: bool,
    pub suggest_tag: String,
    pub suggest_class_name: String,
    pub empty_class_name: String,
    pub ignored_tag: String,
    pub ignored_class_name: Option<String>,
    pub disable_decorations: DisableDecorations,
    pub is_valid_position: Option<PositionValidator>,
    /// Handlers for key presses while this suggester's match is active,
    /// keyed by [`KeyEvent::binding_name`].
    pub key_bindings: HashMap<String, KeyBindingHandler>,
    pub on_text_input: Option<TextInputHandler>,
    pub on_change: ChangeHandler,
}

impl Suggester {
    pub fn new(
        name: impl Into<String>,
        char: impl Into<String>,
        on_change: impl Fn(&SuggestChangeHandlerProps<'_>, &mut SuggestActions)
            + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            char: char.into(),
            priority: DEFAULT_SUGGESTER_PRIORITY,
            match_offset: 0,
            start_of_line: false,
            supported_characters: DEFAULT_SUPPORTED_CHARACTERS.to_owned(),
            valid_prefix_characters: DEFAULT_VALID_PREFIX_CHARACTERS
                .to_owned(),
            case_insensitive: false,
            valid_nodes: None,
            invalid_nodes: Vec::new(),
            empty_selections_only: false,
            match_on_selection: true,
            suggest_tag: "span".to_owned(),
            suggest_class_name: "suggest".to_owned(),
            empty_class_name: "suggest-empty".to_owned(),
            ignored_tag: "span".to_owned(),
            ignored_class_name: None,
            disable_decorations: DisableDecorations::Never,
            is_valid_position: None,
            key_bindings: HashMap::new(),
            on_text_input: None,
            on_change: Rc::new(on_change),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn match_offset(mut self, match_offset: usize) -> Self {
        self.match_offset = match_offset;
        self
    }

    pub fn start_of_line(mut self, start_of_line: bool) -> Self {
        self.start_of_line = start_of_line;
        self
    }

    pub fn supported_characters(mut self, pattern: impl Into<String>) -> Self {
        self.supported_characters = pattern.into();
        self
    }

    pub fn valid_prefix_characters(
        mut self,
        pattern: impl Into<String>,
    ) -> Self {
        self.valid_prefix_characters = pattern.into();
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn valid_nodes(mut self, kinds: &[&str]) -> Self {
        self.valid_nodes =
            Some(kinds.iter().map(|kind| kind.to_string()).collect());
        self
    }

    pub fn invalid_nodes(mut self, kinds: &[&str]) -> Self {
        self.invalid_nodes = kinds.iter().map(|kind| kind.to_string()).collect();
        self
    }

    pub fn empty_selections_only(mut self, only: bool) -> Self {
        self.empty_selections_only = only;
        self
    }

    pub fn match_on_selection(mut self, match_on_selection: bool) -> Self {
        self.match_on_selection = match_on_selection;
        self
    }

    pub fn suggest_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.suggest_class_name = class_name.into();
        self
    }

    pub fn ignored_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.ignored_class_name = Some(class_name.into());
        self
    }

    pub fn disable_decorations(mut self, disable: DisableDecorations) -> Self {
        self.disable_decorations = disable;
        self
    }

    pub fn is_valid_position(
        mut self,
        validator: impl Fn(&ResolvedPos<'_>, &SuggestMatch) -> bool + 'static,
    ) -> Self {
        self.is_valid_position = Some(Rc::new(validator));
        self
    }

    pub fn key_binding(
        mut self,
        key: impl Into<String>,
        handler: impl Fn(&SuggestInputProps<'_>, &KeyEvent, &mut SuggestActions) -> HandlerOutcome
            + 'static,
    ) -> Self {
        self.key_bindings.insert(key.into(), Rc::new(handler));
        self
    }

    pub fn on_text_input(
        mut self,
        handler: impl Fn(
                &SuggestInputProps<'_>,
                usize,
                usize,
                &str,
                &mut SuggestActions,
            ) -> HandlerOutcome
            + 'static,
    ) -> Self {
        self.on_text_input = Some(Rc::new(handler));
        self
    }

    /// Whether the suggester may match inside a block of `kind`.
    pub fn is_valid_node(&self, kind: &str) -> bool {
        if self.invalid_nodes.iter().any(|invalid| invalid == kind) {
            return false;
        }
        self.valid_nodes
            .as_ref()
            .map_or(true, |valid| valid.iter().any(|node| node == kind))
    }
}

impl fmt::Debug for Suggester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suggester")
            .field("name", &self.name)
            .field("char", &self.char)
            .field("priority", &self.priority)
            .field("match_offset", &self.match_offset)
            .field("start_of_line", &self.start_of_line)
            .field("supported_characters", &self.supported_characters)
            .field("key_bindings", &self.key_bindings.keys())
            .finish_non_exhaustive()
    }
}

/// A registered suggester with its patterns compiled.
#[derive(Clone, Debug)]
pub struct CompiledSuggester {
    pub(crate) options: Suggester,
    pub(crate) regex: Regex,
    pub(crate) prefix: Regex,
    /// Registration sequence number, used to break priority ties.
    pub(crate) order: usize,
}

impl CompiledSuggester {
    pub(crate) fn compile(options: Suggester, order: usize) -> SuggestResult<Self> {
        let invalid = |source| SuggestError::InvalidPattern {
            name: options.name.clone(),
            source,
        };
        let regex = Regex::new(&match_pattern(&options)).map_err(invalid)?;
        let prefix = if options.valid_prefix_characters
            == DEFAULT_VALID_PREFIX_CHARACTERS
        {
            DEFAULT_PREFIX_REGEX.clone()
        } else {
            Regex::new(&options.valid_prefix_characters).map_err(invalid)?
        };
        Ok(Self {
            options,
            regex,
            prefix,
            order,
        })
    }

    pub fn options(&self) -> &Suggester {
        &self.options
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }
}

/// Name of the capture group holding the query.
pub(crate) const QUERY_GROUP: &str = "query";

/// `[^]` + escaped trigger + `(?P<query>(?:supported){match_offset,})`.
fn match_pattern(options: &Suggester) -> String {
    let mut pattern = String::new();
    if options.case_insensitive {
        pattern.push_str("(?i)");
    }
    if options.start_of_line {
        pattern.push('^');
    }
    pattern.push_str(&regex::escape(&options.char));
    pattern.push_str(&format!(
        "(?P<{QUERY_GROUP}>(?:{}){{{},}})",
        options.supported_characters, options.match_offset
    ));
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str, char: &str) -> Suggester {
        Suggester::new(name, char, |_, _| {})
    }

    #[test]
    fn pattern_escapes_trigger_char() {
        let pattern = match_pattern(&noop("cmd", "+"));
        assert_eq!(pattern, r"\+(?P<query>(?:[\w\d_]+){0,})");
    }

    #[test]
    fn pattern_includes_offset_and_line_start() {
        let pattern =
            match_pattern(&noop("at", "@").match_offset(2).start_of_line(true));
        assert_eq!(pattern, r"^@(?P<query>(?:[\w\d_]+){2,})");
    }

    #[test]
    fn invalid_supported_characters_fail_to_compile() {
        let options = noop("broken", "@").supported_characters("[a-");
        let err = CompiledSuggester::compile(options, 0).unwrap_err();
        assert!(matches!(err, SuggestError::InvalidPattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn node_validity_honours_both_lists() {
        let suggester = noop("at", "@")
            .valid_nodes(&["paragraph", "heading"])
            .invalid_nodes(&["heading"]);
        assert!(suggester.is_valid_node("paragraph"));
        assert!(!suggester.is_valid_node("heading"));
        assert!(!suggester.is_valid_node("code_block"));
    }

    #[test]
    fn disable_decorations_variants() {
        let state = EditorState::from_text("");
        let matched = SuggestMatch {
            range: crate::MatchRange {
                from: 1,
                to: 2,
                cursor: 2,
            },
            query: Default::default(),
            text: Default::default(),
            text_after: String::new(),
            suggester: "at".into(),
        };
        assert!(!DisableDecorations::Never.applies(&state, &matched));
        assert!(DisableDecorations::Always.applies(&state, &matched));
        let when = DisableDecorations::When(Rc::new(
            |_: &EditorState, m: &SuggestMatch| {
                m.query.full.is_empty()
            },
        ));
        assert!(when.applies(&state, &matched));
    }
}
