// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Expansion, validation and ordering of the extensions a manager loads.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;

use crate::{
    Combined, Extension, ExtensionKind, ManagerError, ManagerResult,
    ManagerSettings, Preset,
};

/// A loaded extension with its effective priority.
pub struct RegisteredExtension {
    pub(crate) extension: Box<dyn Extension>,
    priority: i32,
    type_id: TypeId,
    /// The preset that provided the extension, if any.
    preset: Option<String>,
}

impl RegisteredExtension {
    fn new(
        extension: Box<dyn Extension>,
        preset: Option<String>,
        settings: &ManagerSettings,
    ) -> Self {
        let priority =
            settings.priority_for(extension.name(), extension.priority());
        let type_id = concrete_type_id(&*extension);
        Self {
            extension,
            priority,
            type_id,
            preset,
        }
    }

    pub fn extension(&self) -> &dyn Extension {
        self.extension.as_ref()
    }

    pub fn name(&self) -> &str {
        self.extension.name()
    }

    pub fn kind(&self) -> ExtensionKind {
        self.extension.kind()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }
}

struct RegisteredPreset {
    preset: Box<dyn Preset>,
    type_id: TypeId,
}

fn concrete_type_id(value: &dyn Any) -> TypeId {
    value.type_id()
}

fn missing_extension<E: Extension>() -> ManagerError {
    ManagerError::MissingExtension(type_name::<E>().to_owned())
}

/// Extensions in load order, with O(1) lookup by concrete type.
#[derive(Default)]
pub struct Registry {
    extensions: Vec<RegisteredExtension>,
    presets: Vec<RegisteredPreset>,
    extension_index: HashMap<TypeId, usize>,
    preset_index: HashMap<TypeId, usize>,
}

impl Registry {
    /// Expand presets, apply priority overrides, drop preset-provided
    /// duplicates, check name uniqueness and sort by priority.
    pub fn register(
        combined: Vec<Combined>,
        settings: &ManagerSettings,
    ) -> ManagerResult<Self> {
        let mut registry = Self::default();
        let mut expanded = Vec::new();
        for entry in combined {
            match entry {
                Combined::Extension(extension) => {
                    expanded.push(RegisteredExtension::new(
                        extension, None, settings,
                    ));
                }
                Combined::Preset(preset) => {
                    let name = preset.name().to_owned();
                    for extension in preset.create_extensions() {
                        expanded.push(RegisteredExtension::new(
                            extension,
                            Some(name.clone()),
                            settings,
                        ));
                    }
                    let type_id = concrete_type_id(&*preset);
                    registry.presets.push(RegisteredPreset { preset, type_id });
                }
            }
        }

        registry.extensions = dedupe(expanded);
        registry.check_names()?;
        registry
            .extensions
            .sort_by_key(|registered| registered.priority);

        for (index, registered) in registry.extensions.iter().enumerate() {
            registry
                .extension_index
                .entry(registered.type_id)
                .or_insert(index);
        }
        for (index, registered) in registry.presets.iter().enumerate() {
            registry
                .preset_index
                .entry(registered.type_id)
                .or_insert(index);
        }
        debug!(
            "Registered extensions: {:?}",
            registry.extensions().map(|e| e.name()).collect::<Vec<_>>()
        );
        Ok(registry)
    }

    fn check_names(&self) -> ManagerResult<()> {
        let mut seen: HashMap<ExtensionKind, HashSet<&str>> = HashMap::new();
        for registered in &self.extensions {
            let kind = registered.kind();
            if !seen.entry(kind).or_default().insert(registered.name()) {
                return Err(ManagerError::DuplicateName {
                    name: registered.name().to_owned(),
                    namespace: kind.to_string(),
                });
            }
        }
        let mut presets = HashSet::new();
        for registered in &self.presets {
            if !presets.insert(registered.preset.name()) {
                return Err(ManagerError::DuplicateName {
                    name: registered.preset.name().to_owned(),
                    namespace: "preset".to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Extensions in load order.
    pub fn extensions(&self) -> impl Iterator<Item = &RegisteredExtension> {
        self.extensions.iter()
    }

    pub(crate) fn extensions_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut RegisteredExtension> {
        self.extensions.iter_mut()
    }

    pub fn presets(&self) -> impl Iterator<Item = &dyn Preset> {
        self.presets.iter().map(|registered| registered.preset.as_ref())
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The loaded extension of type `E`.
    pub fn by_constructor<E: Extension>(&self) -> ManagerResult<&E> {
        let any: &dyn Any = &*self.entry::<E>()?.extension;
        any.downcast_ref::<E>().ok_or_else(missing_extension::<E>)
    }

    pub fn by_constructor_mut<E: Extension>(
        &mut self,
    ) -> ManagerResult<&mut E> {
        let index = self.index_of::<E>()?;
        let any: &mut dyn Any = &mut *self.extensions[index].extension;
        any.downcast_mut::<E>().ok_or_else(missing_extension::<E>)
    }

    pub fn preset_by_constructor<P: Preset>(&self) -> ManagerResult<&P> {
        let missing =
            || ManagerError::MissingPreset(type_name::<P>().to_owned());
        let index = *self
            .preset_index
            .get(&TypeId::of::<P>())
            .ok_or_else(missing)?;
        let any: &dyn Any = &*self.presets[index].preset;
        any.downcast_ref::<P>().ok_or_else(missing)
    }

    pub fn has_extension_type(&self, type_id: TypeId) -> bool {
        self.extension_index.contains_key(&type_id)
    }

    pub fn has_preset_type(&self, type_id: TypeId) -> bool {
        self.preset_index.contains_key(&type_id)
    }

    /// Whether an extension or preset called `name` is loaded.
    pub fn has_name(&self, name: &str) -> bool {
        self.extensions().any(|registered| registered.name() == name)
            || self.presets().any(|preset| preset.name() == name)
    }

    fn index_of<E: Extension>(&self) -> ManagerResult<usize> {
        self.extension_index
            .get(&TypeId::of::<E>())
            .copied()
            .ok_or_else(missing_extension::<E>)
    }

    fn entry<E: Extension>(&self) -> ManagerResult<&RegisteredExtension> {
        Ok(&self.extensions[self.index_of::<E>()?])
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "extensions",
                &self
                    .extensions()
                    .map(|e| (e.name(), e.priority()))
                    .collect::<Vec<_>>(),
            )
            .field(
                "presets",
                &self.presets().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Drop a preset-provided extension whose type is already loaded. Of the
/// two, the lower priority value wins; on a tie the earlier entry does.
/// Two extensions given directly are both kept.
fn dedupe(expanded: Vec<RegisteredExtension>) -> Vec<RegisteredExtension> {
    let mut kept: Vec<RegisteredExtension> = Vec::with_capacity(expanded.len());
    for candidate in expanded {
        let existing = kept.iter().position(|registered| {
            registered.type_id == candidate.type_id
                && (registered.preset.is_some() || candidate.preset.is_some())
        });
        match existing {
            Some(index) if candidate.priority < kept[index].priority => {
                debug!(
                    "Replacing '{}' with the copy from {:?}",
                    kept[index].name(),
                    candidate.preset
                );
                kept[index] = candidate;
            }
            Some(_) => {
                debug!(
                    "Dropping duplicate '{}' from {:?}",
                    candidate.name(),
                    candidate.preset
                );
            }
            None => kept.push(candidate),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;
    use crate::ManagerErrorCode;

    #[derive(Clone, Debug)]
    struct Named {
        name: &'static str,
        kind: ExtensionKind,
        priority: i32,
    }

    impl Extension for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> ExtensionKind {
            self.kind
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn clone_extension(&self) -> Box<dyn Extension> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone, Debug)]
    struct Bold {
        priority: i32,
    }

    impl Extension for Bold {
        fn name(&self) -> &str {
            "bold"
        }

        fn kind(&self) -> ExtensionKind {
            ExtensionKind::Mark
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn clone_extension(&self) -> Box<dyn Extension> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone, Debug)]
    struct Italic;

    impl Extension for Italic {
        fn name(&self) -> &str {
            "italic"
        }

        fn kind(&self) -> ExtensionKind {
            ExtensionKind::Mark
        }

        fn clone_extension(&self) -> Box<dyn Extension> {
            Box::new(Italic)
        }
    }

    #[derive(Clone, Debug)]
    struct Formatting {
        bold_priority: i32,
    }

    impl Preset for Formatting {
        fn name(&self) -> &str {
            "formatting"
        }

        fn create_extensions(&self) -> Vec<Box<dyn Extension>> {
            vec![
                Box::new(Bold {
                    priority: self.bold_priority,
                }),
                Box::new(Italic),
            ]
        }

        fn clone_preset(&self) -> Box<dyn Preset> {
            Box::new(self.clone())
        }
    }

    fn named(
        name: &'static str,
        kind: ExtensionKind,
        priority: i32,
    ) -> Combined {
        Combined::extension(Named {
            name,
            kind,
            priority,
        })
    }

    fn formatting(bold_priority: i32) -> Combined {
        Combined::preset(Formatting { bold_priority })
    }

    fn register(combined: Vec<Combined>) -> ManagerResult<Registry> {
        Registry::register(combined, &ManagerSettings::default())
    }

    fn names(registry: &Registry) -> Vec<&str> {
        registry.extensions().map(|e| e.name()).collect()
    }

    // ===================================================================
    // Ordering
    // ===================================================================

    #[test]
    fn extensions_load_by_ascending_priority_keeping_ties_stable() {
        let registry = register(vec![
            named("c", ExtensionKind::Plain, 100),
            named("a", ExtensionKind::Plain, 10),
            named("d", ExtensionKind::Plain, 100),
            named("b", ExtensionKind::Plain, 50),
        ])
        .unwrap();
        assert_eq!(names(&registry), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn settings_override_priorities() {
        let settings = ManagerSettings::new().with_priority("late", 1);
        let registry = Registry::register(
            vec![
                named("early", ExtensionKind::Plain, 10),
                named("late", ExtensionKind::Plain, 200),
            ],
            &settings,
        )
        .unwrap();
        assert_eq!(names(&registry), vec!["late", "early"]);
        assert_eq!(registry.extensions().next().unwrap().priority(), 1);
    }

    // ===================================================================
    // Names
    // ===================================================================

    #[test]
    fn duplicate_names_in_one_namespace_fail() {
        let err = register(vec![
            named("bold", ExtensionKind::Mark, 100),
            named("bold", ExtensionKind::Mark, 100),
        ])
        .unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::DuplicateName);
        assert_eq!(err.to_string(), "Duplicate mark name 'bold'");
    }

    #[test]
    fn namespaces_are_independent() {
        let registry = register(vec![
            named("code", ExtensionKind::Mark, 100),
            named("code", ExtensionKind::Node, 100),
            named("code", ExtensionKind::Plain, 100),
        ]);
        assert_that!(registry.map(|r| r.len()).ok()).is_equal_to(Some(3));
    }

    #[test]
    fn duplicate_preset_names_fail() {
        let err = register(vec![formatting(100), formatting(100)])
            .unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::DuplicateName);
        assert_eq!(err.to_string(), "Duplicate preset name 'formatting'");
    }

    // ===================================================================
    // Presets
    // ===================================================================

    #[test]
    fn presets_expand_in_place() {
        let registry = register(vec![
            named("first", ExtensionKind::Plain, 100),
            formatting(100),
            named("last", ExtensionKind::Plain, 100),
        ])
        .unwrap();
        assert_eq!(names(&registry), vec!["first", "bold", "italic", "last"]);
        let bold = registry.extensions().nth(1).unwrap();
        assert_eq!(bold.preset(), Some("formatting"));
        assert!(registry.preset_by_constructor::<Formatting>().is_ok());
    }

    #[test]
    fn preset_copy_of_a_loaded_type_is_dropped() {
        let registry = register(vec![
            Combined::extension(Bold { priority: 100 }),
            formatting(100),
        ])
        .unwrap();
        assert_eq!(names(&registry), vec!["bold", "italic"]);
        assert_eq!(registry.extensions().next().unwrap().preset(), None);
    }

    #[test]
    fn preset_copy_with_a_lower_priority_replaces_the_loaded_one() {
        let registry = register(vec![
            Combined::extension(Bold { priority: 100 }),
            formatting(10),
        ])
        .unwrap();
        let bold = registry.by_constructor::<Bold>().unwrap();
        assert_eq!(bold.priority, 10);
        assert_eq!(registry.len(), 2);
    }

    // ===================================================================
    // Lookup
    // ===================================================================

    #[test]
    fn lookup_by_type() {
        let registry = register(vec![
            Combined::extension(Italic),
            named("other", ExtensionKind::Plain, 1),
        ])
        .unwrap();
        assert_eq!(registry.by_constructor::<Italic>().unwrap().name(), "italic");
        let err = registry.by_constructor::<Bold>().unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::MissingExtension);
        let err = registry.preset_by_constructor::<Formatting>().unwrap_err();
        assert_eq!(err.code(), ManagerErrorCode::MissingPreset);
        assert!(registry.has_name("other"));
        assert!(!registry.has_name("missing"));
    }

    #[test]
    fn mutable_lookup_reaches_the_loaded_instance() {
        let mut registry =
            register(vec![Combined::extension(Bold { priority: 100 })])
                .unwrap();
        registry.by_constructor_mut::<Bold>().unwrap().priority = 7;
        assert_eq!(registry.by_constructor::<Bold>().unwrap().priority, 7);
    }
}
