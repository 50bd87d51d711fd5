// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The lifecycle orchestrator.

use std::any::{Any, TypeId};
use std::fmt;

use editor_state::{EditorState, EditorView, Plugin, Transaction};
use log::{debug, warn};
use suggest::{suggest, SuggestHandle};

use crate::commands::Commands;
use crate::events::Listeners;
use crate::extension::{CreateContext, ViewContext};
use crate::store::{ExtensionStore, ManagerStore};
use crate::{
    Combined, DisposerList, Extension, ExtensionKind, FrameworkAdapter,
    KeymapPlugin, ListenerId, ManagerError, ManagerPhase, ManagerResult,
    ManagerSettings, Preset, Registry, StateUpdateProps,
};

/// An entry to look for with [`Manager::includes`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// An extension or preset of this concrete type.
    Type(TypeId),
    /// An extension or preset with this name.
    Name(String),
}

impl Lookup {
    pub fn of<T: Any>() -> Self {
        Lookup::Type(TypeId::of::<T>())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Lookup::Name(name.into())
    }
}

/// Runs extensions through their lifecycle and mediates access to the
/// shared stores, the view and the suggest state.
pub struct Manager {
    phase: ManagerPhase,
    registry: Registry,
    /// Untouched copies of the combined list, for cloning.
    frozen: Vec<Combined>,
    store: ManagerStore,
    extension_store: ExtensionStore,
    commands: Commands,
    view: Option<EditorView>,
    suggest: Option<SuggestHandle>,
    framework: Option<Box<dyn FrameworkAdapter>>,
    framework_state: Option<EditorState>,
    disposers: DisposerList,
    listeners: Listeners,
}

impl Manager {
    pub fn new(combined: Vec<Combined>) -> ManagerResult<Self> {
        Self::with_settings(combined, ManagerSettings::default())
    }

    /// Register `combined` and run every extension's `on_create`.
    pub fn with_settings(
        combined: Vec<Combined>,
        settings: ManagerSettings,
    ) -> ManagerResult<Self> {
        let frozen = combined.iter().map(Combined::clone_combined).collect();
        let registry = Registry::register(combined, &settings)?;
        let commands = Commands::collect(
            registry
                .extensions()
                .flat_map(|registered| {
                    registered.extension().create_commands()
                }),
        )?;

        let mut manager = Self {
            phase: ManagerPhase::None,
            store: ManagerStore::new(settings),
            registry,
            frozen,
            extension_store: ExtensionStore::default(),
            commands,
            view: None,
            suggest: None,
            framework: None,
            framework_state: None,
            disposers: DisposerList::new(),
            listeners: Listeners::default(),
        };
        manager.populate_store();
        manager.set_phase(ManagerPhase::Create);

        for registered in manager.registry.extensions_mut() {
            let mut ctx = CreateContext {
                phase: manager.phase,
                store: &mut manager.store,
                extension_store: &mut manager.extension_store,
            };
            let disposer = registered.extension.on_create(&mut ctx)?;
            manager.disposers.push(disposer);
        }
        Ok(manager)
    }

    fn populate_store(&mut self) {
        for registered in self.registry.extensions() {
            let name = registered.name().to_owned();
            match registered.kind() {
                ExtensionKind::Node => self.store.node_names.push(name.clone()),
                ExtensionKind::Mark => self.store.mark_names.push(name.clone()),
                ExtensionKind::Plain => {
                    self.store.plain_names.push(name.clone())
                }
            }
            self.store.extension_names.push(name);
        }
        self.store.preset_names = self
            .registry
            .presets()
            .map(|preset| preset.name().to_owned())
            .collect();
        self.store.command_names = self.commands.names().to_vec();
    }

    fn set_phase(&mut self, phase: ManagerPhase) {
        #[cfg(any(test, feature = "assert-invariants"))]
        assert!(
            phase >= self.phase,
            "phase moved backwards from {} to {phase}",
            self.phase
        );
        debug!("Manager phase: {} -> {phase}", self.phase);
        self.phase = phase;
    }

    // ─── Accessors ────────────────────────────────────────────────────

    pub fn phase(&self) -> ManagerPhase {
        self.phase
    }

    /// The frozen store. Writes go through [`Manager::set_store_key`].
    pub fn store(&self) -> &ManagerStore {
        &self.store
    }

    pub fn extension_store(&self) -> &ExtensionStore {
        &self.extension_store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn view(&self) -> Option<&EditorView> {
        self.view.as_ref()
    }

    /// The suggest state, once plugins have been created.
    pub fn suggest(&self) -> Option<&SuggestHandle> {
        self.suggest.as_ref()
    }

    pub fn set_store_key<T: Any>(&mut self, key: &str, value: T) {
        self.store.set_store_key(key, value);
    }

    pub fn get_store_key<T: Any>(&self, key: &str) -> ManagerResult<&T> {
        self.store.get_store_key(key)
    }

    /// Set an extension store entry. Fails after the view phase.
    pub fn set_extension_store<T: Any>(
        &mut self,
        key: &str,
        value: T,
    ) -> ManagerResult<()> {
        self.extension_store.set(self.phase, key, value)
    }

    pub fn get_extension<E: Extension>(&self) -> ManagerResult<&E> {
        self.registry.by_constructor::<E>()
    }

    pub fn get_extension_mut<E: Extension>(
        &mut self,
    ) -> ManagerResult<&mut E> {
        self.registry.by_constructor_mut::<E>()
    }

    pub fn get_preset<P: Preset>(&self) -> ManagerResult<&P> {
        self.registry.preset_by_constructor::<P>()
    }

    /// Whether every entry of `list` is loaded, by type or by name.
    pub fn includes(&self, list: &[Lookup]) -> bool {
        list.iter().all(|lookup| match lookup {
            Lookup::Type(type_id) => {
                self.registry.has_extension_type(*type_id)
                    || self.registry.has_preset_type(*type_id)
            }
            Lookup::Name(name) => self.registry.has_name(name),
        })
    }

    // ─── Cloning ──────────────────────────────────────────────────────

    /// A new manager built from fresh copies of the original extensions
    /// and presets, with the same settings.
    pub fn try_clone(&self) -> ManagerResult<Manager> {
        self.recreate(Vec::new())
    }

    /// Like [`Manager::try_clone`], with `extra` appended.
    pub fn recreate(&self, extra: Vec<Combined>) -> ManagerResult<Manager> {
        let mut combined: Vec<Combined> =
            self.frozen.iter().map(Combined::clone_combined).collect();
        combined.extend(extra);
        Manager::with_settings(combined, self.store.settings.clone())
    }

    // ─── State and view ───────────────────────────────────────────────

    pub fn create_state(&self, content: &str) -> EditorState {
        EditorState::from_text(content)
    }

    /// Every extension's plugins, in load order, preceded by the suggest
    /// plugin and followed by the keymap. Replaces the suggest state of
    /// any earlier call.
    pub fn create_plugins(&mut self) -> ManagerResult<Vec<Box<dyn Plugin>>> {
        let mut plugins: Vec<Box<dyn Plugin>> = Vec::new();
        if !self.store.settings.exclude_suggesters {
            let suggesters = self
                .registry
                .extensions()
                .flat_map(|registered| {
                    registered.extension().create_suggesters()
                })
                .collect();
            let (plugin, handle) = suggest(suggesters)?;
            plugins.push(Box::new(plugin));
            self.suggest = Some(handle);
        }
        for registered in self.registry.extensions() {
            plugins.extend(registered.extension().create_plugins());
        }
        let bindings = self
            .registry
            .extensions()
            .flat_map(|registered| registered.extension().create_keymap());
        plugins.push(Box::new(KeymapPlugin::new(bindings)));
        Ok(plugins)
    }

    /// Build a view over `state` with the manager's plugins and attach it.
    /// Does nothing once a view has been attached, so the suggest handle
    /// keeps pointing at the state the live view drives.
    pub fn create_view(&mut self, state: EditorState) -> ManagerResult<()> {
        if self.phase >= ManagerPhase::EditorView {
            warn!("create_view called in the {} phase; ignoring", self.phase);
            return Ok(());
        }
        let plugins = self.create_plugins()?;
        self.add_view(EditorView::new(state, plugins))
    }

    /// Attach `view` and run every `on_view`. Does nothing once a view has
    /// been attached.
    pub fn add_view(&mut self, view: EditorView) -> ManagerResult<()> {
        if self.phase >= ManagerPhase::EditorView {
            warn!("add_view called in the {} phase; ignoring", self.phase);
            return Ok(());
        }
        self.set_phase(ManagerPhase::EditorView);
        self.extension_store.current_state = Some(view.state().clone());
        let view: &EditorView = self.view.insert(view);
        for registered in self.registry.extensions_mut() {
            let mut ctx = ViewContext {
                phase: self.phase,
                view,
                store: &self.store,
                extension_store: &mut self.extension_store,
            };
            let disposer = registered.extension.on_view(&mut ctx)?;
            self.disposers.push(disposer);
        }
        Ok(())
    }

    pub fn attach_framework(&mut self, framework: Box<dyn FrameworkAdapter>) {
        self.framework_state = framework.initial_state();
        self.framework = Some(framework);
    }

    /// The current state. Before a view exists, only an attached framework
    /// can provide one.
    pub fn get_state(&self) -> ManagerResult<&EditorState> {
        if let Some(view) = &self.view {
            return Ok(view.state());
        }
        if self.phase < ManagerPhase::EditorView {
            if let Some(state) = &self.framework_state {
                return Ok(state);
            }
        }
        Err(ManagerError::MissingView)
    }

    /// Replace the view's state, then propagate the update.
    pub fn update_state(&mut self, state: EditorState) -> ManagerResult<()> {
        let view = self.view.as_mut().ok_or(ManagerError::MissingView)?;
        let previous_state = view.state().clone();
        view.update_state(state.clone());
        self.on_state_update(previous_state, state);
        Ok(())
    }

    /// Dispatch `tr` to the view, then propagate the update.
    pub fn dispatch(&mut self, tr: Transaction) -> ManagerResult<()> {
        let view = self.view.as_mut().ok_or(ManagerError::MissingView)?;
        let previous_state = view.state().clone();
        view.dispatch(tr);
        let state = view.state().clone();
        self.on_state_update(previous_state, state);
        Ok(())
    }

    /// Run `f` against the view. If it dispatched or replaced the state,
    /// the update is propagated afterwards, even when the resulting state
    /// equals the previous one.
    pub fn with_view<R>(
        &mut self,
        f: impl FnOnce(&mut EditorView) -> R,
    ) -> ManagerResult<R> {
        let view = self.view.as_mut().ok_or(ManagerError::MissingView)?;
        let previous_state = view.state().clone();
        let updates = view.update_count();
        let result = f(view);
        if view.update_count() != updates {
            let state = view.state().clone();
            self.on_state_update(previous_state, state);
        }
        Ok(result)
    }

    /// Run a command against the current state. Returns whether it could
    /// run.
    pub fn run_command(&mut self, name: &str) -> ManagerResult<bool> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| ManagerError::MissingCommand(name.to_owned()))?
            .clone();
        let tr = command(self.get_state()?);
        match tr {
            Some(tr) => self.dispatch(tr).map(|_| true),
            None => Ok(false),
        }
    }

    /// Record a state change and tell every extension, listener and the
    /// framework about it. The first call after a view is attached moves
    /// the manager to the runtime phase.
    pub fn on_state_update(
        &mut self,
        previous_state: EditorState,
        state: EditorState,
    ) {
        if self.phase == ManagerPhase::Destroy {
            warn!("State update after destroy; ignoring");
            return;
        }
        let first_update = self.phase == ManagerPhase::EditorView;
        if first_update {
            self.set_phase(ManagerPhase::Runtime);
        }
        self.extension_store.previous_state = Some(previous_state.clone());
        self.extension_store.current_state = Some(state.clone());

        let props = StateUpdateProps {
            previous_state,
            state,
            first_update,
        };
        for registered in self.registry.extensions_mut() {
            registered.extension.on_state_update(&props);
        }
        self.listeners.emit_state_update(&props);
        if let Some(framework) = self.framework.as_mut() {
            framework.on_state_update(&props);
        }
    }

    // ─── Events ───────────────────────────────────────────────────────

    pub fn add_state_update_listener(
        &mut self,
        listener: impl FnMut(&StateUpdateProps) + 'static,
    ) -> ListenerId {
        self.listeners.add_state_update(Box::new(listener))
    }

    pub fn add_destroy_listener(
        &mut self,
        listener: impl FnMut() + 'static,
    ) -> ListenerId {
        self.listeners.add_destroy(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ─── Teardown ─────────────────────────────────────────────────────

    /// Tear everything down. Safe to call without a view, and more than
    /// once.
    pub fn destroy(&mut self) {
        if self.phase == ManagerPhase::Destroy {
            return;
        }
        self.set_phase(ManagerPhase::Destroy);
        for registered in self.registry.extensions_mut() {
            registered.extension.on_destroy();
        }
        match self.view.as_mut() {
            Some(view) => view.destroy(),
            None => {
                if let Some(suggest) = &self.suggest {
                    suggest.borrow_mut().destroy();
                }
            }
        }
        if let Some(mut framework) = self.framework.take() {
            framework.destroy();
        }
        self.framework_state = None;
        let disposed = self.disposers.dispose_all();
        debug!("Ran {disposed} disposers");
        self.view = None;
        self.listeners.emit_destroy();
        self.listeners.clear();
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.disposers.dispose_all();
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("phase", &self.phase)
            .field("registry", &self.registry)
            .field("store", &self.store)
            .field("commands", &self.commands)
            .field("view", &self.view.is_some())
            .field("framework", &self.framework.is_some())
            .field("disposers", &self.disposers.pending())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
