use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::PluginId;
use crate::error::{EngineError, Result};

/// Lifetime and sharing breadth of a plugin's stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginDataScope {
    /// Lives as long as the engine, shared by every `process` call.
    Global,
    /// One per `process` call, shared by all blocks of the group.
    Group,
    /// One per block.
    Block,
}

impl fmt::Display for PluginDataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PluginDataScope::Global => "global",
            PluginDataScope::Group => "group",
            PluginDataScope::Block => "block",
        };
        f.write_str(name)
    }
}

/// Plugin-private values keyed by plugin identity.
///
/// Keys are plain [`PluginId`]s, so an entry never keeps its plugin alive.
/// The table is dropped together with the scope that owns it; there is no
/// per-plugin cleanup.
#[derive(Default)]
pub struct PluginDataMap {
    entries: RefCell<HashMap<PluginId, Rc<dyn Any>>>,
}

impl fmt::Debug for PluginDataMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDataMap")
            .field("entries", &self.len())
            .finish()
    }
}

impl PluginDataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains(&self, plugin: PluginId) -> bool {
        self.entries.borrow().contains_key(&plugin)
    }

    /// Returns the plugin's value, creating it with `init` on first access.
    ///
    /// Every later call hands out the same `Rc`, so changes made through it
    /// are seen by all hooks of the plugin that share this scope.
    pub fn get_or_init<T, F>(
        &self,
        plugin: PluginId,
        scope: PluginDataScope,
        init: F,
    ) -> Result<Rc<RefCell<T>>>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        let existing = self.entries.borrow().get(&plugin).cloned();
        let entry = match existing {
            Some(entry) => entry,
            None => {
                // `init` may itself read plugin data, so the table is not borrowed while it runs.
                let created: Rc<dyn Any> = Rc::new(RefCell::new(init()));
                let mut entries = self.entries.borrow_mut();
                Rc::clone(entries.entry(plugin).or_insert(created))
            }
        };
        entry
            .downcast::<RefCell<T>>()
            .map_err(|_| EngineError::PluginDataType {
                plugin,
                scope,
                expected: type_name::<T>(),
            })
    }
}

/// The three tables visible while one block is processed.
#[derive(Debug, Clone)]
pub struct ScopedPluginData {
    global: Rc<PluginDataMap>,
    group: Rc<PluginDataMap>,
    block: Rc<PluginDataMap>,
}

impl ScopedPluginData {
    /// Combines the shared tables with a fresh block table.
    pub fn new(global: Rc<PluginDataMap>, group: Rc<PluginDataMap>) -> Self {
        Self {
            global,
            group,
            block: Rc::new(PluginDataMap::new()),
        }
    }

    pub fn scope(&self, scope: PluginDataScope) -> &PluginDataMap {
        match scope {
            PluginDataScope::Global => &self.global,
            PluginDataScope::Group => &self.group,
            PluginDataScope::Block => &self.block,
        }
    }
}
