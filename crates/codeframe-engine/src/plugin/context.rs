//! Context values passed to hook handlers.
//!
//! A context is built for a single call and dropped right after it, so each
//! handler only sees what its phase allows: content phases get the block
//! mutably, rendering phases get it read-only plus the tree being built.

use std::cell::RefCell;
use std::rc::Rc;

use super::PluginId;
use super::data::{PluginDataScope, ScopedPluginData};
use crate::block::{CodeBlock, CodeLine};
use crate::error::Result;
use crate::rendering::ast::{Element, Root};

/// Plugin data lookups bound to one plugin and one set of scopes.
#[derive(Debug, Clone, Copy)]
pub struct PluginDataAccess<'a> {
    plugin: PluginId,
    scopes: &'a ScopedPluginData,
}

impl<'a> PluginDataAccess<'a> {
    pub(crate) fn new(plugin: PluginId, scopes: &'a ScopedPluginData) -> Self {
        Self { plugin, scopes }
    }

    pub fn plugin(&self) -> PluginId {
        self.plugin
    }

    /// See [`PluginDataMap::get_or_init`](super::PluginDataMap::get_or_init).
    pub fn get<T, F>(&self, scope: PluginDataScope, init: F) -> Result<Rc<RefCell<T>>>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        self.scopes.scope(scope).get_or_init(self.plugin, scope, init)
    }
}

/// Context of the six content phases, from `preprocessMetadata` to `postprocessAnnotations`.
pub struct BlockContext<'a> {
    pub code_block: &'a mut CodeBlock,
    plugin_data: PluginDataAccess<'a>,
}

impl<'a> BlockContext<'a> {
    pub(crate) fn new(code_block: &'a mut CodeBlock, plugin_data: PluginDataAccess<'a>) -> Self {
        Self {
            code_block,
            plugin_data,
        }
    }

    pub fn plugin_data<T, F>(&self, scope: PluginDataScope, init: F) -> Result<Rc<RefCell<T>>>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        self.plugin_data.get(scope, init)
    }
}

/// Tree of the line being rendered; handlers may edit or replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRenderData {
    pub line_ast: Element,
}

pub struct LineContext<'a> {
    pub code_block: &'a CodeBlock,
    pub line: &'a CodeLine,
    /// Zero-based index of `line` within the block.
    pub line_index: usize,
    pub render_data: &'a mut LineRenderData,
    plugin_data: PluginDataAccess<'a>,
}

impl<'a> LineContext<'a> {
    pub(crate) fn new(
        code_block: &'a CodeBlock,
        line: &'a CodeLine,
        line_index: usize,
        render_data: &'a mut LineRenderData,
        plugin_data: PluginDataAccess<'a>,
    ) -> Self {
        Self {
            code_block,
            line,
            line_index,
            render_data,
            plugin_data,
        }
    }

    pub fn plugin_data<T, F>(&self, scope: PluginDataScope, init: F) -> Result<Rc<RefCell<T>>>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        self.plugin_data.get(scope, init)
    }
}

/// Tree of the whole block; handlers may edit or replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRenderData {
    pub block_ast: Element,
}

pub struct RenderedBlockContext<'a> {
    pub code_block: &'a CodeBlock,
    pub render_data: &'a mut BlockRenderData,
    plugin_data: PluginDataAccess<'a>,
}

impl<'a> RenderedBlockContext<'a> {
    pub(crate) fn new(
        code_block: &'a CodeBlock,
        render_data: &'a mut BlockRenderData,
        plugin_data: PluginDataAccess<'a>,
    ) -> Self {
        Self {
            code_block,
            render_data,
            plugin_data,
        }
    }

    pub fn plugin_data<T, F>(&self, scope: PluginDataScope, init: F) -> Result<Rc<RefCell<T>>>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        self.plugin_data.get(scope, init)
    }
}

/// One finished block as seen by a group hook.
pub struct GroupContent<'a> {
    pub code_block: &'a CodeBlock,
    pub block_ast: &'a Element,
    plugin_data: PluginDataAccess<'a>,
}

impl<'a> GroupContent<'a> {
    pub(crate) fn new(
        code_block: &'a CodeBlock,
        block_ast: &'a Element,
        plugin_data: PluginDataAccess<'a>,
    ) -> Self {
        Self {
            code_block,
            block_ast,
            plugin_data,
        }
    }

    /// Data of the calling plugin as it was while this block was processed,
    /// including its block scope.
    pub fn plugin_data<T, F>(&self, scope: PluginDataScope, init: F) -> Result<Rc<RefCell<T>>>
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        self.plugin_data.get(scope, init)
    }
}

/// Tree of the whole group; handlers may edit or replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRenderData {
    pub group_ast: Root,
}

pub struct GroupContext<'a> {
    pub group_contents: Vec<GroupContent<'a>>,
    pub render_data: &'a mut GroupRenderData,
}

impl<'a> GroupContext<'a> {
    pub(crate) fn new(
        group_contents: Vec<GroupContent<'a>>,
        render_data: &'a mut GroupRenderData,
    ) -> Self {
        Self {
            group_contents,
            render_data,
        }
    }
}
