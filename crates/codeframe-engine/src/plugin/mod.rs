//! # Plugins
//!
//! A [`Plugin`] is a named set of optional hook handlers. The set of hooks is
//! closed ([`HookName`]) and every handler slot is typed by the context it
//! receives, so dispatch is a lookup rather than runtime inspection.
//!
//! ```
//! use codeframe_engine::plugin::{HookName, Plugin, PluginDataScope};
//!
//! let plugin = Plugin::new("counter").on_preprocess_code(|ctx| {
//!     let seen = ctx.plugin_data(PluginDataScope::Group, || 0usize)?;
//!     *seen.borrow_mut() += 1;
//!     Ok(())
//! });
//!
//! assert!(plugin.implements(HookName::PreprocessCode));
//! assert!(!plugin.implements(HookName::AnnotateCode));
//! ```
//!
//! ## Modules
//!
//! - **`context`**: per-call context values handed to hooks
//! - **`data`**: the scoped, identity-keyed plugin data store
//! - **`registry`**: ordered lookup of handlers by hook name

pub mod context;
pub mod data;
pub mod registry;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use context::{
    BlockContext, BlockRenderData, GroupContent, GroupContext, GroupRenderData, LineContext,
    LineRenderData, PluginDataAccess, RenderedBlockContext,
};
pub use data::{PluginDataMap, PluginDataScope, ScopedPluginData};
pub use registry::PluginRegistry;

static NEXT_PLUGIN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a plugin instance.
///
/// Assigned once when the plugin is created and never derived from its
/// contents: two plugins built the same way are still different plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginId(u64);

impl PluginId {
    fn next() -> Self {
        PluginId(NEXT_PLUGIN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin #{}", self.0)
    }
}

/// Every extension point, in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookName {
    PreprocessMetadata,
    PreprocessCode,
    PerformSyntaxAnalysis,
    PostprocessAnalyzedCode,
    AnnotateCode,
    PostprocessAnnotations,
    PostprocessRenderedLine,
    PostprocessRenderedBlock,
    PostprocessRenderedBlockGroup,
}

impl HookName {
    pub const ALL: [HookName; 9] = [
        HookName::PreprocessMetadata,
        HookName::PreprocessCode,
        HookName::PerformSyntaxAnalysis,
        HookName::PostprocessAnalyzedCode,
        HookName::AnnotateCode,
        HookName::PostprocessAnnotations,
        HookName::PostprocessRenderedLine,
        HookName::PostprocessRenderedBlock,
        HookName::PostprocessRenderedBlockGroup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookName::PreprocessMetadata => "preprocessMetadata",
            HookName::PreprocessCode => "preprocessCode",
            HookName::PerformSyntaxAnalysis => "performSyntaxAnalysis",
            HookName::PostprocessAnalyzedCode => "postprocessAnalyzedCode",
            HookName::AnnotateCode => "annotateCode",
            HookName::PostprocessAnnotations => "postprocessAnnotations",
            HookName::PostprocessRenderedLine => "postprocessRenderedLine",
            HookName::PostprocessRenderedBlock => "postprocessRenderedBlock",
            HookName::PostprocessRenderedBlockGroup => "postprocessRenderedBlockGroup",
        }
    }

    /// Whether the hook runs before rendering and receives a [`BlockContext`].
    pub fn is_block_phase(self) -> bool {
        self < HookName::PostprocessRenderedLine
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type BlockHookFn = Box<dyn Fn(&mut BlockContext<'_>) -> anyhow::Result<()>>;
pub type LineHookFn = Box<dyn Fn(&mut LineContext<'_>) -> anyhow::Result<()>>;
pub type RenderedBlockHookFn =
    Box<dyn Fn(&mut RenderedBlockContext<'_>) -> anyhow::Result<()>>;
pub type GroupHookFn = Box<dyn Fn(&mut GroupContext<'_>) -> anyhow::Result<()>>;

/// Handler slots, one per hook. Empty slots are skipped during dispatch.
#[derive(Default)]
pub struct PluginHooks {
    pub preprocess_metadata: Option<BlockHookFn>,
    pub preprocess_code: Option<BlockHookFn>,
    pub perform_syntax_analysis: Option<BlockHookFn>,
    pub postprocess_analyzed_code: Option<BlockHookFn>,
    pub annotate_code: Option<BlockHookFn>,
    pub postprocess_annotations: Option<BlockHookFn>,
    pub postprocess_rendered_line: Option<LineHookFn>,
    pub postprocess_rendered_block: Option<RenderedBlockHookFn>,
    pub postprocess_rendered_block_group: Option<GroupHookFn>,
}

impl PluginHooks {
    /// The handler for one of the six content phases.
    pub fn block_hook(&self, hook: HookName) -> Option<&BlockHookFn> {
        match hook {
            HookName::PreprocessMetadata => self.preprocess_metadata.as_ref(),
            HookName::PreprocessCode => self.preprocess_code.as_ref(),
            HookName::PerformSyntaxAnalysis => self.perform_syntax_analysis.as_ref(),
            HookName::PostprocessAnalyzedCode => self.postprocess_analyzed_code.as_ref(),
            HookName::AnnotateCode => self.annotate_code.as_ref(),
            HookName::PostprocessAnnotations => self.postprocess_annotations.as_ref(),
            HookName::PostprocessRenderedLine
            | HookName::PostprocessRenderedBlock
            | HookName::PostprocessRenderedBlockGroup => None,
        }
    }

    pub fn implements(&self, hook: HookName) -> bool {
        match hook {
            HookName::PostprocessRenderedLine => self.postprocess_rendered_line.is_some(),
            HookName::PostprocessRenderedBlock => self.postprocess_rendered_block.is_some(),
            HookName::PostprocessRenderedBlockGroup => {
                self.postprocess_rendered_block_group.is_some()
            }
            block_phase => self.block_hook(block_phase).is_some(),
        }
    }

    fn block_slot(&mut self, hook: HookName) -> Option<&mut Option<BlockHookFn>> {
        match hook {
            HookName::PreprocessMetadata => Some(&mut self.preprocess_metadata),
            HookName::PreprocessCode => Some(&mut self.preprocess_code),
            HookName::PerformSyntaxAnalysis => Some(&mut self.perform_syntax_analysis),
            HookName::PostprocessAnalyzedCode => Some(&mut self.postprocess_analyzed_code),
            HookName::AnnotateCode => Some(&mut self.annotate_code),
            HookName::PostprocessAnnotations => Some(&mut self.postprocess_annotations),
            _ => None,
        }
    }
}

/// A named plugin and its hook handlers.
///
/// Plugins are not `Clone`: the engine tells them apart by [`PluginId`], and
/// a copy would be a different plugin with separate data.
pub struct Plugin {
    id: PluginId,
    name: String,
    hooks: PluginHooks,
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<&str> = HookName::ALL
            .iter()
            .filter(|hook| self.implements(**hook))
            .map(|hook| hook.as_str())
            .collect();
        f.debug_struct("Plugin")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hooks", &hooks)
            .finish()
    }
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hooks(name, PluginHooks::default())
    }

    pub fn with_hooks(name: impl Into<String>, hooks: PluginHooks) -> Self {
        Self {
            id: PluginId::next(),
            name: name.into(),
            hooks,
        }
    }

    pub fn id(&self) -> PluginId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hooks(&self) -> &PluginHooks {
        &self.hooks
    }

    pub fn implements(&self, hook: HookName) -> bool {
        self.hooks.implements(hook)
    }

    /// Sets the handler of a content-phase hook.
    ///
    /// # Panics
    ///
    /// Panics if `hook` is a rendering hook; those take differently typed
    /// handlers and have their own builder methods.
    pub fn on_block_phase<F>(mut self, hook: HookName, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        match self.hooks.block_slot(hook) {
            Some(slot) => *slot = Some(Box::new(handler)),
            None => panic!("{hook} is not a content-phase hook"),
        }
        self
    }

    pub fn on_preprocess_metadata<F>(self, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_block_phase(HookName::PreprocessMetadata, handler)
    }

    pub fn on_preprocess_code<F>(self, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_block_phase(HookName::PreprocessCode, handler)
    }

    pub fn on_perform_syntax_analysis<F>(self, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_block_phase(HookName::PerformSyntaxAnalysis, handler)
    }

    pub fn on_postprocess_analyzed_code<F>(self, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_block_phase(HookName::PostprocessAnalyzedCode, handler)
    }

    pub fn on_annotate_code<F>(self, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_block_phase(HookName::AnnotateCode, handler)
    }

    pub fn on_postprocess_annotations<F>(self, handler: F) -> Self
    where
        F: Fn(&mut BlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_block_phase(HookName::PostprocessAnnotations, handler)
    }

    pub fn on_postprocess_rendered_line<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut LineContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.hooks.postprocess_rendered_line = Some(Box::new(handler));
        self
    }

    pub fn on_postprocess_rendered_block<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut RenderedBlockContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.hooks.postprocess_rendered_block = Some(Box::new(handler));
        self
    }

    pub fn on_postprocess_rendered_block_group<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut GroupContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.hooks.postprocess_rendered_block_group = Some(Box::new(handler));
        self
    }
}
