use super::{BlockHookFn, GroupHookFn, HookName, LineHookFn, Plugin, RenderedBlockHookFn};

/// The engine's fixed, ordered plugin list.
///
/// Every lookup yields handlers in registration order and silently skips
/// plugins that leave the slot empty.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Plugins implementing `hook`, in registration order.
    pub fn implementing(&self, hook: HookName) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().filter(move |p| p.implements(hook))
    }

    /// Handlers of a content-phase hook. Empty for rendering hooks.
    pub fn block_hooks(&self, hook: HookName) -> impl Iterator<Item = (&Plugin, &BlockHookFn)> {
        self.plugins
            .iter()
            .filter_map(move |p| p.hooks().block_hook(hook).map(|f| (p, f)))
    }

    pub fn line_hooks(&self) -> impl Iterator<Item = (&Plugin, &LineHookFn)> {
        self.plugins.iter().filter_map(|p| {
            p.hooks()
                .postprocess_rendered_line
                .as_ref()
                .map(|f| (p, f))
        })
    }

    pub fn rendered_block_hooks(&self) -> impl Iterator<Item = (&Plugin, &RenderedBlockHookFn)> {
        self.plugins.iter().filter_map(|p| {
            p.hooks()
                .postprocess_rendered_block
                .as_ref()
                .map(|f| (p, f))
        })
    }

    pub fn group_hooks(&self) -> impl Iterator<Item = (&Plugin, &GroupHookFn)> {
        self.plugins.iter().filter_map(|p| {
            p.hooks()
                .postprocess_rendered_block_group
                .as_ref()
                .map(|f| (p, f))
        })
    }
}
