//! # Engine
//!
//! Runs groups of code blocks through the plugin pipeline.
//!
//! ## Processing a group
//!
//! 1. **Normalize**: specs become [`CodeBlock`]s, existing blocks pass through
//! 2. **Group data**: one fresh group table per `process` call
//! 3. **Blocks**: each block, in input order, gets a fresh block table and walks
//!    every phase of the [`PhaseMachine`], ending in a block tree
//! 4. **Group tree**: block trees are folded into one root
//! 5. **Group hooks**: run once per plugin with every block, its data and its tree
//!
//! The global table lives as long as the engine. Nothing here is `Sync`;
//! callers sharing an engine across threads must serialize access themselves.

use std::rc::Rc;

use crate::block::{BlockSpec, CodeBlock};
use crate::error::Result;
use crate::plugin::{
    BlockContext, BlockRenderData, GroupContent, GroupContext, GroupRenderData, HookName,
    LineContext, LineRenderData, Plugin, PluginDataAccess, PluginDataMap, PluginRegistry,
    RenderedBlockContext, ScopedPluginData,
};
use crate::rendering::ast::{Element, Root};
use crate::rendering::{
    build_code_block_ast_from_rendered_lines, build_group_root_ast_from_rendered_blocks,
    render_line_to_ast,
};
use crate::state::{Phase, PhaseMachine};

#[derive(Debug, Default)]
pub struct EngineConfig {
    /// Plugins in the order their hooks should run.
    pub plugins: Vec<Plugin>,
}

impl EngineConfig {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }
}

/// One input block: a spec to build, or a block to process as is.
#[derive(Debug)]
pub enum BlockInput {
    Spec(BlockSpec),
    Block(CodeBlock),
}

impl From<BlockSpec> for BlockInput {
    fn from(spec: BlockSpec) -> Self {
        BlockInput::Spec(spec)
    }
}

impl From<CodeBlock> for BlockInput {
    fn from(block: CodeBlock) -> Self {
        BlockInput::Block(block)
    }
}

/// The ordered blocks of one `process` call.
#[derive(Debug, Default)]
pub struct ProcessInput(Vec<BlockInput>);

impl ProcessInput {
    fn into_code_blocks(self) -> Result<Vec<CodeBlock>> {
        self.0
            .into_iter()
            .map(|input| match input {
                BlockInput::Spec(spec) => CodeBlock::new(spec),
                BlockInput::Block(block) => Ok(block),
            })
            .collect()
    }
}

impl From<BlockInput> for ProcessInput {
    fn from(input: BlockInput) -> Self {
        ProcessInput(vec![input])
    }
}

impl From<BlockSpec> for ProcessInput {
    fn from(spec: BlockSpec) -> Self {
        ProcessInput(vec![spec.into()])
    }
}

impl From<CodeBlock> for ProcessInput {
    fn from(block: CodeBlock) -> Self {
        ProcessInput(vec![block.into()])
    }
}

impl<T: Into<BlockInput>> From<Vec<T>> for ProcessInput {
    fn from(inputs: Vec<T>) -> Self {
        ProcessInput(inputs.into_iter().map(Into::into).collect())
    }
}

/// A processed block handed back to the caller.
#[derive(Debug)]
pub struct RenderedBlock {
    pub code_block: CodeBlock,
    pub block_ast: Element,
}

#[derive(Debug)]
pub struct ProcessOutput {
    /// The group tree, after group hooks had their say.
    pub rendered_ast: Root,
    /// Input blocks in their original order.
    pub group_contents: Vec<RenderedBlock>,
}

struct ProcessedBlock {
    code_block: CodeBlock,
    plugin_data: ScopedPluginData,
    block_ast: Element,
}

#[derive(Debug)]
pub struct Engine {
    registry: PluginRegistry,
    global_data: Rc<PluginDataMap>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: PluginRegistry::new(config.plugins),
            global_data: Rc::new(PluginDataMap::new()),
        }
    }

    pub fn plugins(&self) -> &[Plugin] {
        self.registry.plugins()
    }

    /// Data stored by plugins in the global scope.
    pub fn global_data(&self) -> &PluginDataMap {
        &self.global_data
    }

    /// Processes one block or a group of blocks.
    ///
    /// The first failing hook aborts the whole call; its error is returned
    /// unchanged as [`EngineError::Plugin`](crate::EngineError::Plugin).
    ///
    /// Blocks passed in are consumed. On error they are dropped along with
    /// any edits hooks made so far, so callers that need a block after a
    /// failed call should pass a clone.
    pub fn process(&self, input: impl Into<ProcessInput>) -> Result<ProcessOutput> {
        let code_blocks = input.into().into_code_blocks()?;
        log::debug!(
            "Processing group of {} code blocks with {} plugins",
            code_blocks.len(),
            self.registry.len()
        );

        let group_data = Rc::new(PluginDataMap::new());

        let mut processed = Vec::with_capacity(code_blocks.len());
        for (block_index, mut code_block) in code_blocks.into_iter().enumerate() {
            let plugin_data =
                ScopedPluginData::new(Rc::clone(&self.global_data), Rc::clone(&group_data));
            let block_ast =
                self.process_single_block(block_index, &mut code_block, &plugin_data)?;
            processed.push(ProcessedBlock {
                code_block,
                plugin_data,
                block_ast,
            });
        }

        let mut render_data = GroupRenderData {
            group_ast: build_group_root_ast_from_rendered_blocks(
                processed.iter().map(|block| block.block_ast.clone()).collect(),
            ),
        };
        for (plugin, hook) in self.registry.group_hooks() {
            log::trace!("{}: {}", HookName::PostprocessRenderedBlockGroup, plugin.name());
            let group_contents = processed
                .iter()
                .map(|block| {
                    GroupContent::new(
                        &block.code_block,
                        &block.block_ast,
                        PluginDataAccess::new(plugin.id(), &block.plugin_data),
                    )
                })
                .collect();
            hook(&mut GroupContext::new(group_contents, &mut render_data))?;
        }

        let group_contents = processed
            .into_iter()
            .map(|block| {
                let mut code_block = block.code_block;
                code_block.set_state(None);
                RenderedBlock {
                    code_block,
                    block_ast: block.block_ast,
                }
            })
            .collect();

        Ok(ProcessOutput {
            rendered_ast: render_data.group_ast,
            group_contents,
        })
    }

    fn process_single_block(
        &self,
        block_index: usize,
        code_block: &mut CodeBlock,
        plugin_data: &ScopedPluginData,
    ) -> Result<Element> {
        let mut machine = PhaseMachine::new();
        code_block.set_state(Some(machine.state()));

        // Content phases: preprocessMetadata through postprocessAnnotations.
        while machine.phase() < Phase::PostprocessAnnotations {
            let phase = enter_next_phase(&mut machine, code_block)?;
            if let Some(hook) = phase.hook() {
                self.run_block_hooks(hook, block_index, code_block, plugin_data)?;
            }
        }

        enter_next_phase(&mut machine, code_block)?;
        let rendered_lines = self.render_lines(block_index, code_block, plugin_data)?;

        enter_next_phase(&mut machine, code_block)?;
        let code_block: &CodeBlock = code_block;
        let mut render_data = BlockRenderData {
            block_ast: build_code_block_ast_from_rendered_lines(rendered_lines),
        };
        for (plugin, hook) in self.registry.rendered_block_hooks() {
            log::trace!("{}: {}", HookName::PostprocessRenderedBlock, plugin.name());
            let access = PluginDataAccess::new(plugin.id(), plugin_data);
            hook(&mut RenderedBlockContext::new(
                code_block,
                &mut render_data,
                access,
            ))?;
        }

        machine.advance()?;
        Ok(render_data.block_ast)
    }

    fn render_lines(
        &self,
        block_index: usize,
        code_block: &CodeBlock,
        plugin_data: &ScopedPluginData,
    ) -> Result<Vec<Element>> {
        log::debug!(
            "Rendering {} lines of block {block_index}",
            code_block.line_count()
        );
        let mut rendered_lines = Vec::with_capacity(code_block.line_count());
        for (line_index, line) in code_block.lines().iter().enumerate() {
            let mut render_data = LineRenderData {
                line_ast: render_line_to_ast(line)?,
            };
            for (plugin, hook) in self.registry.line_hooks() {
                let access = PluginDataAccess::new(plugin.id(), plugin_data);
                hook(&mut LineContext::new(
                    code_block,
                    line,
                    line_index,
                    &mut render_data,
                    access,
                ))?;
            }
            rendered_lines.push(render_data.line_ast);
        }
        Ok(rendered_lines)
    }

    fn run_block_hooks(
        &self,
        hook_name: HookName,
        block_index: usize,
        code_block: &mut CodeBlock,
        plugin_data: &ScopedPluginData,
    ) -> Result<()> {
        log::debug!("Running {hook_name} hooks on block {block_index}");
        for (plugin, hook) in self.registry.block_hooks(hook_name) {
            log::trace!("{hook_name}: {}", plugin.name());
            let access = PluginDataAccess::new(plugin.id(), plugin_data);
            hook(&mut BlockContext::new(code_block, access))?;
        }
        Ok(())
    }
}

fn enter_next_phase(machine: &mut PhaseMachine, code_block: &mut CodeBlock) -> Result<Phase> {
    let phase = machine.advance()?;
    code_block.set_state(Some(machine.state()));
    Ok(phase)
}
