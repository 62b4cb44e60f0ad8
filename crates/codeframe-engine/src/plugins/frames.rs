//! Figure markup around each block and around the whole group.

use super::{MetaToken, take_from_meta, unescape_quoted};
use crate::plugin::{BlockContext, GroupContext, Plugin, PluginDataScope, RenderedBlockContext};
use crate::rendering::ast::{Element, Node};

/// Class of the element wrapping every rendered group.
pub const GROUP_WRAPPER_CLASS: &str = "expressive-code";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct FrameData {
    title: Option<String>,
}

pub fn frames() -> Plugin {
    Plugin::new("frames")
        .on_preprocess_metadata(extract_title)
        .on_postprocess_rendered_block(wrap_block)
        .on_postprocess_rendered_block_group(wrap_group)
}

fn extract_title(ctx: &mut BlockContext<'_>) -> anyhow::Result<()> {
    let (meta, titles) = take_from_meta(ctx.code_block.meta(), title_value);
    // Last one wins when a title is given twice.
    let Some(title) = titles.last() else {
        return Ok(());
    };
    let data = ctx.plugin_data(PluginDataScope::Block, FrameData::default)?;
    data.borrow_mut().title = Some(unescape_quoted(title));
    ctx.code_block.set_meta(meta)?;
    Ok(())
}

fn title_value(token: MetaToken<'_>) -> Option<String> {
    match token {
        MetaToken::Attribute {
            key: "title",
            value,
        } => Some(value.to_string()),
        _ => None,
    }
}

fn wrap_block(ctx: &mut RenderedBlockContext<'_>) -> anyhow::Result<()> {
    let data = ctx.plugin_data(PluginDataScope::Block, FrameData::default)?;
    let title = data.borrow().title.clone();

    let mut caption = Element::new("figcaption").with_class("header");
    let mut figure = Element::new("figure").with_class("frame");
    if let Some(title) = title {
        figure.add_class("has-title");
        let title = Element::new("span")
            .with_class("title")
            .with_child(Node::text(title));
        caption = caption.with_child(title);
    }

    let block_ast = std::mem::replace(&mut ctx.render_data.block_ast, Element::new("pre"));
    ctx.render_data.block_ast = figure.with_child(caption).with_child(block_ast);
    Ok(())
}

fn wrap_group(ctx: &mut GroupContext<'_>) -> anyhow::Result<()> {
    let children = std::mem::take(&mut ctx.render_data.group_ast.children);
    let wrapper = Element::new("div")
        .with_class(GROUP_WRAPPER_CLASS)
        .with_children(children);
    ctx.render_data.group_ast.children = vec![wrapper.into()];
    Ok(())
}
