//! Gutter line numbers.
//!
//! Each rendered line gets a `span.ln` holding its number in front of its
//! content. By default numbering restarts at 1 for every block; with
//! `continuous` it carries on across all blocks of the group.

use crate::plugin::{LineContext, Plugin, PluginDataScope};
use crate::rendering::ast::{Element, Node};

/// Class of the gutter element.
pub const LINE_NUMBER_CLASS: &str = "ln";

#[derive(Debug, Default)]
struct LineCounter {
    last: usize,
}

pub fn line_numbers(continuous: bool) -> Plugin {
    let scope = if continuous {
        PluginDataScope::Group
    } else {
        PluginDataScope::Block
    };
    Plugin::new("line-numbers").on_postprocess_rendered_line(move |ctx| number_line(ctx, scope))
}

fn number_line(ctx: &mut LineContext<'_>, scope: PluginDataScope) -> anyhow::Result<()> {
    let counter = ctx.plugin_data(scope, LineCounter::default)?;
    let number = {
        let mut counter = counter.borrow_mut();
        counter.last += 1;
        counter.last
    };

    let gutter = Element::new("span")
        .with_class(LINE_NUMBER_CLASS)
        .with_property("aria-hidden", "true")
        .with_child(Node::text(number.to_string()));
    ctx.render_data.line_ast.children.insert(0, gutter.into());
    Ok(())
}
