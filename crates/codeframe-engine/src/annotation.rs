//! Line annotations and the built-in annotation kinds.
//!
//! An annotation is attached to a [`CodeLine`](crate::block::CodeLine) during the
//! annotation phases and applied when the line is rendered. Inline annotations
//! cover a column range and transform the text parts inside it; full-line
//! annotations transform the rendered line element as a whole.

use std::fmt;
use std::ops::Range;

use crate::rendering::ast::{Element, Node};

pub trait Annotation: fmt::Debug {
    /// Name used in error messages and by plugins to recognise their own annotations.
    fn name(&self) -> &str;

    /// Character column range covered by an inline annotation, `None` for the whole line.
    fn inline_range(&self) -> Option<Range<usize>> {
        None
    }

    /// Transforms the given nodes. Must return exactly one node per input node.
    fn render(&self, nodes: Vec<Node>) -> Vec<Node>;
}

/// Adds a class (and optionally an inline style) to the whole line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClassAnnotation {
    name: String,
    class: String,
    style: Option<String>,
}

impl LineClassAnnotation {
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

impl Annotation for LineClassAnnotation {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, nodes: Vec<Node>) -> Vec<Node> {
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Element(mut element) => {
                    element.add_class(&self.class);
                    if let Some(style) = &self.style {
                        element.set_property("style", style.clone());
                    }
                    Node::Element(element)
                }
                text => text,
            })
            .collect()
    }
}

/// Wraps every text part inside a column range in an element, e.g. `<mark>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMarkAnnotation {
    name: String,
    range: Range<usize>,
    tag_name: String,
    class: Option<String>,
}

impl InlineMarkAnnotation {
    pub fn new(name: impl Into<String>, range: Range<usize>, tag_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range,
            tag_name: tag_name.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

impl Annotation for InlineMarkAnnotation {
    fn name(&self) -> &str {
        &self.name
    }

    fn inline_range(&self) -> Option<Range<usize>> {
        Some(self.range.clone())
    }

    fn render(&self, nodes: Vec<Node>) -> Vec<Node> {
        nodes
            .into_iter()
            .map(|node| {
                let mut wrapper = Element::new(self.tag_name.clone());
                if let Some(class) = &self.class {
                    wrapper.add_class(class);
                }
                Node::Element(wrapper.with_child(node))
            })
            .collect()
    }
}
