//! # Rendering
//!
//! Turns processed lines into markup trees and folds them upward:
//!
//! ```text
//! CodeLine --render_line_to_ast--> div.ec-line
//! [div.ec-line] --build_code_block_ast_from_rendered_lines--> pre > code
//! [pre] --build_group_root_ast_from_rendered_blocks--> Root
//! ```
//!
//! The pipeline never looks inside these trees; it only threads them between
//! phases and hands them to plugins for replacement. [`outline`] prints a tree
//! as indented text for logs and snapshots.

pub mod ast;
pub mod outline;

use std::collections::BTreeSet;
use std::ops::Range;

use crate::block::CodeLine;
use crate::error::{EngineError, Result};
use crate::style::CODE_LINE_CLASS;
use ast::{Element, Node, Root};

struct Part {
    columns: Range<usize>,
    node: Node,
}

/// Renders a single line, applying its inline annotations first and its
/// full-line annotations afterwards, each group in insertion order.
pub fn render_line_to_ast(line: &CodeLine) -> Result<Element> {
    let text = line.text();
    let char_len = text.chars().count();
    let annotations = line.annotations();

    let mut boundaries = BTreeSet::from([0, char_len]);
    for range in annotations.iter().filter_map(|a| a.inline_range()) {
        boundaries.insert(range.start.min(char_len));
        boundaries.insert(range.end.min(char_len));
    }
    let boundaries: Vec<usize> = boundaries.into_iter().collect();
    let mut parts: Vec<Part> = boundaries
        .windows(2)
        .filter(|w| w[0] < w[1])
        .map(|w| Part {
            columns: w[0]..w[1],
            node: Node::text(slice_columns(text, w[0]..w[1])),
        })
        .collect();

    for annotation in annotations.iter() {
        let Some(range) = annotation.inline_range() else {
            continue;
        };
        let covered: Vec<usize> = parts
            .iter()
            .enumerate()
            .filter(|(_, part)| part.columns.start >= range.start && part.columns.end <= range.end)
            .map(|(index, _)| index)
            .collect();
        if covered.is_empty() {
            continue;
        }
        let nodes = covered.iter().map(|&i| parts[i].node.clone()).collect();
        let rendered = annotation.render(nodes);
        if rendered.len() != covered.len() {
            return Err(EngineError::AnnotationRender {
                name: annotation.name().to_string(),
                expected: covered.len(),
                actual: rendered.len(),
            });
        }
        for (index, node) in covered.into_iter().zip(rendered) {
            parts[index].node = node;
        }
    }

    let mut line_element = Element::new("div")
        .with_class(CODE_LINE_CLASS)
        .with_children(parts.into_iter().map(|part| part.node));

    for annotation in annotations.iter().filter(|a| a.inline_range().is_none()) {
        let mut rendered = annotation.render(vec![Node::Element(line_element)]);
        if rendered.len() != 1 {
            return Err(EngineError::AnnotationRender {
                name: annotation.name().to_string(),
                expected: 1,
                actual: rendered.len(),
            });
        }
        line_element = match rendered.remove(0) {
            Node::Element(element) => element,
            Node::Text { .. } => {
                return Err(EngineError::AnnotationNotElement(
                    annotation.name().to_string(),
                ));
            }
        };
    }

    Ok(line_element)
}

pub fn build_code_block_ast_from_rendered_lines(lines: Vec<Element>) -> Element {
    Element::new("pre").with_child(
        Element::new("code").with_children(lines.into_iter().map(Node::Element)),
    )
}

pub fn build_group_root_ast_from_rendered_blocks(blocks: Vec<Element>) -> Root {
    Root {
        children: blocks.into_iter().map(Node::Element).collect(),
    }
}

fn slice_columns(text: &str, columns: Range<usize>) -> String {
    text.chars()
        .skip(columns.start)
        .take(columns.end - columns.start)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::annotation::{Annotation, InlineMarkAnnotation, LineClassAnnotation};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct DroppingAnnotation;

    impl Annotation for DroppingAnnotation {
        fn name(&self) -> &str {
            "dropper"
        }

        fn inline_range(&self) -> Option<Range<usize>> {
            Some(0..2)
        }

        fn render(&self, _nodes: Vec<Node>) -> Vec<Node> {
            Vec::new()
        }
    }

    #[derive(Debug)]
    struct TextifyAnnotation;

    impl Annotation for TextifyAnnotation {
        fn name(&self) -> &str {
            "textify"
        }

        fn render(&self, nodes: Vec<Node>) -> Vec<Node> {
            nodes.iter().map(|n| Node::text(n.text_content())).collect()
        }
    }

    #[test]
    fn plain_line_renders_single_text_child() {
        let line = CodeLine::new("let x = 1;");
        let ast = render_line_to_ast(&line).unwrap();

        assert_eq!(
            ast,
            Element::new("div")
                .with_class(CODE_LINE_CLASS)
                .with_child(Node::text("let x = 1;"))
        );
    }

    #[test]
    fn empty_line_has_no_children() {
        let ast = render_line_to_ast(&CodeLine::new("")).unwrap();
        assert!(ast.children.is_empty());
    }

    #[test]
    fn inline_annotation_splits_text_at_boundaries() {
        let mut line = CodeLine::new("fn main()");
        line.push_annotation(Rc::new(InlineMarkAnnotation::new("term", 3..7, "mark")));

        let ast = render_line_to_ast(&line).unwrap();

        assert_eq!(
            ast.children,
            vec![
                Node::text("fn "),
                Node::Element(Element::new("mark").with_child(Node::text("main"))),
                Node::text("()"),
            ]
        );
    }

    #[test]
    fn overlapping_inline_annotations_each_wrap_their_parts() {
        let mut line = CodeLine::new("abcd");
        line.push_annotation(Rc::new(InlineMarkAnnotation::new("outer", 0..4, "b")));
        line.push_annotation(Rc::new(InlineMarkAnnotation::new("inner", 1..2, "i")));

        let ast = render_line_to_ast(&line).unwrap();

        assert_eq!(ast.children.len(), 3);
        assert_eq!(ast.text_content(), "abcd");
        let middle = ast.children[1].as_element().unwrap();
        assert_eq!(middle.tag_name, "i");
        assert_eq!(middle.child_elements().next().unwrap().tag_name, "b");
    }

    #[test]
    fn inline_range_past_line_end_is_clamped() {
        let mut line = CodeLine::new("ab");
        line.push_annotation(Rc::new(InlineMarkAnnotation::new("term", 1..10, "mark")));

        let ast = render_line_to_ast(&line).unwrap();

        assert_eq!(ast.text_content(), "ab");
        assert_eq!(ast.children.len(), 2);
    }

    #[test]
    fn full_line_annotation_applies_after_inline() {
        let mut line = CodeLine::new("x");
        line.push_annotation(Rc::new(LineClassAnnotation::new("mark", "mark")));
        line.push_annotation(Rc::new(InlineMarkAnnotation::new("term", 0..1, "mark")));

        let ast = render_line_to_ast(&line).unwrap();

        assert!(ast.has_class(CODE_LINE_CLASS));
        assert!(ast.has_class("mark"));
        assert_eq!(ast.child_elements().next().unwrap().tag_name, "mark");
    }

    #[test]
    fn multibyte_columns_are_characters() {
        let mut line = CodeLine::new("äöü");
        line.push_annotation(Rc::new(InlineMarkAnnotation::new("term", 1..2, "mark")));

        let ast = render_line_to_ast(&line).unwrap();

        assert_eq!(ast.children[1].text_content(), "ö");
    }

    #[test]
    fn annotation_changing_node_count_is_rejected() {
        let mut line = CodeLine::new("abc");
        line.push_annotation(Rc::new(DroppingAnnotation));

        let err = render_line_to_ast(&line).unwrap_err();

        assert!(matches!(
            err,
            EngineError::AnnotationRender { ref name, expected: 1, actual: 0 } if name == "dropper"
        ));
    }

    #[test]
    fn full_line_annotation_must_keep_an_element() {
        let mut line = CodeLine::new("abc");
        line.push_annotation(Rc::new(TextifyAnnotation));

        let err = render_line_to_ast(&line).unwrap_err();

        assert!(matches!(err, EngineError::AnnotationNotElement(ref name) if name == "textify"));
    }

    #[test]
    fn blocks_and_groups_fold_in_order() {
        let lines = vec![
            render_line_to_ast(&CodeLine::new("a")).unwrap(),
            render_line_to_ast(&CodeLine::new("b")).unwrap(),
        ];
        let block = build_code_block_ast_from_rendered_lines(lines);
        assert_eq!(block.tag_name, "pre");
        let code = block.child_elements().next().unwrap();
        assert_eq!(code.tag_name, "code");
        assert_eq!(code.children.len(), 2);

        let root = build_group_root_ast_from_rendered_blocks(vec![block.clone(), block]);
        assert_eq!(root.children.len(), 2);
    }
}
