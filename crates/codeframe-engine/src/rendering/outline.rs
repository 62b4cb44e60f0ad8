//! Indented plain-text view of a rendered tree, one node per line.
//!
//! ```text
//! pre
//!   code
//!     div.ec-line.mark style="background: var(--ec-tm-markBg)"
//!       "let x = 1;"
//! ```
//!
//! Elements show their tag, classes and remaining properties in name order;
//! text nodes are quoted with Rust string escapes.

use super::ast::{Element, Node, Root};

pub fn outline(root: &Root) -> String {
    let mut out = String::new();
    for node in &root.children {
        write_node(&mut out, node, 0);
    }
    out
}

pub fn element_outline(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Element(element) => write_element(out, element, depth),
        Node::Text { value } => {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{value:?}\n"));
        }
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&element.tag_name);
    for class in element.classes() {
        out.push('.');
        out.push_str(class);
    }
    for (name, value) in element.properties.iter().filter(|(name, _)| *name != "class") {
        out.push_str(&format!(" {name}={value:?}"));
    }
    out.push('\n');
    for child in &element.children {
        write_node(out, child, depth + 1);
    }
}
