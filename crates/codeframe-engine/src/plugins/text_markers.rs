//! Line and text highlighting driven by the block's meta string.
//!
//! `{1,3-4}` marks whole lines (1-based, inclusive ranges) and every `"term"`
//! marks each occurrence of the term. Both are removed from the meta during
//! `preprocessMetadata` so later plugins only see what is left.

use std::ops::RangeInclusive;
use std::rc::Rc;

use anyhow::{Context, bail};

use super::{MetaToken, take_from_meta, unescape_quoted};
use crate::annotation::{InlineMarkAnnotation, LineClassAnnotation};
use crate::plugin::{BlockContext, Plugin, PluginDataScope};
use crate::style::css_var_name;

/// Name of every annotation this plugin adds.
pub const MARK_ANNOTATION: &str = "mark";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct MarkerData {
    /// Zero-based, inclusive line ranges as written. Ranges may reach past
    /// the last line.
    lines: Vec<RangeInclusive<usize>>,
    terms: Vec<String>,
}

pub fn text_markers() -> Plugin {
    Plugin::new("text-markers")
        .on_preprocess_metadata(collect_markers)
        .on_annotate_code(annotate_markers)
}

/// A marker taken from the meta, before ranges are parsed.
enum Marker {
    Lines(String),
    Term(String),
}

fn marker(token: MetaToken<'_>) -> Option<Marker> {
    match token {
        MetaToken::Braced(ranges) => Some(Marker::Lines(ranges.to_string())),
        MetaToken::Quoted(term) => Some(Marker::Term(unescape_quoted(term))),
        _ => None,
    }
}

fn collect_markers(ctx: &mut BlockContext<'_>) -> anyhow::Result<()> {
    let (meta, markers) = take_from_meta(ctx.code_block.meta(), marker);
    if markers.is_empty() {
        return Ok(());
    }

    let data = ctx.plugin_data(PluginDataScope::Block, MarkerData::default)?;
    {
        let mut data = data.borrow_mut();
        for marker in markers {
            match marker {
                Marker::Lines(ranges) => data.lines.extend(parse_line_ranges(&ranges)?),
                Marker::Term(term) if !term.is_empty() => data.terms.push(term),
                Marker::Term(_) => {}
            }
        }
    }
    ctx.code_block.set_meta(meta)?;
    Ok(())
}

fn annotate_markers(ctx: &mut BlockContext<'_>) -> anyhow::Result<()> {
    let data = ctx.plugin_data(PluginDataScope::Block, MarkerData::default)?;
    let data = data.borrow();
    if data.lines.is_empty() && data.terms.is_empty() {
        return Ok(());
    }

    let line_style = format!(
        "background: var({})",
        css_var_name("textMarkers.markBackground")
    );
    let line_count = ctx.code_block.line_count();
    let marked = (0..line_count)
        .filter(|index| data.lines.iter().any(|range| range.contains(index)));
    for index in marked {
        let annotation = LineClassAnnotation::new(MARK_ANNOTATION, "mark").with_style(&line_style);
        ctx.code_block.add_annotation(index, Rc::new(annotation))?;
    }

    for index in 0..line_count {
        let ranges: Vec<_> = match ctx.code_block.line(index) {
            Some(line) => data
                .terms
                .iter()
                .flat_map(|term| term_columns(line.text(), term))
                .collect(),
            None => continue,
        };
        for range in ranges {
            let annotation = InlineMarkAnnotation::new(MARK_ANNOTATION, range, "mark");
            ctx.code_block.add_annotation(index, Rc::new(annotation))?;
        }
    }
    Ok(())
}

/// Parses `1,3-4` into zero-based, inclusive line ranges.
fn parse_line_ranges(spec: &str) -> anyhow::Result<Vec<RangeInclusive<usize>>> {
    let mut ranges = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_line_number(start)?, parse_line_number(end)?),
            None => {
                let line = parse_line_number(part)?;
                (line, line)
            }
        };
        if start > end {
            bail!("line range {part:?} ends before it starts");
        }
        ranges.push(start - 1..=end - 1);
    }
    Ok(ranges)
}

fn parse_line_number(text: &str) -> anyhow::Result<usize> {
    let text = text.trim();
    let line: usize = text
        .parse()
        .with_context(|| format!("invalid line number {text:?} in text marker range"))?;
    if line == 0 {
        bail!("line numbers in text marker ranges start at 1");
    }
    Ok(line)
}

/// Character column ranges of every occurrence of `term` in `text`.
fn term_columns(text: &str, term: &str) -> Vec<std::ops::Range<usize>> {
    let term_len = term.chars().count();
    text.match_indices(term)
        .map(|(byte_index, _)| {
            let start = text[..byte_index].chars().count();
            start..start + term_len
        })
        .collect()
}
