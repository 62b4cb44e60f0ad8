//! Fenced code block extraction from Markdown documents.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::block::BlockSpec;

/// Returns a [`BlockSpec`] for every fenced code block, in document order.
///
/// The first word of the info string becomes the language and the rest the
/// meta. Indented code blocks carry no info string and are skipped.
pub fn extract_code_blocks(markdown: &str) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let (language, meta) = split_info(&info);
                current = Some((String::new(), language.to_string(), meta.to_string()));
            }
            Event::Text(text) => {
                if let Some((code, _, _)) = current.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((mut code, language, meta)) = current.take() {
                    if code.ends_with('\n') {
                        code.pop();
                    }
                    blocks.push(BlockSpec::new(code, language).with_meta(meta));
                }
            }
            _ => {}
        }
    }

    log::debug!("Extracted {} fenced code blocks", blocks.len());
    blocks
}

fn split_info(info: &str) -> (&str, &str) {
    let info = info.trim();
    match info.split_once(char::is_whitespace) {
        Some((language, meta)) => (language, meta.trim()),
        None => (info, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("rust", ("rust", ""))]
    #[case("js title=\"a.js\" {1}", ("js", "title=\"a.js\" {1}"))]
    #[case("  sh   {2} ", ("sh", "{2}"))]
    #[case("", ("", ""))]
    fn test_split_info(#[case] info: &str, #[case] expected: (&str, &str)) {
        assert_eq!(split_info(info), expected);
    }

    #[test]
    fn test_extracts_fenced_blocks_in_order() {
        let markdown = "# Title\n\n```rust {1}\nfn main() {}\n```\n\ntext\n\n~~~\nplain\nsecond\n~~~\n";

        let blocks = extract_code_blocks(markdown);

        assert_eq!(
            blocks,
            vec![
                BlockSpec::new("fn main() {}", "rust").with_meta("{1}"),
                BlockSpec::new("plain\nsecond", ""),
            ]
        );
    }

    #[test]
    fn test_skips_indented_code() {
        let markdown = "Paragraph\n\n    indented code\n\n```\nfenced\n```\n";

        let blocks = extract_code_blocks(markdown);

        assert_eq!(blocks, vec![BlockSpec::new("fenced", "")]);
    }

    #[test]
    fn test_empty_fence_gives_empty_code() {
        let blocks = extract_code_blocks("```py\n```\n");

        assert_eq!(blocks, vec![BlockSpec::new("", "py")]);
    }
}
