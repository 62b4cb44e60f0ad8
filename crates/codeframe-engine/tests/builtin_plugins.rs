use codeframe_engine::plugins::frames::GROUP_WRAPPER_CLASS;
use codeframe_engine::plugins::line_numbers::LINE_NUMBER_CLASS;
use codeframe_engine::plugins::text_markers::MARK_ANNOTATION;
use codeframe_engine::plugins::{frames, line_numbers, text_markers};
use codeframe_engine::rendering::ast::Element;
use codeframe_engine::{BlockSpec, Engine, EngineConfig, EngineError};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn lines_of(block_ast: &Element) -> Vec<&Element> {
    block_ast
        .child_elements()
        .find(|element| element.tag_name == "code")
        .map(|code| code.child_elements().collect())
        .unwrap_or_default()
}

fn gutter_numbers(block_ast: &Element) -> Vec<String> {
    lines_of(block_ast)
        .into_iter()
        .filter_map(|line| line.child_elements().find(|e| e.has_class(LINE_NUMBER_CLASS)))
        .map(Element::text_content)
        .collect()
}

#[rstest]
#[case(false, vec![vec!["1", "2"], vec!["1"]])]
#[case(true, vec![vec!["1", "2"], vec!["3"]])]
fn line_numbers_restart_or_continue(#[case] continuous: bool, #[case] expected: Vec<Vec<&str>>) {
    let engine = Engine::new(EngineConfig::new(vec![line_numbers(continuous)]));

    let output = engine
        .process(vec![BlockSpec::new("a\nb", "text"), BlockSpec::new("c", "text")])
        .unwrap();

    let numbers: Vec<Vec<String>> = output
        .group_contents
        .iter()
        .map(|block| gutter_numbers(&block.block_ast))
        .collect();
    assert_eq!(numbers, expected);
}

#[test]
fn continuous_numbering_restarts_with_each_group() {
    let engine = Engine::new(EngineConfig::new(vec![line_numbers(true)]));

    engine.process(BlockSpec::new("a\nb", "text")).unwrap();
    let output = engine.process(BlockSpec::new("c", "text")).unwrap();

    assert_eq!(gutter_numbers(&output.group_contents[0].block_ast), vec!["1"]);
}

#[test]
fn text_markers_annotate_lines_and_terms() {
    let engine = Engine::new(EngineConfig::new(vec![text_markers()]));

    let spec = BlockSpec::new("let x = 1;\nlet y = x + x;\nx", "rust").with_meta(r#"{1,3} "x" wrap"#);

    let output = engine.process(spec).unwrap();

    let block = &output.group_contents[0];
    assert_eq!(block.code_block.meta(), "wrap");
    let marked: Vec<bool> = lines_of(&block.block_ast)
        .iter()
        .map(|line| line.has_class("mark"))
        .collect();
    assert_eq!(marked, vec![true, false, true]);
    let term_marks: Vec<usize> = block
        .code_block
        .lines()
        .iter()
        .map(|line| {
            line.annotations_named(MARK_ANNOTATION)
                .filter(|annotation| annotation.inline_range().is_some())
                .count()
        })
        .collect();
    assert_eq!(term_marks, vec![1, 2, 1]);
}

#[test]
fn text_markers_ignore_ranges_past_the_last_line() {
    let engine = Engine::new(EngineConfig::new(vec![text_markers()]));

    let output = engine
        .process(BlockSpec::new("only", "text").with_meta("{1-5}"))
        .unwrap();

    let lines = lines_of(&output.group_contents[0].block_ast);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].has_class("mark"));
}

#[rstest]
#[case(1, vec![true])]
#[case(2, vec![false])]
fn text_markers_handle_huge_range_ends(#[case] start: usize, #[case] expected: Vec<bool>) {
    let engine = Engine::new(EngineConfig::new(vec![text_markers()]));
    let meta = format!("{{{start}-{}}}", usize::MAX);

    let output = engine
        .process(BlockSpec::new("only", "text").with_meta(meta))
        .unwrap();

    let marked: Vec<bool> = lines_of(&output.group_contents[0].block_ast)
        .iter()
        .map(|line| line.has_class("mark"))
        .collect();
    assert_eq!(marked, expected);
}

#[test]
fn text_markers_leave_quoted_titles_alone() {
    let engine = Engine::new(EngineConfig::new(vec![text_markers(), frames()]));

    let output = engine
        .process(BlockSpec::new("a\nb", "text").with_meta(r#"title="see {2} or \"x\"" {1}"#))
        .unwrap();

    let block = &output.group_contents[0];
    let marked: Vec<bool> = block
        .code_block
        .lines()
        .iter()
        .map(|line| {
            line.annotations_named(MARK_ANNOTATION)
                .any(|annotation| annotation.inline_range().is_none())
        })
        .collect();
    assert_eq!(marked, vec![true, false]);
    let caption = block.block_ast.child_elements().next().unwrap();
    assert_eq!(caption.text_content(), "see {2} or \"x\"");
    assert_eq!(block.code_block.meta(), "");
}

#[test]
fn bad_marker_ranges_fail_the_whole_call() {
    let engine = Engine::new(EngineConfig::new(vec![text_markers()]));

    let err = engine
        .process(BlockSpec::new("a", "text").with_meta("{3-1}"))
        .unwrap_err();

    assert!(matches!(err, EngineError::Plugin(_)));
    assert!(err.to_string().contains("ends before it starts"));
}

#[test]
fn frames_wrap_blocks_and_group() {
    let engine = Engine::new(EngineConfig::new(vec![frames()]));

    let output = engine
        .process(vec![
            BlockSpec::new("a", "text").with_meta(r#"title="One \"quoted\" title""#),
            BlockSpec::new("b", "text"),
        ])
        .unwrap();

    let wrappers: Vec<&Element> = output.rendered_ast.child_elements().collect();
    assert_eq!(wrappers.len(), 1);
    assert!(wrappers[0].has_class(GROUP_WRAPPER_CLASS));
    let figures: Vec<&Element> = wrappers[0].child_elements().collect();
    assert_eq!(figures.len(), 2);
    assert!(figures[0].has_class("has-title"));
    assert!(!figures[1].has_class("has-title"));

    let caption = figures[0].child_elements().next().unwrap();
    assert_eq!(caption.tag_name, "figcaption");
    assert_eq!(caption.text_content(), "One \"quoted\" title");
    assert_eq!(output.group_contents[0].code_block.meta(), "");
}
