use codeframe_engine::markdown::extract_code_blocks;
use codeframe_engine::plugins::{frames, line_numbers, text_markers};
use codeframe_engine::rendering::outline::outline;
use codeframe_engine::{Engine, EngineConfig};

#[test]
fn fixture_marked_lines() {
    assert_fixture("marked_lines");
}

#[test]
fn fixture_titled_group() {
    assert_fixture("titled_group");
}

fn assert_fixture(name: &str) {
    let md = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let engine = Engine::new(EngineConfig::new(vec![
        frames(),
        text_markers(),
        line_numbers(false),
    ]));

    let output = engine.process(extract_code_blocks(&md)).unwrap();

    // Every marker and title was consumed from the meta.
    for block in &output.group_contents {
        assert_eq!(block.code_block.meta(), "");
    }
    insta::assert_snapshot!(name, outline(&output.rendered_ast));
}
