use codeframe_engine::markdown::extract_code_blocks;
use codeframe_engine::plugins::{frames, line_numbers, text_markers};
use codeframe_engine::{BlockSpec, Engine, EngineConfig};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
mod common;

fn builtin_engine() -> Engine {
    Engine::new(EngineConfig::new(vec![
        frames(),
        text_markers(),
        line_numbers(true),
    ]))
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown");
    group.sample_size(20);

    let content = common::generate_markdown_content(100);
    group.bench_function("extract_code_blocks", |b| {
        b.iter(|| {
            let blocks = extract_code_blocks(black_box(&content));
            black_box(blocks);
        });
    });

    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");
    group.sample_size(20);

    let specs = extract_code_blocks(&common::generate_markdown_content(100));
    let bare = Engine::new(EngineConfig::default());
    group.bench_function("group_without_plugins", |b| {
        b.iter(|| {
            let output = bare.process(black_box(specs.clone())).unwrap();
            black_box(output);
        });
    });

    let engine = builtin_engine();
    group.bench_function("group_with_builtin_plugins", |b| {
        b.iter(|| {
            let output = engine.process(black_box(specs.clone())).unwrap();
            black_box(output);
        });
    });

    let long_block = BlockSpec::new(common::generate_long_block(1_000), "rust")
        .with_meta("{1-500} \"value\"");
    group.bench_function("long_block_with_markers", |b| {
        b.iter(|| {
            let output = engine.process(black_box(long_block.clone())).unwrap();
            black_box(output);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_extract, bench_process);
criterion_main!(benches);
