// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(blocks: usize) -> String {
    let base = "## Example\n\nSome prose between blocks.\n\n```rust title=\"src/lib.rs\" {2} \"value\"\nfn example() {\n    let value = 42;\n    println!(\"{value}\");\n}\n```\n\n";
    base.repeat(blocks)
}

#[allow(dead_code)]
pub fn generate_long_block(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("let value_{i} = value_{} + {i};", i.saturating_sub(1)))
        .collect::<Vec<_>>()
        .join("\n")
}
