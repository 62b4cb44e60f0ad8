use anyhow::{Context, Result};
use codeframe_config::{Config, PluginsConfig};
use codeframe_engine::plugins::{frames, line_numbers, text_markers};
use codeframe_engine::rendering::outline::outline;
use codeframe_engine::{BlockSpec, Engine, EngineConfig, Plugin, ProcessOutput};
use std::{env, path::Path, path::PathBuf, process};

#[derive(Debug, PartialEq, Eq)]
struct Args {
    markdown_path: PathBuf,
    json: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut markdown_path = None;
    let mut json = false;
    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            _ if markdown_path.is_none() && !arg.starts_with("--") => {
                markdown_path = Some(Config::expand_path(Path::new(arg)));
            }
            _ => return None,
        }
    }
    Some(Args {
        markdown_path: markdown_path?,
        json,
    })
}

fn build_plugins(config: &PluginsConfig) -> Vec<Plugin> {
    let mut plugins = Vec::new();
    if config.frames {
        plugins.push(frames());
    }
    if config.text_markers {
        plugins.push(text_markers());
    }
    if config.line_numbers {
        plugins.push(line_numbers(config.continuous_line_numbers));
    }
    plugins
}

fn render_document(markdown: &str, config: &Config) -> Result<ProcessOutput> {
    let specs: Vec<BlockSpec> = codeframe_engine::markdown::extract_code_blocks(markdown)
        .into_iter()
        .map(|spec| BlockSpec {
            language: config.language_for(&spec.language).to_string(),
            ..spec
        })
        .collect();
    log::info!("Rendering {} code blocks", specs.len());

    let engine = Engine::new(EngineConfig::new(build_plugins(&config.plugins)));
    Ok(engine.process(specs)?)
}

fn format_output(output: &ProcessOutput, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(&output.rendered_ast)?)
    } else {
        Ok(outline(&output.rendered_ast))
    }
}

fn run(args: &Args, config: &Config) -> Result<String> {
    let markdown = std::fs::read_to_string(&args.markdown_path)
        .with_context(|| format!("Failed to read {}", args.markdown_path.display()))?;
    let output = render_document(&markdown, config)
        .with_context(|| format!("Failed to render {}", args.markdown_path.display()))?;
    format_output(&output, args.json)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = env::args().collect();
    let program_name = argv.first().map_or("codeframe", String::as_str);
    let Some(args) = parse_args(argv.get(1..).unwrap_or_default()) else {
        eprintln!("Usage: {program_name} <markdown-file> [--json]");
        process::exit(1);
    };

    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!("No config file found, using defaults");
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    match run(&args, &config) {
        Ok(rendered) => print!("{rendered}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(&strings(&["guide.md", "--json"])),
            Some(Args {
                markdown_path: PathBuf::from("guide.md"),
                json: true,
            })
        );
        assert_eq!(
            parse_args(&strings(&["guide.md"])).map(|args| args.json),
            Some(false)
        );
    }

    #[test]
    fn test_parse_args_rejects_bad_usage() {
        assert_eq!(parse_args(&[]), None);
        assert_eq!(parse_args(&strings(&["--json"])), None);
        assert_eq!(parse_args(&strings(&["a.md", "b.md"])), None);
        assert_eq!(parse_args(&strings(&["a.md", "--verbose"])), None);
    }

    #[test]
    fn test_build_plugins_follows_config() {
        let names = |config: &PluginsConfig| -> Vec<String> {
            build_plugins(config)
                .iter()
                .map(|plugin| plugin.name().to_string())
                .collect()
        };

        assert_eq!(names(&PluginsConfig::default()), vec!["frames", "text-markers"]);
        let all = PluginsConfig {
            line_numbers: true,
            ..PluginsConfig::default()
        };
        assert_eq!(names(&all), vec!["frames", "text-markers", "line-numbers"]);
    }

    #[test]
    fn test_render_document_applies_default_language() {
        let config = Config {
            default_language: Some("text".to_string()),
            ..Config::default()
        };

        let output = render_document("```\nplain\n```\n\n```rust\nfn x() {}\n```\n", &config).unwrap();

        let languages: Vec<&str> = output
            .group_contents
            .iter()
            .map(|block| block.code_block.language())
            .collect();
        assert_eq!(languages, vec!["text", "rust"]);
    }

    #[test]
    fn test_run_prints_outline_and_json() {
        let temp_dir = TempDir::new().unwrap();
        let markdown_path = temp_dir.path().join("guide.md");
        std::fs::write(&markdown_path, "```sh title=\"Run\"\ncargo run\n```\n").unwrap();
        let config = Config::default();

        let text = run(
            &Args {
                markdown_path: markdown_path.clone(),
                json: false,
            },
            &config,
        )
        .unwrap();
        assert!(text.starts_with("div.expressive-code\n  figure.frame.has-title\n"));
        assert!(text.contains("\"cargo run\"\n"));

        let json = run(
            &Args {
                markdown_path,
                json: true,
            },
            &config,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["children"][0]["tagName"], "div");
        assert_eq!(value["children"][0]["type"], "element");
    }

    #[test]
    fn test_run_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let args = Args {
            markdown_path: temp_dir.path().join("missing.md"),
            json: false,
        };

        let err = run(&args, &Config::default()).unwrap_err();

        assert!(format!("{err:#}").contains("missing.md"));
    }
}
