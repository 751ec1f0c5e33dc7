//! `arna` command-line driver: read a `.arna` file, compile it, and emit
//! the laid-out graph as JSON or SVG.

use arna_core::{
    CompileError, CompileOptions, GraphParameterOverrides, GraphSnapshot, TunableParameters,
    compile,
};
use arna_render::{Renderer, SvgSurface};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

/// Compile an arna graph description, lay it out, and print it.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "arna", version, about = "Compile and lay out an arna graph")]
pub struct Cli {
    /// Input `.arna` file
    pub input: PathBuf,

    /// Seed for the layout RNG (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bundle edges even if the graph does not ask for it
    #[arg(long)]
    pub bundle: bool,

    /// JSON file with layout/bundling parameters
    #[arg(long, value_name = "FILE.json")]
    pub config: Option<PathBuf>,

    /// Write an SVG drawing here instead of printing JSON
    #[arg(long, value_name = "OUT")]
    pub svg: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// SVG height in pixels
    #[arg(long)]
    pub height: Option<f64>,
}

/// Contents of `--config`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub parameters: GraphParameterOverrides,
    pub bundling: TunableParameters,
    pub seed: Option<u64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ConfigFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid config '{path}': {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("cannot serialize graph: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Lines to print on stderr, one per diagnostic.
    pub fn messages(&self) -> Vec<String> {
        match self {
            CliError::Compile(error) => error.messages(),
            other => vec![format!("error: {other}")],
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(String),
    Svg(String),
}

/// Compile `source` according to the flags and config, without touching the
/// filesystem.
pub fn execute(cli: &Cli, source: &str, config: &ConfigFile) -> Result<Output, CliError> {
    let mut parameters = config.parameters;
    if cli.bundle {
        parameters.bundle = Some(true);
    }
    let options = CompileOptions {
        parameters,
        seed: cli.seed.or(config.seed),
    };

    let mut graph = compile(source, &options)?;
    log::info!(
        "compiled `{}`: {} nodes, {} edges",
        graph.name,
        graph.node_count(),
        graph.edge_count()
    );

    if cli.svg.is_some() {
        let width = cli.width.or(config.width).unwrap_or(DEFAULT_WIDTH);
        let height = cli.height.or(config.height).unwrap_or(DEFAULT_HEIGHT);
        let mut renderer =
            Renderer::new(SvgSurface::new(width, height)).with_bundling(config.bundling);
        renderer.draw(&mut graph);
        return Ok(Output::Svg(renderer.into_surface().to_svg()));
    }

    if graph.parameters.bundle {
        graph.bundle_edges(&config.bundling);
    }
    let json = serde_json::to_string_pretty(&GraphSnapshot::of(&graph))?;
    Ok(Output::Json(json))
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    let text = read(path)?;
    ConfigFile::from_json(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Full CLI run: read input and config, compile, then write the SVG or
/// print the JSON.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let source = read(&cli.input)?;
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConfigFile::default(),
    };

    match execute(cli, &source, &config)? {
        Output::Json(json) => println!("{json}"),
        Output::Svg(svg) => {
            if let Some(path) = &cli.svg {
                fs::write(path, svg).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                log::info!("wrote {}", path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"graph cli { A [label="A"] B A -- B }"#;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("arna").chain(args.iter().copied()))
    }

    #[test]
    fn parse_flags() {
        let parsed = cli(&["g.arna", "--seed", "7", "--bundle", "--svg", "out.svg", "--width", "320"]);
        assert_eq!(parsed.input, PathBuf::from("g.arna"));
        assert_eq!(parsed.seed, Some(7));
        assert!(parsed.bundle);
        assert_eq!(parsed.svg, Some(PathBuf::from("out.svg")));
        assert_eq!(parsed.width, Some(320.0));
        assert_eq!(parsed.height, None);
    }

    #[test]
    fn json_output_is_a_snapshot() {
        let output = execute(&cli(&["g.arna", "--seed", "1"]), SOURCE, &ConfigFile::default()).unwrap();
        let Output::Json(json) = output else {
            panic!("expected JSON output");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "cli");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["nodes"][0]["label"], "A");
        assert_eq!(value["edges"][0]["tail"], "A");
        assert_eq!(value["edges"][0]["polyline"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bundle_flag_subdivides_json_polylines() {
        let output = execute(
            &cli(&["g.arna", "--seed", "1", "--bundle"]),
            SOURCE,
            &ConfigFile::default(),
        )
        .unwrap();
        let Output::Json(json) = output else {
            panic!("expected JSON output");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["parameters"]["bundle"], true);
        assert_eq!(value["edges"][0]["polyline"].as_array().unwrap().len(), 64 + 2);
    }

    #[test]
    fn svg_output_uses_config_size() {
        let config = ConfigFile::from_json(r#"{ "width": 320, "height": 200 }"#).unwrap();
        let output = execute(&cli(&["g.arna", "--svg", "out.svg"]), SOURCE, &config).unwrap();
        let Output::Svg(svg) = output else {
            panic!("expected SVG output");
        };
        assert!(svg.contains("width=\"320\" height=\"200\""));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigFile::from_json(
            r#"{ "parameters": { "max_ticks": 5, "c": 0.02 }, "bundling": { "cycle_count": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.parameters.max_ticks, Some(5));
        assert_eq!(config.parameters.damping, Some(0.02));
        assert_eq!(config.bundling.cycle_count, 2);
        assert_eq!(config.bundling.subdivision_rate, 2);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn compile_errors_become_diagnostic_lines() {
        let error = execute(&cli(&["g.arna"]), "graph g { A A -- B }", &ConfigFile::default())
            .unwrap_err();
        let messages = error.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("semantic error at 1:18"));
        assert!(messages[0].contains("`B`"));
    }

    #[test]
    fn missing_input_file() {
        let error = run(&cli(&["/definitely/not/here.arna"])).unwrap_err();
        assert!(matches!(error, CliError::Read { .. }));
    }
}
