// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;

use catlynet_view::{
    LayoutConfig, LayoutState, LogNotifier, LogStatus, ReactionGraphView, ReactionSystem,
    SceneStyle, ViewConfig,
};

#[derive(Parser)]
#[command(author, version, about = "Lay out and render reaction graphs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a layout for a reaction system and write SVG or coordinates
    Layout {
        /// Reaction system in JSON form
        input: PathBuf,
        #[arg(long, default_value_t = LayoutConfig::default().iterations)]
        iterations: usize,
        /// Worker threads for the repulsion pass; 0 uses every core
        #[arg(long, default_value_t = 0)]
        threads: usize,
        #[arg(long, default_value_t = LayoutConfig::default().seed)]
        seed: u64,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit node coordinates as JSON instead of SVG
        #[arg(long)]
        json: bool,
    },
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:>5} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_boxed_logger(Box::new(StderrLogger)).context("installing logger")?;
    log::set_max_level(level);
    Ok(())
}

fn coordinates_json(view: &ReactionGraphView) -> Result<String> {
    let coords = view.coordinates();
    let nodes: Vec<_> = view
        .graph()
        .nodes()
        .filter_map(|node| {
            let pos = coords.get(&node.id)?;
            Some(json!({
                "id": node.id.0,
                "label": node.payload.label(),
                "x": pos.x,
                "y": pos.y,
            }))
        })
        .collect();
    Ok(serde_json::to_string_pretty(&json!({ "nodes": nodes }))?)
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn layout(
    input: &Path,
    layout: LayoutConfig,
    output: Option<&Path>,
    as_json: bool,
) -> Result<()> {
    let contents =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let system = ReactionSystem::from_json(&contents)
        .with_context(|| format!("parsing {}", input.display()))?;
    log::info!(
        "loaded '{}' with {} reactions",
        system.name,
        system.reactions.len()
    );

    let config = ViewConfig {
        layout,
        style: SceneStyle::default(),
    };
    let mut view = ReactionGraphView::new(config, Box::new(LogNotifier), Box::new(LogStatus));
    view.update(&system)?;
    match view.wait_for_layout() {
        None | Some(LayoutState::Succeeded) | Some(LayoutState::Cancelled) => {}
        Some(state) => bail!("layout did not complete ({state:?})"),
    }

    let rendered = if as_json {
        coordinates_json(&view)?
    } else {
        view.render_svg()
    };
    write_output(output, &rendered)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Layout {
            input,
            iterations,
            threads,
            seed,
            output,
            json,
        } => {
            let config = LayoutConfig {
                iterations,
                threads,
                seed,
                ..LayoutConfig::default()
            };
            layout(&input, config, output.as_deref(), json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout_defaults() {
        let cli = Cli::try_parse_from(["catlynet", "layout", "model.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        let Command::Layout {
            input,
            iterations,
            threads,
            seed,
            output,
            json,
        } = cli.command;
        assert_eq!(input, PathBuf::from("model.json"));
        assert_eq!(iterations, 1000);
        assert_eq!(threads, 0);
        assert_eq!(seed, 42);
        assert!(output.is_none());
        assert!(!json);
    }

    #[test]
    fn test_parse_layout_flags() {
        let cli = Cli::try_parse_from([
            "catlynet", "-vv", "layout", "m.json", "--iterations", "10", "--threads", "2",
            "--seed", "7", "-o", "out.svg", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Layout {
            iterations,
            threads,
            seed,
            output,
            json,
            ..
        } = cli.command;
        assert_eq!((iterations, threads, seed), (10, 2, 7));
        assert_eq!(output, Some(PathBuf::from("out.svg")));
        assert!(json);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Cli::try_parse_from(["catlynet", "layout"]).is_err());
    }
}
