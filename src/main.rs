// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nereid Flow CLI entrypoint.
//!
//! Loads a graph (`{ nodes: [{id, label}], connections: [{source, target}] }` JSON, or the
//! built-in sample), auto-arranges it on a headless surface and prints the resulting flow design
//! together with the node positions.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;

use nereid_flow::model::{fixtures::sample_graph, GraphData, Point};
use nereid_flow::{FlowConfig, FlowDesigner, InMemorySurface};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <graph.json> [--config <file>]\n  {program} --sample [--config <file>]\n\nThe graph is loaded onto a headless canvas, auto-arranged and printed as JSON.\nWithout a graph file the built-in sample is used.\n\nLog verbosity follows RUST_LOG (default `warn`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    sample: bool,
    graph_path: Option<String>,
    config_path: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => {
                if options.sample {
                    return Err(());
                }
                options.sample = true;
            }
            "--config" => {
                if options.config_path.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config_path = Some(path);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.graph_path.is_some() {
                    return Err(());
                }
                options.graph_path = Some(arg);
            }
        }
    }

    if options.sample && options.graph_path.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "nereid-flow".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let config = match &options.config_path {
            Some(path) => FlowConfig::load(path)?,
            None => FlowConfig::default(),
        };
        let graph = match &options.graph_path {
            Some(path) => GraphData::from_json(&fs::read_to_string(path)?)?,
            None => sample_graph(),
        };

        let surface = InMemorySurface::new(config.canvas.size(), config.nodes.size());
        let mut designer = FlowDesigner::new(surface, config);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let (load, arrange) = runtime.block_on(async {
            let load = designer.load_graph(&graph).await;
            let arrange = designer.auto_arrange().await;
            (load, arrange)
        });

        for err in &load.errors {
            eprintln!("nereid-flow: skipped: {err}");
        }
        for err in &arrange.failures {
            eprintln!("nereid-flow: {err}");
        }
        if let Some(err) = &arrange.layout_non_convergence {
            eprintln!("nereid-flow: {err}");
        }

        let positions = designer
            .model()
            .nodes()
            .map(|node| (node.id().to_string(), node.position()))
            .collect::<BTreeMap<String, Point>>();
        let output = serde_json::json!({
            "design": designer.flow_design(),
            "positions": positions,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("nereid-flow: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_sample_flag() {
        let options = parse_options(["--sample".to_owned()].into_iter()).expect("parse options");
        assert!(options.sample);
        assert!(options.graph_path.is_none());
    }

    #[test]
    fn parses_positional_graph_and_config() {
        let options = parse_options(
            ["graph.json".to_owned(), "--config".to_owned(), "flow.json".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.graph_path.as_deref(), Some("graph.json"));
        assert_eq!(options.config_path.as_deref(), Some("flow.json"));
        assert!(!options.sample);
    }

    #[test]
    fn rejects_sample_with_graph() {
        parse_options(["--sample".to_owned(), "graph.json".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_duplicate_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
        parse_options(["--sample".to_owned(), "--sample".to_owned()].into_iter()).unwrap_err();
        parse_options(["a.json".to_owned(), "b.json".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_missing_config_value() {
        parse_options(["--config".to_owned()].into_iter()).unwrap_err();
    }
}
