use anyhow::{bail, Context as _};
use clap::Parser;
use log::info;

use organizer::cli::Args;
use organizer::document::FlowDocument;
use organizer::Context;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level())
        .init();

    let Some(flow_path) = &args.flow_path else {
        bail!("no flow document given (see --help)");
    };

    let doc = FlowDocument::load(flow_path)
        .with_context(|| format!("loading {}", flow_path.display()))?;

    let Some(logic) = doc.logic_list.get(args.graph_index) else {
        bail!(
            "document has {} logic graph(s), index {} is out of range",
            doc.logic_list.len(),
            args.graph_index
        );
    };

    let ctx = Context::from_logic(logic)?;
    let graph = ctx.graph();
    println!(
        "graph {}: {} node(s), {} edge(s)",
        args.graph_index,
        graph.node_count(),
        graph.edge_count()
    );
    for node in graph.nodes() {
        println!(
            "  {} [{}] {} at ({}, {})",
            node.id,
            node.properties.type_name(),
            node.properties.display_name().unwrap_or("-"),
            node.x,
            node.y
        );
    }

    if args.eval {
        let report = ctx.evaluate_all(&doc);
        info!(
            "evaluated {} conversion node(s): {} ok, {} failed",
            report.outcomes.len(),
            report.success_count(),
            report.failure_count()
        );
        for outcome in &report.outcomes {
            match &outcome.outcome {
                Ok(value) => println!(
                    "  {} ({}) => {}",
                    outcome.node_id,
                    outcome.name.as_deref().unwrap_or("-"),
                    value
                ),
                Err(err) => println!("  {} failed: {}", outcome.node_id, err),
            }
        }
    }

    if let Some(out_path) = &args.out_path {
        doc.save(out_path)
            .with_context(|| format!("writing {}", out_path.display()))?;
        println!("wrote {}", out_path.display());
    }

    Ok(())
}
