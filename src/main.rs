use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use kestrel_core::perft::{divide, perft};
use kestrel_core::{Move, Position};
use kestrel_engine::{Engine, SearchConfig, SearchInfo, SearchObserver, SearchOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: kestrel <perft|divide|search> <depth> [fen]";

/// Prints search progress to stdout.
struct StdoutObserver;

impl SearchObserver for StdoutObserver {
    fn on_info(&self, info: &SearchInfo) {
        let pv: Vec<String> = info.pv.iter().map(Move::to_string).collect();
        println!(
            "info depth {} seldepth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
            info.depth,
            info.seldepth,
            info.score,
            info.nodes,
            info.nps,
            info.elapsed.as_millis(),
            info.hashfull,
            pv.join(" ")
        );
    }

    fn on_best_move(&self, best: Move, ponder: Option<Move>) {
        match ponder {
            Some(reply) => println!("bestmove {best} ponder {reply}"),
            None => println!("bestmove {best}"),
        }
    }

    fn on_hash_resized(&self, megabytes: usize) {
        info!(megabytes, "hash table ready");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, depth, fen) = match args.as_slice() {
        [command, depth, fen @ ..] => (command.as_str(), depth, fen.join(" ")),
        _ => bail!(USAGE),
    };
    let depth: u8 = depth.parse().with_context(|| format!("invalid depth \"{depth}\""))?;
    let mut pos = if fen.is_empty() {
        Position::starting()
    } else {
        fen.parse::<Position>().with_context(|| format!("invalid FEN \"{fen}\""))?
    };

    match command {
        "perft" => {
            let start = Instant::now();
            let nodes = perft(&mut pos, depth as usize);
            let elapsed = start.elapsed();
            println!("nodes {nodes} time {} ms", elapsed.as_millis());
        }
        "divide" => {
            let split = divide(&mut pos, depth as usize);
            for (mv, nodes) in &split {
                println!("{mv}: {nodes}");
            }
            println!("total {}", split.iter().map(|(_, nodes)| nodes).sum::<u64>());
        }
        "search" => {
            let mut engine = Engine::new(SearchOptions::default(), Arc::new(StdoutObserver));
            engine.start_search(&pos, SearchConfig::depth(depth)).context("starting search")?;
            let result = engine.wait().context("waiting for search")?;
            if let Some(result) = result {
                info!(nodes = result.stats.nodes, depth = result.depth, "search done");
            }
        }
        other => bail!("unknown command \"{other}\"\n{USAGE}"),
    }
    Ok(())
}
