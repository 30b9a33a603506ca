use anyhow::Result;
use clap::{Parser, Subcommand};
use kgrag::cache::ExtractionCache;
use kgrag::extraction::{parse_extraction_output, TripleExtractor};
use kgrag::ingest::{build_indexes, load_triples};
use kgrag::{
    build_graph, get_2hop_neighbors, get_neighbors, verbalize_from_graph,
    verbalize_from_triples, Config, Mode,
};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "kgrag")]
#[command(about = "Knowledge-graph neighborhood retrieval and verbalization for RAG prompts")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a concept's graph neighbors
    Neighbors {
        /// Concept name to query
        concept: String,

        /// Traversal mode: bidirectional, outgoing, or ingoing
        #[arg(short, long)]
        mode: Option<String>,

        /// Expand to the strict 2-hop ring instead of 1-hop (always bidirectional)
        #[arg(long)]
        two_hop: bool,
    },

    /// Verbalize a concept's neighborhood as prompt-ready triple lines
    Verbalize {
        /// Concept name to query
        concept: String,

        /// Traversal mode: bidirectional, outgoing, or ingoing
        #[arg(short, long)]
        mode: Option<String>,

        /// Relation label applied uniformly to every emitted line
        #[arg(short, long)]
        relation_label: Option<String>,

        /// Render straight from the triple list, keeping each triple's own label
        #[arg(long)]
        from_triples: bool,
    },

    /// Extract candidate triples from free text via the configured LLM
    Extract {
        /// Free-text prompt to extract triples from
        prompt: String,
    },
}

/// Build a configured extractor with an optional LRU response cache.
fn build_extractor(config: &Config) -> Result<TripleExtractor> {
    let api_key = std::env::var(&config.extraction.api_key_env).map_err(|_| {
        anyhow::anyhow!(
            "Environment variable {} not set. Set it in your .env file or as an environment variable.",
            config.extraction.api_key_env
        )
    })?;

    // Wrap in an LRU cache if cache_capacity > 0 (avoids re-extracting repeated prompts)
    let cache = if config.extraction.cache_capacity > 0 {
        Some(Arc::new(ExtractionCache::new(
            config.extraction.cache_capacity,
        )))
    } else {
        None
    };

    Ok(TripleExtractor::new_with_cache(
        api_key,
        config.extraction.model.clone(),
        config.extraction.max_tokens,
        config.extraction.max_retries,
        cache,
    ))
}

/// Resolve the traversal mode: CLI flag wins, config default otherwise.
fn resolve_mode(cli_mode: Option<&str>, config: &Config) -> Result<Mode> {
    match cli_mode {
        Some(s) => Ok(s.parse::<Mode>()?),
        None => config.default_mode(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load()?;

    match args.command {
        Command::Neighbors {
            concept,
            mode,
            two_hop,
        } => {
            let triples = load_triples(config.triples_path())?;
            let (concepts, relations) = build_indexes(&triples)?;
            let graph = build_graph(&triples, &concepts, &relations)?;

            let neighbors = if two_hop {
                get_2hop_neighbors(&graph, &concept, &concepts)
            } else {
                let mode = resolve_mode(mode.as_deref(), &config)?;
                get_neighbors(&graph, &concept, &concepts, mode)
            };

            let hops = if two_hop { "2-hop" } else { "1-hop" };
            if neighbors.is_empty() {
                println!("No {} neighbors found for \"{}\".", hops, concept);
            } else {
                println!("{} neighbors of \"{}\" ({}):", hops, concept, neighbors.len());
                for neighbor in neighbors {
                    println!("{}", neighbor);
                }
            }
        }

        Command::Verbalize {
            concept,
            mode,
            relation_label,
            from_triples,
        } => {
            let triples = load_triples(config.triples_path())?;

            let output = if from_triples {
                verbalize_from_triples(&triples, &concept)
            } else {
                let (concepts, relations) = build_indexes(&triples)?;
                let graph = build_graph(&triples, &concepts, &relations)?;
                let mode = resolve_mode(mode.as_deref(), &config)?;
                let label = relation_label
                    .as_deref()
                    .unwrap_or(&config.retrieval.relation_label);
                verbalize_from_graph(&graph, &concept, &concepts, label, mode)
            };

            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }

        Command::Extract { prompt } => {
            let extractor = build_extractor(&config)?;

            log::info!("Extracting candidate triples via {}", config.extraction.model);
            let output = extractor.extract(&prompt).await;
            let triples = parse_extraction_output(&output)?;
            log::info!("Extracted {} candidate triples", triples.len());

            println!("{}", output);
        }
    }

    Ok(())
}
