mod assemble;
mod assembly_graph;
mod bubble_removal;
mod cli;
mod configs;
mod contigs;
mod errors;
mod graph_queries;
mod graph_simplification;
mod kmer_index;
mod path_selection;
mod read_fastq;
mod tip_trimming;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};
use crate::configs::{AssembleConfig, CountKmersConfig};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::CountKmers(args) => {
            let config = CountKmersConfig::from(args);
            assemble::run_count_kmers(&config)
                .with_context(|| format!("counting k-mers into {}", config.output.display()))?;
        }
        Commands::Assemble(args) => {
            let config = AssembleConfig::from(args);
            assemble::run_assemble(&config)
                .with_context(|| format!("assembling contigs into {}", config.output.display()))?;
        }
    }

    Ok(())
}
