use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::configs::{
    AssembleConfig, CountKmersConfig, KmerSource, DEFAULT_KMER_SIZE, DEFAULT_LINE_WIDTH,
    DEFAULT_SEED,
};

#[derive(Parser)]
#[command(
    name = "dbg_assembler",
    version,
    about = "De novo assembly of short single-end reads using a de Bruijn graph"
)]
pub struct Cli {
    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {

    /// Count k-mers in FASTQ files and store the table
    CountKmers(CountKmersArgs),

    /// Build, simplify and walk the de Bruijn graph into contigs
    Assemble(AssembleArgs),
}

#[derive(Args)]
pub struct CountKmersArgs {

    /// Input reads in FASTQ format
    #[arg(short = 'i', long = "reads", required = true, num_args = 1..)]
    pub reads_fq: Vec<PathBuf>,

    /// K-mer length
    #[arg(short, long, default_value_t = DEFAULT_KMER_SIZE, value_parser = clap::value_parser!(u32).range(2..))]
    pub kmer_size: u32,

    /// K-mer table binary file
    #[arg(short, long, default_value = "kmers.bin")]
    pub output: PathBuf,
}

impl From<&CountKmersArgs> for CountKmersConfig {
    fn from(args: &CountKmersArgs) -> Self {
        Self {
            reads_fq: args.reads_fq.clone(),
            kmer_size: args.kmer_size as usize,
            output: args.output.clone(),
        }
    }
}

#[derive(Args)]
pub struct AssembleArgs {

    /// Input reads in FASTQ format
    #[arg(short = 'i', long = "reads", num_args = 1.., required_unless_present = "kmer_binary", conflicts_with = "kmer_binary")]
    pub reads_fq: Vec<PathBuf>,

    /// K-mer table written by `count-kmers`, used instead of reads
    #[arg(short = 'b', long)]
    pub kmer_binary: Option<PathBuf>,

    /// K-mer length (ignored with --kmer-binary)
    #[arg(short, long, default_value_t = DEFAULT_KMER_SIZE, value_parser = clap::value_parser!(u32).range(2..))]
    pub kmer_size: u32,

    /// Output contigs in FASTA format
    #[arg(short, long, default_value = "contigs.fasta")]
    pub output: PathBuf,

    /// Seed for tie-breaking between equally supported paths
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// FASTA line width
    #[arg(short = 'w', long, default_value_t = DEFAULT_LINE_WIDTH, value_parser = parse_line_width)]
    pub line_width: usize,

    /// Write the simplified graph in DOT format
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// Skip bubble and tip removal
    #[arg(long)]
    pub no_simplify: bool,
}

fn parse_line_width(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("line width must be at least 1".to_string()),
        Ok(w) => Ok(w),
        Err(e) => Err(e.to_string()),
    }
}

impl From<&AssembleArgs> for AssembleConfig {
    fn from(args: &AssembleArgs) -> Self {
        let kmer_source = match &args.kmer_binary {
            Some(path) => KmerSource::Binary(path.clone()),
            None => KmerSource::Reads {
                reads_fq: args.reads_fq.clone(),
                kmer_size: args.kmer_size as usize,
            },
        };
        Self {
            kmer_source,
            output: args.output.clone(),
            seed: args.seed,
            line_width: args.line_width,
            dot: args.dot.clone(),
            simplify: !args.no_simplify,
        }
    }
}
