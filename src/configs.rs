use std::path::PathBuf;

pub const DEFAULT_KMER_SIZE: u32 = 21;
pub const DEFAULT_SEED: u64 = 9001;
pub const DEFAULT_LINE_WIDTH: usize = 80;

pub struct CountKmersConfig {
    pub reads_fq: Vec<PathBuf>,
    pub kmer_size: usize,
    pub output: PathBuf,
}

/// Where the assembler gets its k-mer table from.
pub enum KmerSource {
    Reads { reads_fq: Vec<PathBuf>, kmer_size: usize },
    Binary(PathBuf),
}

pub struct AssembleConfig {
    pub kmer_source: KmerSource,
    pub output: PathBuf,
    pub seed: u64,
    pub line_width: usize,
    pub dot: Option<PathBuf>,
    pub simplify: bool,
}
