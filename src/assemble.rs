/// Assembly pipeline
/// reads -> k-mer table -> de Bruijn graph -> simplification -> contigs -> FASTA

use log::{info, warn};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::path::PathBuf;

use crate::assembly_graph::AssemblyGraph;
use crate::configs::{AssembleConfig, CountKmersConfig, KmerSource};
use crate::contigs::{get_contigs, log_contig_stats, write_contigs, Contig};
use crate::errors::AssemblyError;
use crate::graph_simplification::simplify_graph;
use crate::kmer_index::{build_kmer_counts, KmerCounts};
use crate::read_fastq::read_fastq;

/// Count k-mers over several FASTQ files, one table per file merged in argument order.
pub fn count_reads(reads_fq: &[PathBuf], kmer_size: usize) -> Result<KmerCounts, AssemblyError> {
    let mut counts = KmerCounts::new(kmer_size);
    for path in reads_fq {
        info!("Reading {}", path.display());
        let reads = read_fastq(path)?;
        counts.merge(&build_kmer_counts(&reads, kmer_size));
    }
    if reads_fq.len() > 1 {
        info!(
            "Merged k-mer table: {} k-mers ({} distinct)",
            counts.total(),
            counts.len()
        );
    }
    Ok(counts)
}

/// Build, optionally simplify, and walk the graph of a k-mer table.
pub fn assemble_counts(
    counts: &KmerCounts,
    seed: u64,
    simplify: bool,
) -> (AssemblyGraph, Vec<Contig>) {
    info!("=== GRAPH CONSTRUCTION (k={}) ===", counts.kmer_size());
    let mut graph = AssemblyGraph::from_kmer_counts(counts);
    info!(
        "Sources: {}, sinks: {}",
        graph.sources().len(),
        graph.sinks().len()
    );

    if simplify {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        simplify_graph(&mut graph, &mut rng);
        if cfg!(debug_assertions) {
            graph.validate();
        }
    }
    if graph.is_empty() {
        warn!("Graph is empty, no contigs to extract");
    }

    info!("=== CONTIG EXTRACTION ===");
    let contigs = get_contigs(&graph);
    log_contig_stats(&contigs);
    (graph, contigs)
}

pub fn run_count_kmers(config: &CountKmersConfig) -> Result<KmerCounts, AssemblyError> {
    info!("=== K-MER COUNTING (k={}) ===", config.kmer_size);
    let counts = count_reads(&config.reads_fq, config.kmer_size)?;
    counts.save(&config.output)?;
    info!("K-mer table written to {}", config.output.display());
    Ok(counts)
}

pub fn run_assemble(config: &AssembleConfig) -> Result<Vec<Contig>, AssemblyError> {
    let counts = match &config.kmer_source {
        KmerSource::Reads { reads_fq, kmer_size } => {
            info!("=== K-MER COUNTING (k={}) ===", kmer_size);
            count_reads(reads_fq, *kmer_size)?
        }
        KmerSource::Binary(path) => {
            info!("Loading k-mer table from {}", path.display());
            let counts = KmerCounts::load(path)?;
            info!(
                "Loaded {} distinct k-mers (k={})",
                counts.len(),
                counts.kmer_size()
            );
            counts
        }
    };
    if counts.is_empty() {
        warn!("No k-mers to assemble, the output will be empty");
    }

    let (graph, contigs) = assemble_counts(&counts, config.seed, config.simplify);

    if let Some(dot) = &config.dot {
        graph.write_dot(dot)?;
        info!("Graph written to {}", dot.display());
    }

    write_contigs(&contigs, &config.output, config.line_width)?;
    info!("{} contigs written to {}", contigs.len(), config.output.display());
    Ok(contigs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dbg_assembler_{}_{}", std::process::id(), name))
    }

    fn write_fastq(path: &Path, reads: &[&str]) {
        let mut text = String::new();
        for (i, read) in reads.iter().enumerate() {
            text.push_str(&format!("@read{}\n{}\n+\n{}\n", i, read, "I".repeat(read.len())));
        }
        fs::write(path, text).unwrap();
    }

    fn assemble_config(reads: Vec<PathBuf>, output: PathBuf, k: usize) -> AssembleConfig {
        AssembleConfig {
            kmer_source: KmerSource::Reads { reads_fq: reads, kmer_size: k },
            output,
            seed: 9001,
            line_width: 80,
            dot: None,
            simplify: true,
        }
    }

    #[test]
    fn assembles_reads_with_errors_into_one_contig() {
        let reads_path = scratch("errors.fq");
        let out_path = scratch("errors.fasta");
        let mut reads = vec!["ATGGCGTGCAACT"; 4];
        reads.extend(["ATGGCGAGCAACT", "ATGGCGTGCAAG", "CGGCGTGCAACT"]);
        write_fastq(&reads_path, &reads);

        let config = assemble_config(vec![reads_path.clone()], out_path.clone(), 4);
        let contigs = run_assemble(&config).unwrap();
        let fasta = fs::read_to_string(&out_path).unwrap();
        fs::remove_file(&reads_path).unwrap();
        fs::remove_file(&out_path).unwrap();

        assert_eq!(contigs.len(), 1);
        assert_eq!(fasta, ">contig_0 len=13\nATGGCGTGCAACT\n");
    }

    #[test]
    fn without_simplification_errors_stay() {
        let mut reads = vec!["ATGGCGTGCAACT"; 4];
        reads.push("ATGGCGTGCAAG");
        let counts = build_kmer_counts(&reads, 4);
        let (_, raw) = assemble_counts(&counts, 9001, false);
        assert_eq!(raw.len(), 2);
        let (_, simplified) = assemble_counts(&counts, 9001, true);
        assert_eq!(simplified.len(), 1);
        assert_eq!(simplified[0].sequence, "ATGGCGTGCAACT");
    }

    #[test]
    fn count_then_assemble_from_binary() {
        let reads_a = scratch("a.fq");
        let reads_b = scratch("b.fq");
        let table = scratch("kmers.bin");
        let out_direct = scratch("direct.fasta");
        let out_binary = scratch("binary.fasta");
        let dot = scratch("graph.dot");
        write_fastq(&reads_a, &["ATGGCGTGCAACT", "ATGGCGTGCAACT"]);
        write_fastq(&reads_b, &["ATGGCGTGCAACT", "ATGGCGAGCAACT"]);

        let counts = run_count_kmers(&CountKmersConfig {
            reads_fq: vec![reads_a.clone(), reads_b.clone()],
            kmer_size: 4,
            output: table.clone(),
        })
        .unwrap();
        assert_eq!(counts.get("ATGG"), Some(4));

        let reads = vec![reads_a.clone(), reads_b.clone()];
        let direct = run_assemble(&assemble_config(reads, out_direct.clone(), 4)).unwrap();
        let mut config = assemble_config(Vec::new(), out_binary.clone(), 4);
        config.kmer_source = KmerSource::Binary(table.clone());
        config.dot = Some(dot.clone());
        let from_binary = run_assemble(&config).unwrap();

        let fasta_direct = fs::read(&out_direct).unwrap();
        let fasta_binary = fs::read(&out_binary).unwrap();
        let dot_text = fs::read_to_string(&dot).unwrap();
        for p in [&reads_a, &reads_b, &table, &out_direct, &out_binary, &dot] {
            fs::remove_file(p).unwrap();
        }

        assert_eq!(direct, from_binary);
        assert_eq!(fasta_direct, fasta_binary);
        assert!(dot_text.starts_with("digraph AssemblyGraph {"));
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        // two equally supported alleles force the random tie-break
        let reads_path = scratch("tie.fq");
        write_fastq(&reads_path, &["ATGGCGTGCAACT", "ATGGCGAGCAACT"]);
        let mut outputs = Vec::new();
        for run in 0..3 {
            let out = scratch(&format!("tie_{}.fasta", run));
            run_assemble(&assemble_config(vec![reads_path.clone()], out.clone(), 4)).unwrap();
            outputs.push(fs::read(&out).unwrap());
            fs::remove_file(&out).unwrap();
        }
        fs::remove_file(&reads_path).unwrap();
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[1], outputs[2]);
        let text = String::from_utf8(outputs[0].clone()).unwrap();
        assert!(text.starts_with(">contig_0 len=13\n"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn reads_shorter_than_k_give_empty_output() {
        let reads_path = scratch("short.fq");
        let out_path = scratch("short.fasta");
        write_fastq(&reads_path, &["ACG", "TT"]);
        let config = assemble_config(vec![reads_path.clone()], out_path.clone(), 5);
        let contigs = run_assemble(&config).unwrap();
        let fasta = fs::read_to_string(&out_path).unwrap();
        fs::remove_file(&reads_path).unwrap();
        fs::remove_file(&out_path).unwrap();
        assert!(contigs.is_empty());
        assert!(fasta.is_empty());
    }

    #[test]
    fn malformed_fastq_is_fatal() {
        let reads_path = scratch("bad.fq");
        fs::write(&reads_path, "@r1\nACGT\n+\n").unwrap();
        let res = run_assemble(&assemble_config(vec![reads_path.clone()], scratch("bad.fasta"), 3));
        fs::remove_file(&reads_path).unwrap();
        assert!(matches!(res, Err(AssemblyError::Format { .. })));
    }
}
