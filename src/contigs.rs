/// Contig extraction and output
/// walk the shortest path between every connected source/sink pair and write the result as FASTA

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::assembly_graph::AssemblyGraph;
use crate::errors::AssemblyError;
use crate::graph_queries::{descendants, shortest_path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contig {
    pub sequence: String,
    pub length: usize,
}

impl Contig {

    /// Spell out a path: the first base of every node, then the whole last node.
    pub fn from_path(path: &[String]) -> Self {
        let mut sequence = String::new();
        if let Some((last, rest)) = path.split_last() {
            for node in rest {
                if let Some(base) = node.chars().next() {
                    sequence.push(base);
                }
            }
            sequence.push_str(last);
        }
        let length = sequence.len();
        Self { sequence, length }
    }
}

/// One contig per (source, sink) pair connected by a path, in source-then-sink order.
pub fn get_contigs(graph: &AssemblyGraph) -> Vec<Contig> {
    let sources = graph.sources();
    let sinks = graph.sinks();
    let mut contigs = Vec::new();

    for start in sources.iter() {
        let reachable = descendants(graph, start);
        for end in sinks.iter() {
            // isolated nodes are both, but spell no k-mer
            if start == end || !reachable.contains(end) {
                continue;
            }
            if let Ok(path) = shortest_path(graph, start, end) {
                contigs.push(Contig::from_path(&path));
            }
        }
    }
    contigs
}

/// N50 of the contig lengths, 0 for no contigs
pub fn n50(contigs: &[Contig]) -> usize {
    let mut lengths: Vec<usize> = contigs.iter().map(|c| c.length).collect();
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    let total: usize = lengths.iter().sum();
    let mut acc = 0;
    for len in lengths {
        acc += len;
        if acc * 2 >= total {
            return len;
        }
    }
    0
}

pub fn log_contig_stats(contigs: &[Contig]) {
    let total: usize = contigs.iter().map(|c| c.length).sum();
    let longest = contigs.iter().map(|c| c.length).max().unwrap_or(0);
    info!(
        "Contigs: {}, total length: {}, longest: {}, N50: {}",
        contigs.len(),
        total,
        longest,
        n50(contigs)
    );
}

/// Split text into lines of at most `width` characters
pub fn fill(text: &str, width: usize) -> String {
    assert!(width > 0, "line width must be positive");
    text.as_bytes()
        .chunks(width)
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write contigs as FASTA records `>contig_<i> len=<length>`.
pub fn write_contigs_to<W: Write>(
    contigs: &[Contig],
    w: &mut W,
    width: usize,
) -> std::io::Result<()> {
    for (i, contig) in contigs.iter().enumerate() {
        writeln!(w, ">contig_{} len={}", i, contig.length)?;
        writeln!(w, "{}", fill(&contig.sequence, width))?;
    }
    Ok(())
}

pub fn write_contigs<P: AsRef<Path>>(
    contigs: &[Contig],
    path: P,
    width: usize,
) -> Result<(), AssemblyError> {
    let mut w = BufWriter::new(File::create(path)?);
    write_contigs_to(contigs, &mut w, width)?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer_index::build_kmer_counts;

    fn contigs_of(reads: &[&str], k: usize) -> Vec<Contig> {
        get_contigs(&AssemblyGraph::from_kmer_counts(&build_kmer_counts(reads, k)))
    }

    fn contig(seq: &str) -> Contig {
        Contig {
            sequence: seq.to_string(),
            length: seq.len(),
        }
    }

    #[test]
    fn single_read_is_reconstructed() {
        assert_eq!(contigs_of(&["AATCG"], 3), vec![contig("AATCG")]);
        assert_eq!(contigs_of(&["GATTACAGC"], 4), vec![contig("GATTACAGC")]);
    }

    #[test]
    fn diverging_reads_give_two_contigs() {
        assert_eq!(
            contigs_of(&["AATCG", "AATCC"], 3),
            vec![contig("AATCG"), contig("AATCC")]
        );
    }

    #[test]
    fn unconnected_pairs_are_skipped() {
        assert_eq!(
            contigs_of(&["AATCG", "GGCCT"], 3),
            vec![contig("AATCG"), contig("GGCCT")]
        );
    }

    #[test]
    fn empty_graph_has_no_contigs() {
        assert!(contigs_of(&[], 3).is_empty());
        assert!(contigs_of(&["AC"], 3).is_empty());
    }

    #[test]
    fn path_spelling() {
        let path: Vec<String> = ["AA", "AT", "TC", "CG"].iter().map(|s| s.to_string()).collect();
        assert_eq!(Contig::from_path(&path), contig("AATCG"));
        assert_eq!(Contig::from_path(&[]), contig(""));
    }

    #[test]
    fn fill_wraps_lines() {
        assert_eq!(fill("ACGTACGT", 3), "ACG\nTAC\nGT");
        assert_eq!(fill("ACG", 3), "ACG");
        assert_eq!(fill("", 80), "");
    }

    #[test]
    fn fasta_records() {
        let contigs = vec![contig("AATCG"), contig("AATCC")];
        let mut out = Vec::new();
        write_contigs_to(&contigs, &mut out, 3).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">contig_0 len=5\nAAT\nCG\n>contig_1 len=5\nAAT\nCC\n"
        );

        let mut out = Vec::new();
        write_contigs_to(&[], &mut out, 80).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn n50_of_lengths() {
        let contigs = vec![contig("AAAAAAAAAA"), contig("AAAAA"), contig("AAA"), contig("AA")];
        assert_eq!(n50(&contigs), 10);
        let contigs = vec![contig("AAAA"), contig("AAAA"), contig("AAAA")];
        assert_eq!(n50(&contigs), 4);
        assert_eq!(n50(&[]), 0);
    }
}
