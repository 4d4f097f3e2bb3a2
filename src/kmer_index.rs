/// K-mer counting module
/// cut every read into overlapping k-mers and count how often each distinct k-mer occurs

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::errors::AssemblyError;

/// Iterate over the k-length windows of `seq`. Yields nothing when `seq` is shorter than `k`.
pub fn cut_kmers(seq: &str, k: usize) -> impl Iterator<Item = &str> + '_ {
    let windows = if k == 0 || seq.len() < k { 0 } else { seq.len() - k + 1 };
    (0..windows).filter_map(move |i| seq.get(i..i + k))
}

/// Occurrence counts of distinct k-mers.
/// K-mers are kept in the order they were first observed so that everything built
/// from the table (graph nodes, sources, sinks, contigs) has a reproducible order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct KmerCounts {
    kmer_size: usize,
    kmers: Vec<(String, u32)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl KmerCounts {

    pub fn new(kmer_size: usize) -> Self {
        assert!(kmer_size >= 1, "k-mer size must be at least 1");
        Self {
            kmer_size,
            kmers: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn kmer_size(&self) -> usize {
        self.kmer_size
    }

    /// Number of distinct k-mers.
    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    /// Total number of k-mer occurrences.
    pub fn total(&self) -> u64 {
        self.kmers.iter().map(|(_, c)| *c as u64).sum()
    }

    #[cfg(test)]
    pub fn get(&self, kmer: &str) -> Option<u32> {
        self.index.get(kmer).map(|&i| self.kmers[i].1)
    }

    /// K-mers and their counts in first-observation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.kmers.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Add `count` occurrences of `kmer`.
    pub fn insert(&mut self, kmer: &str, count: u32) {
        match self.index.get(kmer) {
            Some(&i) => self.kmers[i].1 += count,
            None => {
                self.index.insert(kmer.to_owned(), self.kmers.len());
                self.kmers.push((kmer.to_owned(), count));
            }
        }
    }

    /// Count every k-mer of one read.
    pub fn add_sequence(&mut self, seq: &str) {
        for kmer in cut_kmers(seq, self.kmer_size) {
            self.insert(kmer, 1);
        }
    }

    /// Sum the counts of another table into this one. New k-mers are appended in the other table's order.
    pub fn merge(&mut self, other: &KmerCounts) {
        assert_eq!(
            self.kmer_size, other.kmer_size,
            "cannot merge k-mer tables of different k"
        );
        for (kmer, count) in other.iter() {
            self.insert(kmer, count);
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .kmers
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
    }

    /// Serialize the table to a bincode file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AssemblyError> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Load a table written by `save`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssemblyError> {
        let reader = BufReader::new(File::open(path)?);
        let mut counts: KmerCounts = bincode::deserialize_from(reader)?;
        counts.rebuild_index();
        Ok(counts)
    }
}

impl PartialEq for KmerCounts {
    fn eq(&self, other: &Self) -> bool {
        self.kmer_size == other.kmer_size && self.kmers == other.kmers
    }
}

/// Build the k-mer table of a set of reads.
pub fn build_kmer_counts<S: AsRef<str>>(reads: &[S], kmer_size: usize) -> KmerCounts {
    let mut counts = KmerCounts::new(kmer_size);
    let mut too_short = 0usize;
    for read in reads {
        let read = read.as_ref();
        if read.len() < kmer_size {
            too_short += 1;
        }
        counts.add_sequence(read);
    }

    if too_short > 0 {
        if too_short == reads.len() {
            warn!("All {} reads are shorter than k={}, no k-mers counted", too_short, kmer_size);
        } else {
            warn!("{} reads shorter than k={} contribute no k-mers", too_short, kmer_size);
        }
    }
    info!(
        "Counted {} k-mers ({} distinct) from {} reads",
        counts.total(),
        counts.len(),
        reads.len()
    );
    counts
}
