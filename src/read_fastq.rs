/// FASTQ read source
/// every record is four lines: header, sequence, separator, qualities; only the sequence is kept

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::AssemblyError;

const LINES_PER_RECORD: usize = 4;

/// Read all sequences from a FASTQ file.
pub fn read_fastq<P: AsRef<Path>>(path: P) -> Result<Vec<String>, AssemblyError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    parse_fastq(reader, path)
}

/// Parse FASTQ records from any buffered reader; `origin` is only used in error messages.
pub fn parse_fastq<R: BufRead>(reader: R, origin: &Path) -> Result<Vec<String>, AssemblyError> {
    let mut reads = Vec::new();
    let mut line_count = 0usize;

    for line in reader.lines() {
        let line = line?;
        line_count += 1;

        // second line of the record
        if line_count % LINES_PER_RECORD == 2 {
            let seq = line.strip_suffix('\r').unwrap_or(&line);
            if !seq.is_ascii() {
                return Err(AssemblyError::Format {
                    path: origin.to_path_buf(),
                    line: line_count,
                    message: "sequence line contains non-ASCII characters".to_string(),
                });
            }
            reads.push(seq.to_string());
        }
    }

    if line_count % LINES_PER_RECORD != 0 {
        return Err(AssemblyError::Format {
            path: origin.to_path_buf(),
            line: line_count,
            message: format!(
                "truncated record: {} lines is not a multiple of {}",
                line_count, LINES_PER_RECORD
            ),
        });
    }

    Ok(reads)
}
