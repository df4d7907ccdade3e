//! Basis file parsing and writing.
//!
//! One basis row per line, bracketed as `[v0 v1 ... vn-1]` with
//! whitespace-separated integers. Blank lines are skipped; parsing stops at
//! the first non-bracketed, non-blank line. All rows must have equal length.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use num_bigint::BigInt;

use lattice_reduction::Basis;

use crate::SweepError;

/// Parse a basis file into integer rows.
///
/// Fails with [`SweepError::EmptyBasis`] when no rows are found and with
/// [`SweepError::RowLengthMismatch`] (naming the offending row) when the
/// rows are not rectangular.
pub fn parse_basis(path: impl AsRef<Path>) -> Result<Basis, SweepError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut rows: Basis = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        if !stripped.starts_with('[') {
            break;
        }
        let content = stripped.trim_start_matches('[').trim_end_matches(']');
        if content.trim().is_empty() {
            break;
        }
        let row_index = rows.len();
        let row = content
            .split_whitespace()
            .map(|token| {
                token.parse::<BigInt>().map_err(|_| SweepError::InvalidEntry {
                    row: row_index,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<BigInt>, SweepError>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SweepError::EmptyBasis(path.to_path_buf()));
    }
    let expected = rows[0].len();
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != expected {
            return Err(SweepError::RowLengthMismatch {
                row: idx,
                expected,
                found: row.len(),
            });
        }
    }
    Ok(rows)
}

/// Write a basis in the bracketed row format, one row per line.
pub fn write_basis(path: impl AsRef<Path>, basis: &Basis) -> Result<(), SweepError> {
    let mut out = File::create(path)?;
    for row in basis {
        writeln!(out, "{}", format_vector(row))?;
    }
    Ok(())
}

/// Render an integer vector as `[v0 v1 ... vn-1]`.
pub fn format_vector(vector: &[BigInt]) -> String {
    let entries: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
    format!("[{}]", entries.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_simple_basis() {
        let file = write_temp("[1 2 3]\n[4 5 6]\n");
        let basis = parse_basis(file.path()).unwrap();
        assert_eq!(basis.len(), 2);
        assert_eq!(basis[0], vec![BigInt::from(1), BigInt::from(2), BigInt::from(3)]);
        assert_eq!(basis[1][2], BigInt::from(6));
    }

    #[test]
    fn test_parse_skips_blank_lines_and_stops_at_trailer() {
        let file = write_temp("\n[1 0]\n\n[0 1]\nnotes follow here\n[9 9]\n");
        let basis = parse_basis(file.path()).unwrap();
        assert_eq!(basis.len(), 2, "parsing must stop at the first non-bracketed line");
    }

    #[test]
    fn test_parse_negative_and_large_entries() {
        let file = write_temp("[-3 123456789012345678901234567890]\n[7 -1]\n");
        let basis = parse_basis(file.path()).unwrap();
        assert_eq!(basis[0][0], BigInt::from(-3));
        assert_eq!(
            basis[0][1],
            "123456789012345678901234567890".parse::<BigInt>().unwrap()
        );
    }

    #[test]
    fn test_empty_file_fails() {
        let file = write_temp("");
        let err = parse_basis(file.path()).unwrap_err();
        assert!(matches!(err, SweepError::EmptyBasis(_)));

        let blank = write_temp("\n   \n");
        assert!(matches!(
            parse_basis(blank.path()),
            Err(SweepError::EmptyBasis(_))
        ));
    }

    #[test]
    fn test_row_length_mismatch_names_row() {
        let file = write_temp("[1 2 3]\n[4 5]\n");
        let err = parse_basis(file.path()).unwrap_err();
        match err {
            SweepError::RowLengthMismatch {
                row,
                expected,
                found,
            } => {
                assert_eq!(row, 1);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected RowLengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_entry_fails() {
        let file = write_temp("[1 two 3]\n");
        assert!(matches!(
            parse_basis(file.path()),
            Err(SweepError::InvalidEntry { row: 0, .. })
        ));
    }

    #[test]
    fn test_write_then_parse_round_trip() {
        let basis: Basis = vec![
            vec![BigInt::from(1), BigInt::from(-2)],
            vec![BigInt::from(30), BigInt::from(4)],
        ];
        let file = NamedTempFile::new().unwrap();
        write_basis(file.path(), &basis).unwrap();
        let parsed = parse_basis(file.path()).unwrap();
        assert_eq!(parsed, basis);
    }

    #[test]
    fn test_format_vector() {
        let v = vec![BigInt::from(1), BigInt::from(-2), BigInt::from(3)];
        assert_eq!(format_vector(&v), "[1 -2 3]");
    }
}
