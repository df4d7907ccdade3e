//! Search an integer lattice basis for vectors near the Gaussian Heuristic.
//!
//! Given a basis file, the driver LLL-reduces the basis, estimates the GH
//! length for the lattice, then sweeps enumeration radii expressed as
//! multiples of GH until short vectors turn up, reporting the best
//! candidates. A Gauss sieve with Klein sampling is available as an
//! alternative search mode.

use std::path::PathBuf;

pub mod basis;
pub mod candidates;
pub mod gh;
pub mod sieve;
pub mod sweep;

pub use basis::{format_vector, parse_basis, write_basis};
pub use candidates::{combine_vector, rank_candidates, Candidate};
pub use gh::gaussian_heuristic;
pub use sieve::{gauss_sieve, klein_sample, SieveConfig, SieveResult};
pub use sweep::{factor_sequence, run_sweep, FactorStatus, Radius, SweepConfig, SweepReport};

/// Fatal errors of a search run. Enumeration failures are deliberately
/// absent: they are recoverable per factor and never abort the sweep
/// (see [`lattice_reduction::EnumerationError`]).
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("no basis rows found in {0}")]
    EmptyBasis(PathBuf),

    #[error("row {row} has {found} entries but row 0 has {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has a malformed integer entry '{token}'")]
    InvalidEntry { row: usize, token: String },

    #[error("invalid factor range: {0}")]
    InvalidRange(String),

    #[error("Gaussian heuristic is undefined for an empty basis")]
    InvalidDimension,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
