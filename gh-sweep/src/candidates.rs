//! Reconstruction and ranking of enumeration solutions.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Zero};

use lattice_reduction::enumerate::Solution;
use lattice_reduction::{is_zero_vector, norm, Basis};

/// A reconstructed short-vector candidate.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Integer vector in the ambient coordinate space.
    pub vector: Vec<BigInt>,
    /// True Euclidean norm (square root of the exact sum of squares).
    pub norm: f64,
    /// Squared length as reported by the enumeration oracle.
    pub raw_length: f64,
}

/// Map a coefficient tuple back to an absolute integer vector.
///
/// Coefficients are rounded with `f64::round`, i.e. half away from zero,
/// the convention this crate commits to. Exact zeros are skipped. Only
/// `min(coeffs.len(), basis.len())` positions are consumed, tolerating
/// oracles that return fewer coefficients than basis rows.
pub fn combine_vector(coeffs: &[f64], basis: &Basis) -> Vec<BigInt> {
    let dimension = coeffs.len().min(basis.len());
    let width = basis.first().map_or(0, |row| row.len());
    let mut vector = vec![BigInt::zero(); width];
    for idx in 0..dimension {
        let coef = BigInt::from_f64(coeffs[idx].round()).unwrap_or_else(BigInt::zero);
        if coef.is_zero() {
            continue;
        }
        for (jdx, base_val) in basis[idx].iter().enumerate() {
            vector[jdx] += &coef * base_val;
        }
    }
    vector
}

/// Reconstruct, filter, and rank oracle solutions.
///
/// All-zero vectors are dropped (the oracle may return the trivial
/// solution). The rest are sorted ascending by true norm -- the sort is
/// stable, so ties keep the oracle's emission order -- and truncated to
/// `report_limit`. Returns the total count of non-zero candidates alongside
/// the truncated list; a limit of zero yields an empty list but a correct
/// total.
pub fn rank_candidates(
    solutions: &[Solution],
    basis: &Basis,
    report_limit: usize,
) -> (usize, Vec<Candidate>) {
    let mut candidates: Vec<Candidate> = Vec::new();
    for (raw_length, coeffs) in solutions {
        let vector = combine_vector(coeffs, basis);
        if is_zero_vector(&vector) {
            continue;
        }
        let norm = norm(&vector);
        candidates.push(Candidate {
            vector,
            norm,
            raw_length: *raw_length,
        });
    }
    let total = candidates.len();
    candidates.sort_by(|a, b| a.norm.partial_cmp(&b.norm).unwrap_or(Ordering::Equal));
    candidates.truncate(report_limit);
    (total, candidates)
}
