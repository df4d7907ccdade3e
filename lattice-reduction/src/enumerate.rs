//! Bounded enumeration of short lattice vectors.
//!
//! Fincke-Pohst search over basis coefficients, pruned with Gram-Schmidt
//! projections. The radius bound arrives as a normalized (mantissa, exponent)
//! pair encoding the squared target length; solutions come back as
//! coefficient vectors with their squared lengths, leaving the caller to
//! reconstruct ambient vectors.

use crate::Gso;

/// Default cap on the number of solutions collected per call.
pub const DEFAULT_MAX_SOLUTIONS: usize = 1000;

/// Recoverable enumeration failures. A failed call means "nothing found for
/// this bound", never a corrupted state; callers may retry with a larger
/// radius.
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    #[error("invalid enumeration range [{first}, {last}) for dimension {dimension}")]
    InvalidRange {
        first: usize,
        last: usize,
        dimension: usize,
    },

    #[error("no lattice vector within squared radius {radius_sq:.6e}")]
    Infeasible { radius_sq: f64 },
}

/// A solution: the squared length of the lattice vector and its coefficients
/// with respect to the basis rows of the enumerated range.
pub type Solution = (f64, Vec<f64>);

/// Bounded enumeration oracle over the GSO data of a reduced basis.
///
/// Holds only read-only projection data; one instance serves any number of
/// `enumerate` calls with varying radii.
pub struct Enumerator {
    mu: Vec<Vec<f64>>,
    norms_sq: Vec<f64>,
    max_solutions: usize,
}

impl Enumerator {
    /// Build an oracle from orthogonalization data, with the default
    /// solution cap.
    pub fn new(gso: &Gso) -> Self {
        Self::with_max_solutions(gso, DEFAULT_MAX_SOLUTIONS)
    }

    /// Build an oracle with an explicit cap on solutions per call.
    pub fn with_max_solutions(gso: &Gso, max_solutions: usize) -> Self {
        Enumerator {
            mu: gso.mu.clone(),
            norms_sq: gso.norms_sq.clone(),
            max_solutions,
        }
    }

    /// Enumerate all lattice vectors of the sub-basis `[first, last)` whose
    /// squared length is at most `mantissa * 2^exponent`.
    ///
    /// The trivial origin may appear among the solutions; callers filter it.
    /// Returns `Err(Infeasible)` when no non-trivial vector lies within the
    /// bound. The solution list is capped at the configured maximum.
    pub fn enumerate(
        &self,
        first: usize,
        last: usize,
        mantissa: f64,
        exponent: i32,
    ) -> Result<Vec<Solution>, EnumerationError> {
        let dimension = self.norms_sq.len();
        if first >= last || last > dimension {
            return Err(EnumerationError::InvalidRange {
                first,
                last,
                dimension,
            });
        }

        let radius_sq = mantissa * 2f64.powi(exponent);
        let width = last - first;

        let mut coords = vec![0i64; width];
        // partial_sq[rel] = squared norm contributed by levels rel..width
        let mut partial_sq = vec![0.0f64; width + 1];
        let mut results: Vec<Solution> = Vec::new();

        self.descend(
            width - 1,
            first,
            radius_sq,
            &mut coords,
            &mut partial_sq,
            &mut results,
        );

        log::debug!(
            "enumerate [{}, {}) radius_sq={:.6e}: {} solution(s)",
            first,
            last,
            radius_sq,
            results.len()
        );

        if results
            .iter()
            .all(|(_, coeffs)| coeffs.iter().all(|&c| c == 0.0))
        {
            return Err(EnumerationError::Infeasible { radius_sq });
        }
        Ok(results)
    }

    /// Depth-first search at relative level `rel` (absolute row `first + rel`).
    ///
    /// Computes the admissible interval for the coefficient at this level from
    /// the remaining squared-radius budget, then walks it zig-zag from the
    /// interval center so short vectors surface before the cap bites.
    fn descend(
        &self,
        rel: usize,
        first: usize,
        radius_sq: f64,
        coords: &mut Vec<i64>,
        partial_sq: &mut Vec<f64>,
        results: &mut Vec<Solution>,
    ) {
        if results.len() >= self.max_solutions {
            return;
        }

        let width = coords.len();
        let idx = first + rel;

        // Projection center from the already-fixed higher levels
        let mut center = 0.0;
        for j in (rel + 1)..width {
            center -= self.mu[first + j][idx] * (coords[j] as f64);
        }

        let remaining_sq = radius_sq - partial_sq[rel + 1];
        if remaining_sq < 0.0 {
            return;
        }

        let bstar_sq = self.norms_sq[idx];
        if bstar_sq < 1e-15 {
            // Degenerate level, fix the coefficient at zero and move on
            coords[rel] = 0;
            partial_sq[rel] = partial_sq[rel + 1];
            self.emit_or_descend(rel, first, radius_sq, coords, partial_sq, results);
            return;
        }

        let half_width = (remaining_sq / bstar_sq).sqrt();
        let lo = (center - half_width).ceil() as i64;
        let hi = (center + half_width).floor() as i64;
        let pivot = center.round() as i64;
        let max_delta = (hi - lo + 1).max(0);

        for delta in 0..=max_delta {
            if results.len() >= self.max_solutions {
                return;
            }
            let tries = if delta == 0 { 1 } else { 2 };
            for sign in 0..tries {
                let ci = if sign == 0 { pivot + delta } else { pivot - delta };
                if ci < lo || ci > hi {
                    continue;
                }

                coords[rel] = ci;
                let diff = ci as f64 - center;
                partial_sq[rel] = partial_sq[rel + 1] + diff * diff * bstar_sq;
                if partial_sq[rel] > radius_sq {
                    continue;
                }

                self.emit_or_descend(rel, first, radius_sq, coords, partial_sq, results);
            }
        }
    }

    fn emit_or_descend(
        &self,
        rel: usize,
        first: usize,
        radius_sq: f64,
        coords: &mut Vec<i64>,
        partial_sq: &mut Vec<f64>,
        results: &mut Vec<Solution>,
    ) {
        if rel == 0 {
            if results.len() < self.max_solutions {
                let coeffs = coords.iter().map(|&c| c as f64).collect();
                results.push((partial_sq[0], coeffs));
            }
        } else {
            self.descend(rel - 1, first, radius_sq, coords, partial_sq, results);
        }
    }
}
