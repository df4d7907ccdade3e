//! Integer lattice basis reduction and orthogonalization.
//!
//! Implements LLL reduction over exact `BigInt` bases (Gram-Schmidt
//! coefficients in `f64`), a GSO handle exposing the log-determinant of any
//! sub-range of basis vectors, and basis quality metrics. The bounded
//! enumeration of short vectors lives in [`enumerate`].

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

pub mod enumerate;

pub use enumerate::{EnumerationError, Enumerator};

/// A lattice basis: rows are basis vectors with exact integer entries.
///
/// Challenge-style bases carry entries far beyond machine words, so rows are
/// `BigInt`. All rows must have equal length; row count may differ from the
/// column count.
pub type Basis = Vec<Vec<BigInt>>;

/// LLL reduction parameters.
#[derive(Debug, Clone)]
pub struct LllParams {
    /// Lovász condition parameter (typically 0.75).
    pub delta: f64,
}

impl Default for LllParams {
    fn default() -> Self {
        Self { delta: 0.75 }
    }
}

/// Quality metrics for a lattice basis after reduction.
#[derive(Debug, Clone)]
pub struct BasisQuality {
    /// Hermite factor: ||b_1|| / det(L)^(1/n). Equals 1 for a perfect lattice.
    pub hermite_factor: f64,
    /// Orthogonality defect: product(||b_i||) / det(L). Equals 1 for an
    /// orthogonal basis.
    pub orthogonality_defect: f64,
    /// Euclidean norm of the first basis vector.
    pub shortest_vector_norm: f64,
}

/// Convert an integer basis to floating-point rows.
///
/// `BigInt::to_f64` saturates to infinity instead of failing, so entries
/// beyond `f64` range degrade gracefully rather than panic.
pub fn float_rows(basis: &Basis) -> Vec<Vec<f64>> {
    basis
        .iter()
        .map(|row| row.iter().map(|v| v.to_f64().unwrap_or(0.0)).collect())
        .collect()
}

/// Gram-Schmidt orthogonalization of floating-point rows.
///
/// Returns the orthogonalized rows and the `mu` coefficient matrix
/// (`mu[i][j]` = projection of row i onto orthogonal row j, for j < i).
pub fn gram_schmidt(rows: &[Vec<f64>]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let n = rows.len();
    let m = if n > 0 { rows[0].len() } else { 0 };
    let mut ortho = rows.to_vec();
    let mut mu = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..i {
            let dot_ij: f64 = (0..m).map(|k| rows[i][k] * ortho[j][k]).sum();
            let dot_jj: f64 = (0..m).map(|k| ortho[j][k] * ortho[j][k]).sum();
            mu[i][j] = if dot_jj > 1e-10 { dot_ij / dot_jj } else { 0.0 };

            for k in 0..m {
                ortho[i][k] -= mu[i][j] * ortho[j][k];
            }
        }
    }

    (ortho, mu)
}

/// Orthogonalization data for a basis: the GSO rows, their squared norms,
/// and the `mu` coefficients. Computed once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Gso {
    /// Gram-Schmidt orthogonalized rows (floating point).
    pub ortho: Vec<Vec<f64>>,
    /// `mu[i][j]` projection coefficients for j < i.
    pub mu: Vec<Vec<f64>>,
    /// Squared norms ||b*_i||^2 of the orthogonalized rows.
    pub norms_sq: Vec<f64>,
}

impl Gso {
    /// Orthogonalize `basis` and capture the per-row data.
    pub fn compute(basis: &Basis) -> Self {
        let rows = float_rows(basis);
        let (ortho, mu) = gram_schmidt(&rows);
        let norms_sq = ortho
            .iter()
            .map(|row| row.iter().map(|x| x * x).sum::<f64>())
            .collect();
        Gso {
            ortho,
            mu,
            norms_sq,
        }
    }

    /// Number of basis rows covered by this orthogonalization.
    pub fn dimension(&self) -> usize {
        self.norms_sq.len()
    }

    /// Log of the Gram determinant over rows `[start, end)`.
    ///
    /// The Gram determinant of a sub-range is the product of the squared
    /// norms of its orthogonalized rows, so the log is a plain sum. Rows must
    /// be linearly independent (zero GSO norms would make this -inf).
    pub fn log_det(&self, start: usize, end: usize) -> f64 {
        self.norms_sq[start..end].iter().map(|n| n.ln()).sum()
    }
}

/// LLL lattice basis reduction, in place.
///
/// Size reduction and swaps operate on the exact integer rows; the
/// Gram-Schmidt data driving them is recomputed in floating point each
/// round, which is robust enough for the dimensions this crate targets.
pub fn lll_reduce(basis: &mut Basis, params: &LllParams) {
    let n = basis.len();
    if n == 0 {
        return;
    }
    let m = basis[0].len();

    let mut k = 1;
    let mut rounds = 0usize;
    while k < n {
        rounds += 1;
        let (_ortho, mu) = gram_schmidt(&float_rows(basis));

        // Size reduction
        for j in (0..k).rev() {
            if mu[k][j].abs() > 0.5 {
                let r = BigInt::from_f64(mu[k][j].round()).unwrap_or_else(BigInt::zero);
                for l in 0..m {
                    let sub = &r * &basis[j][l];
                    basis[k][l] -= sub;
                }
            }
        }

        // Lovász condition check on the size-reduced rows
        let (ortho, mu) = gram_schmidt(&float_rows(basis));
        let norm_k: f64 = (0..m).map(|l| ortho[k][l].powi(2)).sum();
        let norm_k1: f64 = (0..m).map(|l| ortho[k - 1][l].powi(2)).sum();

        if norm_k >= (params.delta - mu[k][k - 1].powi(2)) * norm_k1 {
            k += 1;
        } else {
            basis.swap(k, k - 1);
            if k > 1 {
                k -= 1;
            }
        }
    }
    log::debug!("LLL finished after {} rounds (n={}, m={})", rounds, n, m);
}

/// Compute quality metrics for a lattice basis.
///
/// - Hermite factor = `||b_1|| / det(L)^(1/n)`
/// - Orthogonality defect = `product(||b_i||) / |det(L)|`
/// - Shortest vector norm = `||b_1||`
///
/// The determinant is taken from the Gram-Schmidt orthogonalization
/// (product of the orthogonal row norms), accumulated in log space.
pub fn basis_quality(basis: &Basis) -> BasisQuality {
    let n = basis.len();
    if n == 0 {
        return BasisQuality {
            hermite_factor: 0.0,
            orthogonality_defect: 0.0,
            shortest_vector_norm: 0.0,
        };
    }

    let rows = float_rows(basis);
    let (ortho, _mu) = gram_schmidt(&rows);

    let norms: Vec<f64> = rows
        .iter()
        .map(|row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();
    let ortho_norms: Vec<f64> = ortho
        .iter()
        .map(|row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();

    let shortest_vector_norm = norms[0];

    let log_det: f64 = ortho_norms.iter().map(|norm| norm.ln()).sum();
    let det_root_n = (log_det / n as f64).exp();

    let hermite_factor = if det_root_n > 1e-15 {
        shortest_vector_norm / det_root_n
    } else {
        f64::INFINITY
    };

    let log_product_norms: f64 = norms.iter().map(|norm| norm.ln()).sum();
    let orthogonality_defect = (log_product_norms - log_det).exp();

    BasisQuality {
        hermite_factor,
        orthogonality_defect,
        shortest_vector_norm,
    }
}

/// Exact squared Euclidean norm of an integer vector.
pub fn norm_sq(vector: &[BigInt]) -> BigInt {
    vector.iter().map(|v| v * v).sum()
}

/// Euclidean norm of an integer vector, as `f64` of the exact square sum.
pub fn norm(vector: &[BigInt]) -> f64 {
    norm_sq(vector).to_f64().unwrap_or(f64::MAX).sqrt()
}

/// True if every entry of the vector is zero.
pub fn is_zero_vector(vector: &[BigInt]) -> bool {
    vector.iter().all(|v| v.is_zero())
}
