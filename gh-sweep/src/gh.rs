//! Gaussian Heuristic length estimation.

use std::f64::consts::{E, PI};

use lattice_reduction::Gso;

use crate::SweepError;

/// Expected shortest-vector length for a random lattice with the volume and
/// dimension captured by `gso`.
///
/// `GH = exp(logVolume / d) * sqrt(d / (2*pi*e))` where `logVolume` is half
/// the log Gram determinant over rows `[0, d)`. A zero-dimensional basis has
/// no GH and is rejected.
pub fn gaussian_heuristic(gso: &Gso) -> Result<f64, SweepError> {
    let dimension = gso.dimension();
    if dimension == 0 {
        return Err(SweepError::InvalidDimension);
    }
    let log_det = gso.log_det(0, dimension);
    let log_volume = log_det / 2.0;
    let d = dimension as f64;
    Ok((log_volume / d).exp() * (d / (2.0 * PI * E)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_reduction::Basis;
    use num_bigint::BigInt;

    fn scaled_identity(dimension: usize, scale: i64) -> Basis {
        (0..dimension)
            .map(|i| {
                (0..dimension)
                    .map(|j| BigInt::from(if i == j { scale } else { 0 }))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_gh_unit_lattice() {
        // Z^d has volume 1, so GH reduces to sqrt(d / (2*pi*e))
        let basis = scaled_identity(4, 1);
        let gso = Gso::compute(&basis);
        let gh = gaussian_heuristic(&gso).unwrap();
        let expected = (4.0f64 / (2.0 * PI * E)).sqrt();
        assert!((gh - expected).abs() < 1e-12);
    }

    #[test]
    fn test_gh_scales_with_volume() {
        // Scaling the basis by c scales the volume by c^d and GH by c
        let gso_1 = Gso::compute(&scaled_identity(3, 1));
        let gso_5 = Gso::compute(&scaled_identity(3, 5));
        let gh_1 = gaussian_heuristic(&gso_1).unwrap();
        let gh_5 = gaussian_heuristic(&gso_5).unwrap();
        assert!((gh_5 / gh_1 - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_gh_empty_basis_rejected() {
        let gso = Gso::compute(&Vec::new());
        assert!(matches!(
            gaussian_heuristic(&gso),
            Err(SweepError::InvalidDimension)
        ));
    }
}
