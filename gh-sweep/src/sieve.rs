//! Gauss sieve with Klein sampling.
//!
//! An alternative short-vector search: sample lattice points from a discrete
//! Gaussian (Klein's randomized nearest-plane algorithm), then pairwise
//! reduce them against a growing list. Collisions (samples reducing to zero)
//! count toward a cycle budget; an optional early stop triggers once a
//! vector at most `mu * GH` long appears. Norm comparisons use exact integer
//! squared norms.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use lattice_reduction::{float_rows, is_zero_vector, norm, norm_sq, Basis, Gso};

/// Sieve parameters.
#[derive(Debug, Clone)]
pub struct SieveConfig {
    /// Gaussian parameter for the Klein sampler.
    pub sigma: f64,
    /// Early-stop multiplier: terminate once a vector with norm
    /// `<= mu * GH` is found.
    pub mu: f64,
    /// Whether the GH early stop is active.
    pub use_gh_stop: bool,
    /// Collision budget: the sieve ends after this many zero reductions.
    pub max_cycles: usize,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            mu: 1.05,
            use_gh_stop: false,
            max_cycles: 500,
        }
    }
}

/// Outcome of a sieve run.
#[derive(Debug, Clone)]
pub struct SieveResult {
    /// Shortest non-zero vector encountered (all zeros if nothing survived).
    pub shortest: Vec<BigInt>,
    /// Euclidean norm of `shortest`.
    pub norm: f64,
    /// Total loop iterations.
    pub iterations: usize,
    /// Samples that reduced to zero against the list.
    pub collisions: usize,
    /// Size of the reduced list at termination.
    pub list_size: usize,
    /// True when the GH early stop fired.
    pub stopped_early: bool,
}

/// A serviceable default Gaussian parameter: the longest GSO norm scaled by
/// `ln(d)`, the usual smoothing-style choice when the caller gives none.
pub fn default_sigma(gso: &Gso) -> f64 {
    let d = gso.dimension().max(2) as f64;
    let max_bstar = gso
        .norms_sq
        .iter()
        .cloned()
        .fold(0.0f64, f64::max)
        .sqrt();
    (max_bstar * d.ln()).max(1.0)
}

/// Sample an integer from a rounded Gaussian centered at `center`.
fn sample_gaussian_integer<R: Rng + ?Sized>(center: f64, sigma: f64, rng: &mut R) -> BigInt {
    let sampled = match Normal::new(center, sigma) {
        Ok(dist) => dist.sample(rng),
        Err(_) => center,
    };
    BigInt::from_f64(sampled.round()).unwrap_or_else(BigInt::zero)
}

/// Klein's randomized nearest-plane sampler around the origin.
///
/// Walks the basis rows from last to first; at each level draws an integer
/// coefficient from a Gaussian centered on the projection of the running
/// target onto the GSO row, with the per-level parameter `sigma / ||b*_i||`.
/// The result is always an exact lattice point.
pub fn klein_sample<R: Rng + ?Sized>(
    basis: &Basis,
    gso: &Gso,
    sigma: f64,
    rng: &mut R,
) -> Vec<BigInt> {
    let n = basis.len();
    let width = basis.first().map_or(0, |row| row.len());
    let rows = float_rows(basis);

    let mut center = vec![0.0f64; width];
    let mut vector = vec![BigInt::zero(); width];

    for i in (0..n).rev() {
        let bstar_sq = gso.norms_sq[i];
        if bstar_sq < 1e-15 {
            continue;
        }
        let dot: f64 = (0..width).map(|j| center[j] * gso.ortho[i][j]).sum();
        let level_center = dot / bstar_sq;
        let level_sigma = sigma / bstar_sq.sqrt();

        let z = sample_gaussian_integer(level_center, level_sigma, rng);
        if z.is_zero() {
            continue;
        }
        let zf = z.to_f64().unwrap_or(0.0);
        for j in 0..width {
            center[j] -= zf * rows[i][j];
            vector[j] += &z * &basis[i][j];
        }
    }
    vector
}

fn subtract(a: &[BigInt], b: &[BigInt]) -> Vec<BigInt> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Pairwise Gauss reduction of `p` against the list.
///
/// First shrinks `p` by list vectors while both are strictly shorter than
/// the current `p`; then evicts list vectors that the final `p` shortens,
/// pushing their reductions onto the stack for reinsertion.
fn gauss_reduce(
    mut p: Vec<BigInt>,
    list: &mut Vec<Vec<BigInt>>,
    stack: &mut Vec<Vec<BigInt>>,
) -> Vec<BigInt> {
    let mut norm_p = norm_sq(&p);
    let mut updated = true;
    while updated {
        updated = false;
        for i in 0..list.len() {
            let norm_vi = norm_sq(&list[i]);
            let diff = subtract(&p, &list[i]);
            let norm_diff = norm_sq(&diff);
            if norm_vi < norm_p && norm_diff < norm_p {
                p = diff;
                norm_p = norm_diff;
                updated = true;
                break;
            }
        }
    }

    if is_zero_vector(&p) {
        return p;
    }

    let mut i = 0;
    while i < list.len() {
        let norm_vi = norm_sq(&list[i]);
        let diff = subtract(&list[i], &p);
        let norm_diff = norm_sq(&diff);
        if norm_vi > norm_p && norm_diff < norm_vi {
            list.swap_remove(i);
            if !is_zero_vector(&diff) {
                stack.push(diff);
            }
        } else {
            i += 1;
        }
    }

    p
}

/// Run the Gauss sieve over a reduced basis.
///
/// `gh_length` feeds the optional early stop; pass the estimate computed for
/// the run (it is ignored when `use_gh_stop` is off).
pub fn gauss_sieve<R: Rng + ?Sized>(
    basis: &Basis,
    gso: &Gso,
    config: &SieveConfig,
    gh_length: f64,
    rng: &mut R,
) -> SieveResult {
    let width = basis.first().map_or(0, |row| row.len());
    let mut list: Vec<Vec<BigInt>> = Vec::new();
    let mut stack: Vec<Vec<BigInt>> = Vec::new();
    let threshold = if config.use_gh_stop {
        Some(config.mu * gh_length)
    } else {
        None
    };

    log::info!(
        "starting Gauss sieve (sigma={:.6e}, mu={}, max_cycles={}, gh_stop={})",
        config.sigma,
        config.mu,
        config.max_cycles,
        config.use_gh_stop
    );

    let mut k = 0usize;
    let mut iterations = 0usize;
    let mut collisions = 0usize;
    let mut stopped_early = false;
    let mut shortest: Option<(Vec<BigInt>, f64)> = None;

    while k < config.max_cycles {
        iterations += 1;
        let sample = stack
            .pop()
            .unwrap_or_else(|| klein_sample(basis, gso, config.sigma, rng));

        if is_zero_vector(&sample) {
            k += 1;
            log::debug!("zero sample; k={} / {}", k, config.max_cycles);
            continue;
        }

        let reduced = gauss_reduce(sample, &mut list, &mut stack);
        if is_zero_vector(&reduced) {
            k += 1;
            collisions += 1;
            log::debug!(
                "collision (reduced to zero); collisions={}, k={} / {}",
                collisions,
                k,
                config.max_cycles
            );
            continue;
        }

        let norm_v = norm(&reduced);
        log::debug!(
            "iteration {} | norm={:.6} | list={} | stack={}",
            iterations,
            norm_v,
            list.len(),
            stack.len()
        );

        let improved = shortest
            .as_ref()
            .map_or(true, |(_, best)| norm_v < *best);
        if improved {
            shortest = Some((reduced.clone(), norm_v));
        }

        list.push(reduced);

        if let Some(limit) = threshold {
            if norm_v <= limit {
                log::info!("early stop: norm {:.6} <= {} x GH", norm_v, config.mu);
                stopped_early = true;
                break;
            }
        }
    }

    let (shortest, shortest_norm) =
        shortest.unwrap_or_else(|| (vec![BigInt::zero(); width], 0.0));

    SieveResult {
        shortest,
        norm: shortest_norm,
        iterations,
        collisions,
        list_size: list.len(),
        stopped_early,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_reduction::{lll_reduce, LllParams};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn int_basis(rows: &[&[i64]]) -> Basis {
        rows.iter()
            .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
            .collect()
    }

    /// Check that `v` lies in the lattice of an orthogonal (diagonal) basis.
    fn in_diagonal_lattice(v: &[BigInt], diag: &[i64]) -> bool {
        v.iter()
            .zip(diag)
            .all(|(entry, &d)| (entry % BigInt::from(d)).is_zero())
    }

    #[test]
    fn test_klein_samples_are_lattice_points() {
        let basis = int_basis(&[&[3, 0, 0], &[0, 4, 0], &[0, 0, 5]]);
        let gso = Gso::compute(&basis);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let v = klein_sample(&basis, &gso, 10.0, &mut rng);
            assert!(in_diagonal_lattice(&v, &[3, 4, 5]), "sample {:?} off-lattice", v);
        }
    }

    #[test]
    fn test_klein_sample_norms_bounded() {
        let basis = int_basis(&[&[1, 0], &[0, 1]]);
        let gso = Gso::compute(&basis);
        let mut rng = StdRng::seed_from_u64(11);

        // sigma 2, dimension 2: samples beyond norm ~40 would be a gross
        // violation of Gaussian concentration
        for _ in 0..100 {
            let v = klein_sample(&basis, &gso, 2.0, &mut rng);
            assert!(norm(&v) < 40.0);
        }
    }

    #[test]
    fn test_gauss_reduce_shrinks_against_list() {
        let mut list = vec![vec![BigInt::from(1), BigInt::from(0)]];
        let mut stack = Vec::new();
        let p = vec![BigInt::from(5), BigInt::from(1)];
        let reduced = gauss_reduce(p, &mut list, &mut stack);
        assert!(
            norm_sq(&reduced) <= BigInt::from(2),
            "expected reduction near [0, 1], got {:?}",
            reduced
        );
    }

    #[test]
    fn test_gauss_reduce_collision() {
        let mut list = vec![vec![BigInt::from(2), BigInt::from(3)]];
        let mut stack = Vec::new();
        let p = vec![BigInt::from(2), BigInt::from(3)];
        let reduced = gauss_reduce(p, &mut list, &mut stack);
        assert!(is_zero_vector(&reduced), "duplicate must reduce to zero");
    }

    #[test]
    fn test_sieve_finds_short_vector() {
        let mut basis = int_basis(&[&[7, 2, 1], &[3, 8, 2], &[1, 1, 9]]);
        lll_reduce(&mut basis, &LllParams::default());
        let gso = Gso::compute(&basis);
        let shortest_row = basis.iter().map(|r| norm(r)).fold(f64::MAX, f64::min);

        let config = SieveConfig {
            sigma: default_sigma(&gso),
            max_cycles: 50,
            ..SieveConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let result = gauss_sieve(&basis, &gso, &config, 0.0, &mut rng);

        assert!(!is_zero_vector(&result.shortest), "sieve must retain a vector");
        assert!(
            result.norm <= shortest_row + 1e-9,
            "sieve result {} should not exceed the shortest basis row {}",
            result.norm,
            shortest_row
        );
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_sieve_gh_stop() {
        let basis = int_basis(&[&[1, 0], &[0, 1]]);
        let gso = Gso::compute(&basis);
        let gh = crate::gh::gaussian_heuristic(&gso).unwrap();

        let config = SieveConfig {
            sigma: 3.0,
            mu: 4.0,
            use_gh_stop: true,
            max_cycles: 1000,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let result = gauss_sieve(&basis, &gso, &config, gh, &mut rng);

        // mu * GH ~ 1.37 admits the unit vectors, so the stop must fire
        assert!(result.stopped_early);
        assert!(result.norm <= 4.0 * gh + 1e-9);
    }
}
