//! The radius-sweep enumeration driver.
//!
//! Encodes target radii for the bounded enumeration oracle, walks an
//! ordered sequence of GH multipliers, and stops at the first factor that
//! yields a non-trivial short vector.

use lattice_reduction::{Basis, Enumerator};

use crate::candidates::{rank_candidates, Candidate};
use crate::SweepError;

/// A squared search radius in normalized binary form:
/// `mantissa * 2^exponent` with mantissa in `[0.5, 1.0)`, or mantissa
/// exactly `0.0` for a degenerate (zero) radius that is never searched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
    pub mantissa: f64,
    pub exponent: i32,
}

impl Radius {
    /// Decompose a squared target length into mantissa/exponent form.
    pub fn encode(squared_length: f64) -> Self {
        let (mantissa, exponent) = frexp(squared_length);
        Radius { mantissa, exponent }
    }

    /// A degenerate radius encodes a squared length of exactly zero.
    pub fn is_degenerate(&self) -> bool {
        self.mantissa == 0.0
    }

    /// The squared length this radius encodes.
    pub fn squared_length(&self) -> f64 {
        self.mantissa * 2f64.powi(self.exponent)
    }
}

/// Binary floating-point decomposition: `value = mantissa * 2^exponent`
/// with `0.5 <= |mantissa| < 1.0`, or `(0.0, 0)` for zero.
///
/// Reads the exponent field of the IEEE-754 representation directly, so the
/// decomposition is exact; subnormals are pre-scaled into the normal range.
pub fn frexp(value: f64) -> (f64, i32) {
    if value == 0.0 || !value.is_finite() {
        return (value, 0);
    }
    let bits = value.to_bits();
    let raw_exponent = ((bits >> 52) & 0x7ff) as i32;
    if raw_exponent == 0 {
        let (mantissa, exponent) = frexp(value * 2f64.powi(64));
        return (mantissa, exponent - 64);
    }
    let exponent = raw_exponent - 1022;
    let mantissa = f64::from_bits((bits & !(0x7ffu64 << 52)) | (1022u64 << 52));
    (mantissa, exponent)
}

/// Ordered sequence of GH multipliers `[start, start+step, ...]`, inclusive
/// of `stop` within a tolerance of `step * 1e-9`, each value rounded to 9
/// decimal digits for reproducible reporting.
pub fn factor_sequence(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, SweepError> {
    if !(step > 0.0) {
        return Err(SweepError::InvalidRange(format!(
            "step must be positive, got {}",
            step
        )));
    }
    if stop < start {
        return Err(SweepError::InvalidRange(format!(
            "stop factor {} is below start factor {}",
            stop, start
        )));
    }
    let mut factors = Vec::new();
    let mut current = start;
    while current <= stop + step * 1e-9 {
        factors.push(round9(current));
        current += step;
    }
    Ok(factors)
}

fn round9(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

/// Sweep parameters: the factor range and per-factor report limit.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// First GH multiplier to try.
    pub start_factor: f64,
    /// Last GH multiplier to try (inclusive).
    pub max_factor: f64,
    /// Increment between multipliers.
    pub step: f64,
    /// How many candidates to retain per factor.
    pub report_limit: usize,
}

/// Outcome of one factor's search.
#[derive(Debug, Clone)]
pub struct FactorStatus {
    /// The GH multiplier searched.
    pub factor: f64,
    /// Target length `factor * GH`.
    pub target_length: f64,
    /// Total non-zero candidates found (0 means "no short vectors found").
    pub total: usize,
    /// Up to `report_limit` best candidates, ascending by norm.
    pub candidates: Vec<Candidate>,
}

/// Record of a completed sweep: one status per visited factor.
///
/// The sweep stops at the first factor with a hit, so at most the last
/// status carries candidates.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub statuses: Vec<FactorStatus>,
    /// The configured sweep ceiling, for the exhaustion message.
    pub max_factor: f64,
}

impl SweepReport {
    /// The successful factor's status, if the sweep found anything.
    pub fn hit(&self) -> Option<&FactorStatus> {
        self.statuses.last().filter(|status| status.total > 0)
    }
}

/// Search a single factor: encode the radius, consult the oracle, rank.
///
/// A degenerate radius skips the oracle entirely; an enumeration failure is
/// recoverable and counts as zero solutions.
pub fn search_with_factor(
    oracle: &Enumerator,
    basis: &Basis,
    gh_length: f64,
    factor: f64,
    report_limit: usize,
) -> FactorStatus {
    let target_length = factor * gh_length;
    let empty = |target_length| FactorStatus {
        factor,
        target_length,
        total: 0,
        candidates: Vec::new(),
    };

    let radius = Radius::encode(target_length * target_length);
    if radius.is_degenerate() {
        return empty(target_length);
    }

    let solutions = match oracle.enumerate(0, basis.len(), radius.mantissa, radius.exponent) {
        Ok(solutions) => solutions,
        Err(err) => {
            log::debug!("factor {}: {}", factor, err);
            return empty(target_length);
        }
    };

    let (total, candidates) = rank_candidates(&solutions, basis, report_limit);
    FactorStatus {
        factor,
        target_length,
        total,
        candidates,
    }
}

/// Drive the sweep: try each factor in order, stop at the first one that
/// yields a non-zero candidate.
///
/// The two-state machine of the design (SEARCHING -> DONE) is the loop with
/// its early exit; all work is synchronous and CPU-bound.
pub fn run_sweep(
    oracle: &Enumerator,
    basis: &Basis,
    gh_length: f64,
    config: &SweepConfig,
) -> Result<SweepReport, SweepError> {
    let factors = factor_sequence(config.start_factor, config.max_factor, config.step)?;
    let mut statuses = Vec::new();
    for factor in factors {
        log::debug!("searching factor {:.4}", factor);
        let status = search_with_factor(oracle, basis, gh_length, factor, config.report_limit);
        let found = status.total > 0;
        statuses.push(status);
        if found {
            break;
        }
    }
    Ok(SweepReport {
        statuses,
        max_factor: config.max_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_reduction::Gso;
    use num_bigint::BigInt;

    fn int_basis(rows: &[&[i64]]) -> Basis {
        rows.iter()
            .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
            .collect()
    }

    #[test]
    fn test_frexp_round_trip() {
        for &value in &[1.0, 0.75, 2.5, 1e-12, 3.7e100, 123456.789] {
            let (mantissa, exponent) = frexp(value);
            assert!((0.5..1.0).contains(&mantissa), "mantissa {} out of range", mantissa);
            assert_eq!(mantissa * 2f64.powi(exponent), value);
        }
    }

    #[test]
    fn test_frexp_zero_is_degenerate() {
        assert_eq!(frexp(0.0), (0.0, 0));
        let radius = Radius::encode(0.0);
        assert!(radius.is_degenerate());
        assert_eq!(radius.squared_length(), 0.0);
    }

    #[test]
    fn test_frexp_subnormal() {
        let value = f64::MIN_POSITIVE / 8.0;
        let (mantissa, exponent) = frexp(value);
        assert!((0.5..1.0).contains(&mantissa));
        assert_eq!(mantissa * 2f64.powi(exponent), value);
    }

    #[test]
    fn test_radius_encodes_squared_target() {
        let radius = Radius::encode(42.125);
        assert!(!radius.is_degenerate());
        assert_eq!(radius.squared_length(), 42.125);
    }

    #[test]
    fn test_factor_sequence_basic() {
        let factors = factor_sequence(1.0, 1.05, 0.01).unwrap();
        assert_eq!(factors, vec![1.0, 1.01, 1.02, 1.03, 1.04, 1.05]);
    }

    #[test]
    fn test_factor_sequence_includes_stop_despite_drift() {
        // 0.05 is not exactly representable; the tolerance must still land
        // the sequence on the stop value
        let factors = factor_sequence(1.0, 1.3, 0.05).unwrap();
        assert_eq!(*factors.first().unwrap(), 1.0);
        assert_eq!(*factors.last().unwrap(), 1.3);
        assert_eq!(factors.len(), 7);
        for pair in factors.windows(2) {
            assert!(pair[1] > pair[0], "sequence must be strictly increasing");
        }
    }

    #[test]
    fn test_factor_sequence_single_element() {
        let factors = factor_sequence(1.05, 1.05, 0.01).unwrap();
        assert_eq!(factors, vec![1.05]);
    }

    #[test]
    fn test_factor_sequence_rejects_bad_ranges() {
        assert!(matches!(
            factor_sequence(1.2, 1.0, 0.01),
            Err(SweepError::InvalidRange(_))
        ));
        assert!(matches!(
            factor_sequence(1.0, 1.2, 0.0),
            Err(SweepError::InvalidRange(_))
        ));
        assert!(matches!(
            factor_sequence(1.0, 1.2, -0.5),
            Err(SweepError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_sweep_first_success_wins() {
        // Z^2: shortest vector has norm 1, GH = sqrt(2 / (2*pi*e)) ~ 0.342,
        // so factor 3.0 already admits the unit vectors
        let basis = int_basis(&[&[1, 0], &[0, 1]]);
        let gso = Gso::compute(&basis);
        let oracle = Enumerator::new(&gso);
        let gh = crate::gh::gaussian_heuristic(&gso).unwrap();

        let config = SweepConfig {
            start_factor: 3.0,
            max_factor: 5.0,
            step: 0.5,
            report_limit: 2,
        };
        let report = run_sweep(&oracle, &basis, gh, &config).unwrap();
        assert_eq!(report.statuses.len(), 1, "sweep must stop at the first hit");
        let hit = report.hit().unwrap();
        assert_eq!(hit.factor, 3.0);
        assert!(hit.total >= 4, "Z^2 has at least four unit vectors in range");
        assert_eq!(hit.candidates.len(), 2);
        assert!((hit.candidates[0].norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_failure_then_success() {
        // 5*Z^2: shortest non-zero vector has norm 5; small factors fail
        // (enumeration reports infeasible) and the sweep keeps going
        let basis = int_basis(&[&[5, 0], &[0, 5]]);
        let gso = Gso::compute(&basis);
        let oracle = Enumerator::new(&gso);
        let gh = crate::gh::gaussian_heuristic(&gso).unwrap();

        let config = SweepConfig {
            start_factor: 1.0,
            max_factor: 4.0,
            step: 1.0,
            report_limit: 1,
        };
        let report = run_sweep(&oracle, &basis, gh, &config).unwrap();
        let hit = report.hit().expect("a later factor must reach norm 5");
        assert!(report.statuses.len() > 1, "early factors must report misses");
        for miss in &report.statuses[..report.statuses.len() - 1] {
            assert_eq!(miss.total, 0);
        }
        assert!((hit.candidates[0].norm - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_exhaustion() {
        let basis = int_basis(&[&[7, 0], &[0, 7]]);
        let gso = Gso::compute(&basis);
        let oracle = Enumerator::new(&gso);
        let gh = crate::gh::gaussian_heuristic(&gso).unwrap();

        // GH ~ 2.4; factors up to 1.5 cap the radius below the shortest norm 7
        let config = SweepConfig {
            start_factor: 1.0,
            max_factor: 1.5,
            step: 0.25,
            report_limit: 2,
        };
        let report = run_sweep(&oracle, &basis, gh, &config).unwrap();
        assert!(report.hit().is_none());
        assert_eq!(report.statuses.len(), 3);
        assert_eq!(report.max_factor, 1.5);
    }

    #[test]
    fn test_degenerate_radius_skips_oracle() {
        let basis = int_basis(&[&[1, 0], &[0, 1]]);
        let gso = Gso::compute(&basis);
        let oracle = Enumerator::new(&gso);
        let status = search_with_factor(&oracle, &basis, 0.0, 0.0, 2);
        assert_eq!(status.total, 0);
        assert!(status.candidates.is_empty());
    }
}
