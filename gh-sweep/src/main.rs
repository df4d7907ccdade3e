//! GH-targeted short vector search CLI.
//!
//! Reduces a basis file, estimates the Gaussian Heuristic length, then
//! sweeps enumeration radii (multiples of GH) until short vectors appear.
//!
//! Usage:
//!   gh-sweep [basis-file] [--factor=1.05] [--max-factor=F] [--step=0.01] [--show=2]
//!            [--save-reduced=PATH] [--json=PATH]
//!   gh-sweep [basis-file] --mode=sieve [--sigma=S] [--mu=1.05] [--max-cycles=500] [--seed=N]
//!
//! Options:
//!   --factor=F        starting multiple of GH to enumerate (default: 1.05)
//!   --max-factor=F    maximum multiple to try (defaults to --factor)
//!   --step=S          step size between factors when searching (default: 0.01)
//!   --show=N          how many solution vectors to print per factor (default: 2)
//!   --save-reduced=P  write the LLL-reduced basis to P in the input format
//!   --json=P          write a machine-readable sweep report to P
//!   --mode=sweep|sieve  search strategy (default: sweep)
//!   --sigma=S         Klein sampler Gaussian parameter (default: derived from GSO)
//!   --mu=M            sieve early-stop multiplier of GH (default: 1.05)
//!   --max-cycles=N    sieve collision budget (default: 500)
//!   --seed=N          seed the sieve RNG for reproducible runs

use std::str::FromStr;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use gh_sweep::sieve::{default_sigma, gauss_sieve, SieveConfig};
use gh_sweep::sweep::{run_sweep, SweepConfig};
use gh_sweep::{format_vector, gaussian_heuristic, parse_basis, write_basis, SweepError};
use lattice_reduction::{basis_quality, is_zero_vector, lll_reduce, Basis, Enumerator, Gso, LllParams};

const DEFAULT_INPUT: &str = "input/sample8.txt";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Sweep,
    Sieve,
}

/// CLI configuration parsed from command-line arguments.
struct CliConfig {
    input: String,
    factor: f64,
    max_factor: f64,
    step: f64,
    show: usize,
    mode: Mode,
    save_reduced: Option<String>,
    json: Option<String>,
    sigma: Option<f64>,
    mu: f64,
    max_cycles: usize,
    seed: Option<u64>,
}

#[derive(Serialize)]
struct CandidateReport {
    rank: usize,
    norm: f64,
    ratio_to_gh: f64,
    raw_length: f64,
    vector: String,
}

#[derive(Serialize)]
struct FactorReport {
    factor: f64,
    target_length: f64,
    total: usize,
    candidates: Vec<CandidateReport>,
}

#[derive(Serialize)]
struct RunReport {
    input: String,
    dimension: usize,
    gh_estimate: f64,
    hermite_factor: f64,
    orthogonality_defect: f64,
    factors: Vec<FactorReport>,
    found: bool,
}

fn usage() -> ! {
    eprintln!("Usage: gh-sweep [basis-file] [--factor=F] [--max-factor=F] [--step=S] [--show=N]");
    eprintln!("                [--save-reduced=PATH] [--json=PATH]");
    eprintln!("       gh-sweep [basis-file] --mode=sieve [--sigma=S] [--mu=M] [--max-cycles=N] [--seed=N]");
    std::process::exit(1);
}

fn require_value(key: &str, value: Option<String>) -> String {
    value.unwrap_or_else(|| {
        eprintln!("--{} requires a value", key);
        usage();
    })
}

fn parse_flag<T: FromStr>(key: &str, value: Option<String>) -> T {
    let raw = require_value(key, value);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid value for --{}: {}", key, raw);
        std::process::exit(1);
    })
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut input: Option<String> = None;
    let mut factor = 1.05f64;
    let mut max_factor: Option<f64> = None;
    let mut step = 0.01f64;
    let mut show = 2usize;
    let mut mode = Mode::Sweep;
    let mut save_reduced: Option<String> = None;
    let mut json: Option<String> = None;
    let mut sigma: Option<f64> = None;
    let mut mu = 1.05f64;
    let mut max_cycles = 500usize;
    let mut seed: Option<u64> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if let Some(rest) = arg.strip_prefix("--") {
            let (key, value) = match rest.split_once('=') {
                Some((k, v)) => (k.to_string(), Some(v.to_string())),
                None => {
                    // bare `--key value` form
                    let value = if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                        i += 1;
                        Some(args[i].clone())
                    } else {
                        None
                    };
                    (rest.to_string(), value)
                }
            };
            match key.as_str() {
                "factor" => factor = parse_flag(&key, value),
                "max-factor" => max_factor = Some(parse_flag(&key, value)),
                "step" => step = parse_flag(&key, value),
                "show" => show = parse_flag(&key, value),
                "mode" => {
                    mode = match require_value(&key, value).as_str() {
                        "sweep" => Mode::Sweep,
                        "sieve" => Mode::Sieve,
                        other => {
                            eprintln!("Unknown mode: {}. Use --mode=sweep|sieve", other);
                            std::process::exit(1);
                        }
                    }
                }
                "save-reduced" => save_reduced = Some(require_value(&key, value)),
                "json" => json = Some(require_value(&key, value)),
                "sigma" => sigma = Some(parse_flag(&key, value)),
                "mu" => mu = parse_flag(&key, value),
                "max-cycles" => max_cycles = parse_flag(&key, value),
                "seed" => seed = Some(parse_flag(&key, value)),
                _ => {
                    eprintln!("Unknown option: --{}", key);
                    usage();
                }
            }
        } else if input.is_none() {
            input = Some(arg.clone());
        } else {
            eprintln!("Unexpected argument: {}", arg);
            usage();
        }
        i += 1;
    }

    CliConfig {
        input: input.unwrap_or_else(|| DEFAULT_INPUT.to_string()),
        factor,
        max_factor: max_factor.unwrap_or(factor),
        step,
        show,
        mode,
        save_reduced,
        json,
        sigma,
        mu,
        max_cycles,
        seed,
    }
}

/// Format with `digits` significant digits, printf `%g` style.
fn format_sig(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits as i32 {
        format!("{:.*e}", digits.saturating_sub(1), value)
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        let rendered = format!("{:.*}", decimals, value);
        if rendered.contains('.') {
            rendered
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        } else {
            rendered
        }
    }
}

fn main() {
    env_logger::init();

    let config = parse_args();
    if let Err(err) = run(&config) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &CliConfig) -> Result<(), SweepError> {
    // Validate the factor range before any reduction work
    if cli.max_factor < cli.factor {
        return Err(SweepError::InvalidRange(
            "--max-factor must be >= --factor".to_string(),
        ));
    }
    if cli.step <= 0.0 {
        return Err(SweepError::InvalidRange(
            "--step must be positive".to_string(),
        ));
    }
    if cli.mode == Mode::Sieve {
        if cli.sigma.is_some_and(|s| s <= 0.0) {
            return Err(SweepError::InvalidRange(
                "--sigma must be positive".to_string(),
            ));
        }
        if cli.mu <= 0.0 {
            return Err(SweepError::InvalidRange("--mu must be positive".to_string()));
        }
        if cli.max_cycles == 0 {
            return Err(SweepError::InvalidRange(
                "--max-cycles must be positive".to_string(),
            ));
        }
    }

    let mut basis = parse_basis(&cli.input)?;

    let started = Instant::now();
    lll_reduce(&mut basis, &LllParams::default());
    log::info!(
        "LLL reduction took {:.1} ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    let gso = Gso::compute(&basis);
    let gh_length = gaussian_heuristic(&gso)?;
    let quality = basis_quality(&basis);

    println!("input: {}", cli.input);
    println!("dimension: {}", basis.len());
    println!("GH estimate: {}", format_sig(gh_length, 6));
    println!(
        "reduced basis: hermite={:.4}, orthogonality defect={:.4}, first row norm={:.4}",
        quality.hermite_factor, quality.orthogonality_defect, quality.shortest_vector_norm
    );

    if let Some(path) = &cli.save_reduced {
        write_basis(path, &basis)?;
        println!("reduced basis written to {}", path);
    }

    match cli.mode {
        Mode::Sweep => run_sweep_mode(cli, &basis, &gso, gh_length, &quality),
        Mode::Sieve => run_sieve_mode(cli, &basis, &gso, gh_length),
    }
}

fn run_sweep_mode(
    cli: &CliConfig,
    basis: &Basis,
    gso: &Gso,
    gh_length: f64,
    quality: &lattice_reduction::BasisQuality,
) -> Result<(), SweepError> {
    let oracle = Enumerator::new(gso);
    let config = SweepConfig {
        start_factor: cli.factor,
        max_factor: cli.max_factor,
        step: cli.step,
        report_limit: cli.show,
    };
    let report = run_sweep(&oracle, basis, gh_length, &config)?;

    let mut factor_reports = Vec::new();
    for status in &report.statuses {
        if status.total == 0 {
            println!("factor {:.4}: no short vectors found", status.factor);
            factor_reports.push(FactorReport {
                factor: status.factor,
                target_length: status.target_length,
                total: 0,
                candidates: Vec::new(),
            });
            continue;
        }
        println!(
            "factor {:.4} (~{} target length) => {} solution(s)",
            status.factor,
            format_sig(status.target_length, 6),
            status.total
        );
        let mut candidate_reports = Vec::new();
        for (idx, candidate) in status.candidates.iter().enumerate() {
            let ratio = candidate.norm / gh_length;
            println!(
                "  solution {}: norm={} (~{:.4}xGH, raw length={})",
                idx + 1,
                format_sig(candidate.norm, 6),
                ratio,
                candidate.raw_length
            );
            println!("    vector: {}", format_vector(&candidate.vector));
            candidate_reports.push(CandidateReport {
                rank: idx + 1,
                norm: candidate.norm,
                ratio_to_gh: ratio,
                raw_length: candidate.raw_length,
                vector: format_vector(&candidate.vector),
            });
        }
        factor_reports.push(FactorReport {
            factor: status.factor,
            target_length: status.target_length,
            total: status.total,
            candidates: candidate_reports,
        });
    }
    if report.hit().is_none() {
        println!("no vectors found up to factor {:.3}", report.max_factor);
    }

    if let Some(path) = &cli.json {
        let run_report = RunReport {
            input: cli.input.clone(),
            dimension: basis.len(),
            gh_estimate: gh_length,
            hermite_factor: quality.hermite_factor,
            orthogonality_defect: quality.orthogonality_defect,
            factors: factor_reports,
            found: report.hit().is_some(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&run_report).unwrap())?;
        println!("report written to {}", path);
    }
    Ok(())
}

fn run_sieve_mode(
    cli: &CliConfig,
    basis: &Basis,
    gso: &Gso,
    gh_length: f64,
) -> Result<(), SweepError> {
    let sigma = cli.sigma.unwrap_or_else(|| default_sigma(gso));
    let config = SieveConfig {
        sigma,
        mu: cli.mu,
        use_gh_stop: true,
        max_cycles: cli.max_cycles,
    };
    let mut rng: StdRng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = gauss_sieve(basis, gso, &config, gh_length, &mut rng);

    if is_zero_vector(&result.shortest) {
        println!(
            "sieve found no non-zero vectors ({} iterations, {} collisions)",
            result.iterations, result.collisions
        );
        return Ok(());
    }

    let ratio = result.norm / gh_length;
    println!(
        "sieve result: norm={} (~{:.4}xGH{})",
        format_sig(result.norm, 6),
        ratio,
        if result.stopped_early { ", early stop" } else { "" }
    );
    println!("  vector: {}", format_vector(&result.shortest));
    println!(
        "iterations={}, collisions={}, list size={}",
        result.iterations, result.collisions, result.list_size
    );
    Ok(())
}
