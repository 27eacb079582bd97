//! Corpus regression runner.
//!
//! Run with:
//! `cargo run --release --bin puzzle_regression -- games.txt`
//! `cargo run --release --bin puzzle_regression -- games.txt --walks 64 --seed 7 --no-translate`
//!
//! One game per line. Exits non-zero when any game fails.

use plum_arbiter::utils::puzzle_regression::{run_regression, RegressionOptions};

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or("usage: puzzle_regression <games-file> [--walks N] [--seed N] [--no-translate]")?;
    let corpus = std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
    let games: Vec<&str> = corpus.lines().collect();

    let defaults = RegressionOptions::default();
    let options = RegressionOptions {
        check_translation: !args.iter().any(|a| a == "--no-translate"),
        random_walks: parse_arg(&args, "--walks", defaults.random_walks),
        seed: parse_arg(&args, "--seed", defaults.seed),
    };

    let report = run_regression(&games, &options);
    println!(
        "games: {}, plies: {}, translations: {}, navigations: {}, failed: {}, elapsed_ms: {}",
        report.games,
        report.plies,
        report.translations,
        report.navigations,
        report.failures.len(),
        report.elapsed.as_millis()
    );
    for failure in &report.failures {
        eprintln!("{failure}");
        if let Some(line) = games.get(failure.game) {
            eprintln!("  {line}");
        }
    }

    if report.passed() {
        Ok(())
    } else {
        Err(format!("{} games failed", report.failures.len()))
    }
}
