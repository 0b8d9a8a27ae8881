#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![allow(clippy::module_name_repetitions)]
//! Counting station CLI: config loading, logging setup, and dispatch.

mod cli;
mod error_fmt;
mod export;
mod run;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use tally_config::Config;

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    let _ = color_eyre::install();

    if let Err(err) = real_main(&args) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(error_fmt::exit_code_for_error(&err));
    }
}

fn real_main(args: &Cli) -> eyre::Result<()> {
    let (cfg, cfg_found) = load_config(&args.config)?;
    init_logging(args, &cfg.logging);
    if !cfg_found {
        tracing::warn!(path = %args.config.display(), "config file not found, using defaults");
    }
    cfg.validate().wrap_err("invalid configuration")?;

    match &args.cmd {
        Commands::SelfCheck => self_check(&cfg, args.json),
        Commands::Run {
            crossings,
            partial_every,
            lot,
            seed,
            history,
            rate_hz,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install signal handler")?;

            let opts = run::RunOpts {
                crossings: *crossings,
                partial_every: partial_every.unwrap_or(cfg.capture.partial_every),
                lot: lot.clone().or_else(|| cfg.station.lot.clone()),
                seed: *seed,
                history: history
                    .clone()
                    .or_else(|| cfg.export.history_file.as_ref().map(PathBuf::from)),
                rate_hz: rate_hz.unwrap_or(cfg.detector.rate_hz),
            };
            let lot = opts.lot.clone();
            let snapshot = run::run_session(&cfg, &opts, shutdown)?;
            print_summary(args.json, &snapshot, lot.as_deref());
            Ok(())
        }
    }
}

/// Load the TOML config; a missing file falls back to defaults so the
/// simulated station works out of the box.
fn load_config(path: &Path) -> eyre::Result<(Config, bool)> {
    if !path.exists() {
        return Ok((Config::default(), false));
    }
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config file {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&text)
        .wrap_err_with(|| format!("parse config file {}", path.display()))?;
    Ok((cfg, true))
}

fn init_logging(args: &Cli, logging: &tally_config::Logging) {
    // CLI flag wins when given; otherwise the config's level; RUST_LOG
    // overrides both.
    let level = if args.log_level == "info" {
        logging.level.as_deref().unwrap_or("info")
    } else {
        &args.log_level
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(file) = &logging.file {
        let path = Path::new(file);
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("tally.log"));
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(writer)
            .init();
    } else {
        // Logs go to stderr so --json output on stdout stays parseable.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Exercise both simulators once and report.
fn self_check(cfg: &Config, json: bool) -> eyre::Result<()> {
    use std::time::Duration;
    use tally_core::error::map_scale_error;
    use tally_traits::{CrossingDetector, WeightSource};

    let mut scale = tally_hardware::SimulatedScale::seeded(cfg.weight.min_kg, cfg.weight.max_kg, 0);
    let kg = scale
        .sample(Duration::from_millis(cfg.weight.sample_timeout_ms))
        .map_err(|e| eyre::Report::new(map_scale_error(&*e)))
        .wrap_err("weight source self-check")?;

    let mut detector = tally_hardware::SimulatedDetector::seeded(cfg.detector.out_ratio, 0);
    detector
        .poll(Duration::from_millis(cfg.detector.poll_timeout_ms))
        .map_err(|e| eyre::eyre!("detector self-check failed: {e}"))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "sample_kg": kg })
        );
    } else {
        println!("self-check: OK (sample {kg:.2} kg)");
    }
    Ok(())
}

fn print_summary(json: bool, snapshot: &tally_core::AggregateSnapshot, lot: Option<&str>) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "finalized",
                "lot": lot,
                "partials": snapshot.partial_count,
                "total_count": snapshot.sum_of_captured_counts,
                "total_weight_kg": snapshot.total_weight_kg,
                "average_weight_kg": snapshot.average_weight_kg,
            })
        );
    } else {
        println!("Session finalized.");
        if let Some(lot) = lot {
            println!("  lot:            {lot}");
        }
        println!("  partials:       {}", snapshot.partial_count);
        println!("  total count:    {}", snapshot.sum_of_captured_counts);
        println!("  total weight:   {:.2} kg", snapshot.total_weight_kg);
        println!("  average weight: {:.2} kg", snapshot.average_weight_kg);
    }
}
