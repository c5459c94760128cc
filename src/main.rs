// Guarded Facility - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/guarded-facility
// ```
//
// Or a reproducible drill:
//
// ```console
// $ ./target/release/guarded-facility --mode drill --steps 2000 --seed 42 --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use guarded_facility::events::AuditLog;
use guarded_facility::simulation::{run_drill, run_full_handover, LoggingConfig, RunStatistics};
use guarded_facility::types::config::CliArgs;
use guarded_facility::types::{FacilityConfig, OutputFormat, RunMode};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match FacilityConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    if let Err(e) = LoggingConfig::from_flags(args.verbose, args.debug).init() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Guarded Facility");

    let config = match FacilityConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - nothing will be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run(&config) {
        error!("Run failed: {:#}", e);
        eprintln!("Run failed: {:#}", e);
        process::exit(1);
    }

    info!("Guarded Facility completed successfully");
}

/// Execute the configured mode and report its results
fn run(config: &FacilityConfig) -> Result<()> {
    let format = config.get_output_format()?;

    let (log, statistics, seed) = match config.get_run_mode()? {
        RunMode::Handover => {
            let report = run_full_handover(config).context("Handover failed")?;
            eprintln!("Former guards: {}, {}", report.former_guards[0], report.former_guards[1]);
            eprintln!("New guards:    {}, {}", report.new_guards[0], report.new_guards[1]);
            (report.facility.audit_log().clone(), report.statistics, None)
        }
        RunMode::Drill => {
            let report = run_drill(config).context("Drill failed")?;
            eprintln!("Drill seed: {}", report.seed);
            (report.facility.audit_log().clone(), report.statistics, Some(report.seed))
        }
    };

    print_audit_log(&log, &statistics, seed, format)?;

    if let Some(path) = &config.audit_output {
        write_audit_output(&log, path)?;
        eprintln!("Audit log written to: {}", path);
    }

    eprintln!();
    eprintln!("{}", statistics.summary());
    eprintln!("{}", statistics.detailed_breakdown());
    Ok(())
}

/// Print the audit log to stdout in the requested format
fn print_audit_log(
    log: &AuditLog,
    statistics: &RunStatistics,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for entry in log.entries() {
                println!("{:>5}  {}  {}", entry.sequence, entry.recorded_at.to_rfc3339(), entry.message);
            }
        }
        OutputFormat::Json => {
            let document = json!({
                "seed": seed,
                "entries": log.entries(),
                "statistics": statistics,
            });
            let rendered = serde_json::to_string_pretty(&document).context("Failed to render audit log")?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

/// Write the audit log as JSON lines
fn write_audit_output(log: &AuditLog, path: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create audit output file '{}'", path))?;
    let mut writer = BufWriter::new(file);

    let lines = log.to_jsonl().context("Failed to serialize audit log")?;
    writer
        .write_all(lines.as_bytes())
        .with_context(|| format!("Failed to write audit output file '{}'", path))?;
    writer.flush().with_context(|| format!("Failed to flush audit output file '{}'", path))?;

    info!(path, entries = log.len(), "Audit log written");
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &FacilityConfig) {
    eprintln!("Guarded Facility");
    eprintln!("================");
    eprintln!("Dual-approval access control with supervised guard handover");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &FacilityConfig) {
    eprintln!("Configuration:");
    eprintln!("  Mode: {}", config.mode);
    eprintln!("  Capacity: {}", config.capacity);
    match config.founding_guards {
        Some([first, second]) => eprintln!("  Founding Guards: {}, {}", first, second),
        None => eprintln!("  Founding Guards: generated"),
    }
    eprintln!("  Staff Count: {}", config.staff_count);
    eprintln!("  Drill Steps: {}", config.steps);
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    if let Some(path) = &config.audit_output {
        eprintln!("  Audit Output: {}", path);
    }
    eprintln!();
}
