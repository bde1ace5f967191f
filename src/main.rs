//! # P3ARSEC Source Metrics - Main Entry Point
//!
//! Computes lines of code, modified lines or average cyclomatic complexity for
//! every variant of the selected benchmarks and prints one tab-separated table
//! on stdout.
//!
//! ## Flow
//!
//! 1. **Parse arguments** and initialize logging (stderr or `--log-file`)
//! 2. **Build the run configuration**, checking that the source trees exist
//! 3. **Probe the external tools** unless `--skip-tool-check` is given
//! 4. **Measure** each selected benchmark in registry order
//! 5. **Print the report**, optionally normalized, and write JSON if requested
//!
//! Any failure aborts the run with a non-zero exit status; a partial table is
//! never printed.

use anyhow::{bail, Context, Result};
use clap::Parser;
use p3arsec_metrics::{
    logging::init_logging, Args, DriverConfig, ExternalTools, MetricDriver, MetricTools,
    Registry, Report, RuleResolver, Variant,
};
use tracing::{debug, info, warn};

fn main() -> Result<()> {
    let args = Args::parse();

    // Held until exit so buffered file output is flushed.
    let _log_guard = init_logging(args.verbose, args.log_file.as_deref())?;

    info!("Starting P3ARSEC source metrics");
    debug!("Configuration: {:?}", args);

    let kind = args.report_kind();
    if args.has_conflicting_reports() {
        warn!("Several report flags given; printing {} only", kind);
    }

    let config = DriverConfig::from_args(&args)?;
    let registry = Registry::parsec()?;
    let normalize = args
        .normalize
        .as_deref()
        .map(Variant::from_selector)
        .transpose()?;

    let tools = ExternalTools::new(config.tools.clone());
    if !args.skip_tool_check {
        tools.check_available()?;
    }

    let benchmarks = registry.select(args.benchmark.as_deref());
    if benchmarks.is_empty() {
        bail!(
            "No benchmark matches '{}'",
            args.benchmark.as_deref().unwrap_or_default()
        );
    }

    let resolver = RuleResolver::new(&registry);
    let driver = MetricDriver::new(&registry, &resolver, &tools, &config);
    let metrics = driver.run_suite(&benchmarks)?;

    let report = Report::build(&registry, &metrics, &config.columns(), kind, normalize)?;
    print!("{}", report);

    if let Some(ref path) = args.output_file {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write report to {:?}", path))?;
    }

    info!("P3ARSEC source metrics completed successfully");
    Ok(())
}
