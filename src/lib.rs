//! # P3ARSEC Source Metrics Library
//!
//! Measures how much programming effort each parallel variant of the P3ARSEC
//! benchmarks takes, relative to the serial baseline of the same benchmark.
//!
//! ## Metrics
//!
//! - **Lines of code**: code lines left after macro-conditional reduction,
//!   reformatting and comment stripping
//! - **Modified lines**: lines changed or introduced with respect to the
//!   serial source
//! - **Cyclomatic complexity**: average per file
//!
//! ## Supported Variants
//!
//! Serial, Pthreads, FastFlow, OpenMP, TBB, OmpSs and SkePU. Not every
//! benchmark defines every variant; undefined cells are reported as `N.A.`.
//!
//! ## Architecture Overview
//!
//! - `registry`: which variants each benchmark defines, their macro flags and
//!   source files
//! - `correspondence`: which serial file a renamed parallel file descends from
//! - `tools`: the external tool chain behind a trait
//! - `staging`: source locations and scratch working copies
//! - `driver`: the per-file pipeline and per-variant accumulation
//! - `report`: tab-separated and JSON reports, with optional normalization
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use p3arsec_metrics::{
//!     Args, DriverConfig, ExternalTools, MetricDriver, Registry, Report, ReportKind,
//!     RuleResolver,
//! };
//! use clap::Parser;
//!
//! fn main() -> anyhow::Result<()> {
//!     let args = Args::parse_from(["p3arsec-metrics", "-l", "-b", "blackscholes"]);
//!     let config = DriverConfig::from_args(&args)?;
//!     let registry = Registry::parsec()?;
//!     let tools = ExternalTools::new(config.tools.clone());
//!     let resolver = RuleResolver::new(&registry);
//!     let driver = MetricDriver::new(&registry, &resolver, &tools, &config);
//!
//!     let metrics = driver.run_suite(&registry.select(Some("blackscholes")))?;
//!     let report = Report::build(&registry, &metrics, &config.columns(), ReportKind::Locs, None)?;
//!     print!("{}", report);
//!     Ok(())
//! }
//! ```

/// Command-line interface
///
/// Report selection, benchmark filtering, normalization, source locations
/// and tool executables.
pub mod cli;

/// Mapping from renamed parallel files back to their serial originals
pub mod correspondence;

/// Per-file metric pipeline and per-benchmark orchestration
pub mod driver;

/// Error types shared across the crate
pub mod error;

/// Diagnostic output setup
pub mod logging;

/// Benchmark and variant catalog
pub mod registry;

/// Report assembly, normalization and output
pub mod report;

/// Source locations and scratch working copies
pub mod staging;

/// External metric tools
pub mod tools;

/// Formatting and validation helpers
pub mod utils;

pub use cli::Args;
pub use correspondence::{Correspondence, Rule, RuleResolver};
pub use driver::{BenchmarkMetrics, DriverConfig, MetricDriver, VariantMetrics};
pub use error::MetricsError;
pub use registry::{BenchmarkSpec, Category, Registry, Variant};
pub use report::{Report, ReportKind};
pub use tools::{ExternalTools, MetricTools, ToolConfig};

/// The current version of the metrics tool
///
/// Populated from Cargo.toml and recorded in the JSON report metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default root of the benchmark suite
    pub const SUITE_ROOT: &str = "/tmp/p3arsec/";

    /// Default directory for working copies
    ///
    /// Per-variant subdirectories are created and removed under it for every
    /// benchmark, so it should not be shared with anything else.
    pub const SCRATCH_DIR: &str = "/tmp/p3arsec-metrics";
}
