//! # Metric Pipeline Driver
//!
//! Runs the external tool chain over every file of every defined variant of a
//! benchmark and accumulates per-variant totals.
//!
//! ## Per-file pipeline
//!
//! 1. **Stage**: copy the source into the scratch space without include lines
//! 2. **Reformat**: canonical layout, so formatting choices do not skew counts
//! 3. **Reduce**: keep only the code selected by the variant's macro flags
//! 4. **Strip comments** and **count lines**
//! 5. **Complexity** (optional): cyclomatic complexity of the reduced file
//!
//! ## Modified lines
//!
//! Once every variant is staged, each non-serial file is diffed against the
//! serial file with the same path, or against the serial file the
//! [`Correspondence`] resolver names. Files with no serial ancestor count in
//! full as introduced lines. The serial variant is never diffed; it reports
//! zero by definition.
//!
//! Everything runs sequentially. Accumulators live for one benchmark only.

use crate::{
    cli::Args,
    correspondence::Correspondence,
    registry::{BenchmarkSpec, Registry, Variant},
    staging::{ScratchSpace, SourceLayout},
    tools::{MetricTools, ToolConfig},
    utils::validate_directory,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Configuration for a metrics run
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Where the benchmark sources are read from
    pub layout: SourceLayout,

    /// Root of the per-variant working copies
    pub scratch_dir: PathBuf,

    /// Leave working copies on disk after each benchmark
    pub keep_files: bool,

    /// Measure cyclomatic complexity (skipped unless reported)
    pub measure_complexity: bool,

    /// Executables for each pipeline stage
    pub tools: ToolConfig,
}

impl DriverConfig {
    /// Build the run configuration from CLI arguments, checking that the
    /// source trees exist.
    pub fn from_args(args: &Args) -> Result<Self> {
        validate_directory(&args.suite_root, "suite root")?;
        if let Some(ref ompss_root) = args.ompss_root {
            validate_directory(ompss_root, "OmpSs root")?;
        }

        Ok(Self {
            layout: SourceLayout {
                suite_root: args.suite_root.clone(),
                ompss_root: args.ompss_root.clone(),
            },
            scratch_dir: args.scratch_dir.clone(),
            keep_files: args.keep_files,
            measure_complexity: args.cyclomatic,
            tools: args.tool_config(),
        })
    }

    /// Report columns: every variant whose sources are available.
    pub fn columns(&self) -> Vec<Variant> {
        Variant::ALL
            .iter()
            .copied()
            .filter(|v| self.layout.provides(*v))
            .collect()
    }
}

/// Metrics of a single reduced file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileMetrics {
    pub lines: u64,
    pub complexity: f64,
}

/// Running totals for one (benchmark, variant) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantMetrics {
    pub lines: u64,
    pub modified: u64,
    pub complexity_total: f64,
    pub files: usize,
}

impl VariantMetrics {
    /// Complexity per file, since variants of one benchmark differ in file count.
    pub fn average_complexity(&self) -> f64 {
        if self.files == 0 {
            0.0
        } else {
            self.complexity_total / self.files as f64
        }
    }
}

/// Finalized totals of one benchmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    pub benchmark: String,
    pub variants: BTreeMap<Variant, VariantMetrics>,
}

/// Drives the tool chain for one or more benchmarks.
pub struct MetricDriver<'a> {
    registry: &'a Registry,
    resolver: &'a dyn Correspondence,
    tools: &'a dyn MetricTools,
    layout: SourceLayout,
    scratch: ScratchSpace,
    measure_complexity: bool,
}

impl<'a> MetricDriver<'a> {
    pub fn new(
        registry: &'a Registry,
        resolver: &'a dyn Correspondence,
        tools: &'a dyn MetricTools,
        config: &DriverConfig,
    ) -> Self {
        Self {
            registry,
            resolver,
            tools,
            layout: config.layout.clone(),
            scratch: ScratchSpace::new(&config.scratch_dir, config.keep_files),
            measure_complexity: config.measure_complexity,
        }
    }

    /// Stage, reduce and measure one file of `variant`.
    pub fn compute_metrics(
        &self,
        benchmark: &str,
        variant: Variant,
        file: &str,
        macro_flags: &str,
    ) -> Result<FileMetrics> {
        let source_dir = self.registry.source_dir(&self.layout, benchmark, variant)?;
        let source_dir = source_dir.ok_or_else(|| {
            anyhow!(
                "No source tree configured for variant '{}' of {}",
                variant,
                benchmark
            )
        })?;

        let staged = self.scratch.stage(&source_dir.join(file), variant, file)?;
        self.tools.reformat(&staged)?;
        self.tools.reduce(&staged, macro_flags)?;
        self.tools.strip_comments(&staged)?;

        let lines = self.tools.count_lines(&staged)?;
        let complexity = if self.measure_complexity {
            self.tools.complexity(&staged)?
        } else {
            0.0
        };

        debug!(
            "{} {} {}: {} lines, complexity {}",
            benchmark, variant, file, lines, complexity
        );
        Ok(FileMetrics { lines, complexity })
    }

    /// Changed or introduced lines of an already staged file of `variant`.
    pub fn compute_modified_lines(&self, benchmark: &str, variant: Variant, file: &str) -> Result<u64> {
        if variant == Variant::Serial {
            return Ok(0);
        }

        let bench = self.registry.get(benchmark)?;
        let staged = self.scratch.staged_path(variant, file);

        let baseline = if bench.serial_files().iter().any(|f| f == file) {
            Some(file.to_string())
        } else {
            let corresponding = self.resolver.resolve(benchmark, variant, file)?;
            if let Some(ref serial_file) = corresponding {
                info!(
                    "Corresponding of: {} {} {}: {}",
                    benchmark, variant, file, serial_file
                );
            }
            corresponding
        };

        match baseline {
            Some(serial_file) => {
                let serial_staged = self.scratch.staged_path(Variant::Serial, &serial_file);
                let diff = self.tools.diff_lines(&serial_staged, &staged)?;
                info!("{} differs with {} lines", file, diff);
                Ok(diff)
            }
            None => {
                let introduced = self.tools.count_lines(&staged)?;
                info!("{} introduces {} lines", file, introduced);
                Ok(introduced)
            }
        }
    }

    /// Measure every available variant of `bench`.
    pub fn run_benchmark(&self, bench: &BenchmarkSpec) -> Result<BenchmarkMetrics> {
        let variants: Vec<Variant> = bench
            .variants()
            .filter(|v| {
                let provided = self.layout.provides(*v);
                if !provided {
                    debug!("Skipping {} {}: no source tree configured", bench.name(), v);
                }
                provided
            })
            .collect();

        info!("Processing benchmark {}", bench.name());
        let result = self.measure(bench, &variants);
        self.scratch.cleanup(&variants)?;
        result
    }

    fn measure(&self, bench: &BenchmarkSpec, variants: &[Variant]) -> Result<BenchmarkMetrics> {
        let name = bench.name();
        let mut totals: BTreeMap<Variant, VariantMetrics> = BTreeMap::new();

        // Stage and measure everything first: modified lines need the
        // reduced serial copies.
        for &variant in variants {
            let spec = bench.spec(variant)?;
            let acc = totals.entry(variant).or_default();
            for file in &spec.files {
                let metrics = self
                    .compute_metrics(name, variant, file, &spec.flags)
                    .with_context(|| format!("Failed to measure {} {} {}", name, variant, file))?;
                acc.lines += metrics.lines;
                acc.complexity_total += metrics.complexity;
                acc.files += 1;
            }
        }

        if !bench.is_defined(Variant::Serial) {
            warn!("{} has no serial variant; every file counts as introduced", name);
        }

        for &variant in variants.iter().filter(|v| **v != Variant::Serial) {
            info!("Modified lines of {} {}", name, variant);
            let spec = bench.spec(variant)?;
            let mut modified = 0;
            for file in &spec.files {
                modified += self
                    .compute_modified_lines(name, variant, file)
                    .with_context(|| format!("Failed to diff {} {} {}", name, variant, file))?;
            }
            totals.entry(variant).or_default().modified = modified;
        }

        Ok(BenchmarkMetrics {
            benchmark: name.to_string(),
            variants: totals,
        })
    }

    /// Measure `benchmarks` one after the other.
    pub fn run_suite(&self, benchmarks: &[&BenchmarkSpec]) -> Result<Vec<BenchmarkMetrics>> {
        benchmarks
            .iter()
            .map(|bench| self.run_benchmark(bench))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_complexity() {
        let metrics = VariantMetrics {
            lines: 100,
            modified: 0,
            complexity_total: 9.0,
            files: 3,
        };
        assert_eq!(metrics.average_complexity(), 3.0);
        assert_eq!(VariantMetrics::default().average_complexity(), 0.0);
    }

    #[test]
    fn test_columns_depend_on_ompss_root() {
        let mut config = DriverConfig {
            layout: SourceLayout {
                suite_root: PathBuf::from("/suite"),
                ompss_root: None,
            },
            scratch_dir: PathBuf::from("/scratch"),
            keep_files: false,
            measure_complexity: false,
            tools: ToolConfig::default(),
        };
        assert!(!config.columns().contains(&Variant::OmpSs));
        assert_eq!(config.columns().len(), 6);

        config.layout.ompss_root = Some(PathBuf::from("/ompss"));
        assert_eq!(config.columns(), Variant::ALL.to_vec());
    }

    #[test]
    fn test_from_args_rejects_missing_suite_root() {
        let args = <Args as clap::Parser>::try_parse_from([
            "p3arsec-metrics",
            "-l",
            "--suite-root",
            "/definitely/not/a/suite",
        ])
        .unwrap();
        assert!(DriverConfig::from_args(&args).is_err());
    }
}
