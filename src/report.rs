use crate::{
    driver::BenchmarkMetrics,
    error::MetricsError,
    registry::{BenchmarkSpec, Registry, Variant},
    utils::format_value,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Printed for variants a benchmark does not have.
pub const NOT_APPLICABLE: &str = "N.A.";

/// Metric shown in the report table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Lines of code
    Locs,
    /// Lines changed or introduced with respect to serial
    Modified,
    /// Average cyclomatic complexity per file
    Cyclomatic,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Locs => write!(f, "Lines of Code"),
            ReportKind::Modified => write!(f, "Modified Lines"),
            ReportKind::Cyclomatic => write!(f, "Cyclomatic Complexity"),
        }
    }
}

/// One table cell; a zero value and an undefined variant stay distinct.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    NotApplicable,
    Value(f64),
}

impl Cell {
    pub fn value(self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::NotApplicable => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::NotApplicable => write!(f, "{}", NOT_APPLICABLE),
            Cell::Value(v) => write!(f, "{}", format_value(*v)),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ReportRow {
    pub benchmark: String,
    /// Variant actually used as reference for this row, if normalized
    pub reference: Option<Variant>,
    pub cells: Vec<Cell>,
}

/// Benchmarks x variants table for one metric
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub normalized_against: Option<Variant>,
    pub columns: Vec<Variant>,
    pub rows: Vec<ReportRow>,
}

/// Raw value of `variant` for the selected metric, `None` if not measured.
fn raw_value(metrics: &BenchmarkMetrics, variant: Variant, kind: ReportKind) -> Option<f64> {
    if kind == ReportKind::Modified && variant == Variant::Serial {
        return Some(0.0);
    }
    let totals = metrics.variants.get(&variant)?;
    Some(match kind {
        ReportKind::Locs => totals.lines as f64,
        ReportKind::Modified => totals.modified as f64,
        ReportKind::Cyclomatic => totals.average_complexity(),
    })
}

impl Report {
    /// Arrange `metrics` into rows (registry order is the caller's order) and
    /// optionally divide each row by its reference variant.
    pub fn build(
        registry: &Registry,
        metrics: &[BenchmarkMetrics],
        columns: &[Variant],
        kind: ReportKind,
        normalize: Option<Variant>,
    ) -> Result<Self, MetricsError> {
        let mut rows = Vec::with_capacity(metrics.len());

        for bench_metrics in metrics {
            let bench = registry.get(&bench_metrics.benchmark)?;
            let mut cells: Vec<Cell> = columns
                .iter()
                .map(|&variant| {
                    if !bench.is_defined(variant) {
                        return Cell::NotApplicable;
                    }
                    raw_value(bench_metrics, variant, kind)
                        .map_or(Cell::NotApplicable, Cell::Value)
                })
                .collect();

            let reference = normalize.and_then(|requested| {
                normalize_row(bench, bench_metrics, columns, &mut cells, kind, requested)
            });

            rows.push(ReportRow {
                benchmark: bench_metrics.benchmark.clone(),
                reference,
                cells,
            });
        }

        Ok(Self {
            kind,
            normalized_against: normalize,
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Write the report as pretty-printed JSON with run metadata.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let document = ReportDocument {
            metadata: ReportMetadata {
                version: crate::VERSION.to_string(),
                timestamp: chrono::Utc::now(),
                kind: self.kind,
                normalized_against: self.normalized_against,
            },
            report: self,
        };

        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write JSON report to {:?}", path))?;

        info!("Report written to: {:?}", path);
        Ok(())
    }
}

/// Divide the row by its reference value. Returns the reference used, or
/// `None` (row left raw) when the benchmark has no usable reference.
fn normalize_row(
    bench: &BenchmarkSpec,
    metrics: &BenchmarkMetrics,
    columns: &[Variant],
    cells: &mut [Cell],
    kind: ReportKind,
    requested: Variant,
) -> Option<Variant> {
    let name = bench.name();
    let Some(reference) = bench.reference_for(requested) else {
        warn!(
            "{} has no '{}' variant to normalize against; row left as measured",
            name, requested
        );
        return None;
    };
    if reference != requested {
        info!("{}: normalizing against {} instead of {}", name, reference, requested);
    }

    let Some(denominator) = raw_value(metrics, reference, kind) else {
        warn!(
            "{} {} was not measured; row left as measured",
            name, reference
        );
        return None;
    };
    if denominator == 0.0 {
        warn!("{} {} is zero; {} row left as measured", name, reference, kind);
        if let Some(cell) = columns.iter().position(|v| *v == reference) {
            cells[cell] = Cell::Value(1.0);
        }
        return None;
    }

    for (variant, cell) in columns.iter().zip(cells.iter_mut()) {
        if let Cell::Value(v) = *cell {
            *cell = if *variant == reference {
                Cell::Value(1.0)
            } else {
                Cell::Value(v / denominator)
            };
        }
    }
    Some(reference)
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    metadata: ReportMetadata,
    report: &'a Report,
}

#[derive(Serialize)]
struct ReportMetadata {
    version: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    kind: ReportKind,
    normalized_against: Option<Variant>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#Bench\t")?;
        for variant in &self.columns {
            write!(f, "{}\t", variant)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "\"{}\"\t", row.benchmark)?;
            for cell in &row.cells {
                write!(f, "{}\t", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build the report and render it as tab-separated text.
pub fn format_report(
    registry: &Registry,
    metrics: &[BenchmarkMetrics],
    columns: &[Variant],
    kind: ReportKind,
    normalize: Option<Variant>,
) -> Result<String, MetricsError> {
    Ok(Report::build(registry, metrics, columns, kind, normalize)?.to_string())
}
