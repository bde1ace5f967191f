//! Error kinds surfaced by the metrics pipeline.
//!
//! Leaf operations (registry lookups, correspondence resolution, tool output
//! parsing) return [`MetricsError`] so callers and tests can match on the exact
//! failure. Orchestration code wraps these in `anyhow::Error` with context.

use crate::registry::Variant;
use std::path::PathBuf;
use thiserror::Error;

/// Typed failures of the registry, the resolver and the external tool layer.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Lookup of a (benchmark, variant) pair that has no entry.
    #[error("variant '{variant}' is not defined for benchmark '{benchmark}'")]
    UndefinedVariant { benchmark: String, variant: Variant },

    /// A benchmark name the registry has never heard of.
    #[error("unknown benchmark '{0}'")]
    UnknownBenchmark(String),

    /// An external tool ran but its output could not be read as a number.
    #[error("{tool} produced no usable numeric output for {}: {output:?}", path.display())]
    MetricTool {
        tool: &'static str,
        path: PathBuf,
        output: String,
    },

    /// An external tool could not be started or exited with a failure status.
    #[error("{tool} failed on {}: {reason}", path.display())]
    ToolFailed {
        tool: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// Pre-flight probe could not run the given program.
    #[error("required tool '{tool}' is not available (tried '{program}')")]
    ToolUnavailable { tool: &'static str, program: String },

    /// A registry under construction violates one of its invariants.
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    /// A variant selector matched no variant, or more than one.
    #[error("'{selector}' does not select exactly one variant (matches: {matches:?})")]
    UnknownVariant {
        selector: String,
        matches: Vec<Variant>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = MetricsError::UndefinedVariant {
            benchmark: "canneal".to_string(),
            variant: Variant::Tbb,
        };
        assert_eq!(
            err.to_string(),
            "variant 'tbb' is not defined for benchmark 'canneal'"
        );

        let err = MetricsError::MetricTool {
            tool: "cloc",
            path: PathBuf::from("/tmp/x.c"),
            output: String::new(),
        };
        assert!(err.to_string().starts_with("cloc produced no usable numeric output"));
    }
}
