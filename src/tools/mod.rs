use crate::error::MetricsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod external;

pub use external::ExternalTools;

/// Executables used for each stage of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    pub coan: String,
    pub astyle: String,
    pub cloc: String,
    pub lizard: String,
    pub git: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            coan: "coan".to_string(),
            astyle: "astyle".to_string(),
            cloc: "cloc".to_string(),
            lizard: "lizard".to_string(),
            git: "git".to_string(),
        }
    }
}

/// External collaborators of the metric pipeline, one method per tool.
///
/// Transforming stages rewrite the staged file in place; measuring stages
/// return a scalar and must fail with [`MetricsError::MetricTool`] instead of
/// defaulting to zero when the tool's output is not numeric.
pub trait MetricTools {
    /// Rewrite `path` in a canonical layout.
    fn reformat(&self, path: &Path) -> Result<(), MetricsError>;

    /// Keep only the code that survives the given macro flags, treating
    /// every unlisted macro as false.
    fn reduce(&self, path: &Path, flags: &str) -> Result<(), MetricsError>;

    /// Remove comments from `path`.
    fn strip_comments(&self, path: &Path) -> Result<(), MetricsError>;

    /// Lines of code, comments and blanks excluded.
    fn count_lines(&self, path: &Path) -> Result<u64, MetricsError>;

    /// Aggregate cyclomatic complexity of the file.
    fn complexity(&self, path: &Path) -> Result<f64, MetricsError>;

    /// Changed lines between `baseline` and `variant`, ignoring whitespace
    /// and blank lines.
    fn diff_lines(&self, baseline: &Path, variant: &Path) -> Result<u64, MetricsError>;

    /// Fail early when a tool cannot be run at all.
    fn check_available(&self) -> Result<(), MetricsError> {
        Ok(())
    }
}
