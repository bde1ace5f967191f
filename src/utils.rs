//! # Utility Functions
//!
//! Small helpers shared by the report and the driver: number formatting for
//! report cells and validation of user-supplied directories.
//!
//! ## Usage Examples
//!
//! ```rust
//! use p3arsec_metrics::utils::format_value;
//!
//! assert_eq!(format_value(187.0), "187");
//! assert_eq!(format_value(1.0 / 3.0), "0.333");
//! ```

use anyhow::Result;
use std::path::Path;

/// Format a report value for display
///
/// Whole numbers (line counts, normalized reference cells) print without a
/// fractional part; everything else prints with three decimals.
///
/// ## Examples
/// - `187.0` → `"187"`
/// - `1.5` → `"1.500"`
/// - `2.0 / 3.0` → `"0.667"`
///
/// Non-finite values fall through to the three-decimal branch and print as
/// Rust formats them (`inf`, `NaN`).
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.3}", value)
    }
}

/// Validate that a path names an existing directory
///
/// ## Parameters
/// - `path`: Directory to check
/// - `what`: Human-readable role of the directory, used in the error message
///
/// ## Returns
/// - `Ok(())`: The directory exists
/// - `Err(anyhow::Error)`: The path is missing or is not a directory
///
/// ## Usage Context
///
/// Used to validate:
/// - The benchmark suite root (`--suite-root`)
/// - The OmpSs source root (`--ompss-root`)
pub fn validate_directory(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("The {} {:?} does not exist", what, path);
    }
    if !path.is_dir() {
        anyhow::bail!("The {} {:?} is not a directory", what, path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    /// Test value formatting for integral and fractional cells
    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(187.0), "187");
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(1.5), "1.500");
        assert_eq!(format_value(2.0 / 3.0), "0.667");
        assert_eq!(format_value(-0.25), "-0.250");
    }

    /// Test directory validation for valid and invalid paths
    #[test]
    fn test_validate_directory() {
        let dir = TempDir::new().unwrap();
        assert!(validate_directory(dir.path(), "suite root").is_ok());

        let missing = dir.path().join("missing");
        let err = validate_directory(&missing, "suite root").unwrap_err();
        assert!(err.to_string().contains("suite root"));
        assert!(err.to_string().contains("does not exist"));

        let file = NamedTempFile::new().unwrap();
        let err = validate_directory(file.path(), "OmpSs root").unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }
}
