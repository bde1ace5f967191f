//! [`MetricTools`] implementation that runs the real command-line programs:
//! `astyle`, `coan`, `cloc`, `lizard` and `git diff`.
//!
//! Programs are spawned directly (no shell), their stdout is parsed here, and
//! anything that is not the expected number becomes a
//! [`MetricsError::MetricTool`].

use super::{MetricTools, ToolConfig};
use crate::error::MetricsError;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

const CLOC_LANG: &str = "--force-lang=C++,hxx";

pub struct ExternalTools {
    config: ToolConfig,
}

impl ExternalTools {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    fn run<I, S>(
        &self,
        tool: &'static str,
        program: &str,
        args: I,
        path: &Path,
    ) -> Result<Output, MetricsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("Running {:?}", cmd);

        cmd.output().map_err(|e| MetricsError::ToolFailed {
            tool,
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn ensure_status(
    tool: &'static str,
    path: &Path,
    output: &Output,
    accepted: &[i32],
) -> Result<(), MetricsError> {
    match output.status.code() {
        Some(code) if accepted.contains(&code) => Ok(()),
        code => Err(MetricsError::ToolFailed {
            tool,
            path: path.to_path_buf(),
            reason: format!(
                "exit status {:?}: {}",
                code,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }),
    }
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn last_line(output: &str) -> Option<&str> {
    output.lines().rev().find(|line| !line.trim().is_empty())
}

/// Code-line count from `cloc --csv` output: fifth field of the last row.
pub fn parse_cloc_code(output: &str) -> Option<u64> {
    last_line(output)?
        .split(',')
        .nth(4)
        .and_then(|field| field.trim().parse().ok())
}

/// Average CCN from `lizard` output: third column of the totals row.
pub fn parse_lizard_ccn(output: &str) -> Option<f64> {
    last_line(output)?
        .split_whitespace()
        .nth(2)
        .and_then(|field| field.parse().ok())
}

/// Changed lines from `git diff --numstat`: the inserted lines, or the
/// deleted lines when nothing was inserted. No output means no change.
pub fn parse_numstat_changed(output: &str) -> Option<u64> {
    let mut added = 0;
    let mut deleted = 0;
    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        let mut fields = line.split('\t');
        added += fields.next()?.trim().parse::<u64>().ok()?;
        deleted += fields.next()?.trim().parse::<u64>().ok()?;
    }
    Some(if added > 0 { added } else { deleted })
}

/// Drop the `# ` directive echo lines `coan` leaves behind.
pub fn drop_directive_echo(output: &str) -> String {
    let mut reduced = String::with_capacity(output.len());
    for line in output.lines().filter(|line| !line.starts_with("# ")) {
        reduced.push_str(line);
        reduced.push('\n');
    }
    reduced
}

impl MetricTools for ExternalTools {
    fn reformat(&self, path: &Path) -> Result<(), MetricsError> {
        let output = self.run(
            "astyle",
            &self.config.astyle,
            [
                OsStr::new("--style=banner"),
                OsStr::new("--suffix=none"),
                OsStr::new("--quiet"),
                path.as_os_str(),
            ],
            path,
        )?;
        ensure_status("astyle", path, &output, &[0])
    }

    fn reduce(&self, path: &Path, flags: &str) -> Result<(), MetricsError> {
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("source"),
            OsStr::new("--implicit"),
            OsStr::new("-ge"),
            OsStr::new("-gs"),
        ];
        args.extend(flags.split_whitespace().map(OsStr::new));
        args.push(path.as_os_str());

        let output = self.run("coan", &self.config.coan, args, path)?;
        let stdout = stdout_of(&output);
        // coan folds diagnostics severity into its exit status; only a
        // failure with nothing on stdout is fatal.
        if !output.status.success() && stdout.trim().is_empty() {
            ensure_status("coan", path, &output, &[0])?;
        }

        fs::write(path, drop_directive_echo(&stdout)).map_err(|e| MetricsError::ToolFailed {
            tool: "coan",
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn strip_comments(&self, path: &Path) -> Result<(), MetricsError> {
        let output = self.run(
            "cloc",
            &self.config.cloc,
            [
                OsStr::new("--strip-comments=sc"),
                OsStr::new("--original-dir"),
                OsStr::new(CLOC_LANG),
                OsStr::new("--quiet"),
                path.as_os_str(),
            ],
            path,
        )?;
        ensure_status("cloc", path, &output, &[0])?;

        let mut stripped = path.as_os_str().to_owned();
        stripped.push(".sc");
        let stripped = PathBuf::from(stripped);
        fs::rename(&stripped, path).map_err(|e| MetricsError::ToolFailed {
            tool: "cloc",
            path: stripped.clone(),
            reason: e.to_string(),
        })
    }

    fn count_lines(&self, path: &Path) -> Result<u64, MetricsError> {
        let output = self.run(
            "cloc",
            &self.config.cloc,
            [
                OsStr::new("--csv"),
                OsStr::new(CLOC_LANG),
                OsStr::new("--quiet"),
                path.as_os_str(),
            ],
            path,
        )?;
        ensure_status("cloc", path, &output, &[0])?;

        let stdout = stdout_of(&output);
        parse_cloc_code(&stdout).ok_or_else(|| MetricsError::MetricTool {
            tool: "cloc",
            path: path.to_path_buf(),
            output: stdout,
        })
    }

    fn complexity(&self, path: &Path) -> Result<f64, MetricsError> {
        let output = self.run(
            "lizard",
            &self.config.lizard,
            [OsStr::new("-l"), OsStr::new("cpp"), path.as_os_str()],
            path,
        )?;

        let stdout = stdout_of(&output);
        parse_lizard_ccn(&stdout).ok_or_else(|| MetricsError::MetricTool {
            tool: "lizard",
            path: path.to_path_buf(),
            output: stdout,
        })
    }

    fn diff_lines(&self, baseline: &Path, variant: &Path) -> Result<u64, MetricsError> {
        let output = self.run(
            "git",
            &self.config.git,
            [
                OsStr::new("diff"),
                OsStr::new("--no-index"),
                OsStr::new("--minimal"),
                OsStr::new("--ignore-all-space"),
                OsStr::new("--ignore-blank-lines"),
                OsStr::new("--numstat"),
                baseline.as_os_str(),
                variant.as_os_str(),
            ],
            variant,
        )?;
        // --no-index exits with 1 when the files differ.
        ensure_status("git diff", variant, &output, &[0, 1])?;

        let stdout = stdout_of(&output);
        parse_numstat_changed(&stdout).ok_or_else(|| MetricsError::MetricTool {
            tool: "git diff",
            path: variant.to_path_buf(),
            output: stdout,
        })
    }

    fn check_available(&self) -> Result<(), MetricsError> {
        let probes: [(&'static str, &str); 5] = [
            ("coan", &self.config.coan),
            ("astyle", &self.config.astyle),
            ("cloc", &self.config.cloc),
            ("lizard", &self.config.lizard),
            ("git", &self.config.git),
        ];

        for (tool, program) in probes {
            let status = Command::new(program)
                .arg("--version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if status.is_err() {
                return Err(MetricsError::ToolUnavailable {
                    tool,
                    program: program.to_string(),
                });
            }
            debug!("Found {} as '{}'", tool, program);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOC_OUTPUT: &str = "files,language,blank,comment,code,\"github.com/AlDanial/cloc v 1.90\"\n\
                               1,C++,12,0,187\n";

    const LIZARD_OUTPUT: &str = "\
================================================
  NLOC    CCN   token  PARAM  length  location
------------------------------------------------
      12      3     80      2      14 CNDF@10-23@blackscholes.c
      40      7    310      9      52 BlkSchlsEqEuroNoDiv@25-76@blackscholes.c
1 file analyzed.
==============================================================
NLOC    Avg.NLOC  AvgCCN  Avg.token  function_cnt    file
--------------------------------------------------------------
     60      26.0     5.0      195.0         2     blackscholes.c

===============================================================================================================
No thresholds exceeded (cyclomatic_complexity > 15 or length > 1000 or nloc > 1000000 or parameter_count > 100)
==========================================================================================
Total nloc   Avg.NLOC  AvgCCN  Avg.token   Fun Cnt  Warning cnt   Fun Rt   nloc Rt
------------------------------------------------------------------------------------------
        60      26.0     5.0      195.0        2            0      0.00    0.00
";

    #[test]
    fn test_parse_cloc_code() {
        assert_eq!(parse_cloc_code(CLOC_OUTPUT), Some(187));
        assert_eq!(parse_cloc_code(""), None);
        assert_eq!(parse_cloc_code("files,language,blank,comment,code"), None);
    }

    #[test]
    fn test_parse_lizard_ccn() {
        assert_eq!(parse_lizard_ccn(LIZARD_OUTPUT), Some(5.0));
        assert_eq!(parse_lizard_ccn("lizard: command not found\n"), None);
        assert_eq!(parse_lizard_ccn(""), None);
    }

    #[test]
    fn test_parse_numstat_changed() {
        assert_eq!(parse_numstat_changed("14\t3\t/tmp/a.c => /tmp/b.c\n"), Some(14));
        assert_eq!(parse_numstat_changed(""), Some(0));
        assert_eq!(parse_numstat_changed("-\t-\tbinary\n"), None);
        assert_eq!(parse_numstat_changed("12\n"), None);
    }

    #[test]
    fn test_deletion_only_diff_counts_deleted_lines() {
        assert_eq!(
            parse_numstat_changed("0\t7\t/tmp/serial/src/a.c => /tmp/ff/src/a.c\n"),
            Some(7)
        );
        assert_eq!(parse_numstat_changed("0\t0\ta.c\n"), Some(0));
    }

    #[test]
    fn test_drop_directive_echo() {
        let reduced = drop_directive_echo("# 1 \"x.c\"\nint x;\n#define Y 1\n# 3\nint y;\n");
        assert_eq!(reduced, "int x;\n#define Y 1\nint y;\n");
    }

    #[test]
    fn test_missing_program_is_reported() {
        let tools = ExternalTools::new(ToolConfig {
            cloc: "definitely-not-a-real-cloc-binary".to_string(),
            ..ToolConfig::default()
        });
        let err = tools.count_lines(Path::new("/nonexistent.c")).unwrap_err();
        assert!(matches!(err, MetricsError::ToolFailed { tool: "cloc", .. }));
    }
}
