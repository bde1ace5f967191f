use crate::report::ReportKind;
use crate::tools::ToolConfig;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// P3ARSEC source metrics - lines of code, modified lines and cyclomatic
/// complexity of every parallel variant, relative to the serial baseline
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
#[clap(group(
    ArgGroup::new("report")
        .required(true)
        .multiple(true)
        .args(["locs", "modified", "cyclomatic"])
))]
pub struct Args {
    /// Print the number of lines of code
    #[clap(short = 'l', long, help_heading = "Report")]
    pub locs: bool,

    /// Print the number of modified lines with respect to the serial version
    #[clap(short = 'm', long, help_heading = "Report")]
    pub modified: bool,

    /// Print the average cyclomatic complexity per file
    #[clap(short = 'c', long, help_heading = "Report")]
    pub cyclomatic: bool,

    /// Only compute metrics for benchmarks whose name contains this string
    #[clap(short = 'b', long)]
    pub benchmark: Option<String>,

    /// Normalize every row with respect to this variant (e.g. pthreads, ff)
    #[clap(short = 'n', long)]
    pub normalize: Option<String>,

    /// Do not remove the working copies (debugging aid)
    #[clap(short = 'k', long, default_value_t = false)]
    pub keep_files: bool,

    /// Print per-file diagnostics while processing
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// Root of the benchmark suite (contains pkgs/apps and pkgs/kernels)
    #[clap(long, default_value = crate::defaults::SUITE_ROOT, help_heading = "Sources")]
    pub suite_root: PathBuf,

    /// Root of the OmpSs benchmark tree; the OmpSs column is omitted without it
    #[clap(long, help_heading = "Sources")]
    pub ompss_root: Option<PathBuf>,

    /// Directory for working copies
    #[clap(long, default_value = crate::defaults::SCRATCH_DIR, help_heading = "Sources")]
    pub scratch_dir: PathBuf,

    /// Also write the report as JSON to this file
    #[clap(short = 'o', long, help_heading = "Output")]
    pub output_file: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[clap(long, help_heading = "Output")]
    pub log_file: Option<PathBuf>,

    /// coan executable (macro-conditional reduction)
    #[clap(long, default_value = "coan", help_heading = "Tools")]
    pub coan: String,

    /// astyle executable (reformatting)
    #[clap(long, default_value = "astyle", help_heading = "Tools")]
    pub astyle: String,

    /// cloc executable (comment stripping and line counting)
    #[clap(long, default_value = "cloc", help_heading = "Tools")]
    pub cloc: String,

    /// lizard executable (cyclomatic complexity)
    #[clap(long, default_value = "lizard", help_heading = "Tools")]
    pub lizard: String,

    /// git executable (diff sizes)
    #[clap(long, default_value = "git", help_heading = "Tools")]
    pub git: String,

    /// Skip probing the external tools before starting
    #[clap(long, default_value_t = false, help_heading = "Tools")]
    pub skip_tool_check: bool,
}

impl Args {
    /// Report to print. With several report flags the first of locs,
    /// modified, cyclomatic wins.
    pub fn report_kind(&self) -> ReportKind {
        if self.locs {
            ReportKind::Locs
        } else if self.modified {
            ReportKind::Modified
        } else {
            ReportKind::Cyclomatic
        }
    }

    /// Whether more than one report flag was given.
    pub fn has_conflicting_reports(&self) -> bool {
        [self.locs, self.modified, self.cyclomatic]
            .iter()
            .filter(|flag| **flag)
            .count()
            > 1
    }

    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            coan: self.coan.clone(),
            astyle: self.astyle.clone(),
            cloc: self.cloc.clone(),
            lizard: self.lizard.clone(),
            git: self.git.clone(),
        }
    }
}
