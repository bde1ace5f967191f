#![allow(dead_code)]

use p3arsec_metrics::{
    staging::SourceLayout, BenchmarkSpec, Category, Correspondence, DriverConfig, MetricTools,
    MetricsError, Registry, Rule, RuleResolver, ToolConfig, Variant,
};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn io_error(tool: &'static str, path: &Path, e: std::io::Error) -> MetricsError {
    MetricsError::ToolFailed {
        tool,
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn code_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// In-process stand-in for the external tool chain.
///
/// Lines written as `@FLAG code` survive reduction only when `-DFLAG` is among
/// the macro flags. Complexity is one plus the number of `if (` lines. The
/// diff counts variant lines with no matching baseline line, or the baseline
/// lines left unmatched when there are none.
#[derive(Default)]
pub struct FakeTools {
    pub complexity_calls: Cell<usize>,
    pub diff_calls: Cell<usize>,
    /// Line counting of this file yields non-numeric output.
    pub unusable_count_for: Option<&'static str>,
}

impl MetricTools for FakeTools {
    fn reformat(&self, _path: &Path) -> Result<(), MetricsError> {
        Ok(())
    }

    fn reduce(&self, path: &Path, flags: &str) -> Result<(), MetricsError> {
        let text = fs::read_to_string(path).map_err(|e| io_error("coan", path, e))?;
        let mut reduced = String::new();
        for line in text.lines() {
            let kept = match line.strip_prefix('@') {
                Some(guarded) => {
                    let (flag, code) = guarded.split_once(char::is_whitespace).unwrap_or((guarded, ""));
                    let define = format!("-D{}", flag);
                    flags.split_whitespace().any(|f| f == define).then_some(code)
                }
                None => Some(line),
            };
            if let Some(code) = kept {
                reduced.push_str(code);
                reduced.push('\n');
            }
        }
        fs::write(path, reduced).map_err(|e| io_error("coan", path, e))
    }

    fn strip_comments(&self, _path: &Path) -> Result<(), MetricsError> {
        Ok(())
    }

    fn count_lines(&self, path: &Path) -> Result<u64, MetricsError> {
        if self.unusable_count_for.map_or(false, |name| path.ends_with(name)) {
            return Err(MetricsError::MetricTool {
                tool: "cloc",
                path: path.to_path_buf(),
                output: "Nothing to count.\n".to_string(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| io_error("cloc", path, e))?;
        Ok(code_lines(&text).len() as u64)
    }

    fn complexity(&self, path: &Path) -> Result<f64, MetricsError> {
        self.complexity_calls.set(self.complexity_calls.get() + 1);
        let text = fs::read_to_string(path).map_err(|e| io_error("lizard", path, e))?;
        Ok(1.0 + text.lines().filter(|line| line.contains("if (")).count() as f64)
    }

    fn diff_lines(&self, baseline: &Path, variant: &Path) -> Result<u64, MetricsError> {
        self.diff_calls.set(self.diff_calls.get() + 1);
        let old = fs::read_to_string(baseline).map_err(|e| io_error("git diff", baseline, e))?;
        let new = fs::read_to_string(variant).map_err(|e| io_error("git diff", variant, e))?;

        let mut remaining = code_lines(&old);
        let mut added = 0;
        for line in code_lines(&new) {
            match remaining.iter().position(|old_line| *old_line == line) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => added += 1,
            }
        }
        Ok(if added > 0 { added } else { remaining.len() as u64 })
    }
}

/// Rule-based resolver that remembers every question it was asked.
pub struct RecordingResolver<'a> {
    inner: RuleResolver<'a>,
    pub calls: RefCell<Vec<(Variant, String)>>,
}

impl<'a> RecordingResolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            inner: RuleResolver::new(registry),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Correspondence for RecordingResolver<'_> {
    fn resolve(
        &self,
        benchmark: &str,
        variant: Variant,
        file: &str,
    ) -> Result<Option<String>, MetricsError> {
        self.calls.borrow_mut().push((variant, file.to_string()));
        self.inner.resolve(benchmark, variant, file)
    }
}

/// Two small benchmarks: `alpha` (serial, pthreads, skepu) and `beta`
/// (serial, openmp).
pub fn test_registry() -> Registry {
    Registry::builder()
        .benchmark(
            BenchmarkSpec::new("alpha", Category::Application)
                .variant(Variant::Serial, "", ["main.c", "util.h"])
                .variant(
                    Variant::Pthreads,
                    "-DENABLE_THREADS",
                    ["main.c", "util.h", "threads.c"],
                )
                .variant(Variant::SkePU, "", ["main_skepu.cpp", "foo_skel.cpp"])
                .rule(Rule::substitute(Some(Variant::SkePU), "_skepu.cpp", ".c")),
        )
        .benchmark(
            BenchmarkSpec::new("beta", Category::Kernel)
                .variant(Variant::Serial, "", ["beta.c"])
                .variant(Variant::OpenMp, "-DENABLE_OPENMP", ["beta.c"]),
        )
        .build()
        .expect("valid test registry")
}

const ALPHA_MAIN: &str = "\
#include <stdio.h>
#include \"util.h\"
int main() {
    int x = 0;
@ENABLE_THREADS    start_threads();
    if (x) {
        x++;
    }
    return x;
}
";

const ALPHA_UTIL: &str = "int helper(int);\n";

const ALPHA_THREADS: &str = "\
# include <pthread.h>
void start_threads() {
    spawn();
}
";

const ALPHA_MAIN_SKEPU: &str = "\
int main() {
    int x = 0;
    skepu_map(x);
    return x;
}
";

const ALPHA_FOO_SKEL: &str = "\
int skel(int a) {
    return a * 2;
}
";

const BETA: &str = "\
void kernel(int n) {
@ENABLE_OPENMP    pragma_parallel();
    for_each(n);
}
";

/// Suite tree on disk plus a scratch directory.
pub struct Fixture {
    pub suite: TempDir,
    pub scratch: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let suite = TempDir::new().expect("create suite dir");
        let scratch = TempDir::new().expect("create scratch dir");

        let alpha = suite.path().join("pkgs/apps/alpha/src");
        let beta = suite.path().join("pkgs/kernels/beta/src");
        for (dir, name, text) in [
            (&alpha, "main.c", ALPHA_MAIN),
            (&alpha, "util.h", ALPHA_UTIL),
            (&alpha, "threads.c", ALPHA_THREADS),
            (&alpha, "main_skepu.cpp", ALPHA_MAIN_SKEPU),
            (&alpha, "foo_skel.cpp", ALPHA_FOO_SKEL),
            (&beta, "beta.c", BETA),
        ] {
            fs::create_dir_all(dir).expect("create source dir");
            fs::write(dir.join(name), text).expect("write source file");
        }

        Self { suite, scratch }
    }

    pub fn source(&self, benchmark_dir: &str, file: &str) -> PathBuf {
        self.suite.path().join(benchmark_dir).join(file)
    }

    pub fn config(&self, measure_complexity: bool) -> DriverConfig {
        DriverConfig {
            layout: SourceLayout {
                suite_root: self.suite.path().to_path_buf(),
                ompss_root: None,
            },
            scratch_dir: self.scratch.path().to_path_buf(),
            keep_files: false,
            measure_complexity,
            tools: ToolConfig::default(),
        }
    }
}
