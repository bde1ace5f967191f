//! # Benchmark Registry
//!
//! Static catalog describing, for every benchmark, which parallel variants exist,
//! which preprocessor macros select each variant's code path, and which source
//! files belong to it.
//!
//! ## Invariants
//!
//! - A variant is *defined* for a benchmark iff it has a [`VariantSpec`]. Macro
//!   flags and file list live in the same record, so one cannot exist without
//!   the other. An empty flag string is a valid definition ("no macros").
//! - File lists are never empty.
//! - Every benchmark defines the serial variant, which is the baseline for
//!   modified-line computation.
//!
//! The registry is built once (see [`Registry::parsec`] for the built-in
//! catalog, or [`RegistryBuilder`] for custom ones) and is read-only afterwards.

mod catalog;

use crate::correspondence::Rule;
use crate::error::MetricsError;
use crate::staging::SourceLayout;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Parallel programming model a benchmark implementation is written against.
///
/// Declaration order is the report's column order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
pub enum Variant {
    /// Sequential baseline
    #[clap(name = "serial")]
    #[serde(rename = "serial")]
    Serial,

    /// Hand-written thread pool (POSIX threads)
    #[clap(name = "pthreads")]
    #[serde(rename = "pthreads")]
    Pthreads,

    /// FastFlow task farm
    #[clap(name = "ff")]
    #[serde(rename = "ff")]
    FastFlow,

    /// OpenMP
    #[clap(name = "openmp")]
    #[serde(rename = "openmp")]
    OpenMp,

    /// Intel Threading Building Blocks
    #[clap(name = "tbb")]
    #[serde(rename = "tbb")]
    Tbb,

    /// OmpSs task dataflow
    #[clap(name = "ompss")]
    #[serde(rename = "ompss")]
    OmpSs,

    /// SkePU skeleton library
    #[clap(name = "skepu")]
    #[serde(rename = "skepu")]
    SkePU,
}

impl Variant {
    /// All variants in column order.
    pub const ALL: [Variant; 7] = [
        Variant::Serial,
        Variant::Pthreads,
        Variant::FastFlow,
        Variant::OpenMp,
        Variant::Tbb,
        Variant::OmpSs,
        Variant::SkePU,
    ];

    /// Short tag used in headers, scratch paths and file names.
    pub fn tag(self) -> &'static str {
        match self {
            Variant::Serial => "serial",
            Variant::Pthreads => "pthreads",
            Variant::FastFlow => "ff",
            Variant::OpenMp => "openmp",
            Variant::Tbb => "tbb",
            Variant::OmpSs => "ompss",
            Variant::SkePU => "skepu",
        }
    }

    /// Select a variant from a user-supplied string.
    ///
    /// An exact tag match (any case) wins; otherwise the string must be
    /// contained in exactly one variant's tag.
    pub fn from_selector(selector: &str) -> Result<Variant, MetricsError> {
        let selector = selector.trim();
        if let Ok(exact) = <Variant as ValueEnum>::from_str(selector, true) {
            return Ok(exact);
        }

        let matches: Vec<Variant> = Self::ALL
            .iter()
            .copied()
            .filter(|v| !selector.is_empty() && v.tag().contains(selector))
            .collect();

        match matches.as_slice() {
            [only] => Ok(*only),
            _ => Err(MetricsError::UnknownVariant {
                selector: selector.to_string(),
                matches,
            }),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// PARSEC package category, which is also the directory the sources live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Application,
    Kernel,
}

impl Category {
    /// Directory name under `pkgs/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Application => "apps",
            Category::Kernel => "kernels",
        }
    }
}

/// Macro flags and ordered file list of one (benchmark, variant) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantSpec {
    pub flags: String,
    pub files: Vec<String>,
}

/// Everything the registry knows about one benchmark.
#[derive(Clone, Debug)]
pub struct BenchmarkSpec {
    name: String,
    category: Category,
    variants: BTreeMap<Variant, VariantSpec>,
    rules: Vec<Rule>,
    reference_substitutes: Vec<(Variant, Variant)>,
}

impl BenchmarkSpec {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            variants: BTreeMap::new(),
            rules: Vec::new(),
            reference_substitutes: Vec::new(),
        }
    }

    /// Define `variant` with its macro flags and files. A later definition of
    /// the same variant replaces the earlier one.
    pub fn variant<I, S>(mut self, variant: Variant, flags: &str, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants.insert(
            variant,
            VariantSpec {
                flags: flags.to_string(),
                files: files.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Append a correspondence rule; rules are evaluated in insertion order.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// When normalisation asks for `requested` and this benchmark lacks it,
    /// normalise against `substitute` instead.
    pub fn substitute_reference(mut self, requested: Variant, substitute: Variant) -> Self {
        self.reference_substitutes.push((requested, substitute));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Defined variants, in column order.
    pub fn variants(&self) -> impl Iterator<Item = Variant> + '_ {
        self.variants.keys().copied()
    }

    pub fn is_defined(&self, variant: Variant) -> bool {
        self.variants.contains_key(&variant)
    }

    pub fn spec(&self, variant: Variant) -> Result<&VariantSpec, MetricsError> {
        self.variants
            .get(&variant)
            .ok_or_else(|| MetricsError::UndefinedVariant {
                benchmark: self.name.clone(),
                variant,
            })
    }

    /// Serial file list, or an empty slice when serial is not defined.
    pub fn serial_files(&self) -> &[String] {
        self.variants
            .get(&Variant::Serial)
            .map(|spec| spec.files.as_slice())
            .unwrap_or(&[])
    }

    /// Variant to normalise against when `requested` is asked for.
    ///
    /// Returns `requested` if defined, otherwise the configured substitute if
    /// that one is defined, otherwise `None`.
    pub fn reference_for(&self, requested: Variant) -> Option<Variant> {
        if self.is_defined(requested) {
            return Some(requested);
        }
        self.reference_substitutes
            .iter()
            .find(|(from, to)| *from == requested && self.is_defined(*to))
            .map(|(_, to)| *to)
    }
}

/// Read-only catalog of benchmarks in report order.
#[derive(Clone, Debug)]
pub struct Registry {
    benchmarks: Vec<BenchmarkSpec>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Built-in catalog of the twelve P3ARSEC benchmarks.
    pub fn parsec() -> Result<Self, MetricsError> {
        catalog::parsec()
    }

    /// Benchmarks in registry order.
    pub fn benchmarks(&self) -> impl Iterator<Item = &BenchmarkSpec> {
        self.benchmarks.iter()
    }

    /// Benchmarks whose name contains `filter` (all of them when `None`).
    pub fn select<'a>(&'a self, filter: Option<&'a str>) -> Vec<&'a BenchmarkSpec> {
        self.benchmarks
            .iter()
            .filter(|b| filter.map_or(true, |f| b.name.contains(f)))
            .collect()
    }

    pub fn get(&self, benchmark: &str) -> Result<&BenchmarkSpec, MetricsError> {
        self.benchmarks
            .iter()
            .find(|b| b.name == benchmark)
            .ok_or_else(|| MetricsError::UnknownBenchmark(benchmark.to_string()))
    }

    pub fn is_defined(&self, benchmark: &str, variant: Variant) -> bool {
        self.get(benchmark)
            .map(|b| b.is_defined(variant))
            .unwrap_or(false)
    }

    pub fn macro_flags(&self, benchmark: &str, variant: Variant) -> Result<&str, MetricsError> {
        Ok(self.get(benchmark)?.spec(variant)?.flags.as_str())
    }

    pub fn file_list(&self, benchmark: &str, variant: Variant) -> Result<&[String], MetricsError> {
        Ok(self.get(benchmark)?.spec(variant)?.files.as_slice())
    }

    pub fn category(&self, benchmark: &str) -> Result<Category, MetricsError> {
        Ok(self.get(benchmark)?.category)
    }

    /// Variants defined for `benchmark`, in column order.
    pub fn variants_of(&self, benchmark: &str) -> Result<Vec<Variant>, MetricsError> {
        Ok(self.get(benchmark)?.variants().collect())
    }

    /// Source directory of `variant` of `benchmark` under `layout`, or `None`
    /// when that variant's tree is not configured.
    pub fn source_dir(
        &self,
        layout: &SourceLayout,
        benchmark: &str,
        variant: Variant,
    ) -> Result<Option<PathBuf>, MetricsError> {
        let bench = self.get(benchmark)?;
        bench.spec(variant)?;
        Ok(layout.source_dir(bench, variant))
    }
}

/// Collects benchmark definitions and checks the registry invariants.
#[derive(Default)]
pub struct RegistryBuilder {
    benchmarks: Vec<BenchmarkSpec>,
}

impl RegistryBuilder {
    pub fn benchmark(mut self, spec: BenchmarkSpec) -> Self {
        self.benchmarks.push(spec);
        self
    }

    pub fn build(self) -> Result<Registry, MetricsError> {
        let mut seen = HashSet::new();

        for bench in &self.benchmarks {
            if bench.name.is_empty() {
                return Err(MetricsError::InvalidRegistry(
                    "benchmark with empty name".to_string(),
                ));
            }
            if !seen.insert(bench.name.as_str()) {
                return Err(MetricsError::InvalidRegistry(format!(
                    "benchmark '{}' declared twice",
                    bench.name
                )));
            }
            if !bench.is_defined(Variant::Serial) {
                return Err(MetricsError::InvalidRegistry(format!(
                    "benchmark '{}' has no serial variant",
                    bench.name
                )));
            }
            for (variant, spec) in &bench.variants {
                if spec.files.is_empty() {
                    return Err(MetricsError::InvalidRegistry(format!(
                        "benchmark '{}' variant '{}' has an empty file list",
                        bench.name, variant
                    )));
                }
            }
            for (requested, substitute) in &bench.reference_substitutes {
                if !bench.is_defined(*substitute) {
                    return Err(MetricsError::InvalidRegistry(format!(
                        "benchmark '{}' substitutes '{}' with undefined variant '{}'",
                        bench.name, requested, substitute
                    )));
                }
            }
        }

        Ok(Registry {
            benchmarks: self.benchmarks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registry {
        Registry::builder()
            .benchmark(
                BenchmarkSpec::new("alpha", Category::Application)
                    .variant(Variant::Serial, "", ["main.c"])
                    .variant(Variant::Pthreads, "-DTHREADS", ["main.c"]),
            )
            .benchmark(
                BenchmarkSpec::new("beta", Category::Kernel)
                    .variant(Variant::Serial, "", ["beta.c"])
                    .variant(Variant::OpenMp, "", ["beta.c"])
                    .substitute_reference(Variant::Pthreads, Variant::OpenMp),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_variant_tags_and_order() {
        let tags: Vec<&str> = Variant::ALL.iter().map(|v| v.tag()).collect();
        assert_eq!(
            tags,
            vec!["serial", "pthreads", "ff", "openmp", "tbb", "ompss", "skepu"]
        );
        let mut sorted = Variant::ALL;
        sorted.sort();
        assert_eq!(sorted, Variant::ALL);
        assert_eq!(Variant::FastFlow.to_string(), "ff");
    }

    #[test]
    fn test_variant_from_selector() {
        assert_eq!(Variant::from_selector("ff").unwrap(), Variant::FastFlow);
        assert_eq!(Variant::from_selector("thread").unwrap(), Variant::Pthreads);
        assert_eq!(Variant::from_selector("omp").unwrap(), Variant::OmpSs);
        assert_eq!(Variant::from_selector("TBB").unwrap(), Variant::Tbb);
        assert_eq!(Variant::from_selector(" SkePU ").unwrap(), Variant::SkePU);
        match Variant::from_selector("mp") {
            Err(MetricsError::UnknownVariant { matches, .. }) => {
                assert_eq!(matches, vec![Variant::OpenMp, Variant::OmpSs]);
            }
            other => panic!("expected ambiguous selector, got {:?}", other),
        }
        assert!(Variant::from_selector("cuda").is_err());
        assert!(Variant::from_selector("").is_err());
    }

    #[test]
    fn test_empty_flags_are_defined() {
        let registry = sample();
        assert!(registry.is_defined("alpha", Variant::Serial));
        assert_eq!(registry.macro_flags("alpha", Variant::Serial).unwrap(), "");
        assert_eq!(
            registry.macro_flags("alpha", Variant::Pthreads).unwrap(),
            "-DTHREADS"
        );
    }

    #[test]
    fn test_undefined_variant_lookup_fails() {
        let registry = sample();
        assert!(!registry.is_defined("beta", Variant::Tbb));
        assert!(matches!(
            registry.file_list("beta", Variant::Tbb),
            Err(MetricsError::UndefinedVariant { variant: Variant::Tbb, .. })
        ));
        assert!(matches!(
            registry.macro_flags("gamma", Variant::Serial),
            Err(MetricsError::UnknownBenchmark(_))
        ));
        assert!(!registry.is_defined("gamma", Variant::Serial));
    }

    #[test]
    fn test_variants_and_source_dirs() {
        let registry = sample();
        assert_eq!(
            registry.variants_of("beta").unwrap(),
            vec![Variant::Serial, Variant::OpenMp]
        );

        let layout = SourceLayout {
            suite_root: PathBuf::from("/suite"),
            ompss_root: None,
        };
        assert_eq!(
            registry.source_dir(&layout, "beta", Variant::OpenMp).unwrap(),
            Some(PathBuf::from("/suite/pkgs/kernels/beta/src"))
        );
        assert!(registry.source_dir(&layout, "beta", Variant::Tbb).is_err());
    }

    #[test]
    fn test_select_by_substring() {
        let registry = sample();
        let names: Vec<&str> = registry.select(Some("ph")).iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["alpha"]);
        assert_eq!(registry.select(None).len(), 2);
        assert!(registry.select(Some("zeta")).is_empty());
    }

    #[test]
    fn test_reference_substitution() {
        let registry = sample();
        let beta = registry.get("beta").unwrap();
        assert_eq!(beta.reference_for(Variant::Serial), Some(Variant::Serial));
        assert_eq!(beta.reference_for(Variant::Pthreads), Some(Variant::OpenMp));
        assert_eq!(beta.reference_for(Variant::Tbb), None);
    }

    #[test]
    fn test_builder_rejects_invalid_registries() {
        let empty_files = Registry::builder()
            .benchmark(
                BenchmarkSpec::new("x", Category::Kernel)
                    .variant(Variant::Serial, "", Vec::<String>::new()),
            )
            .build();
        assert!(matches!(empty_files, Err(MetricsError::InvalidRegistry(_))));

        let no_serial = Registry::builder()
            .benchmark(BenchmarkSpec::new("x", Category::Kernel).variant(
                Variant::Tbb,
                "",
                ["x.cpp"],
            ))
            .build();
        assert!(no_serial.is_err());

        let duplicate = Registry::builder()
            .benchmark(BenchmarkSpec::new("x", Category::Kernel).variant(Variant::Serial, "", ["a"]))
            .benchmark(BenchmarkSpec::new("x", Category::Kernel).variant(Variant::Serial, "", ["b"]))
            .build();
        assert!(duplicate.is_err());

        let bad_substitute = Registry::builder()
            .benchmark(
                BenchmarkSpec::new("x", Category::Kernel)
                    .variant(Variant::Serial, "", ["a"])
                    .substitute_reference(Variant::Pthreads, Variant::OpenMp),
            )
            .build();
        assert!(bad_substitute.is_err());
    }
}
