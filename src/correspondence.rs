//! # Correspondence Resolution
//!
//! When a parallel variant renames or restructures a file (for example
//! `blackscholes-ompss.c` instead of `blackscholes.c`), the modified-line count
//! must still be computed against the serial file holding "the same" code. This
//! module decides which serial file that is.
//!
//! Each benchmark carries an ordered list of [`Rule`]s in the registry. The
//! [`RuleResolver`] evaluates the rules of exactly one benchmark, takes the
//! first candidate produced, and accepts it only if the serial variant really
//! lists that file. No candidate means the file is new code.
//!
//! The driver only asks for a correspondence when the file's literal path is
//! absent from the serial file list.

use crate::error::MetricsError;
use crate::registry::{Registry, Variant};
use std::path::Path;
use tracing::debug;

const SOURCE_EXTENSIONS: [&str; 4] = ["c", "cc", "cpp", "cxx"];

/// One benchmark-specific mapping from a variant file to a serial file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Any path containing `pattern` maps to the fixed serial file `target`.
    Rename {
        only: Option<Variant>,
        pattern: String,
        target: String,
    },

    /// Replace `token` by `replacement` in the path. Paths containing one of
    /// the `except` names are not touched.
    Substitute {
        only: Option<Variant>,
        token: String,
        replacement: String,
        except: Vec<String>,
    },

    /// Files playing the role named by `pattern` map to the serial `header`
    /// or `source`, depending on their own extension.
    Role {
        pattern: String,
        header: String,
        source: String,
    },

    /// Files whose name contains the variant's tag map to `target`.
    VariantTag { target: String },
}

impl Rule {
    pub fn rename(only: Option<Variant>, pattern: &str, target: &str) -> Self {
        Rule::Rename {
            only,
            pattern: pattern.to_string(),
            target: target.to_string(),
        }
    }

    pub fn substitute(only: Option<Variant>, token: &str, replacement: &str) -> Self {
        Rule::Substitute {
            only,
            token: token.to_string(),
            replacement: replacement.to_string(),
            except: Vec::new(),
        }
    }

    /// Exclude `name` from an otherwise matching [`Rule::Substitute`].
    pub fn except(mut self, name: &str) -> Self {
        if let Rule::Substitute { except, .. } = &mut self {
            except.push(name.to_string());
        }
        self
    }

    pub fn role(pattern: &str, header: &str, source: &str) -> Self {
        Rule::Role {
            pattern: pattern.to_string(),
            header: header.to_string(),
            source: source.to_string(),
        }
    }

    pub fn variant_tag(target: &str) -> Self {
        Rule::VariantTag {
            target: target.to_string(),
        }
    }

    /// Candidate serial path for `file` of `variant`, if this rule matches.
    pub fn apply(&self, variant: Variant, file: &str) -> Option<String> {
        match self {
            Rule::Rename {
                only,
                pattern,
                target,
            } => (gate(*only, variant) && file.contains(pattern.as_str())).then(|| target.clone()),
            Rule::Substitute {
                only,
                token,
                replacement,
                except,
            } => {
                let excluded = except.iter().any(|name| file.contains(name.as_str()));
                (gate(*only, variant) && file.contains(token.as_str()) && !excluded)
                    .then(|| file.replace(token.as_str(), replacement))
            }
            Rule::Role {
                pattern,
                header,
                source,
            } => file.contains(pattern.as_str()).then(|| {
                if is_source_file(file) {
                    source.clone()
                } else {
                    header.clone()
                }
            }),
            Rule::VariantTag { target } => {
                let name = Path::new(file)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(file);
                name.contains(variant.tag()).then(|| target.clone())
            }
        }
    }
}

fn gate(only: Option<Variant>, variant: Variant) -> bool {
    only.map_or(true, |v| v == variant)
}

/// Whether `file` is an implementation file rather than a header.
pub fn is_source_file(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Decides which serial file a variant file should be diffed against.
pub trait Correspondence {
    /// `Ok(None)` means the file has no serial ancestor and counts as new code.
    fn resolve(
        &self,
        benchmark: &str,
        variant: Variant,
        file: &str,
    ) -> Result<Option<String>, MetricsError>;
}

/// [`Correspondence`] backed by the per-benchmark rules of a [`Registry`].
pub struct RuleResolver<'a> {
    registry: &'a Registry,
}

impl<'a> RuleResolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl Correspondence for RuleResolver<'_> {
    fn resolve(
        &self,
        benchmark: &str,
        variant: Variant,
        file: &str,
    ) -> Result<Option<String>, MetricsError> {
        let bench = self.registry.get(benchmark)?;
        if variant == Variant::Serial {
            return Ok(None);
        }

        let candidate = bench.rules().iter().find_map(|rule| rule.apply(variant, file));
        let serial = bench.serial_files();

        Ok(candidate.filter(|path| {
            let known = serial.iter().any(|s| s == path);
            if !known {
                debug!(
                    "{}: {} candidate {} is not a serial file, treating as new code",
                    benchmark, file, path
                );
            }
            known
        }))
    }
}
