use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::{FormulaError, FormulaResult};
use crate::formula::FormulaDescriptor;

/// Looks up the installed prefix of a dependency.
///
/// This is the seam to the host package manager: the formula logic never
/// consults a global registry, it only asks a resolver it was handed.
pub trait DependencyResolver {
    /// Returns the installed prefix of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::UnresolvedDependency`] if `name` is not installed.
    fn resolve(&self, name: &str) -> FormulaResult<PathBuf>;
}

/// Resolves dependencies through the stable `opt` links of an installation prefix,
/// i.e. `<prefix>/opt/<name>`.
#[derive(Debug, Clone)]
pub struct OptResolver {
    opt_dir: PathBuf,
}

impl OptResolver {
    pub fn new<P: AsRef<Path>>(opt_dir: P) -> Self {
        Self {
            opt_dir: opt_dir.as_ref().to_path_buf(),
        }
    }
}

impl DependencyResolver for OptResolver {
    fn resolve(&self, name: &str) -> FormulaResult<PathBuf> {
        let prefix = self.opt_dir.join(name);
        if !prefix.is_dir() {
            return Err(FormulaError::unresolved(
                name,
                format!("'{}' is not installed", prefix.display()),
            ));
        }
        debug!(dependency = name, prefix = %prefix.display(), "resolved dependency");
        Ok(prefix)
    }
}

/// A resolved map from dependency name to its installed prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedDependencies {
    prefixes: BTreeMap<String, PathBuf>,
}

impl ResolvedDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every declared dependency of `formula`.
    ///
    /// Fails on the first dependency the resolver cannot locate.
    pub fn resolve_all<R: DependencyResolver + ?Sized>(
        formula: &FormulaDescriptor,
        resolver: &R,
    ) -> FormulaResult<Self> {
        let mut resolved = Self::new();
        for name in &formula.dependencies {
            let prefix = resolver.resolve(name)?;
            resolved.insert(name, prefix);
        }
        Ok(resolved)
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, name: &str, prefix: P) {
        self.prefixes.insert(name.to_string(), prefix.into());
    }

    pub fn prefix(&self, name: &str) -> Option<&Path> {
        self.prefixes.get(name).map(PathBuf::as_path)
    }

    /// Returns `<prefix>/bin` of a resolved dependency.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::UnresolvedDependency`] if `name` is not in the map
    /// or its `bin` directory does not exist.
    pub fn bin_dir(&self, name: &str) -> FormulaResult<PathBuf> {
        let prefix = self
            .prefix(name)
            .ok_or_else(|| FormulaError::unresolved(name, "not in the resolved dependency set"))?;
        let bin = prefix.join("bin");
        if !bin.is_dir() {
            return Err(FormulaError::unresolved(
                name,
                format!("'{}' does not exist", bin.display()),
            ));
        }
        Ok(bin)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl<S: Into<String>, P: Into<PathBuf>> FromIterator<(S, P)> for ResolvedDependencies {
    fn from_iter<I: IntoIterator<Item = (S, P)>>(iter: I) -> Self {
        Self {
            prefixes: iter
                .into_iter()
                .map(|(name, prefix)| (name.into(), prefix.into()))
                .collect(),
        }
    }
}
