use std::path::{Path, PathBuf};
use crate::formula::FormulaDescriptor;
use crate::resolver::OptResolver;

/// Directory layout of an installation prefix.
///
/// ```text
/// <prefix>/bin                 shared wrappers
/// <prefix>/libexec/<formula>   private files of one formula
/// <prefix>/opt/<dependency>    installed dependency prefixes
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixLayout {
    root: PathBuf,
}

impl PrefixLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the shared `bin` directory.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Returns the private library directory of `formula`.
    pub fn lib_dir(&self, formula: &FormulaDescriptor) -> PathBuf {
        self.root.join("libexec").join(&formula.name)
    }

    /// Returns the directory holding the `opt` prefixes of installed formulas.
    pub fn opt_dir(&self) -> PathBuf {
        self.root.join("opt")
    }

    /// Returns the path the wrapper of `formula` is installed at.
    pub fn wrapper_path(&self, formula: &FormulaDescriptor) -> PathBuf {
        self.bin_dir().join(formula.wrapper_name())
    }

    /// A resolver looking up dependencies under this prefix.
    pub fn resolver(&self) -> OptResolver {
        OptResolver::new(self.opt_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::sugarkube;

    #[test]
    fn test_layout_paths() {
        let layout = PrefixLayout::new("/usr/local");
        let formula = sugarkube().unwrap();
        assert_eq!(layout.bin_dir(), PathBuf::from("/usr/local/bin"));
        assert_eq!(layout.lib_dir(&formula), PathBuf::from("/usr/local/libexec/sugarkube"));
        assert_eq!(layout.opt_dir(), PathBuf::from("/usr/local/opt"));
        assert_eq!(
            layout.wrapper_path(&formula),
            PathBuf::from("/usr/local/bin/sugarkube-setup")
        );
    }
}
