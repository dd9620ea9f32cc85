use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use crate::error::{FormulaError, FormulaResult};

static FORMULA_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_.+@-]*$").expect("valid formula name regex"));

/// Represents the contents of a formula file.
///
/// The metadata (`description`, `homepage`) has no behavioral effect; the
/// `install` and `test` tables drive what gets installed and how it is verified.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FormulaDescriptor {
    /// Unique identifier within the formula namespace (e.g. `"sugarkube"`).
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage: String,
    /// Advisory version string. Not checked against the fetched content.
    pub version: String,
    /// Names of formulas that must already be installed.
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    pub source: Source,
    pub install: InstallSpec,
    #[serde(default)]
    pub test: TestSpec,
}

/// Where the installable content comes from. Fetching it is the host's job.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Source {
    pub url: String,
    /// Branch, tag or revision to fetch.
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Parameters of the install step.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct InstallSpec {
    /// Path of the script, relative to the staging directory root.
    pub script: PathBuf,
    /// Dependency providing the interpreter the wrapper pins.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Interpreter binary inside the dependency's `bin` directory.
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Wrapper file name in `binDir`. Defaults to `<name>-setup`.
    #[serde(default)]
    pub wrapper: Option<String>,
}

/// Parameters of the smoke test.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TestSpec {
    #[serde(default = "default_test_args")]
    pub args: Vec<String>,
}

impl Default for TestSpec {
    fn default() -> Self {
        Self {
            args: default_test_args(),
        }
    }
}

fn default_interpreter() -> String {
    "python@3.11".to_string()
}

fn default_executable() -> String {
    "python3".to_string()
}

fn default_test_args() -> Vec<String> {
    vec!["--help".to_string()]
}

impl FormulaDescriptor {
    /// Parses and validates a formula from TOML text.
    ///
    /// # Errors
    /// Returns [`FormulaError::Parse`] on malformed TOML and
    /// [`FormulaError::InvalidFormula`] when [`validate`](Self::validate) fails.
    pub fn from_toml_str(content: &str) -> FormulaResult<FormulaDescriptor> {
        let formula: FormulaDescriptor = toml::from_str(content)?;
        formula.validate()?;
        Ok(formula)
    }

    /// Loads a formula from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> FormulaResult<FormulaDescriptor> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormulaError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Saves the formula in pretty TOML format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> FormulaResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| FormulaError::InvalidFormula(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| FormulaError::io(path, e))
    }

    /// Checks the invariants the install step relies on.
    ///
    /// - the name and every dependency name are well formed
    /// - the interpreter is a declared dependency
    /// - the script is a relative path inside the staging tree with a file name
    /// - the wrapper name is a plain file name
    pub fn validate(&self) -> FormulaResult<()> {
        validate_name(&self.name)?;
        for dependency in &self.dependencies {
            validate_name(dependency)?;
        }
        if !self.dependencies.contains(&self.install.interpreter) {
            return Err(FormulaError::InvalidFormula(format!(
                "interpreter '{}' is not a declared dependency of '{}'",
                self.install.interpreter, self.name
            )));
        }
        let script = &self.install.script;
        let escapes = script.components().any(|c| {
            !matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir)
        });
        if script.as_os_str().is_empty() || escapes || script.file_name().is_none() {
            return Err(FormulaError::InvalidFormula(format!(
                "script path '{}' must be relative to the staging directory",
                script.display()
            )));
        }
        if !is_plain_file_name(&self.install.executable) {
            return Err(FormulaError::InvalidFormula(format!(
                "invalid interpreter executable '{}'",
                self.install.executable
            )));
        }
        if let Some(wrapper) = &self.install.wrapper {
            if !is_plain_file_name(wrapper) {
                return Err(FormulaError::InvalidFormula(format!(
                    "invalid wrapper name '{wrapper}'"
                )));
            }
        }
        Ok(())
    }

    /// File name of the generated wrapper in `binDir`.
    pub fn wrapper_name(&self) -> String {
        match &self.install.wrapper {
            Some(wrapper) => wrapper.clone(),
            None => format!("{}-setup", self.name),
        }
    }

    /// File name the script is installed under in `libDir`.
    pub fn script_file_name(&self) -> FormulaResult<&std::ffi::OsStr> {
        self.install.script.file_name().ok_or_else(|| {
            FormulaError::InvalidFormula(format!(
                "script path '{}' has no file name",
                self.install.script.display()
            ))
        })
    }

    /// Whether the formula tracks a moving ref instead of a pinned release.
    ///
    /// Versions carrying a pre-release tag (`0.0.0-main`) or that are not
    /// semver at all count as rolling.
    pub fn is_rolling(&self) -> bool {
        match Version::parse(&self.version) {
            Ok(version) => !version.pre.is_empty(),
            Err(_) => true,
        }
    }
}

fn validate_name(name: &str) -> FormulaResult<()> {
    if FORMULA_NAME.is_match(name) {
        Ok(())
    } else {
        Err(FormulaError::InvalidFormula(format!(
            "invalid formula name '{name}'"
        )))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
