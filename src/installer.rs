use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::error::{FormulaError, FormulaResult};
use crate::formula::FormulaDescriptor;
use crate::layout::PrefixLayout;
use crate::resolver::ResolvedDependencies;
use crate::wrapper::{render_wrapper, write_executable};

/// Everything the install step reads from and writes to.
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Fetched source tree. Only read from.
    pub staging_dir: PathBuf,
    pub dependencies: ResolvedDependencies,
    /// Private library directory of the formula.
    pub lib_dir: PathBuf,
    /// Shared directory the wrapper is written to.
    pub bin_dir: PathBuf,
}

impl InstallContext {
    /// Builds a context targeting the directories of `layout`.
    pub fn for_layout<P: AsRef<Path>>(
        formula: &FormulaDescriptor,
        layout: &PrefixLayout,
        staging_dir: P,
        dependencies: ResolvedDependencies,
    ) -> Self {
        Self {
            staging_dir: staging_dir.as_ref().to_path_buf(),
            dependencies,
            lib_dir: layout.lib_dir(formula),
            bin_dir: layout.bin_dir(),
        }
    }
}

/// The two files a successful install leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledArtifacts {
    pub script: PathBuf,
    pub wrapper: PathBuf,
}

/// A fully checked install, computed before anything is written.
#[derive(Debug)]
struct InstallPlan {
    source: PathBuf,
    script: PathBuf,
    wrapper: PathBuf,
    content: String,
}

/// Absolute interpreter and installed-script paths embedded in the wrapper.
///
/// Relative directories are resolved against the current directory here, so the
/// wrapper keeps working when invoked from anywhere else.
fn embedded_paths(
    formula: &FormulaDescriptor,
    ctx: &InstallContext,
) -> FormulaResult<(PathBuf, PathBuf)> {
    let bin_dir = ctx.dependencies.bin_dir(&formula.install.interpreter)?;
    let interpreter = std::path::absolute(&bin_dir)
        .map_err(|e| FormulaError::io(&bin_dir, e))?
        .join(&formula.install.executable);
    let lib_dir = std::path::absolute(&ctx.lib_dir)
        .map_err(|e| FormulaError::io(&ctx.lib_dir, e))?;
    Ok((interpreter, lib_dir.join(formula.script_file_name()?)))
}

fn plan(formula: &FormulaDescriptor, ctx: &InstallContext) -> FormulaResult<InstallPlan> {
    let source = ctx.staging_dir.join(&formula.install.script);
    if !source.is_file() {
        return Err(FormulaError::MissingSourceFile {
            path: formula.install.script.clone(),
            staging: ctx.staging_dir.clone(),
        });
    }
    let (interpreter, script) = embedded_paths(formula, ctx)?;
    debug!(interpreter = %interpreter.display(), "using interpreter");

    let wrapper = ctx.bin_dir.join(formula.wrapper_name());
    let content = render_wrapper(&interpreter, &script)?;
    Ok(InstallPlan {
        source,
        script,
        wrapper,
        content,
    })
}

/// Renders the wrapper `install` would write, without touching the filesystem.
pub fn preview_wrapper(
    formula: &FormulaDescriptor,
    ctx: &InstallContext,
) -> FormulaResult<String> {
    let (interpreter, script) = embedded_paths(formula, ctx)?;
    render_wrapper(&interpreter, &script)
}

/// Installs `formula`: copies its script into `lib_dir` and writes the wrapper
/// into `bin_dir`.
///
/// All preconditions (script present in staging, interpreter resolvable, paths
/// embeddable) are checked before the first write, so a failing precondition
/// leaves the filesystem untouched. Re-installing overwrites both files.
///
/// # Errors
///
/// - [`FormulaError::MissingSourceFile`] if the script is not in staging
/// - [`FormulaError::UnresolvedDependency`] if the interpreter cannot be located
/// - [`FormulaError::UnquotablePath`] if a path cannot be embedded in the wrapper
/// - [`FormulaError::InstallIo`] on any write failure
pub fn install(
    formula: &FormulaDescriptor,
    ctx: &InstallContext,
) -> FormulaResult<InstalledArtifacts> {
    if formula.is_rolling() {
        warn!(
            formula = %formula.name,
            version = %formula.version,
            reference = %formula.source.reference,
            "installing a rolling version"
        );
    }
    let plan = plan(formula, ctx)?;

    std::fs::create_dir_all(&ctx.lib_dir).map_err(|e| FormulaError::io(&ctx.lib_dir, e))?;
    std::fs::create_dir_all(&ctx.bin_dir).map_err(|e| FormulaError::io(&ctx.bin_dir, e))?;

    // copy() keeps the source mode, so a read-only copy must be replaced
    if plan.script.exists() {
        std::fs::remove_file(&plan.script).map_err(|e| FormulaError::io(&plan.script, e))?;
    }
    std::fs::copy(&plan.source, &plan.script).map_err(|e| FormulaError::io(&plan.script, e))?;
    info!(script = %plan.script.display(), "installed script");

    write_executable(&plan.wrapper, &plan.content)?;
    info!(wrapper = %plan.wrapper.display(), "wrote wrapper");

    Ok(InstalledArtifacts {
        script: plan.script,
        wrapper: plan.wrapper,
    })
}

/// Removes the wrapper and the installed script of `formula`.
///
/// Files that are already gone are skipped. `lib_dir` is removed once empty.
pub fn uninstall(
    formula: &FormulaDescriptor,
    lib_dir: &Path,
    bin_dir: &Path,
) -> FormulaResult<()> {
    let wrapper = bin_dir.join(formula.wrapper_name());
    let script = lib_dir.join(formula.script_file_name()?);
    for path in [&wrapper, &script] {
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| FormulaError::io(path, e))?;
            info!(path = %path.display(), "removed");
        }
    }
    if lib_dir.is_dir() {
        let empty = std::fs::read_dir(lib_dir)
            .map_err(|e| FormulaError::io(lib_dir, e))?
            .next()
            .is_none();
        if empty {
            std::fs::remove_dir(lib_dir).map_err(|e| FormulaError::io(lib_dir, e))?;
        }
    }
    Ok(())
}
