use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use formulate::builtin::builtin;
use formulate::config::Config;
use formulate::formula::FormulaDescriptor;
use formulate::installer::{install, preview_wrapper, uninstall, InstallContext};
use formulate::layout::PrefixLayout;
use formulate::resolver::ResolvedDependencies;
use formulate::smoke::test_formula;
use crate::cli::{FormulaCommand, CLI};

pub fn execute(cli: CLI, config: &Config) -> Result<()> {
    match cli.command {
        FormulaCommand::Install { formula, staging, prefix, skip_test } => {
            execute_install(&formula, &staging, layout(config, prefix)?, skip_test)
        }
        FormulaCommand::Test { formula, prefix } => {
            execute_test(&formula, layout(config, prefix)?)
        }
        FormulaCommand::Uninstall { formula, prefix } => {
            execute_uninstall(&formula, layout(config, prefix)?)
        }
        FormulaCommand::Info { formula, json } => {
            execute_info(&formula, json)
        }
        FormulaCommand::Wrapper { formula, prefix } => {
            execute_wrapper(&formula, layout(config, prefix)?)
        }
    }
}

fn layout(config: &Config, prefix: Option<PathBuf>) -> Result<PrefixLayout> {
    Ok(PrefixLayout::new(config.resolve_prefix(prefix)?))
}

/// Loads a formula from a `.toml` path, falling back to the built-in formulas.
pub fn load_formula(formula: &str) -> Result<FormulaDescriptor> {
    let path = Path::new(formula);
    if path.is_file() {
        return FormulaDescriptor::load(path)
            .with_context(|| format!("Could not load formula {}", path.display()));
    }
    match builtin(formula) {
        Some(loaded) => Ok(loaded?),
        None => bail!("Formula not found: {}", formula),
    }
}

pub fn execute_install(
    formula: &str,
    staging: &Path,
    layout: PrefixLayout,
    skip_test: bool,
) -> Result<()> {
    let formula = load_formula(formula)?;
    println!("Installing {} {}", formula.name.bold(), formula.version);
    let dependencies = ResolvedDependencies::resolve_all(&formula, &layout.resolver())
        .with_context(|| format!("Could not resolve dependencies of {}", formula.name))?;
    let ctx = InstallContext::for_layout(&formula, &layout, staging, dependencies);
    let artifacts = install(&formula, &ctx)
        .with_context(|| format!("Install of {} failed", formula.name))?;
    println!("  script:  {}", artifacts.script.display());
    println!("  wrapper: {}", artifacts.wrapper.display());

    if skip_test {
        return Ok(());
    }
    run_test(&formula, &artifacts.wrapper)
}

pub fn execute_test(formula: &str, layout: PrefixLayout) -> Result<()> {
    let formula = load_formula(formula)?;
    let wrapper = layout.wrapper_path(&formula);
    if !wrapper.exists() {
        bail!("{} is not installed in {}", formula.name, layout.root().display());
    }
    run_test(&formula, &wrapper)
}

fn run_test(formula: &FormulaDescriptor, wrapper: &Path) -> Result<()> {
    match test_formula(formula, wrapper) {
        Ok(_) => {
            println!("{} {}", "Smoke test passed:".green(), formula.name);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Smoke test failed:".red(), formula.name);
            if let formulate::FormulaError::SmokeTestFailed { stderr, .. } = &e {
                if !stderr.is_empty() {
                    eprint!("{stderr}");
                }
            }
            Err(anyhow!(e))
        }
    }
}

pub fn execute_uninstall(formula: &str, layout: PrefixLayout) -> Result<()> {
    let formula = load_formula(formula)?;
    println!("Uninstalling {}", formula.name);
    uninstall(&formula, &layout.lib_dir(&formula), &layout.bin_dir())?;
    println!("Done");
    Ok(())
}

pub fn execute_info(formula: &str, json: bool) -> Result<()> {
    let formula = load_formula(formula)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&formula)?);
        return Ok(());
    }
    println!("{}: {}", formula.name.bold(), formula.description);
    println!("  homepage: {}", formula.homepage);
    println!("  source:   {} ({})", formula.source.url, formula.source.reference);
    if formula.is_rolling() {
        println!("  version:  {} {}", formula.version, "(rolling)".yellow());
    } else {
        println!("  version:  {}", formula.version);
    }
    let dependencies: Vec<&str> = formula.dependencies.iter().map(String::as_str).collect();
    println!("  depends:  {}", dependencies.join(", "));
    println!("  wrapper:  {}", formula.wrapper_name());
    Ok(())
}

pub fn execute_wrapper(formula: &str, layout: PrefixLayout) -> Result<()> {
    let formula = load_formula(formula)?;
    let dependencies = ResolvedDependencies::resolve_all(&formula, &layout.resolver())?;
    let ctx = InstallContext::for_layout(&formula, &layout, PathBuf::new(), dependencies);
    print!("{}", preview_wrapper(&formula, &ctx)?);
    Ok(())
}
