#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use formulate::*;

/// Script that behaves like a CLI with a `--help` flag.
const HELPFUL_SCRIPT: &str = r#"if [ "$1" = "--help" ]; then
  echo "usage: sugarkube-setup [--apply]"
  exit 0
fi
exit 2
"#;

/// Fake interpreter that runs its first argument as a shell script.
const SH_INTERPRETER: &str = "#!/bin/sh\nexec /bin/sh \"$@\"\n";

/// Fake interpreter that prints every argument it receives, NUL-terminated.
const ECHO_INTERPRETER: &str = "#!/bin/sh\nprintf '%s\\0' \"$@\"\n";

fn setup_tests(script: Option<&str>, interpreter: &str) -> (TempDir, PrefixLayout, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let staging = temp_dir.path().join("staging");
    std::fs::create_dir_all(staging.join("scripts")).unwrap();
    if let Some(script) = script {
        std::fs::write(staging.join("scripts").join("sugarkube_setup.py"), script).unwrap();
    }
    let layout = PrefixLayout::new(temp_dir.path().join("prefix"));
    let python_bin = layout.opt_dir().join("python@3.11").join("bin");
    std::fs::create_dir_all(&python_bin).unwrap();
    write_executable(python_bin.join("python3"), interpreter).unwrap();
    (temp_dir, layout, staging)
}

fn install_sugarkube(layout: &PrefixLayout, staging: &Path) -> FormulaResult<InstalledArtifacts> {
    let formula = sugarkube()?;
    let dependencies = ResolvedDependencies::resolve_all(&formula, &layout.resolver())?;
    let ctx = InstallContext::for_layout(&formula, layout, staging, dependencies);
    install(&formula, &ctx)
}

fn run_wrapper(wrapper: &Path, args: &[&str]) -> Vec<String> {
    let output = Command::new(wrapper).args(args).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .strip_suffix('\0')
        .unwrap_or(&stdout)
        .split('\0')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_then_smoke_test_passes() {
        let (_dir, layout, staging) = setup_tests(Some(HELPFUL_SCRIPT), SH_INTERPRETER);
        let artifacts = install_sugarkube(&layout, &staging).unwrap();
        assert_eq!(artifacts.wrapper, layout.bin_dir().join("sugarkube-setup"));

        let formula = sugarkube().unwrap();
        let report = test_formula(&formula, &artifacts.wrapper).unwrap();
        assert!(report.stdout.contains("usage: sugarkube-setup"));
    }

    #[test]
    fn test_smoke_test_fails_without_help_flag() {
        let (_dir, layout, staging) = setup_tests(Some("exit 1\n"), SH_INTERPRETER);
        let artifacts = install_sugarkube(&layout, &staging).unwrap();
        let formula = sugarkube().unwrap();
        let err = test_formula(&formula, &artifacts.wrapper).unwrap_err();
        assert!(matches!(err, FormulaError::SmokeTestFailed { .. }));
        // a failed smoke test leaves the install in place
        assert!(artifacts.wrapper.exists());
        assert!(artifacts.script.exists());
    }

    #[test]
    fn test_smoke_test_fails_when_interpreter_disappears() {
        let (_dir, layout, staging) = setup_tests(Some(HELPFUL_SCRIPT), SH_INTERPRETER);
        let artifacts = install_sugarkube(&layout, &staging).unwrap();
        std::fs::remove_dir_all(layout.opt_dir().join("python@3.11")).unwrap();
        let formula = sugarkube().unwrap();
        assert!(test_formula(&formula, &artifacts.wrapper).is_err());
    }

    #[test]
    fn test_wrapper_passes_script_then_arguments() {
        let (_dir, layout, staging) = setup_tests(Some(HELPFUL_SCRIPT), ECHO_INTERPRETER);
        let artifacts = install_sugarkube(&layout, &staging).unwrap();
        let received = run_wrapper(&artifacts.wrapper, &["--apply", "two words"]);
        assert_eq!(
            received,
            vec![
                artifacts.script.display().to_string(),
                "--apply".to_string(),
                "two words".to_string(),
            ]
        );
    }

    #[test]
    fn test_arguments_round_trip_into_script() {
        let script = "printf '%s\\0' \"$@\"\n";
        let (_dir, layout, staging) = setup_tests(Some(script), SH_INTERPRETER);
        let artifacts = install_sugarkube(&layout, &staging).unwrap();
        let args = [
            "plain",
            "with space",
            "",
            "$HOME",
            "'single'",
            "\"double\"",
            "semi;colon",
            "glob*",
            "multi\nline",
            "--flag=value",
        ];
        assert_eq!(run_wrapper(&artifacts.wrapper, &args), args);
    }

    #[test]
    fn test_missing_interpreter_dependency() {
        let (_dir, layout, staging) = setup_tests(Some(HELPFUL_SCRIPT), SH_INTERPRETER);
        std::fs::remove_dir_all(layout.opt_dir()).unwrap();
        let err = install_sugarkube(&layout, &staging).unwrap_err();
        assert!(matches!(err, FormulaError::UnresolvedDependency { .. }));
        assert!(!layout.bin_dir().exists());
    }

    #[test]
    fn test_missing_script_leaves_prefix_untouched() {
        let (_dir, layout, staging) = setup_tests(None, SH_INTERPRETER);
        let err = install_sugarkube(&layout, &staging).unwrap_err();
        assert!(matches!(err, FormulaError::MissingSourceFile { .. }));
        assert!(!layout.bin_dir().exists());
        assert!(!layout.root().join("libexec").exists());
    }
}
