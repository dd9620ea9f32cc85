use std::path::Path;
use std::process::Command;
use tracing::{debug, info};
use crate::error::{FormulaError, FormulaResult};
use crate::formula::FormulaDescriptor;

/// Output of a passing smoke test.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeReport {
    pub stdout: String,
}

/// Runs `wrapper` with `args` and succeeds iff it exits with code 0.
///
/// Never touches installed files; a failure is reported, not rolled back.
///
/// # Errors
///
/// Returns [`FormulaError::SmokeTestFailed`] if the process cannot be spawned,
/// exits non-zero or is killed by a signal.
pub fn run_smoke_test<S: AsRef<str>>(wrapper: &Path, args: &[S]) -> FormulaResult<SmokeReport> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    debug!(wrapper = %wrapper.display(), ?args, "running smoke test");

    let output = Command::new(wrapper)
        .args(&args)
        .output()
        .map_err(|e| FormulaError::SmokeTestFailed {
            wrapper: wrapper.to_path_buf(),
            reason: format!("could not spawn: {e}"),
            stderr: String::new(),
        })?;

    if !output.status.success() {
        let reason = match output.status.code() {
            Some(code) => format!("exited with code {code}"),
            None => "terminated by signal".to_string(),
        };
        return Err(FormulaError::SmokeTestFailed {
            wrapper: wrapper.to_path_buf(),
            reason,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    info!(wrapper = %wrapper.display(), "smoke test passed");
    Ok(SmokeReport {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Runs the smoke test declared by `formula` against its installed wrapper.
pub fn test_formula(formula: &FormulaDescriptor, wrapper: &Path) -> FormulaResult<SmokeReport> {
    run_smoke_test(wrapper, formula.test.args.as_slice())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::wrapper::write_executable;
    use tempfile::tempdir;

    #[test]
    fn test_passing_command() {
        let dir = tempdir().unwrap();
        let tool = write_executable(dir.path().join("tool"), "#!/bin/sh\necho usage\nexit 0\n").unwrap();
        let report = run_smoke_test(&tool, &["--help"]).unwrap();
        assert_eq!(report.stdout, "usage\n");
    }

    #[test]
    fn test_non_zero_exit_fails() {
        let dir = tempdir().unwrap();
        let tool = write_executable(dir.path().join("tool"), "#!/bin/sh\necho broken >&2\nexit 3\n").unwrap();
        let err = run_smoke_test(&tool, &["--help"]).unwrap_err();
        match err {
            FormulaError::SmokeTestFailed { reason, stderr, .. } => {
                assert_eq!(reason, "exited with code 3");
                assert_eq!(stderr, "broken\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_wrapper_fails() {
        let dir = tempdir().unwrap();
        let err = run_smoke_test(&dir.path().join("absent"), &["--help"]).unwrap_err();
        assert!(matches!(err, FormulaError::SmokeTestFailed { .. }));
    }

    #[test]
    fn test_missing_interpreter_at_run_time_fails() {
        let dir = tempdir().unwrap();
        let script = format!(
            "#!/bin/bash\nexec \"{}\" \"$@\"\n",
            dir.path().join("gone").join("python3").display()
        );
        let tool = write_executable(dir.path().join("tool"), &script).unwrap();
        assert!(run_smoke_test(&tool, &["--help"]).is_err());
    }
}
