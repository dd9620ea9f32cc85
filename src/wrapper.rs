use std::path::{Path, PathBuf};
use crate::error::{FormulaError, FormulaResult};

/// Renders the wrapper script that forwards to `script` through `interpreter`.
///
/// The output is exactly
///
/// ```text
/// #!/bin/bash
/// exec "<interpreter>" "<script>" "$@"
/// ```
///
/// followed by a newline. Both paths are interpolated verbatim inside double
/// quotes, so any path containing a character the shell would still expand
/// there (`"`, `$`, `` ` ``, `\`) or a newline is rejected.
///
/// # Errors
///
/// Returns [`FormulaError::UnquotablePath`] for such paths.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use formulate::render_wrapper;
///
/// let wrapper = render_wrapper(
///     Path::new("/opt/homebrew/opt/python@3.11/bin/python3"),
///     Path::new("/opt/homebrew/libexec/sugarkube/sugarkube_setup.py"),
/// ).unwrap();
/// assert!(wrapper.starts_with("#!/bin/bash\n"));
/// ```
pub fn render_wrapper(interpreter: &Path, script: &Path) -> FormulaResult<String> {
    let interpreter = quotable(interpreter)?;
    let script = quotable(script)?;
    Ok(format!(
        "#!/bin/bash\nexec \"{interpreter}\" \"{script}\" \"$@\"\n"
    ))
}

fn quotable(path: &Path) -> FormulaResult<&str> {
    let unquotable = || FormulaError::UnquotablePath(path.to_path_buf());
    let text = path.to_str().ok_or_else(unquotable)?;
    if text.contains(['"', '$', '`', '\\', '\n', '\r']) {
        return Err(unquotable());
    }
    Ok(text)
}

/// Writes `content` to `path` and marks it executable (`0755` on Unix).
///
/// An existing file at `path` is overwritten.
pub fn write_executable<P: AsRef<Path>>(path: P, content: &str) -> FormulaResult<PathBuf> {
    let path = path.as_ref();
    std::fs::write(path, content).map_err(|e| FormulaError::io(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| FormulaError::io(path, e))?;
    }
    Ok(path.to_path_buf())
}
