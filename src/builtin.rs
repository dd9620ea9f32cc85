use crate::error::FormulaResult;
use crate::formula::FormulaDescriptor;

const SUGARKUBE: &str = include_str!("../formulas/sugarkube.toml");

/// Names of the formulas shipped with this crate.
pub const BUILTIN_FORMULAS: &[&str] = &["sugarkube"];

/// The Sugarkube setup wizard formula.
pub fn sugarkube() -> FormulaResult<FormulaDescriptor> {
    FormulaDescriptor::from_toml_str(SUGARKUBE)
}

/// Looks up a shipped formula by name.
pub fn builtin(name: &str) -> Option<FormulaResult<FormulaDescriptor>> {
    match name {
        "sugarkube" => Some(sugarkube()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sugarkube_formula() {
        let formula = sugarkube().unwrap();
        assert_eq!(formula.name, "sugarkube");
        assert_eq!(formula.version, "0.0.0-main");
        assert_eq!(formula.source.reference, "main");
        assert!(formula.dependencies.contains("python@3.11"));
        assert_eq!(formula.wrapper_name(), "sugarkube-setup");
        assert_eq!(formula.script_file_name().unwrap(), "sugarkube_setup.py");
        assert!(formula.is_rolling());
    }

    #[test]
    fn test_every_builtin_loads() {
        for name in BUILTIN_FORMULAS {
            assert!(builtin(name).unwrap().is_ok(), "{name} failed to load");
        }
        assert!(builtin("missing").is_none());
    }
}
