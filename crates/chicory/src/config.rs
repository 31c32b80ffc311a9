use std::path::Path;

use serde::Deserialize;

use crate::ChicoryError;

/// Knobs for one checking run. Every field has a default, so an empty
/// `[check]` table (or none at all) gives the stock behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Source tag attached to editor diagnostics.
    pub language: String,
    /// Imported names unify with anything instead of only with the same import.
    pub dynamic_imports: bool,
    /// Lowercase markup tags are host elements and skip component lookup.
    pub intrinsic_elements: bool,
    /// Report ADT matches that neither cover every constructor nor have a wildcard arm.
    pub exhaustiveness: bool,
    /// Report same-scope variable re-declarations and constructor names shared by two ADTs.
    pub strict_redeclaration: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            dynamic_imports: false,
            intrinsic_elements: true,
            exhaustiveness: false,
            strict_redeclaration: false,
        }
    }
}

fn default_language() -> String {
    "chicory".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChicoryToml {
    #[serde(default)]
    pub check: CheckerConfig,
}

impl std::str::FromStr for ChicoryToml {
    type Err = ChicoryError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        toml::from_str(text).map_err(|err| ChicoryError::Config(err.to_string()))
    }
}

pub fn read_config(path: &Path) -> Result<ChicoryToml, ChicoryError> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str(&text)
        .map_err(|err| ChicoryError::Config(format!("failed to parse {}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let parsed: ChicoryToml = "".parse().unwrap();
        assert_eq!(parsed.check, CheckerConfig::default());
        assert_eq!(parsed.check.language, "chicory");
        assert!(parsed.check.intrinsic_elements);
    }

    #[test]
    fn partial_check_table_keeps_other_defaults() {
        let parsed: ChicoryToml = "[check]\nexhaustiveness = true\n".parse().unwrap();
        assert!(parsed.check.exhaustiveness);
        assert!(!parsed.check.dynamic_imports);
        assert!(!parsed.check.strict_redeclaration);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = "[check]\nexhaustive = true\n".parse::<ChicoryToml>().unwrap_err();
        assert!(matches!(err, ChicoryError::Config(_)));
    }

    #[test]
    fn reads_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chicory.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[check]\nlanguage = \"chic\"\ndynamic_imports = true").unwrap();
        let parsed = read_config(&path).unwrap();
        assert_eq!(parsed.check.language, "chic");
        assert!(parsed.check.dynamic_imports);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ChicoryError::Io(_)));
    }
}
