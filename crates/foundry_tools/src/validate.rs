//! Data validation utilities.

use std::path::Path;

use foundry_core::catalog::{Catalog, CatalogData};
use foundry_core::config::GameRules;

use crate::{Result, ToolError};

/// Summary of a catalog that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    /// Moves in the move table.
    pub moves: usize,
    /// Templates rolled from the seed.
    pub templates: usize,
    /// Guilds.
    pub guilds: usize,
    /// Story chapters.
    pub chapters: usize,
}

/// Parse catalog data, roll its templates and check every cross-reference.
///
/// # Errors
///
/// Returns [`ToolError::Invalid`] listing every problem found, or a parse
/// error if the text is not catalog RON.
pub fn validate_catalog_str(source_name: &str, text: &str, seed: u64) -> Result<CatalogSummary> {
    let data = CatalogData::from_ron_str(source_name, text)?;
    let catalog = Catalog::generate(data, seed);

    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::warn!(source = source_name, "{error}");
        }
        return Err(ToolError::Invalid {
            source_name: source_name.to_string(),
            errors,
        });
    }

    Ok(CatalogSummary {
        moves: catalog.moves().count(),
        templates: catalog.templates().len(),
        guilds: catalog.guilds().len(),
        chapters: catalog.chapters().len(),
    })
}

/// Validate a catalog RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn validate_catalog_file(path: &Path, seed: u64) -> Result<CatalogSummary> {
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    validate_catalog_str(&path.display().to_string(), &text, seed)
}

/// Load and check a rules RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or holds unusable values.
pub fn load_rules_file(path: &Path) -> Result<GameRules> {
    let source_name = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
    let rules = GameRules::from_ron_str(&source_name, &text)?;

    let errors = rules.validate();
    if !errors.is_empty() {
        return Err(ToolError::Invalid {
            source_name,
            errors,
        });
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_core::catalog::DEFAULT_CATALOG_SEED;

    const BROKEN: &str = r#"CatalogData(
        moves: [
            Move(id: "zap", name: "Zap", element: Voltaic, damage_percent: 0),
        ],
        guilds: [],
    )"#;

    #[test]
    fn test_bundled_catalog_passes() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../foundry_core/data/catalog.ron");
        let summary = validate_catalog_file(&path, DEFAULT_CATALOG_SEED).unwrap();
        assert_eq!(summary.moves, 40);
        assert_eq!(summary.guilds, 5);
        assert_eq!(summary.templates, 100);
    }

    #[test]
    fn test_zero_damage_move_is_reported() {
        let err = validate_catalog_str("broken", BROKEN, 1).unwrap_err();
        match err {
            ToolError::Invalid { errors, .. } => {
                assert!(errors.iter().any(|e| e.contains("zap")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = validate_catalog_file(Path::new("/nonexistent/catalog.ron"), 1).unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
    }

    #[test]
    fn test_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("rules.ron");
        std::fs::write(&good, "GameRules(chest_cost: 150)").unwrap();
        assert_eq!(load_rules_file(&good).unwrap().chest_cost, 150);

        let bad = dir.path().join("bad.ron");
        std::fs::write(&bad, "GameRules(max_team_size: 0)").unwrap();
        assert!(matches!(load_rules_file(&bad), Err(ToolError::Invalid { .. })));
    }
}
