use super::ScriptExtractor;
use crate::types::ProjectScript;
use std::fs;
use std::path::Path;
use tracing::debug;

const DEFAULT_MANAGER: &str = "npm";

/// `package.json` scripts, run through the detected manager
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeScriptExtractor;

impl ScriptExtractor for NodeScriptExtractor {
    fn project_type(&self) -> &'static str {
        "nodejs"
    }

    fn extract(&self, root: &Path, package_manager: Option<&str>) -> Vec<ProjectScript> {
        let manager = package_manager.unwrap_or(DEFAULT_MANAGER);
        let path = root.join("package.json");

        let manifest: serde_json::Value = match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                debug!("Skipping scripts from {:?}: {e}", path);
                return Vec::new();
            }
        };

        let Some(scripts) = manifest.get("scripts").and_then(|s| s.as_object()) else {
            return Vec::new();
        };

        scripts
            .iter()
            .filter(|(_, command)| command.is_string())
            .map(|(name, _)| ProjectScript::new(name, format!("{manager} run {name}")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scripts_in_declaration_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"scripts": {"dev": "vite", "build": "tsc", "broken": 42, "lint": "eslint ."}}"#,
        )
        .unwrap();

        let scripts = NodeScriptExtractor.extract(dir.path(), Some("pnpm"));
        assert_eq!(
            scripts,
            vec![
                ProjectScript::new("dev", "pnpm run dev"),
                ProjectScript::new("build", "pnpm run build"),
                ProjectScript::new("lint", "pnpm run lint"),
            ]
        );
    }

    #[test]
    fn test_defaults_to_npm() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"scripts": {"test": "jest"}}"#,
        )
        .unwrap();

        let scripts = NodeScriptExtractor.extract(dir.path(), None);
        assert_eq!(scripts[0].command, "npm run test");
    }

    #[test]
    fn test_missing_or_malformed_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(NodeScriptExtractor.extract(dir.path(), None).is_empty());

        fs::write(dir.path().join("package.json"), "{").unwrap();
        assert!(NodeScriptExtractor.extract(dir.path(), None).is_empty());
    }
}
