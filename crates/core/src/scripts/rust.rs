use super::ScriptExtractor;
use crate::types::ProjectScript;
use cargo_toml::Manifest;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Cargo commands plus one `run-<bin>` per explicit `[[bin]]` target
#[derive(Debug, Default, Clone, Copy)]
pub struct RustScriptExtractor;

struct CargoTargets {
    bins: Vec<String>,
    is_workspace: bool,
}

impl RustScriptExtractor {
    fn read_targets(contents: &str) -> CargoTargets {
        match Manifest::from_str(contents) {
            Ok(manifest) => CargoTargets {
                bins: manifest
                    .bin
                    .iter()
                    .filter_map(|product| product.name.clone())
                    .collect(),
                is_workspace: manifest.workspace.is_some(),
            },
            Err(e) => {
                // Partially valid manifests still name their binaries
                debug!("Failed to parse Cargo.toml, scanning text instead: {e}");
                CargoTargets {
                    bins: scan_bin_names(contents),
                    is_workspace: contents.contains("[workspace]"),
                }
            }
        }
    }
}

fn scan_bin_names(contents: &str) -> Vec<String> {
    let Ok(re) = Regex::new(r#"\[\[bin\]\]\s*name\s*=\s*["']([^"']+)["']"#) else {
        return Vec::new();
    };
    re.captures_iter(contents)
        .map(|caps| caps[1].to_string())
        .collect()
}

impl ScriptExtractor for RustScriptExtractor {
    fn project_type(&self) -> &'static str {
        "rust"
    }

    fn extract(&self, root: &Path, _package_manager: Option<&str>) -> Vec<ProjectScript> {
        let mut scripts = vec![
            ProjectScript::new("build", "cargo build"),
            ProjectScript::new("run", "cargo run"),
            ProjectScript::new("test", "cargo test"),
            ProjectScript::new("check", "cargo check"),
            ProjectScript::new("build-release", "cargo build --release"),
            ProjectScript::new("run-release", "cargo run --release"),
        ];

        let path = root.join("Cargo.toml");
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Cannot read {:?}: {e}", path);
                return scripts;
            }
        };

        let targets = Self::read_targets(&contents);
        scripts.extend(
            targets
                .bins
                .iter()
                .map(|bin| {
                    ProjectScript::new(format!("run-{bin}"), format!("cargo run --bin {bin}"))
                }),
        );

        if targets.is_workspace {
            scripts.push(ProjectScript::new("workspace-build", "cargo build --workspace"));
            scripts.push(ProjectScript::new("workspace-test", "cargo test --workspace"));
        }

        scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_BINS: &str = r#"
[package]
name = "chat"
version = "0.1.0"
edition = "2021"

[[bin]]
name = "server"
path = "src/server.rs"

[[bin]]
name = "client"
path = "src/client.rs"
"#;

    #[test]
    fn test_bin_targets() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), TWO_BINS).unwrap();

        let scripts = RustScriptExtractor.extract(dir.path(), Some("cargo"));
        let names: Vec<_> = scripts.iter().map(|s| s.name.as_str()).collect();
        for expected in ["build", "run", "test", "run-server", "run-client"] {
            assert!(names.contains(&expected), "missing {expected} in {names:?}");
        }
        assert!(scripts.contains(&ProjectScript::new("run-client", "cargo run --bin client")));
        assert!(!names.contains(&"workspace-build"));
    }

    #[test]
    fn test_workspace_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"crates/*\"]\nresolver = \"2\"\n",
        )
        .unwrap();

        let scripts = RustScriptExtractor.extract(dir.path(), None);
        assert_eq!(
            scripts.last(),
            Some(&ProjectScript::new("workspace-test", "cargo test --workspace"))
        );
    }

    #[test]
    fn test_text_fallback() {
        let broken = "[[bin]]\nname = \"tool\"\n[package\n";
        assert_eq!(scan_bin_names(broken), vec!["tool"]);
    }

    #[test]
    fn test_missing_manifest_keeps_base_commands() {
        let dir = TempDir::new().unwrap();
        assert_eq!(RustScriptExtractor.extract(dir.path(), None).len(), 6);
    }
}
