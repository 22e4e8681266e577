use super::ScriptExtractor;
use crate::types::ProjectScript;
use regex::Regex;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Number of Makefile targets considered
const MAKE_TARGET_LIMIT: usize = 5;

const SKIPPED_MAKE_TARGETS: [&str; 3] = ["all", "clean", "help"];

#[derive(Debug, Default, Clone, Copy)]
pub struct GoScriptExtractor;

impl GoScriptExtractor {
    /// Subdirectories of `cmd/`, sorted by name
    fn cmd_entrypoints(root: &Path) -> Vec<String> {
        let cmd_dir = root.join("cmd");
        if !cmd_dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(&cmd_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect()
    }

    fn make_targets(contents: &str) -> Vec<String> {
        let Ok(re) = Regex::new(r"(?m)^([\w-]+):") else {
            return Vec::new();
        };
        re.captures_iter(contents)
            .take(MAKE_TARGET_LIMIT)
            .map(|caps| caps[1].to_string())
            .filter(|target| !SKIPPED_MAKE_TARGETS.contains(&target.as_str()))
            .collect()
    }
}

impl ScriptExtractor for GoScriptExtractor {
    fn project_type(&self) -> &'static str {
        "go"
    }

    fn extract(&self, root: &Path, _package_manager: Option<&str>) -> Vec<ProjectScript> {
        let mut scripts = vec![
            ProjectScript::new("build", "go build"),
            ProjectScript::new("run", "go run ."),
            ProjectScript::new("test", "go test ./..."),
            ProjectScript::new("mod-tidy", "go mod tidy"),
            ProjectScript::new("mod-download", "go mod download"),
            ProjectScript::new("vet", "go vet ./..."),
            ProjectScript::new("fmt", "go fmt ./..."),
        ];

        if root.join("main.go").is_file() {
            scripts.push(ProjectScript::new("run-main", "go run main.go"));
        }

        for name in Self::cmd_entrypoints(root) {
            scripts.push(ProjectScript::new(
                format!("run-{name}"),
                format!("go run ./cmd/{name}"),
            ));
        }

        let makefile = root.join("Makefile");
        if makefile.is_file() {
            scripts.push(ProjectScript::new("make", "make"));
            if let Ok(contents) = fs::read_to_string(&makefile) {
                for target in Self::make_targets(&contents) {
                    scripts.push(ProjectScript::new(
                        format!("make-{target}"),
                        format!("make {target}"),
                    ));
                }
            }
        }

        scripts
    }
}
