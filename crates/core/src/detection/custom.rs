//! Built-in predicates usable by `custom` detection rules.
//!
//! Configuration files cannot carry code, so custom rules reference one of a
//! closed set of predicates by expression, e.g. `hasExtension:py` or
//! `packageJsonDependency:react`. A configuration may also register named
//! aliases for these expressions under `customFunctions`.

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomFunction {
    /// The workspace root contains at least one entry
    AnyFile,
    /// A top-level file with this extension exists
    HasExtension(String),
    /// `package.json` lists the package in any dependency section
    PackageJsonDependency(String),
    /// `pyproject.toml` has a `[tool.<name>]` table
    PyprojectTool(String),
}

impl CustomFunction {
    /// Run the predicate against `root`.
    ///
    /// A missing manifest is a plain `false`; unreadable or malformed files
    /// surface as errors so the caller can log them.
    pub fn evaluate(&self, root: &Path) -> Result<bool> {
        match self {
            Self::AnyFile => {
                let mut entries = fs::read_dir(root)?;
                Ok(entries.next().is_some())
            }
            Self::HasExtension(ext) => {
                for entry in fs::read_dir(root)? {
                    let path = entry?.path();
                    if path.is_file()
                        && path
                            .extension()
                            .and_then(|e| e.to_str())
                            .is_some_and(|e| e.eq_ignore_ascii_case(ext))
                    {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::PackageJsonDependency(name) => {
                let manifest = root.join("package.json");
                if !manifest.is_file() {
                    return Ok(false);
                }
                let contents = fs::read_to_string(manifest)?;
                let json: serde_json::Value = serde_json::from_str(&contents)?;
                Ok(["dependencies", "devDependencies", "peerDependencies"]
                    .iter()
                    .any(|section| json.get(section).and_then(|deps| deps.get(name)).is_some()))
            }
            Self::PyprojectTool(name) => {
                let manifest = root.join("pyproject.toml");
                if !manifest.is_file() {
                    return Ok(false);
                }
                let contents = fs::read_to_string(manifest)?;
                let doc: toml::Table = contents
                    .parse()
                    .map_err(|e| Error::Other(format!("Failed to parse pyproject.toml: {e}")))?;
                Ok(doc
                    .get("tool")
                    .and_then(|tool| tool.get(name.as_str()))
                    .is_some())
            }
        }
    }
}

impl FromStr for CustomFunction {
    type Err = Error;

    fn from_str(expr: &str) -> Result<Self> {
        let expr = expr.trim();
        if expr == "*" || expr.eq_ignore_ascii_case("anyFile") {
            return Ok(Self::AnyFile);
        }

        let (name, arg) = expr
            .split_once(':')
            .ok_or_else(|| Error::UnknownCustomFunction(expr.to_string()))?;
        let arg = arg.trim();
        if arg.is_empty() {
            return Err(Error::UnknownCustomFunction(expr.to_string()));
        }

        match name.to_lowercase().as_str() {
            "hasextension" => Ok(Self::HasExtension(arg.trim_start_matches('.').to_string())),
            "packagejsondependency" => Ok(Self::PackageJsonDependency(arg.to_string())),
            "pyprojecttool" => Ok(Self::PyprojectTool(arg.to_string())),
            _ => Err(Error::UnknownCustomFunction(expr.to_string())),
        }
    }
}

impl fmt::Display for CustomFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyFile => write!(f, "anyFile"),
            Self::HasExtension(ext) => write!(f, "hasExtension:{ext}"),
            Self::PackageJsonDependency(name) => write!(f, "packageJsonDependency:{name}"),
            Self::PyprojectTool(name) => write!(f, "pyprojectTool:{name}"),
        }
    }
}
