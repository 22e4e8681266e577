use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Synthetic project type reported when nothing was detected
pub const UNKNOWN_PROJECT_TYPE: &str = "unknown";

/// A runnable command derived from a project's own manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScript {
    pub name: String,
    pub command: String,
}

impl ProjectScript {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedProjectType {
    pub id: String,
    pub display_name: String,
    pub score: u32,
    /// Percentage of the type's maximum attainable score, 0..=100
    pub confidence: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<ProjectScript>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPackageManager {
    pub id: String,
    pub display_name: String,
    pub project_type: String,
    pub score: u32,
}

/// Per-rule diagnostic entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrace {
    pub name: String,
    pub matched: bool,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Full scoring trace for one project type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTypeTrace {
    pub project_type: String,
    pub score: u32,
    pub max_possible_score: u32,
    pub required_failed: bool,
    pub rules: Vec<RuleTrace>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetectionResult {
    pub types: Vec<String>,
    pub detected_project_types: Vec<DetectedProjectType>,
    pub detected_package_managers: Vec<DetectedPackageManager>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_manager: Option<String>,
    pub has_git: bool,
    pub has_docker: bool,
    pub workspace_root: Option<PathBuf>,
    pub detection_details: Vec<ProjectTypeTrace>,
}

impl ProjectDetectionResult {
    /// The result reported when there is nothing to inspect
    pub fn empty(workspace_root: Option<PathBuf>) -> Self {
        Self {
            types: vec![UNKNOWN_PROJECT_TYPE.to_string()],
            detected_project_types: Vec::new(),
            detected_package_managers: Vec::new(),
            package_manager: None,
            python_manager: None,
            has_git: false,
            has_docker: false,
            workspace_root,
            detection_details: Vec::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.detected_project_types.is_empty()
    }

    /// True if any detected manager has this id, including the convenience fields
    pub fn has_package_manager(&self, id: &str) -> bool {
        self.package_manager.as_deref() == Some(id)
            || self.python_manager.as_deref() == Some(id)
            || self.detected_package_managers.iter().any(|pm| pm.id == id)
    }

    pub fn project_type(&self, id: &str) -> Option<&DetectedProjectType> {
        self.detected_project_types.iter().find(|pt| pt.id == id)
    }

    pub fn package_manager_entry(&self, id: &str) -> Option<&DetectedPackageManager> {
        self.detected_package_managers.iter().find(|pm| pm.id == id)
    }

    pub fn scripts_for(&self, id: &str) -> &[ProjectScript] {
        self.project_type(id)
            .map(|pt| pt.scripts.as_slice())
            .unwrap_or_default()
    }

    pub fn trace_for(&self, id: &str) -> Option<&ProjectTypeTrace> {
        self.detection_details.iter().find(|t| t.project_type == id)
    }
}
