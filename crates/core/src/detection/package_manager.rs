use super::RuleEvaluator;
use crate::types::{DetectedPackageManager, ProjectTypeDefinition};
use std::path::Path;
use tracing::debug;

/// Managers reported through `packageManager`
pub const JS_PACKAGE_MANAGERS: [&str; 4] = ["npm", "yarn", "pnpm", "bun"];

/// Managers reported through `pythonManager`
pub const PYTHON_PACKAGE_MANAGERS: [&str; 3] = ["pip", "conda", "poetry"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerEcosystem {
    JavaScript,
    Python,
}

impl ManagerEcosystem {
    /// Which convenience field a manager id surfaces in, if any
    pub fn of(id: &str) -> Option<Self> {
        if JS_PACKAGE_MANAGERS.contains(&id) {
            Some(Self::JavaScript)
        } else if PYTHON_PACKAGE_MANAGERS.contains(&id) {
            Some(Self::Python)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PackageManagerResolver<'a> {
    evaluator: RuleEvaluator<'a>,
}

impl<'a> PackageManagerResolver<'a> {
    pub fn new(evaluator: RuleEvaluator<'a>) -> Self {
        Self { evaluator }
    }

    /// Every declared manager of `project_type` scoring above zero
    pub fn resolve(
        &self,
        project_type: &ProjectTypeDefinition,
        root: &Path,
    ) -> Vec<DetectedPackageManager> {
        project_type
            .package_managers
            .iter()
            .filter_map(|pm| {
                let score: u32 = self
                    .evaluator
                    .evaluate_all(&pm.detection_rules, root)
                    .iter()
                    .filter(|outcome| outcome.matched)
                    .fold(0u32, |acc, outcome| acc.saturating_add(outcome.score));
                debug!("{}/{} scored {score}", project_type.id, pm.id);

                (score > 0).then(|| DetectedPackageManager {
                    id: pm.id.clone(),
                    display_name: pm.display_name.clone(),
                    project_type: project_type.id.clone(),
                    score,
                })
            })
            .collect()
    }
}

/// Highest-scoring manager; the earliest one wins ties
pub fn best_package_manager(
    managers: &[DetectedPackageManager],
) -> Option<&DetectedPackageManager> {
    managers.iter().fold(None, |best, pm| match best {
        Some(current) if current.score >= pm.score => Some(current),
        _ => Some(pm),
    })
}
