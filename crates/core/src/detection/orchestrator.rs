use super::package_manager::{ManagerEcosystem, PackageManagerResolver, best_package_manager};
use super::{ProjectTypeScore, ProjectTypeScorer, RuleEvaluator, StrategySelector};
use crate::config::{ConfigProvider, DetectionSettings};
use crate::error::{Error, Result};
use crate::scripts::ScriptRegistry;
use crate::types::{
    DetectedProjectType, ProjectDetectionResult, ProjectTypeTrace, UNKNOWN_PROJECT_TYPE,
};
use lru::LruCache;
use rayon::prelude::*;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const GIT_PROJECT_TYPE: &str = "git";
const DOCKER_PROJECT_TYPE: &str = "docker";

/// Detects project types, package managers and scripts for workspace roots.
///
/// Results are memoized per canonical root until [`clear_cache`] or a forced
/// refresh; the filesystem is not watched.
///
/// [`clear_cache`]: ProjectDetector::clear_cache
pub struct ProjectDetector {
    provider: Arc<dyn ConfigProvider>,
    settings: DetectionSettings,
    pool: rayon::ThreadPool,
    cache: Mutex<LruCache<PathBuf, ProjectDetectionResult>>,
    scripts: ScriptRegistry,
}

impl fmt::Debug for ProjectDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectDetector")
            .field("settings", &self.settings)
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

impl ProjectDetector {
    /// Detector using the provider's own detection settings
    pub fn new(provider: Arc<dyn ConfigProvider>) -> Result<Self> {
        let settings = provider.detection_settings();
        Self::with_settings(provider, settings)
    }

    pub fn with_settings(
        provider: Arc<dyn ConfigProvider>,
        settings: DetectionSettings,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.max_parallel_probes.max(1))
            .thread_name(|i| format!("depcmd-probe-{i}"))
            .build()
            .map_err(|e| Error::ThreadPoolError(e.to_string()))?;
        let capacity = NonZeroUsize::new(settings.cache_capacity).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            provider,
            settings,
            pool,
            cache: Mutex::new(LruCache::new(capacity)),
            scripts: ScriptRegistry::new(),
        })
    }

    pub fn with_script_registry(mut self, scripts: ScriptRegistry) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    pub fn provider(&self) -> &Arc<dyn ConfigProvider> {
        &self.provider
    }

    /// Detect the project at `workspace_root`.
    ///
    /// `None` yields the "unknown" result without touching the filesystem.
    /// A cached result for the same root is returned unless `force_refresh`.
    pub fn detect_project(
        &self,
        workspace_root: Option<&Path>,
        force_refresh: bool,
    ) -> ProjectDetectionResult {
        let Some(root) = workspace_root else {
            debug!("No workspace root, returning unknown project");
            return ProjectDetectionResult::empty(None);
        };
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        if !force_refresh {
            if let Some(cached) = self.cached(&root) {
                debug!("Using cached detection for {:?}", root);
                return cached;
            }
        }

        let result = self.run_detection(&root);
        self.lock_cache().put(root, result.clone());
        result
    }

    /// Cached result for `root`, if any
    pub fn cached(&self, root: &Path) -> Option<ProjectDetectionResult> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        self.lock_cache().get(&root).cloned()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        debug!("Detection cache cleared");
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<PathBuf, ProjectDetectionResult>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_detection(&self, root: &Path) -> ProjectDetectionResult {
        let provider = self.provider.as_ref();
        let evaluator = RuleEvaluator::new(provider);
        let scorer = ProjectTypeScorer::new(evaluator);
        let resolver = PackageManagerResolver::new(evaluator);

        let scores: Vec<ProjectTypeScore> = self.pool.install(|| {
            provider
                .project_types()
                .par_iter()
                .map(|pt| scorer.score(pt, root))
                .collect()
        });
        let detection_details: Vec<ProjectTypeTrace> =
            scores.iter().map(ProjectTypeScore::to_trace).collect();

        let selector =
            StrategySelector::new(self.settings.strategy, self.settings.min_detection_score);
        let selected = selector.select(scores);

        let mut detected_project_types = Vec::with_capacity(selected.len());
        let mut detected_package_managers = Vec::new();

        for score in &selected {
            let Some(project_type) = provider
                .project_types()
                .iter()
                .find(|pt| pt.id == score.project_type)
            else {
                continue;
            };

            let managers = self.pool.install(|| resolver.resolve(project_type, root));
            let manager = best_package_manager(&managers).map(|pm| pm.id.as_str());
            let scripts = self.scripts.scripts_for(project_type, root, manager);

            detected_project_types.push(DetectedProjectType {
                id: project_type.id.clone(),
                display_name: project_type.display_name.clone(),
                score: score.score,
                confidence: score.confidence(),
                scripts,
            });
            detected_package_managers.extend(managers);
        }

        let types: Vec<String> = if detected_project_types.is_empty() {
            vec![UNKNOWN_PROJECT_TYPE.to_string()]
        } else {
            detected_project_types.iter().map(|pt| pt.id.clone()).collect()
        };

        let mut package_manager = None;
        let mut python_manager = None;
        if let Some(top) = best_package_manager(&detected_package_managers) {
            match ManagerEcosystem::of(&top.id) {
                Some(ManagerEcosystem::JavaScript) => package_manager = Some(top.id.clone()),
                Some(ManagerEcosystem::Python) => python_manager = Some(top.id.clone()),
                None => debug!("Top package manager {} has no convenience field", top.id),
            }
        }

        let has_git = types.iter().any(|t| t == GIT_PROJECT_TYPE);
        let has_docker = types.iter().any(|t| t == DOCKER_PROJECT_TYPE);

        info!(
            "Detected [{}] in {:?} (strategy {}, package manager {:?})",
            types.join(", "),
            root,
            self.settings.strategy,
            package_manager.as_deref().or(python_manager.as_deref())
        );

        ProjectDetectionResult {
            types,
            detected_project_types,
            detected_package_managers,
            package_manager,
            python_manager,
            has_git,
            has_docker,
            workspace_root: Some(root.to_path_buf()),
            detection_details,
        }
    }
}
