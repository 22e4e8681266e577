//! Project detection engine
//!
//! Rules are evaluated against the workspace, folded into per-type scores,
//! ranked by a [`DetectionStrategy`] and finally enriched with package
//! managers and derived scripts by the [`ProjectDetector`].

pub mod custom;
pub mod evaluator;
pub mod orchestrator;
pub mod package_manager;
pub mod scorer;
pub mod strategy;

pub use custom::CustomFunction;
pub use evaluator::RuleEvaluator;
pub use orchestrator::ProjectDetector;
pub use package_manager::{
    JS_PACKAGE_MANAGERS, ManagerEcosystem, PYTHON_PACKAGE_MANAGERS, PackageManagerResolver,
    best_package_manager,
};
pub use scorer::{ProjectTypeScore, ProjectTypeScorer, confidence};
pub use strategy::{
    BALANCED_THRESHOLD, Candidate, DEFAULT_MIN_DETECTION_SCORE, DetectionStrategy, Ranked,
    StrategySelector,
};
