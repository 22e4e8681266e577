use crate::detection::{DEFAULT_MIN_DETECTION_SCORE, DetectionStrategy};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PARALLEL_PROBES: usize = 8;
pub const DEFAULT_CACHE_CAPACITY: usize = 1;

/// Knobs for the detection pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSettings {
    #[serde(default)]
    pub strategy: DetectionStrategy,
    #[serde(default = "default_min_detection_score")]
    pub min_detection_score: u32,
    /// Worker threads used to evaluate rules concurrently
    #[serde(default = "default_max_parallel_probes")]
    pub max_parallel_probes: usize,
    /// Number of workspace roots whose results are memoized
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::default(),
            min_detection_score: DEFAULT_MIN_DETECTION_SCORE,
            max_parallel_probes: DEFAULT_MAX_PARALLEL_PROBES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl DetectionSettings {
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_min_detection_score(mut self, score: u32) -> Self {
        self.min_detection_score = score;
        self
    }
}

fn default_min_detection_score() -> u32 {
    DEFAULT_MIN_DETECTION_SCORE
}

fn default_max_parallel_probes() -> usize {
    DEFAULT_MAX_PARALLEL_PROBES
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// How to probe whether the tool behind a category is installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCheckConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Program and arguments, split on whitespace when `args` is absent
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

impl DependencyCheckConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            enabled: true,
            command: command.into(),
            args: None,
            timeout_ms: None,
        }
    }

    /// Program and argument vector to spawn, `None` for an empty command
    pub fn argv(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        let args = match &self.args {
            Some(args) => args.clone(),
            None => parts.collect(),
        };
        Some((program, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_settings_defaults() {
        let settings: DetectionSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, DetectionSettings::default());
        assert_eq!(settings.min_detection_score, 50);
        assert_eq!(settings.strategy, DetectionStrategy::Balanced);
    }

    #[test]
    fn test_dependency_argv() {
        let check = DependencyCheckConfig::new("docker --version");
        assert_eq!(
            check.argv(),
            Some(("docker".to_string(), vec!["--version".to_string()]))
        );

        let explicit: DependencyCheckConfig =
            serde_json::from_str(r#"{"command": "conda", "args": ["info", "--json"]}"#).unwrap();
        assert!(explicit.enabled);
        assert_eq!(explicit.argv().unwrap().1, vec!["info", "--json"]);

        assert_eq!(DependencyCheckConfig::new("   ").argv(), None);
    }
}
