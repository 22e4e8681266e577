//! Single-rule evaluation against a workspace

use super::CustomFunction;
use crate::config::ConfigProvider;
use crate::types::rule::ANY_FILE_TARGET;
use crate::types::{DetectionRule, RuleOutcome, RulePattern, RuleType};
use rayon::prelude::*;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Evaluates detection rules. Probe failures never escape; they become misses.
#[derive(Clone, Copy)]
pub struct RuleEvaluator<'a> {
    provider: &'a dyn ConfigProvider,
}

impl fmt::Debug for RuleEvaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEvaluator").finish_non_exhaustive()
    }
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(provider: &'a dyn ConfigProvider) -> Self {
        Self { provider }
    }

    pub fn evaluate(&self, rule: &DetectionRule, root: &Path) -> RuleOutcome {
        if let Some(excluded) = rule
            .exclusions()
            .iter()
            .find(|path| root.join(path).exists())
        {
            return RuleOutcome::miss(format!("excluded because {excluded} exists"));
        }

        match rule.rule_type {
            RuleType::FileExists => self.check_path(rule, root, false),
            RuleType::DirectoryExists => self.check_path(rule, root, true),
            RuleType::FileContent => self.check_content(rule, root),
            RuleType::Custom => self.check_custom(rule, root),
        }
    }

    /// Evaluate `rules` concurrently on the current rayon pool.
    ///
    /// Outcomes are returned in declaration order.
    pub fn evaluate_all(&self, rules: &[DetectionRule], root: &Path) -> Vec<RuleOutcome> {
        rules
            .par_iter()
            .map(|rule| self.evaluate(rule, root))
            .collect()
    }

    fn check_path(&self, rule: &DetectionRule, root: &Path, want_dir: bool) -> RuleOutcome {
        let kind = if want_dir { "directory" } else { "file" };
        match fs::metadata(root.join(&rule.target)) {
            Ok(meta) if meta.is_dir() == want_dir => {
                RuleOutcome::hit(rule.weight, format!("{kind} {} exists", rule.target))
            }
            Ok(_) => RuleOutcome::miss(format!("{} is not a {kind}", rule.target)),
            Err(e) => {
                debug!("Rule {} probe of {} failed: {e}", rule.name, rule.target);
                RuleOutcome::miss(format!("{kind} {} not found", rule.target))
            }
        }
    }

    fn check_content(&self, rule: &DetectionRule, root: &Path) -> RuleOutcome {
        let Some(pattern) = rule.pattern() else {
            return RuleOutcome::miss("no pattern configured");
        };

        let contents = match fs::read_to_string(root.join(&rule.target)) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Rule {} could not read {}: {e}", rule.name, rule.target);
                return RuleOutcome::miss(format!("cannot read {}", rule.target));
            }
        };

        let found = match pattern {
            RulePattern::Literal(text) => contents.contains(text.as_str()),
            RulePattern::Regex { regex } => match Regex::new(regex) {
                Ok(re) => re.is_match(&contents),
                Err(e) => {
                    warn!("Rule {} has an invalid regex: {e}", rule.name);
                    return RuleOutcome::miss("invalid regex");
                }
            },
        };

        if found {
            RuleOutcome::hit(rule.weight, format!("pattern found in {}", rule.target))
        } else {
            RuleOutcome::miss(format!("pattern not found in {}", rule.target))
        }
    }

    fn check_custom(&self, rule: &DetectionRule, root: &Path) -> RuleOutcome {
        let matched = match rule.custom_function() {
            Some(name) => self.provider.execute_custom_function(name, root),
            None if rule.target == ANY_FILE_TARGET => {
                CustomFunction::AnyFile.evaluate(root).unwrap_or_else(|e| {
                    debug!("Rule {} could not list {:?}: {e}", rule.name, root);
                    false
                })
            }
            None => self.provider.execute_custom_function(&rule.target, root),
        };

        let name = rule.custom_function().unwrap_or(&rule.target);
        if matched {
            RuleOutcome::hit(rule.weight, format!("custom function {name} matched"))
        } else {
            RuleOutcome::miss(format!("custom function {name} did not match"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfigProvider;
    use tempfile::TempDir;

    fn provider() -> SchemaConfigProvider {
        SchemaConfigProvider::builtin().unwrap()
    }

    #[test]
    fn test_file_and_directory_kinds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("go.mod"), "module x").unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();

        let provider = provider();
        let evaluator = RuleEvaluator::new(&provider);

        let file = DetectionRule::file_exists("go-mod", "go.mod").with_weight(80);
        assert_eq!(evaluator.evaluate(&file, dir.path()).score, 80);

        let wrong_kind = DetectionRule::file_exists("src-as-file", "src");
        assert!(!evaluator.evaluate(&wrong_kind, dir.path()).matched);

        let directory = DetectionRule::directory_exists("src", "src");
        assert!(evaluator.evaluate(&directory, dir.path()).matched);

        let missing = DetectionRule::directory_exists("git", ".git");
        let outcome = evaluator.evaluate(&missing, dir.path());
        assert_eq!((outcome.matched, outcome.score), (false, 0));
    }

    #[test]
    fn test_exclusion_voids_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let provider = provider();
        let evaluator = RuleEvaluator::new(&provider);
        let rule = DetectionRule::file_exists("npm-only", "package.json")
            .with_weight(50)
            .excluding("yarn.lock");

        assert!(evaluator.evaluate(&rule, dir.path()).matched);

        fs::write(dir.path().join("yarn.lock"), "").unwrap();
        let outcome = evaluator.evaluate(&rule, dir.path());
        assert!(!outcome.matched);
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_file_content_patterns() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace]\nmembers = [\"crates/*\"]\n",
        )
        .unwrap();

        let provider = provider();
        let evaluator = RuleEvaluator::new(&provider);

        let literal =
            DetectionRule::file_content("ws", "Cargo.toml", RulePattern::literal("[workspace]"));
        assert!(evaluator.evaluate(&literal, dir.path()).matched);

        let regex = DetectionRule::file_content(
            "members",
            "Cargo.toml",
            RulePattern::regex(r"(?m)^members\s*="),
        );
        assert!(evaluator.evaluate(&regex, dir.path()).matched);

        let invalid = DetectionRule::file_content("bad", "Cargo.toml", RulePattern::regex("("));
        assert!(!evaluator.evaluate(&invalid, dir.path()).matched);

        let unreadable =
            DetectionRule::file_content("missing", "nope.toml", RulePattern::literal("x"));
        assert!(!evaluator.evaluate(&unreadable, dir.path()).matched);
    }

    #[test]
    fn test_custom_rules() {
        let dir = TempDir::new().unwrap();
        let provider = provider();
        let evaluator = RuleEvaluator::new(&provider);

        let any = DetectionRule::custom("any", "*");
        assert!(!evaluator.evaluate(&any, dir.path()).matched);

        fs::write(dir.path().join("main.py"), "print()").unwrap();
        assert!(evaluator.evaluate(&any, dir.path()).matched);

        let by_config = DetectionRule::custom("py", "ignored").with_custom_function("hasExtension:py");
        assert!(evaluator.evaluate(&by_config, dir.path()).matched);

        let unknown = DetectionRule::custom("mystery", "isMonorepo");
        assert!(!evaluator.evaluate(&unknown, dir.path()).matched);
    }

    #[test]
    fn test_evaluate_all_keeps_declaration_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b"), "").unwrap();

        let provider = provider();
        let evaluator = RuleEvaluator::new(&provider);
        let rules: Vec<_> = ["a", "b", "c", "b"]
            .iter()
            .enumerate()
            .map(|(i, target)| DetectionRule::file_exists(format!("r{i}"), *target))
            .collect();

        let matched: Vec<bool> = evaluator
            .evaluate_all(&rules, dir.path())
            .iter()
            .map(|o| o.matched)
            .collect();
        assert_eq!(matched, vec![false, true, false, true]);
    }
}
