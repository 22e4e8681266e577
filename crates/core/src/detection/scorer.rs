use super::RuleEvaluator;
use super::strategy::Ranked;
use crate::types::{ProjectTypeDefinition, ProjectTypeTrace, RuleOutcome, RuleTrace};
use std::path::Path;
use tracing::debug;

/// `round(score / max * 100)`, clamped to 0..=100
pub fn confidence(score: u32, max_possible_score: u32) -> u32 {
    if max_possible_score == 0 {
        return 0;
    }
    let pct = (f64::from(score) / f64::from(max_possible_score) * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// Aggregate score of one project type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTypeScore {
    pub project_type: String,
    pub priority: i32,
    pub score: u32,
    pub max_possible_score: u32,
    /// A required rule did not match, forcing the score to zero
    pub required_failed: bool,
    pub rules: Vec<RuleTrace>,
}

impl ProjectTypeScore {
    /// Fold rule outcomes, given in declaration order, into a score.
    pub fn aggregate(project_type: &ProjectTypeDefinition, outcomes: Vec<RuleOutcome>) -> Self {
        let mut score = 0u32;
        let mut required_failed = false;
        let mut rules = Vec::with_capacity(outcomes.len());

        for (rule, outcome) in project_type.detection_rules.iter().zip(outcomes) {
            if outcome.matched {
                score = score.saturating_add(outcome.score);
            } else if rule.required {
                required_failed = true;
            }
            rules.push(RuleTrace {
                name: rule.name.clone(),
                matched: outcome.matched,
                score: outcome.score,
                details: outcome.details,
            });
        }

        if required_failed {
            debug!("{}: required rule failed, score vetoed", project_type.id);
            score = 0;
        }

        Self {
            project_type: project_type.id.clone(),
            priority: project_type.priority,
            score,
            max_possible_score: project_type.max_possible_score(),
            required_failed,
            rules,
        }
    }

    pub fn confidence(&self) -> u32 {
        confidence(self.score, self.max_possible_score)
    }

    pub fn to_trace(&self) -> ProjectTypeTrace {
        ProjectTypeTrace {
            project_type: self.project_type.clone(),
            score: self.score,
            max_possible_score: self.max_possible_score,
            required_failed: self.required_failed,
            rules: self.rules.clone(),
        }
    }
}

impl Ranked for ProjectTypeScore {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn score(&self) -> u32 {
        self.score
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectTypeScorer<'a> {
    evaluator: RuleEvaluator<'a>,
}

impl<'a> ProjectTypeScorer<'a> {
    pub fn new(evaluator: RuleEvaluator<'a>) -> Self {
        Self { evaluator }
    }

    pub fn score(&self, project_type: &ProjectTypeDefinition, root: &Path) -> ProjectTypeScore {
        let outcomes = self
            .evaluator
            .evaluate_all(&project_type.detection_rules, root);
        let score = ProjectTypeScore::aggregate(project_type, outcomes);
        debug!(
            "{} scored {}/{}",
            score.project_type, score.score, score.max_possible_score
        );
        score
    }
}
