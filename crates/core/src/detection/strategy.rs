//! Detection strategies
//!
//! Turns the ranked list of positively scored project types into the set that
//! counts as "detected".

use crate::impl_case_insensitive_deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Fraction of the survivors' mean score a type must reach under `balanced`
pub const BALANCED_THRESHOLD: f64 = 0.8;

/// Default absolute floor applied before any strategy
pub const DEFAULT_MIN_DETECTION_SCORE: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    /// Keep every type above the floor
    Aggressive,
    /// Keep only the top-ranked type
    Conservative,
    /// Keep types scoring at least 80% of the survivors' mean
    #[default]
    Balanced,
}

impl_case_insensitive_deserialize!(
    DetectionStrategy,
    Aggressive => "aggressive",
    Conservative => "conservative",
    Balanced => "balanced"
);

impl DetectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Conservative => "conservative",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggressive" => Ok(Self::Aggressive),
            "conservative" => Ok(Self::Conservative),
            "balanced" => Ok(Self::Balanced),
            other => Err(format!(
                "unknown strategy '{other}', expected one of: aggressive, conservative, balanced"
            )),
        }
    }
}

/// Anything the selector can rank
pub trait Ranked {
    fn priority(&self) -> i32;
    fn score(&self) -> u32;
}

/// Plain candidate, handy when only the numbers matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub priority: i32,
    pub score: u32,
}

impl Candidate {
    pub fn new(id: impl Into<String>, priority: i32, score: u32) -> Self {
        Self {
            id: id.into(),
            priority,
            score,
        }
    }
}

impl Ranked for Candidate {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn score(&self) -> u32 {
        self.score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategySelector {
    strategy: DetectionStrategy,
    min_detection_score: u32,
}

impl StrategySelector {
    pub fn new(strategy: DetectionStrategy, min_detection_score: u32) -> Self {
        Self {
            strategy,
            min_detection_score,
        }
    }

    pub fn strategy(&self) -> DetectionStrategy {
        self.strategy
    }

    /// Rank, apply the score floor, then apply the strategy.
    ///
    /// Candidates with a zero score are discarded up front. Ranking is by
    /// priority, then score, both descending; equal keys keep input order.
    pub fn select<T: Ranked>(&self, candidates: Vec<T>) -> Vec<T> {
        let mut ranked: Vec<T> = candidates.into_iter().filter(|c| c.score() > 0).collect();
        ranked.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| b.score().cmp(&a.score()))
        });

        let survivors: Vec<T> = ranked
            .into_iter()
            .filter(|c| c.score() >= self.min_detection_score)
            .collect();

        let selected = match self.strategy {
            DetectionStrategy::Aggressive => survivors,
            DetectionStrategy::Conservative => survivors.into_iter().take(1).collect(),
            DetectionStrategy::Balanced => {
                if survivors.is_empty() {
                    survivors
                } else {
                    let total: u64 = survivors.iter().map(|c| u64::from(c.score())).sum();
                    let mean = total as f64 / survivors.len() as f64;
                    let threshold = mean * BALANCED_THRESHOLD;
                    debug!("Balanced strategy: mean={mean:.2}, threshold={threshold:.2}");
                    survivors
                        .into_iter()
                        .filter(|c| f64::from(c.score()) >= threshold)
                        .collect()
                }
            }
        };

        debug!(
            "Strategy {} kept {} candidate(s) above floor {}",
            self.strategy,
            selected.len(),
            self.min_detection_score
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(selected: &[Candidate]) -> Vec<&str> {
        selected.iter().map(|c| c.id.as_str()).collect()
    }

    fn sample() -> Vec<Candidate> {
        vec![
            Candidate::new("docker", 50, 60),
            Candidate::new("nodejs", 100, 90),
            Candidate::new("git", 10, 110),
            Candidate::new("java", 60, 40),
        ]
    }

    #[test]
    fn test_priority_outranks_score() {
        let selector = StrategySelector::new(DetectionStrategy::Aggressive, 50);
        let selected = selector.select(sample());
        assert_eq!(ids(&selected), vec!["nodejs", "docker", "git"]);
    }

    #[test]
    fn test_score_breaks_priority_ties() {
        let selector = StrategySelector::new(DetectionStrategy::Aggressive, 0);
        let selected = selector.select(vec![
            Candidate::new("a", 10, 20),
            Candidate::new("b", 10, 70),
            Candidate::new("c", 10, 70),
        ]);
        assert_eq!(ids(&selected), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_conservative_keeps_top_only() {
        let selector = StrategySelector::new(DetectionStrategy::Conservative, 50);
        let selected = selector.select(sample());
        assert_eq!(ids(&selected), vec!["nodejs"]);
    }

    #[test]
    fn test_balanced_drops_far_below_mean() {
        // mean of 60, 90, 110 is 86.67, threshold 69.33
        let selector = StrategySelector::new(DetectionStrategy::Balanced, 50);
        let selected = selector.select(sample());
        assert_eq!(ids(&selected), vec!["nodejs", "git"]);
    }

    #[test]
    fn test_floor_applies_under_every_strategy() {
        for strategy in [
            DetectionStrategy::Aggressive,
            DetectionStrategy::Conservative,
            DetectionStrategy::Balanced,
        ] {
            let selector = StrategySelector::new(strategy, 50);
            let selected = selector.select(vec![
                Candidate::new("low", 100, 40),
                Candidate::new("high", 1, 80),
            ]);
            assert_eq!(ids(&selected), vec!["high"], "strategy {strategy}");
        }
    }

    #[test]
    fn test_output_sizes_are_ordered() {
        let inputs = vec![
            Candidate::new("a", 5, 55),
            Candidate::new("b", 4, 200),
            Candidate::new("c", 3, 75),
            Candidate::new("d", 2, 51),
            Candidate::new("e", 1, 0),
        ];
        let len = |strategy| StrategySelector::new(strategy, 50).select(inputs.clone()).len();

        let aggressive = len(DetectionStrategy::Aggressive);
        let balanced = len(DetectionStrategy::Balanced);
        let conservative = len(DetectionStrategy::Conservative);
        assert!(aggressive >= balanced);
        assert!(balanced >= conservative);
        assert!(conservative <= 1);
    }

    #[test]
    fn test_empty_input() {
        let selector = StrategySelector::new(DetectionStrategy::Balanced, 50);
        assert!(selector.select(Vec::<Candidate>::new()).is_empty());
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("Balanced".parse::<DetectionStrategy>(), Ok(DetectionStrategy::Balanced));
        assert!("greedy".parse::<DetectionStrategy>().is_err());
        let parsed: DetectionStrategy = serde_json::from_str(r#""CONSERVATIVE""#).unwrap();
        assert_eq!(parsed, DetectionStrategy::Conservative);
    }
}
