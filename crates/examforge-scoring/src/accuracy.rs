use examforge_config::EvaluationConfig;

/// Folds violation counts into a quality score in `0..=100`.
///
/// `score = max(0, 100 - hard_weight * hard - soft_weight * soft)`, with
/// weights 10 and 1 by default.
///
/// # Example
///
/// ```
/// use examforge_scoring::AccuracyScorer;
///
/// let scorer = AccuracyScorer::default();
/// assert_eq!(scorer.score(0, 0), 100);
/// assert_eq!(scorer.score(2, 5), 75);
/// assert_eq!(scorer.score(11, 0), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccuracyScorer {
    hard_weight: u32,
    soft_weight: u32,
}

impl AccuracyScorer {
    pub const PERFECT: u32 = 100;

    pub fn new(hard_weight: u32, soft_weight: u32) -> Self {
        Self {
            hard_weight,
            soft_weight,
        }
    }

    /// Creates a scorer with the configured weights.
    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self::new(config.hard_weight, config.soft_weight)
    }

    /// Scores a timetable from its violation counts. Never negative.
    pub fn score(&self, hard: usize, soft: usize) -> u32 {
        let penalty = (hard as u64)
            .saturating_mul(u64::from(self.hard_weight))
            .saturating_add((soft as u64).saturating_mul(u64::from(self.soft_weight)));
        u64::from(Self::PERFECT).saturating_sub(penalty) as u32
    }
}

impl Default for AccuracyScorer {
    fn default() -> Self {
        Self::new(10, 1)
    }
}
