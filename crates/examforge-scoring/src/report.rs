//! Combined evaluation of a timetable.

use examforge_config::EvaluationConfig;
use examforge_core::{Catalog, ConstraintViolation, Timetable};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::accuracy::AccuracyScorer;
use crate::utilization::{DayLoad, UtilizationAnalyzer};
use crate::validator::ConstraintValidator;

/// Quality report for one timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// True when no hard constraint is broken.
    pub feasible: bool,
    pub hard_violation_count: usize,
    /// Every hard violation.
    pub hard_violations: Vec<ConstraintViolation>,
    pub soft_violation_count: usize,
    /// The first soft violations, up to the configured detail limit.
    pub soft_violations: Vec<ConstraintViolation>,
    /// Rounded to two decimals.
    pub hall_utilization_percent: f64,
    /// Serialized as a day to entry-count map in day order.
    #[serde(with = "day_load_map")]
    pub day_load_distribution: Vec<DayLoad>,
    pub accuracy_score: u32,
    pub total_exams_scheduled: usize,
}

impl EvaluationReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the validator, the utilization analyzer and the accuracy scorer.
///
/// Evaluation is recomputed from scratch on every call.
#[derive(Debug, Clone)]
pub struct Evaluator {
    validator: ConstraintValidator,
    analyzer: UtilizationAnalyzer,
    scorer: AccuracyScorer,
    soft_detail_limit: usize,
}

impl Evaluator {
    pub fn new(config: &EvaluationConfig) -> Self {
        Self {
            validator: ConstraintValidator::new(),
            analyzer: UtilizationAnalyzer::new(),
            scorer: AccuracyScorer::from_config(config),
            soft_detail_limit: config.soft_violation_detail_limit,
        }
    }

    pub fn scorer(&self) -> &AccuracyScorer {
        &self.scorer
    }

    /// Evaluates `timetable` against `catalog`.
    pub fn evaluate(&self, timetable: &Timetable, catalog: &Catalog) -> EvaluationReport {
        let outcome = self.validator.validate(timetable, catalog);
        let utilization = self.analyzer.analyze_catalog(timetable, catalog);

        let hard_violation_count = outcome.hard_count();
        let soft_violation_count = outcome.soft_count();
        let accuracy_score = self.scorer.score(hard_violation_count, soft_violation_count);

        let mut soft_violations = outcome.soft;
        soft_violations.truncate(self.soft_detail_limit);

        let report = EvaluationReport {
            feasible: hard_violation_count == 0,
            hard_violation_count,
            hard_violations: outcome.hard,
            soft_violation_count,
            soft_violations,
            hall_utilization_percent: round2(utilization.percent),
            day_load_distribution: utilization.day_load,
            accuracy_score,
            total_exams_scheduled: timetable.len(),
        };

        info!(
            event = "evaluate",
            status = %timetable.status,
            feasible = report.feasible,
            hard = report.hard_violation_count,
            soft = report.soft_violation_count,
            accuracy = report.accuracy_score,
            utilization = report.hall_utilization_percent,
        );

        report
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(&EvaluationConfig::default())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

mod day_load_map {
    use std::fmt;

    use examforge_core::Day;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use crate::utilization::DayLoad;

    pub(super) fn serialize<S: Serializer>(
        loads: &[DayLoad],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(loads.len()))?;
        for load in loads {
            map.serialize_entry(&load.day, &load.entries)?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<DayLoad>, D::Error> {
        deserializer.deserialize_map(DayLoadVisitor)
    }

    struct DayLoadVisitor;

    impl<'de> Visitor<'de> for DayLoadVisitor {
        type Value = Vec<DayLoad>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from day to entry count")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut loads = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((day, entries)) = access.next_entry::<Day, usize>()? {
                loads.push(DayLoad { day, entries });
            }
            Ok(loads)
        }
    }
}
