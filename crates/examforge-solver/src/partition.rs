//! Decomposition of a module catalog into independently solved groups.
//!
//! A [`PartitionStrategy`] splits modules into [`PartitionGroup`]s, each with
//! its own subset of days. The orchestrator solves groups independently and
//! concatenates their entries, so a strategy decides both how small each
//! search gets and which cross-group collisions remain possible.

use std::fmt::Debug;

use examforge_config::{BandConfig, DaySlicing, PlannerConfig};
use examforge_core::{Day, Module};
use tracing::debug;

/// One independently solved group of modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionGroup {
    pub name: String,
    /// Semesters that belong to this group.
    pub semesters: Vec<u32>,
    /// Days this group may use, in scheduling order.
    pub days: Vec<Day>,
    /// Member modules, in catalog order.
    pub modules: Vec<Module>,
}

impl PartitionGroup {
    pub fn new(
        name: impl Into<String>,
        semesters: Vec<u32>,
        days: Vec<Day>,
        modules: Vec<Module>,
    ) -> Self {
        Self {
            name: name.into(),
            semesters,
            days,
            modules,
        }
    }

    /// A group holding every module on every day.
    pub fn whole(name: impl Into<String>, modules: Vec<Module>, days: Vec<Day>) -> Self {
        let mut semesters: Vec<u32> = modules.iter().map(Module::semester).collect();
        semesters.sort_unstable();
        semesters.dedup();
        Self::new(name, semesters, days, modules)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if modules of `semester` belong to this group.
    pub fn admits(&self, semester: u32) -> bool {
        self.semesters.contains(&semester)
    }
}

/// Splits modules into groups with assigned day ranges.
///
/// Implementations must be pure: the same modules and days always yield the
/// same groups in the same order.
pub trait PartitionStrategy: Send + Sync + Debug {
    /// Partitions `modules` over `days`.
    ///
    /// Groups may be empty. Modules that fit no group are left out; use
    /// [`PartitionStrategy::unassigned`] to report them.
    fn partition(&self, modules: &[Module], days: &[Day]) -> Vec<PartitionGroup>;

    /// Modules that [`PartitionStrategy::partition`] would leave out.
    fn unassigned<'a>(&self, modules: &'a [Module]) -> Vec<&'a Module>;

    /// Short name used in logs and reports.
    fn name(&self) -> &str;
}

/// Groups modules by semester band and gives each band a contiguous slice
/// of days.
///
/// With [`DaySlicing::Disjoint`] the days are split into one contiguous chunk
/// per band, and the first `days % bands` chunks get one extra day. With
/// [`DaySlicing::Overlapping`] each band after the first also starts
/// `overlap_days` days before its disjoint chunk, sharing those days with
/// the preceding band.
///
/// # Example
///
/// ```
/// use examforge_config::{BandConfig, DaySlicing};
/// use examforge_core::{Day, ModuleRecord};
/// use examforge_solver::{PartitionStrategy, SemesterBandPartitioner};
///
/// let partitioner = SemesterBandPartitioner::new(
///     vec![
///         BandConfig::new("lower", vec![1, 2]),
///         BandConfig::new("upper", vec![3, 4]),
///     ],
///     DaySlicing::Disjoint,
/// );
/// let modules = vec![
///     ModuleRecord::new("CE1101", "CE", 1, 50).build().unwrap(),
///     ModuleRecord::new("CE3101", "CE", 3, 50).build().unwrap(),
/// ];
///
/// let groups = partitioner.partition(&modules, &Day::sequence(5));
/// assert_eq!(groups[0].days.len(), 3);
/// assert_eq!(groups[1].days[0].as_str(), "day4");
/// assert_eq!(groups[1].modules[0].code(), "CE3101");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterBandPartitioner {
    bands: Vec<BandConfig>,
    slicing: DaySlicing,
}

impl SemesterBandPartitioner {
    pub fn new(bands: Vec<BandConfig>, slicing: DaySlicing) -> Self {
        Self { bands, slicing }
    }

    /// Creates a partitioner from the configured bands and day slicing.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.bands.clone(), config.day_slicing)
    }

    pub fn bands(&self) -> &[BandConfig] {
        &self.bands
    }

    pub fn slicing(&self) -> DaySlicing {
        self.slicing
    }

    /// Day ranges `[start, end)` per band, as indices into `day_count` days.
    pub fn day_ranges(&self, day_count: usize) -> Vec<(usize, usize)> {
        let bands = self.bands.len();
        if bands == 0 {
            return Vec::new();
        }

        let base = day_count / bands;
        let extra = day_count % bands;
        let mut ranges = Vec::with_capacity(bands);
        let mut start = 0;
        for i in 0..bands {
            let len = base + usize::from(i < extra);
            ranges.push((start, start + len));
            start += len;
        }

        if let DaySlicing::Overlapping { overlap_days } = self.slicing {
            for range in ranges.iter_mut().skip(1) {
                range.0 = range.0.saturating_sub(overlap_days);
            }
        }
        ranges
    }
}

impl Default for SemesterBandPartitioner {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl PartitionStrategy for SemesterBandPartitioner {
    fn partition(&self, modules: &[Module], days: &[Day]) -> Vec<PartitionGroup> {
        let ranges = self.day_ranges(days.len());

        self.bands
            .iter()
            .zip(ranges)
            .map(|(band, (start, end))| {
                let members: Vec<Module> = modules
                    .iter()
                    .filter(|m| band.contains(m.semester()))
                    .cloned()
                    .collect();
                debug!(
                    event = "partition_group",
                    group = %band.name,
                    modules = members.len(),
                    first_day = start,
                    end_day = end,
                );
                PartitionGroup::new(
                    band.name.clone(),
                    band.semesters.clone(),
                    days[start..end].to_vec(),
                    members,
                )
            })
            .collect()
    }

    fn unassigned<'a>(&self, modules: &'a [Module]) -> Vec<&'a Module> {
        modules
            .iter()
            .filter(|m| !self.bands.iter().any(|b| b.contains(m.semester())))
            .collect()
    }

    fn name(&self) -> &str {
        "semester_bands"
    }
}
