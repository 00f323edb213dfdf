//! When to run sweep passes.

use std::time::Duration;

use super::{StrayToggleDetector, SweepConfig, SweepReport};
use crate::dom::Dom;

/// Offsets from page load at which the sweep runs: immediately, then after
/// each configured delay, to catch toggles injected by late scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSchedule {
    offsets: Vec<Duration>,
}

impl SweepSchedule {
    pub fn from_config(config: &SweepConfig) -> Self {
        let mut offsets: Vec<Duration> = std::iter::once(0)
            .chain(config.delays_ms.iter().copied())
            .map(Duration::from_millis)
            .collect();
        offsets.sort();
        offsets.dedup();
        Self { offsets }
    }

    /// Sorted, deduplicated offsets; always starts at zero.
    pub fn offsets(&self) -> &[Duration] {
        &self.offsets
    }

    /// The delayed passes, excluding the immediate one.
    pub fn delayed(&self) -> impl Iterator<Item = Duration> + '_ {
        self.offsets.iter().copied().filter(|d| !d.is_zero())
    }
}

/// Re-runs the sweep only when nodes were inserted since the last pass.
///
/// On the in-memory [`Document`](crate::Document) removals do not count as
/// changes, so a sweep never re-triggers itself there.
#[derive(Debug, Clone, Default)]
pub struct MutationWatch {
    last_generation: Option<u64>,
}

impl MutationWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep_if_changed<D: Dom + ?Sized>(
        &mut self,
        detector: &StrayToggleDetector,
        dom: &mut D,
    ) -> Option<SweepReport> {
        if self.last_generation == Some(dom.generation()) {
            return None;
        }
        let report = detector.sweep(dom);
        self.last_generation = Some(dom.generation());
        Some(report)
    }
}
