//! Cleanup of stray theme toggles left behind by older deployments.
//!
//! This module provides:
//!
//! - [`SweepConfig`]: the allow-list (sanctioned container, page root) and
//!   the deny-list (wording, icons, naming markers, bottom margin)
//! - [`StrayToggleDetector`]: scanning and removal against any [`Dom`](crate::Dom)
//! - [`SweepSchedule`] and [`MutationWatch`]: when to run passes
//!
//! The sweep is a best-effort heuristic; its only real risk is removing
//! legitimate content, so every predicate is narrowed by the allow-list.

mod config;
mod detector;
mod schedule;

pub use config::SweepConfig;
pub use detector::{Removal, StrayFinding, StrayReason, StrayToggleDetector, SweepReport};
pub use schedule::{MutationWatch, SweepSchedule};
