//! Reporting views over tracked time.

pub mod aggregator;
pub mod periods;
pub mod task_sheet;

pub use aggregator::{BucketStatus, TaskTotal, TimeBucket, TrackedTimeAggregator, TrackedTimeReport};
pub use periods::{period_range, superset_range, Period};
pub use task_sheet::{IntervalRow, SheetRow, TaskTimeSheet};
