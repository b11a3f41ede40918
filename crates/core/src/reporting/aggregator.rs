//! Tracked-time aggregation for the today/week/month report
//!
//! A full report issues a single query over the union of the three periods
//! and buckets the result client-side. Running entries carry no final
//! duration yet and are left out of every bucket.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use clicktick_common::time::format_duration;
use clicktick_domain::config::ReportingConfig;
use clicktick_domain::{ClickTickError, Result, TimeEntry, TimeRange};
use tracing::{debug, instrument};

use super::periods::{period_range, superset_range, Period};
use crate::tracking::TimeEntryClient;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Target decoration of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    /// Nothing tracked.
    Empty,
    /// A target is set and not yet reached.
    BelowTarget,
    /// The target is met.
    OnTarget,
    /// Time tracked, no target configured.
    Untargeted,
}

/// Everything tracked on one task within a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTotal {
    /// `None` groups entries not attached to a task.
    pub task_id: Option<String>,
    /// Name as embedded in the entries.
    pub task_name: String,
    /// Custom id, when the workspace uses them.
    pub custom_id: Option<String>,
    /// Summed duration of the entries.
    pub total_ms: i64,
    /// Entry starts in epoch millis.
    pub starts: Vec<i64>,
    /// Entry ends in epoch millis.
    pub ends: Vec<i64>,
    /// Tag names, deduplicated.
    pub tags: Vec<String>,
    /// Number of entries summed.
    pub entries: usize,
}

impl TaskTotal {
    fn new(entry: &TimeEntry) -> Self {
        let (task_id, task_name, custom_id) = match entry.task.as_ref() {
            Some(task) => (Some(task.id.clone()), task.name.clone(), task.custom_id.clone()),
            None => (None, "No task".to_string(), None),
        };
        Self {
            task_id,
            task_name,
            custom_id,
            total_ms: 0,
            starts: Vec::new(),
            ends: Vec::new(),
            tags: Vec::new(),
            entries: 0,
        }
    }

    /// `[id] name (1h 5m)`
    pub fn label(&self) -> String {
        let duration = format_duration(self.total_ms);
        match self.custom_id.as_deref().or(self.task_id.as_deref()) {
            Some(id) => format!("[{id}] {} ({duration})", self.task_name),
            None => format!("{} ({duration})", self.task_name),
        }
    }
}

/// Aggregated entries of one period.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    /// Which window this is.
    pub period: Period,
    /// Window the totals cover.
    pub range: TimeRange,
    /// Tracked time in the window.
    pub total_ms: i64,
    /// Per-task totals, largest first.
    pub tasks: Vec<TaskTotal>,
    /// Minimum hours target in millis.
    pub target_ms: Option<i64>,
    /// Progress against the target.
    pub status: BucketStatus,
}

impl TimeBucket {
    /// Bucket the closed entries of `entries` that started within `range`.
    pub fn from_entries(
        period: Period,
        range: TimeRange,
        entries: &[TimeEntry],
        target_hours: Option<f64>,
    ) -> Self {
        let mut order: Vec<Option<String>> = Vec::new();
        let mut grouped: HashMap<Option<String>, (TaskTotal, BTreeSet<String>)> = HashMap::new();

        let in_range = entries.iter().filter(|entry| {
            !entry.is_running() && entry.start_ms().is_some_and(|start| range.contains(start))
        });

        for entry in in_range {
            let key = entry.task_id().map(str::to_string);
            let (total, tags) = grouped.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (TaskTotal::new(entry), BTreeSet::new())
            });

            total.total_ms = total.total_ms.saturating_add(entry.closed_duration_ms());
            total.entries += 1;
            total.starts.extend(entry.start_ms());
            total.ends.extend(entry.end_ms());
            tags.extend(entry.tags.iter().map(|tag| tag.name.clone()));
        }

        let mut tasks: Vec<TaskTotal> = order
            .into_iter()
            .filter_map(|key| grouped.remove(&key))
            .map(|(mut total, tags)| {
                total.tags = tags.into_iter().collect();
                total
            })
            .collect();
        tasks.sort_by(|a, b| b.total_ms.cmp(&a.total_ms).then_with(|| a.task_name.cmp(&b.task_name)));

        let total_ms = tasks.iter().map(|task| task.total_ms).fold(0, i64::saturating_add);
        let target_ms = target_hours
            .filter(|hours| hours.is_finite() && *hours > 0.0)
            .map(|hours| (hours * MS_PER_HOUR).round() as i64);

        Self { period, range, total_ms, tasks, target_ms, status: status_for(total_ms, target_ms) }
    }

    /// `Tracked Time today: 1h 5m`
    pub fn header(&self) -> String {
        format!("Tracked Time {}: {}", self.period.label(), format_duration(self.total_ms))
    }
}

fn status_for(total_ms: i64, target_ms: Option<i64>) -> BucketStatus {
    match target_ms {
        _ if total_ms <= 0 => BucketStatus::Empty,
        None => BucketStatus::Untargeted,
        Some(target) if total_ms < target => BucketStatus::BelowTarget,
        Some(_) => BucketStatus::OnTarget,
    }
}

/// The three standard buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedTimeReport {
    /// Since local midnight.
    pub today: TimeBucket,
    /// Since Monday.
    pub week: TimeBucket,
    /// Since the first of the month.
    pub month: TimeBucket,
}

impl TrackedTimeReport {
    /// Today, week and month in display order.
    pub fn buckets(&self) -> [&TimeBucket; 3] {
        [&self.today, &self.week, &self.month]
    }
}

/// Builds reports from the remote time entries of a team.
pub struct TrackedTimeAggregator {
    client: Arc<dyn TimeEntryClient>,
    targets: ReportingConfig,
    request_timeout: Duration,
}

impl TrackedTimeAggregator {
    /// Requests slower than `request_timeout` fail with `Timeout`.
    pub fn new(
        client: Arc<dyn TimeEntryClient>,
        targets: ReportingConfig,
        request_timeout: Duration,
    ) -> Self {
        Self { client, targets, request_timeout }
    }

    /// Today, this week and this month around `now`, from one query.
    ///
    /// # Errors
    /// Propagates the remote failure or `Timeout`.
    #[instrument(skip(self, now))]
    pub async fn report<Tz>(&self, team_id: &str, now: &DateTime<Tz>) -> Result<TrackedTimeReport>
    where
        Tz: TimeZone,
    {
        let superset = superset_range(now)?;
        let entries = self.fetch(team_id, superset).await?;
        debug!(count = entries.len(), "Fetched entries for report");

        let bucket = |period| -> Result<TimeBucket> {
            Ok(TimeBucket::from_entries(
                period,
                period_range(period, now)?,
                &entries,
                self.target_hours(period),
            ))
        };

        Ok(TrackedTimeReport {
            today: bucket(Period::Today)?,
            week: bucket(Period::ThisWeek)?,
            month: bucket(Period::ThisMonth)?,
        })
    }

    /// A single bucket, queried on its own range.
    ///
    /// # Errors
    /// Propagates the remote failure or `Timeout`.
    #[instrument(skip(self, now))]
    pub async fn bucket_for<Tz>(
        &self,
        team_id: &str,
        period: Period,
        now: &DateTime<Tz>,
    ) -> Result<TimeBucket>
    where
        Tz: TimeZone,
    {
        let range = period_range(period, now)?;
        let entries = self.fetch(team_id, range).await?;
        Ok(TimeBucket::from_entries(period, range, &entries, self.target_hours(period)))
    }

    fn target_hours(&self, period: Period) -> Option<f64> {
        match period {
            Period::Today => self.targets.daily_target_hours,
            Period::ThisWeek => self.targets.weekly_target_hours,
            Period::ThisMonth => self.targets.monthly_target_hours,
        }
    }

    async fn fetch(&self, team_id: &str, range: TimeRange) -> Result<Vec<TimeEntry>> {
        let limit = self.request_timeout;
        tokio::time::timeout(limit, self.client.get_time_entries(team_id, range))
            .await
            .map_err(|_| ClickTickError::Timeout(limit))?
    }
}
