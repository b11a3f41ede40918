//! Integration tests for the tracked-time aggregator and workspace catalog.

mod support;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use clicktick_core::reporting::{period_range, superset_range, BucketStatus, Period, TrackedTimeAggregator};
use clicktick_core::workspace::{ListScope, WorkspaceCatalog};
use clicktick_domain::config::ReportingConfig;
use clicktick_domain::constants::{filtered_spaces_key, spaces_key, TEAMS_KEY, USER_KEY};
use clicktick_domain::{Folder, Space, Team, User};
use support::fixtures::{closed_entry, list, running_entry, task, TEAM_ID};
use support::mocks::{ClientCall, MapStore, MockTimeClient, MockWorkspaceDirectory};

fn hours(n: i64) -> i64 {
    n * 3_600_000
}

/// Validates one superset query feeds all three buckets.
///
/// Assertions:
/// - Exactly one entries query, over the superset range.
/// - Today, week and month totals include only their own entries.
/// - Running entries are excluded.
#[tokio::test]
async fn test_report_buckets_from_single_query() {
    // Wednesday 2024-05-15 14:00 UTC; week began Sunday 12th
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 14, 0, 0).unwrap();
    let at = |day, hour| Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap().timestamp_millis();

    let client = Arc::new(MockTimeClient::default().with_entries(vec![
        closed_entry("e1", "t1", at(15, 9), hours(2)),
        closed_entry("e2", "t2", at(13, 9), hours(3)),
        closed_entry("e3", "t1", at(2, 9), hours(4)),
        running_entry("t1", at(15, 13)),
    ]));
    let aggregator = TrackedTimeAggregator::new(
        client.clone(),
        ReportingConfig { daily_target_hours: Some(8.0), ..ReportingConfig::default() },
        Duration::from_secs(5),
    );

    let report = aggregator.report(TEAM_ID, &now).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![ClientCall::Entries { team_id: TEAM_ID.into(), range: superset_range(&now).unwrap() }]
    );
    assert_eq!(report.today.total_ms, hours(2));
    assert_eq!(report.today.status, BucketStatus::BelowTarget);
    assert_eq!(report.today.header(), "Tracked Time today: 2h 0m");
    assert_eq!(report.week.total_ms, hours(5));
    assert_eq!(report.week.status, BucketStatus::Untargeted);
    assert_eq!(report.month.total_ms, hours(9));
    assert_eq!(report.month.tasks[0].task_id.as_deref(), Some("t1"));
    assert_eq!(report.month.tasks[0].total_ms, hours(6));
    assert_eq!(report.buckets().len(), 3);
}

/// Validates the per-period variant queries only its own range.
#[tokio::test]
async fn test_bucket_for_single_period() {
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 14, 0, 0).unwrap();
    let client = Arc::new(MockTimeClient::default());
    let aggregator =
        TrackedTimeAggregator::new(client.clone(), ReportingConfig::default(), Duration::from_secs(5));

    let bucket = aggregator.bucket_for(TEAM_ID, Period::ThisWeek, &now).await.unwrap();

    assert_eq!(bucket.status, BucketStatus::Empty);
    assert_eq!(bucket.header(), "Tracked Time this week: 0s");
    assert_eq!(
        client.calls(),
        vec![ClientCall::Entries {
            team_id: TEAM_ID.into(),
            range: period_range(Period::ThisWeek, &now).unwrap(),
        }]
    );
}

fn space(id: &str) -> Space {
    Space {
        id: id.into(),
        name: format!("Space {id}"),
        private: false,
        color: None,
        avatar: None,
        archived: false,
        multiple_assignees: true,
    }
}

fn catalog(spaces: Vec<Space>) -> (WorkspaceCatalog, Arc<MockWorkspaceDirectory>, Arc<MapStore>) {
    catalog_over(spaces, |_| {})
}

fn catalog_over(
    spaces: Vec<Space>,
    seed: impl FnOnce(&mut MockWorkspaceDirectory),
) -> (WorkspaceCatalog, Arc<MockWorkspaceDirectory>, Arc<MapStore>) {
    let team = Team {
        id: TEAM_ID.into(),
        name: "Acme".into(),
        color: None,
        avatar: None,
        members: Vec::new(),
    };
    let mut directory =
        MockWorkspaceDirectory::new(vec![team], HashMap::from([(TEAM_ID.to_string(), spaces)]));
    seed(&mut directory);
    let directory = Arc::new(directory);
    let store = Arc::new(MapStore::default());
    (WorkspaceCatalog::new(directory.clone(), store.clone()), directory, store)
}

/// Validates teams and spaces are fetched once, then served from storage.
#[tokio::test]
async fn test_catalog_caches_and_resets() {
    let (catalog, directory, store) = catalog(vec![space("s1")]);

    assert_eq!(catalog.teams().await.unwrap()[0].name, "Acme");
    assert_eq!(catalog.teams().await.unwrap().len(), 1);
    assert_eq!(catalog.default_team().await.unwrap().id, TEAM_ID);
    assert_eq!(catalog.spaces(TEAM_ID).await.unwrap().len(), 1);
    assert_eq!(catalog.spaces(TEAM_ID).await.unwrap().len(), 1);
    assert_eq!(directory.fetches(), 2);
    assert!(store.value(TEAMS_KEY).is_some());
    assert!(store.value(&spaces_key(TEAM_ID)).is_some());

    catalog.reset_teams().await.unwrap();
    assert!(store.value(TEAMS_KEY).is_none());
    catalog.teams().await.unwrap();
    catalog.refresh_spaces(TEAM_ID).await.unwrap();
    assert_eq!(directory.fetches(), 4);
}

/// Validates the space filter needs more than one space and is applied.
#[tokio::test]
async fn test_space_filter() {
    let (single, _, single_store) = catalog(vec![space("s1")]);
    assert!(!single.save_space_filter(TEAM_ID, &["s1".to_string()]).await.unwrap());
    assert!(single_store.value(&filtered_spaces_key(TEAM_ID)).is_none());

    let (catalog, _, _) = catalog(vec![space("s1"), space("s2"), space("s3")]);
    assert_eq!(catalog.visible_spaces(TEAM_ID).await.unwrap().len(), 3);

    let saved = catalog
        .save_space_filter(TEAM_ID, &["s3".to_string(), "unknown".to_string(), "s1".to_string()])
        .await
        .unwrap();

    assert!(saved);
    assert_eq!(
        catalog.space_filter(TEAM_ID).await.unwrap(),
        Some(vec!["s1".to_string(), "s3".to_string()])
    );
    let visible: Vec<String> =
        catalog.visible_spaces(TEAM_ID).await.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(visible, vec!["s1".to_string(), "s3".to_string()]);
}

/// Validates lists carry a task count, counting tasks only when the listing
/// omits it.
///
/// Assertions:
/// - A reported count is used as is without fetching tasks
/// - A missing count is filled in from the list's tasks
/// - Folder scope reads the folder's lists, space scope the folderless ones
#[tokio::test]
async fn test_lists_are_summarized_with_task_counts() {
    let (catalog, directory, _) = catalog_over(vec![space("s1")], |dir| {
        dir.folders.insert(
            "s1".into(),
            vec![Folder { id: "f1".into(), name: "Sprint".into(), hidden: false, space: None, lists: Vec::new() }],
        );
        dir.space_lists.insert("s1".into(), vec![list("l1", "Inbox", Some(4))]);
        dir.folder_lists.insert("f1".into(), vec![list("l2", "Backlog", None)]);
        dir.tasks.insert("l2".into(), vec![task("t1", "One"), task("t2", "Two")]);
    });

    let folders = catalog.folders("s1").await.unwrap();
    assert_eq!(folders[0].name, "Sprint");

    let inbox = catalog.lists(ListScope::Space("s1")).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].task_count, 4);
    assert_eq!(inbox[0].label(), "Inbox (4)");
    assert_eq!(directory.fetches(), 2);

    let backlog = catalog.lists(ListScope::Folder("f1")).await.unwrap();
    assert_eq!(backlog[0].label(), "Backlog (2)");
    assert_eq!(directory.fetches(), 4);

    let tasks = catalog.tasks("l2").await.unwrap();
    assert_eq!(tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["t1", "t2"]);
    assert!(catalog.tasks("missing").await.is_err());
}

/// Validates "my tasks" queries as the token's user within the space filter.
///
/// Assertions:
/// - The authorized user is fetched once and cached
/// - Without a filter every space is searched (no space ids sent)
/// - With a filter only the filtered space ids are sent
#[tokio::test]
async fn test_my_tasks_follow_user_and_space_filter() {
    let (catalog, directory, store) = catalog_over(vec![space("s1"), space("s2")], |dir| {
        dir.user = User { id: 42, username: Some("ana".into()), ..User::default() };
        dir.my_tasks = vec![task("t9", "Mine")];
    });

    let mine = catalog.my_tasks(TEAM_ID).await.unwrap();
    assert_eq!(mine[0].id, "t9");
    assert!(store.value(USER_KEY).is_some());

    catalog.save_space_filter(TEAM_ID, &["s2".to_string()]).await.unwrap();
    catalog.my_tasks(TEAM_ID).await.unwrap();

    assert_eq!(
        directory.my_task_queries(),
        vec![
            (TEAM_ID.to_string(), 42, Vec::new()),
            (TEAM_ID.to_string(), 42, vec!["s2".to_string()]),
        ]
    );
    assert_eq!(catalog.me().await.unwrap().id, 42);

    catalog.reset_user().await.unwrap();
    assert!(store.value(USER_KEY).is_none());
}
