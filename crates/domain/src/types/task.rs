//! Task records
//!
//! A task reaches the core either as a lightweight [`TaskRef`] (an id typed
//! by the user, a stale payload from storage) or as a full [`Task`] fetched
//! from the service. The split is explicit in [`TaskRecord`].

use serde::{Deserialize, Serialize};

/// A ClickUp user as embedded in tasks and time entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Service id.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,
    /// Initials shown in avatars.
    #[serde(default)]
    pub initials: Option<String>,
    /// Avatar URL.
    #[serde(default, rename = "profilePicture")]
    pub profile_picture: Option<String>,
}

/// A task tag with its colors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    /// Display name.
    pub name: String,
    /// Foreground color.
    #[serde(default)]
    pub tag_fg: Option<String>,
    /// Background color.
    #[serde(default)]
    pub tag_bg: Option<String>,
}

/// Workflow status of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Status name, e.g. `in progress`.
    pub status: String,
    /// `open`, `custom` or `closed`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,
}

/// Priority as ClickUp reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    /// Service id.
    pub id: String,
    /// `urgent`, `high`, `normal` or `low`.
    pub priority: String,
    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,
}

/// Id/name pair for the list, folder and space a task lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    /// Service id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A fully fetched task.
///
/// `url` and `team_id` are only present on a full fetch, which is what lets
/// [`TaskRecord::from_stored`] tell a full payload from a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Service id.
    pub id: String,
    /// Workspace-specific id, when custom ids are enabled.
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Team (workspace) the task belongs to.
    pub team_id: String,
    /// Web URL of the task.
    pub url: String,
    /// Current status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Description as plain text.
    #[serde(default)]
    pub text_content: Option<String>,
    /// Epoch millis as a string.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Priority, when set.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Tags attached to it.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Users assigned.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// List it belongs to.
    #[serde(default)]
    pub list: Option<ContainerRef>,
    /// Folder it belongs to.
    #[serde(default)]
    pub folder: Option<ContainerRef>,
    /// Space it belongs to.
    #[serde(default)]
    pub space: Option<ContainerRef>,
}

impl Task {
    /// Human-facing id: the custom id when the workspace uses them.
    pub fn display_id(&self) -> &str {
        self.custom_id.as_deref().filter(|id| !id.is_empty()).unwrap_or(&self.id)
    }

    /// `[id] name`, as shown next to the timer.
    pub fn label(&self) -> String {
        format!("[{}] {}", self.display_id(), self.name)
    }

    /// Due date in epoch millis, if the task has one.
    pub fn due_date_ms(&self) -> Option<i64> {
        self.due_date.as_deref().and_then(super::parse_millis)
    }

    /// Reference carrying the fields a later lookup needs.
    pub fn to_ref(&self) -> TaskRef {
        TaskRef {
            id: self.id.clone(),
            custom_id: self.custom_id.clone(),
            name: Some(self.name.clone()),
            team_id: Some(self.team_id.clone()),
        }
    }
}

/// Partial task reference: enough to look the task up, not enough to track it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    /// Service id.
    pub id: String,
    /// Workspace-specific id, if enabled.
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Team the task belongs to.
    #[serde(default)]
    pub team_id: Option<String>,
}

impl TaskRef {
    /// Reference by id only.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), custom_id: None, name: None, team_id: None }
    }
}

/// A task as handed to the selection controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRecord {
    /// Needs a lookup before it can be tracked.
    Partial(TaskRef),
    /// A fetched task.
    Full(Box<Task>),
}

impl TaskRecord {
    /// Task id, whichever form the record takes.
    pub fn id(&self) -> &str {
        match self {
            Self::Partial(reference) => &reference.id,
            Self::Full(task) => &task.id,
        }
    }

    /// Whether the record can be tracked without a lookup.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Decode a persisted payload, classifying it as full or partial.
    ///
    /// # Errors
    /// Returns the decoding error when the value is neither a task nor a
    /// task reference.
    pub fn from_stored(value: serde_json::Value) -> serde_json::Result<Self> {
        match serde_json::from_value::<Task>(value.clone()) {
            Ok(task) => Ok(Self::Full(Box::new(task))),
            Err(_) => serde_json::from_value::<TaskRef>(value).map(Self::Partial),
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self::Full(Box::new(task))
    }
}

impl From<TaskRef> for TaskRecord {
    fn from(reference: TaskRef) -> Self {
        Self::Partial(reference)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_payload() -> serde_json::Value {
        json!({
            "id": "86a1b2c3",
            "custom_id": "ENG-42",
            "name": "Ship the timer",
            "team_id": "9001",
            "url": "https://app.clickup.com/t/86a1b2c3",
            "status": {"status": "in progress", "type": "custom", "color": "#ff0"},
            "tags": [{"name": "backend", "tag_fg": "#fff", "tag_bg": "#000"}],
            "assignees": [{"id": 7, "username": "dana"}],
            "list": {"id": "l1", "name": "Sprint"},
            "orderindex": "12.0"
        })
    }

    #[test]
    fn full_payload_is_classified_as_complete() {
        let record = TaskRecord::from_stored(full_payload()).unwrap();
        assert!(record.is_complete());
        assert_eq!(record.id(), "86a1b2c3");
    }

    #[test]
    fn payload_without_url_is_partial() {
        let record =
            TaskRecord::from_stored(json!({"id": "86a1b2c3", "name": "Ship the timer"})).unwrap();

        match record {
            TaskRecord::Partial(reference) => {
                assert_eq!(reference.id, "86a1b2c3");
                assert_eq!(reference.name.as_deref(), Some("Ship the timer"));
            }
            TaskRecord::Full(_) => panic!("expected a partial record"),
        }
    }

    #[test]
    fn display_id_prefers_custom_id() {
        let task: Task = serde_json::from_value(full_payload()).unwrap();
        assert_eq!(task.display_id(), "ENG-42");
        assert_eq!(task.label(), "[ENG-42] Ship the timer");

        let plain = Task { custom_id: None, ..task };
        assert_eq!(plain.display_id(), "86a1b2c3");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(TaskRecord::from_stored(json!(42)).is_err());
    }
}
