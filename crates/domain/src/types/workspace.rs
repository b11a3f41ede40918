//! Workspace hierarchy: teams, spaces, folders and lists
//!
//! A team (workspace) holds spaces; a space holds folders and folderless
//! lists; a folder holds lists; lists hold tasks.

use serde::{Deserialize, Deserializer, Serialize};

use super::task::{ContainerRef, User};

/// Membership record of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// The member.
    pub user: User,
}

/// A ClickUp workspace, called a team by the v2 API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Service id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Members of the team.
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

/// Top-level division of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Service id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether only invited members see it.
    #[serde(default)]
    pub private: bool,
    /// Hex color.
    #[serde(default)]
    pub color: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether it is archived.
    #[serde(default)]
    pub archived: bool,
    /// Whether tasks accept several assignees.
    #[serde(default)]
    pub multiple_assignees: bool,
}

/// Group of lists inside a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Service id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hidden folders hold the folderless lists of a space.
    #[serde(default)]
    pub hidden: bool,
    /// Space the folder is in.
    #[serde(default)]
    pub space: Option<ContainerRef>,
    /// Lists embedded in the folder listing.
    #[serde(default)]
    pub lists: Vec<List>,
}

/// A task list, either inside a folder or directly in a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Service id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Open tasks as reported by the service; some endpoints omit it.
    #[serde(default, deserialize_with = "lenient_count")]
    pub task_count: Option<u64>,
    /// Whether it is archived.
    #[serde(default)]
    pub archived: bool,
    /// Parent folder, absent for folderless lists.
    #[serde(default)]
    pub folder: Option<ContainerRef>,
    /// Space it belongs to.
    #[serde(default)]
    pub space: Option<ContainerRef>,
}

/// `task_count` arrives as a number, a numeric string or `null`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number.as_u64(),
        serde_json::Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_task_count_accepts_numbers_and_strings() {
        let lists: Vec<List> = serde_json::from_value(json!([
            {"id": "l1", "name": "Backlog", "task_count": 12},
            {"id": "l2", "name": "Sprint", "task_count": "3"},
            {"id": "l3", "name": "Ideas", "task_count": null},
            {"id": "l4", "name": "Empty"}
        ]))
        .unwrap();

        let counts: Vec<Option<u64>> = lists.iter().map(|list| list.task_count).collect();
        assert_eq!(counts, vec![Some(12), Some(3), None, None]);
    }

    #[test]
    fn folder_carries_its_lists() {
        let folder: Folder = serde_json::from_value(json!({
            "id": "f1",
            "name": "Q3",
            "space": {"id": "s1", "name": "Eng"},
            "lists": [{"id": "l1", "name": "Backlog", "task_count": "4"}]
        }))
        .unwrap();

        assert_eq!(folder.lists[0].task_count, Some(4));
        assert_eq!(folder.space.unwrap().id, "s1");
    }
}
