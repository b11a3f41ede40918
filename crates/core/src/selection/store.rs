//! Persisted selection state

use std::sync::Arc;

use clicktick_domain::constants::{LIST_OF_TASK_ID_KEY, SELECTED_TASK_KEY};
use clicktick_domain::{Result, Task, TaskRecord};
use tracing::warn;

use crate::storage_ports::{load_json, save_json, KeyValueStore};

/// Reads and writes the `selectedTaskData` and `listOfTaskId` records.
#[derive(Clone)]
pub struct SelectedTaskStore {
    store: Arc<dyn KeyValueStore>,
}

impl SelectedTaskStore {
    /// Records kept in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The last selected task, full or partial depending on what was stored.
    pub async fn load(&self) -> Result<Option<TaskRecord>> {
        let Some(value) = self.store.get(SELECTED_TASK_KEY).await? else {
            return Ok(None);
        };

        match TaskRecord::from_stored(value) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(error = %err, "Stored selection is unreadable, ignoring it");
                Ok(None)
            }
        }
    }

    /// Persist the full task as the selection.
    pub async fn save(&self, task: &Task) -> Result<()> {
        save_json(self.store.as_ref(), SELECTED_TASK_KEY, task).await
    }

    /// Drop both the selected task and the remembered list.
    pub async fn clear(&self) -> Result<()> {
        self.store.delete(SELECTED_TASK_KEY).await?;
        self.store.delete(LIST_OF_TASK_ID_KEY).await
    }

    /// Remember the last browsed list.
    pub async fn remember_list(&self, list_id: &str) -> Result<()> {
        save_json(self.store.as_ref(), LIST_OF_TASK_ID_KEY, &list_id).await
    }

    /// The remembered list, if any.
    pub async fn list_id(&self) -> Result<Option<String>> {
        load_json(self.store.as_ref(), LIST_OF_TASK_ID_KEY).await
    }
}
