//! Key/value persistence port
//!
//! Values are stored as JSON documents under string keys. The typed helpers
//! treat an undecodable value the same as a missing one and log it.

use async_trait::async_trait;
use clicktick_domain::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Persistent string-keyed JSON storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Read and decode `key`.
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let Some(value) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(err) => {
            warn!(key, error = %err, "Discarding undecodable stored value");
            Ok(None)
        }
    }
}

/// Encode and write `value` under `key`.
pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + Sync,
{
    store.set(key, serde_json::to_value(value)?).await
}
