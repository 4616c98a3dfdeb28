use crate::core::errors::RupeeError;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key-value persistence port. Each collection is stored whole, as a JSON array, under its
/// collection key.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, RupeeError>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), RupeeError>;
    async fn remove_item(&self, key: &str) -> Result<(), RupeeError>;
}

#[async_trait]
impl Storage for Box<dyn Storage> {
    async fn get_item(&self, key: &str) -> Result<Option<String>, RupeeError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), RupeeError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), RupeeError> {
        (**self).remove_item(key).await
    }
}

/// Reads a collection; a missing key is an empty collection.
pub async fn read_collection<T, S>(storage: &S, key: &str) -> Result<Vec<T>, RupeeError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match storage.get_item(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| RupeeError::StorageError(format!("Collection `{}` is unreadable: {}", key, e))),
        None => Ok(Vec::new()),
    }
}

pub async fn write_collection<T, S>(storage: &S, key: &str, items: &[T]) -> Result<(), RupeeError>
where
    T: Serialize + Sync,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(items)?;
    storage.set_item(key, raw).await
}

pub mod file;
pub mod in_memory;
