mod budget_tests;
mod data_tests;

use crate::core::errors::RupeeError;
use crate::core::models::audit::AppLog;
use crate::core::money::Money;
use crate::core::services::RupeeService;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

pub fn create_test_service() -> RupeeService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    RupeeService::new(storage, logging)
}

pub fn rupees(amount: i64) -> Money {
    Money::from_minor(amount * 100)
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

/// Reads succeed, every write fails.
#[derive(Default)]
pub struct ReadOnlyStorage {
    inner: InMemoryStorage,
}

#[async_trait]
impl Storage for ReadOnlyStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, RupeeError> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, _key: &str, _value: String) -> Result<(), RupeeError> {
        Err(RupeeError::StorageError("read-only".to_string()))
    }

    async fn remove_item(&self, _key: &str) -> Result<(), RupeeError> {
        Err(RupeeError::StorageError("read-only".to_string()))
    }
}

/// Shares its contents with `inner`; writes to `failing_key` fail once it is set.
#[derive(Clone, Default)]
pub struct FailingKeyStorage {
    pub inner: InMemoryStorage,
    failing_key: Arc<Mutex<Option<String>>>,
}

impl FailingKeyStorage {
    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock().unwrap() = Some(key.to_string());
    }

    fn check(&self, key: &str) -> Result<(), RupeeError> {
        match self.failing_key.lock().unwrap().as_deref() {
            Some(failing) if failing == key => Err(RupeeError::StorageError(format!("{} unavailable", key))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Storage for FailingKeyStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, RupeeError> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), RupeeError> {
        self.check(key)?;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), RupeeError> {
        self.check(key)?;
        self.inner.remove_item(key).await
    }
}

/// Audit trail that rejects every record.
pub struct BrokenLogging;

#[async_trait]
impl LoggingService for BrokenLogging {
    async fn log_action(
        &self,
        _action: &str,
        _details: serde_json::Value,
        _entity_id: Option<&str>,
    ) -> Result<(), RupeeError> {
        Err(RupeeError::LoggingError("audit store offline".to_string()))
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, RupeeError> {
        Ok(Vec::new())
    }
}
