use crate::core::errors::RupeeError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

const DEFAULT_RETAINED: usize = 1_000;

/// Audit trail kept in memory, oldest first. Once `retained` entries exist the oldest one is
/// evicted for each new action.
#[derive(Clone)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<VecDeque<AppLog>>>,
    retained: usize,
}

impl Default for InMemoryLogging {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETAINED)
    }

    pub fn with_retention(retained: usize) -> Self {
        InMemoryLogging {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            retained: retained.max(1),
        }
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        entity_id: Option<&str>,
    ) -> Result<(), RupeeError> {
        let details: HashMap<String, serde_json::Value> = serde_json::from_value(details)
            .map_err(|e| RupeeError::LoggingError(format!("Audit details must be a JSON object: {}", e)))?;
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            entity_id: entity_id.map(String::from),
            details,
            timestamp: Utc::now(),
        };

        let mut entries = self.entries.write().await;
        while entries.len() >= self.retained {
            entries.pop_front();
        }
        entries.push_back(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, RupeeError> {
        Ok(self.entries.read().await.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn evicts_oldest_entries_past_retention() {
        let logging = InMemoryLogging::with_retention(2);
        for action in ["FIRST", "SECOND", "THIRD"] {
            logging.log_action(action, json!({}), None).await.unwrap();
        }
        let actions: Vec<String> = logging.get_logs().await.unwrap().into_iter().map(|l| l.action).collect();
        assert_eq!(actions, vec!["SECOND", "THIRD"]);
    }

    #[tokio::test]
    async fn rejects_non_object_details() {
        let logging = InMemoryLogging::new();
        let result = logging.log_action("FRIEND_ADDED", json!(["not", "an", "object"]), Some("f1")).await;
        assert!(matches!(result, Err(RupeeError::LoggingError(_))));
        assert!(logging.get_logs().await.unwrap().is_empty());
    }
}
