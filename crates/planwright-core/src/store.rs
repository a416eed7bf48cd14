//! Persistence collaborator seam.
//!
//! The planning facade never does I/O itself. It hands finished
//! [`GenerationRecord`]s to a [`PlanStore`] keyed by plan id and reads them
//! back for partial updates. Store errors are passed through unchanged.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use planwright_model::GenerationRecord;

/// Storage for generation records, keyed by plan id.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Insert or replace the record for `record.plan.id`.
    async fn save(&self, record: &GenerationRecord) -> Result<()>;

    /// Fetch the record for `plan_id`, or `None` if nothing was saved.
    async fn load(&self, plan_id: Uuid) -> Result<Option<GenerationRecord>>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn PlanStore) {}
};

/// In-process [`PlanStore`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, GenerationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing record, e.g. one read from disk.
    pub async fn insert(&self, record: GenerationRecord) {
        self.records.write().await.insert(record.plan_id(), record);
    }

    pub async fn get(&self, plan_id: Uuid) -> Option<GenerationRecord> {
        self.records.read().await.get(&plan_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn save(&self, record: &GenerationRecord) -> Result<()> {
        self.insert(record.clone()).await;
        Ok(())
    }

    async fn load(&self, plan_id: Uuid) -> Result<Option<GenerationRecord>> {
        Ok(self.get(plan_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_model::{Plan, ValidationSummary};

    fn record() -> GenerationRecord {
        GenerationRecord {
            plan: Plan::new("p", ""),
            tasks: vec![],
            critical_path: vec![],
            validation: ValidationSummary::default(),
        }
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryStore::new();
        let record = record();
        store.save(&record).await.unwrap();
        assert_eq!(store.len().await, 1);

        let loaded = store.load(record.plan_id()).await.unwrap();
        assert_eq!(loaded.as_ref(), Some(&record));
        assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let store = MemoryStore::new();
        let mut record = record();
        store.save(&record).await.unwrap();
        record.plan.title = "renamed".to_string();
        store.save(&record).await.unwrap();

        assert_eq!(store.len().await, 1);
        let loaded = store.get(record.plan_id()).await.unwrap();
        assert_eq!(loaded.plan.title, "renamed");
    }
}
