//! Flow-record storage contract.
//!
//! The editor core is transport-agnostic: it talks to whatever backend
//! holds the saved flows through the [`FlowStore`] trait and never sees
//! HTTP, auth headers or retries. An in-memory implementation backs tests
//! and offline runs.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::FlowDocument;
use crate::error::FlowError;

/// A stored flow record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: String,
    pub name: String,
    pub flow_config: FlowDocument,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating or updating a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowPayload {
    pub name: String,
    pub flow_config: FlowDocument,
}

/// Paging parameters, 1-based page index.
#[derive(Debug, Clone, Copy)]
pub struct ListParams {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { page_index: 1, page_size: 10 }
    }
}

/// Fetch contract injected into the editor. Implementations own the
/// transport; the core only sees records in and records out.
pub trait FlowStore {
    fn list(&self, params: ListParams) -> Result<Vec<FlowRecord>, FlowError>;
    fn get(&self, id: &str) -> Result<FlowRecord, FlowError>;
    fn create(&mut self, payload: FlowPayload) -> Result<FlowRecord, FlowError>;
    fn update(&mut self, id: &str, payload: FlowPayload) -> Result<FlowRecord, FlowError>;
    fn delete(&mut self, id: &str) -> Result<(), FlowError>;
}

/// In-memory store, insertion-ordered.
#[derive(Debug, Default)]
pub struct MemoryFlowStore {
    records: IndexMap<String, FlowRecord>,
    clock: u64,
}

impl MemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Monotonic stand-in for a wall-clock timestamp.
    fn tick(&mut self) -> String {
        self.clock += 1;
        format!("t{}", self.clock)
    }
}

impl FlowStore for MemoryFlowStore {
    fn list(&self, params: ListParams) -> Result<Vec<FlowRecord>, FlowError> {
        let page_index = params.page_index.max(1);
        let skip = (page_index - 1) * params.page_size;
        Ok(self
            .records
            .values()
            .skip(skip)
            .take(params.page_size)
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<FlowRecord, FlowError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| FlowError::NotFound(id.to_string()))
    }

    fn create(&mut self, payload: FlowPayload) -> Result<FlowRecord, FlowError> {
        let stamp = self.tick();
        let record = FlowRecord {
            id: Uuid::new_v4().simple().to_string(),
            name: payload.name,
            flow_config: payload.flow_config,
            created_at: stamp.clone(),
            updated_at: stamp,
        };
        debug!("stored flow record {}", record.id);
        self.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&mut self, id: &str, payload: FlowPayload) -> Result<FlowRecord, FlowError> {
        let stamp = self.tick();
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| FlowError::NotFound(id.to_string()))?;
        record.name = payload.name;
        record.flow_config = payload.flow_config;
        record.updated_at = stamp;
        Ok(record.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), FlowError> {
        self.records
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| FlowError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> FlowPayload {
        FlowPayload {
            name: name.into(),
            flow_config: FlowDocument::default(),
        }
    }

    #[test]
    fn test_crud_cycle() {
        let mut store = MemoryFlowStore::new();
        let created = store.create(payload("voices")).unwrap();
        assert_eq!(store.get(&created.id).unwrap().name, "voices");

        let updated = store.update(&created.id, payload("voices v2")).unwrap();
        assert_eq!(updated.name, "voices v2");
        assert_eq!(updated.created_at, created.created_at);
        assert_ne!(updated.updated_at, created.updated_at);

        store.delete(&created.id).unwrap();
        assert!(matches!(store.get(&created.id), Err(FlowError::NotFound(_))));
        assert!(matches!(store.delete(&created.id), Err(FlowError::NotFound(_))));
    }

    #[test]
    fn test_list_pages_in_insertion_order() {
        let mut store = MemoryFlowStore::new();
        for i in 0..5 {
            store.create(payload(&format!("flow {i}"))).unwrap();
        }

        let page1 = store
            .list(ListParams { page_index: 1, page_size: 2 })
            .unwrap();
        let page3 = store
            .list(ListParams { page_index: 3, page_size: 2 })
            .unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].name, "flow 0");
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].name, "flow 4");
    }
}
