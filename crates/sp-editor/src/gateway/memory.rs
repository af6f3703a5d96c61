//! In-process layout store

use std::collections::BTreeMap;

use chrono::Utc;
use parking_lot::Mutex;
use sp_core::{LayoutDocument, LayoutSummary, OwnerRef};
use uuid::Uuid;

use super::{GatewayError, LayoutGateway};

/// Gateway keeping documents in memory, for offline use and tests.
///
/// Assigns ids and timestamps the way the REST backend does.
#[derive(Default)]
pub struct MemoryGateway {
    documents: Mutex<BTreeMap<String, LayoutDocument>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }
}

impl LayoutGateway for MemoryGateway {
    fn list(&self) -> Result<Vec<LayoutSummary>, GatewayError> {
        Ok(self
            .documents
            .lock()
            .values()
            .map(LayoutDocument::summary)
            .collect())
    }

    fn get(&self, id: &str) -> Result<LayoutDocument, GatewayError> {
        self.documents
            .lock()
            .get(id)
            .cloned()
            .map(LayoutDocument::normalized)
            .ok_or(GatewayError::NotFound)
    }

    fn create(&self, document: &LayoutDocument) -> Result<LayoutDocument, GatewayError> {
        let now = Utc::now();
        let mut stored = document.clone().normalized();
        let id = Uuid::new_v4().simple().to_string();
        stored.id = Some(id.clone());
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.documents.lock().insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, id: &str, document: &LayoutDocument) -> Result<LayoutDocument, GatewayError> {
        let mut documents = self.documents.lock();
        let existing = documents.get_mut(id).ok_or(GatewayError::NotFound)?;
        // Only name and aisles are writable; id, owner and creation time stay
        existing.name = document.name.clone();
        existing.aisles = document.aisles.clone();
        existing.normalize();
        existing.updated_at = Some(Utc::now());
        Ok(existing.clone())
    }

    fn remove(&self, id: &str) -> Result<(), GatewayError> {
        self.documents
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or(GatewayError::NotFound)
    }

    fn assign(&self, id: &str, owner_id: &str) -> Result<LayoutDocument, GatewayError> {
        let mut documents = self.documents.lock();
        let existing = documents.get_mut(id).ok_or(GatewayError::NotFound)?;
        existing.owner = Some(OwnerRef::Id(owner_id.to_string()));
        existing.updated_at = Some(Utc::now());
        Ok(existing.clone())
    }
}
