//! Save, load and manage layouts through a gateway
//!
//! One operation runs at a time: a second call while one is in flight is
//! rejected with [`PersistenceError::Busy`]. Callers must not hold the editor
//! state lock across these calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sp_core::{LayoutDocument, LayoutSummary, OwnerRef};

use crate::gateway::{GatewayError, LayoutGateway};
use crate::session::Session;

/// Persistence errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Another save or load is still running")]
    Busy,
    #[error("Not allowed: {0}")]
    Forbidden(String),
    #[error("Layout has not been saved yet")]
    NoLayoutId,
}

/// Marks an operation in flight until dropped
pub struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Persistence {
    gateway: Arc<dyn LayoutGateway>,
    session: Session,
    in_flight: AtomicBool,
}

impl Persistence {
    pub fn new(gateway: Arc<dyn LayoutGateway>, session: Session) -> Self {
        Self {
            gateway,
            session,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the in-flight slot
    pub fn begin(&self) -> Result<InFlight<'_>, PersistenceError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PersistenceError::Busy)?;
        Ok(InFlight {
            flag: &self.in_flight,
        })
    }

    /// Create the layout if it has no id yet, otherwise update it
    pub fn save(&self, document: &LayoutDocument) -> Result<LayoutDocument, PersistenceError> {
        let _guard = self.begin()?;
        let saved = match document.id.as_deref() {
            None => {
                if !self.session.can_create() {
                    return Err(PersistenceError::Forbidden(
                        "only admins can create layouts".to_string(),
                    ));
                }
                let mut document = document.clone();
                if document.owner.is_none()
                    && let Some(user) = &self.session.user_id
                {
                    document.owner = Some(OwnerRef::Id(user.clone()));
                }
                self.gateway.create(&document)?
            }
            Some(id) => {
                let owner = document.owner.as_ref().map(OwnerRef::id);
                if !self.session.can_update(owner) {
                    return Err(PersistenceError::Forbidden(
                        "layout belongs to another owner".to_string(),
                    ));
                }
                self.gateway.update(id, document)?
            }
        };
        tracing::info!(
            "Saved layout '{}' ({})",
            saved.name,
            saved.id.as_deref().unwrap_or("no id")
        );
        Ok(saved)
    }

    pub fn load(&self, id: &str) -> Result<LayoutDocument, PersistenceError> {
        let _guard = self.begin()?;
        let document = self.gateway.get(id)?;
        let owner = document.owner.as_ref().map(OwnerRef::id);
        if !self.session.can_update(owner) {
            return Err(PersistenceError::Forbidden(
                "layout belongs to another owner".to_string(),
            ));
        }
        Ok(document)
    }

    pub fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        if !self.session.can_delete() {
            return Err(PersistenceError::Forbidden(
                "only admins can delete layouts".to_string(),
            ));
        }
        let _guard = self.begin()?;
        self.gateway.remove(id)?;
        tracing::info!("Deleted layout {}", id);
        Ok(())
    }

    /// Layouts visible to the session: all for admins, their own for owners
    pub fn list(&self) -> Result<Vec<LayoutSummary>, PersistenceError> {
        let _guard = self.begin()?;
        let mut summaries = self.gateway.list()?;
        if !self.session.is_admin() {
            let user = self.session.user_id.as_deref();
            summaries.retain(|summary| summary.owner.as_deref() == user && user.is_some());
        }
        Ok(summaries)
    }

    pub fn assign(&self, id: &str, owner_id: &str) -> Result<LayoutDocument, PersistenceError> {
        if !self.session.can_assign() {
            return Err(PersistenceError::Forbidden(
                "only admins can assign layouts".to_string(),
            ));
        }
        let _guard = self.begin()?;
        let document = self.gateway.assign(id, owner_id)?;
        tracing::info!("Assigned layout {} to {}", id, owner_id);
        Ok(document)
    }
}
