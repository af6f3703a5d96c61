//! Layout storage gateways
//!
//! A gateway moves [`LayoutDocument`]s to and from a store. Documents coming
//! back from a gateway are always normalized.

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::MemoryGateway;

use sp_core::{LayoutDocument, LayoutSummary};

/// CRUD access to stored layouts
pub trait LayoutGateway: Send + Sync {
    /// Summaries of every layout visible to the caller
    fn list(&self) -> Result<Vec<LayoutSummary>, GatewayError>;

    fn get(&self, id: &str) -> Result<LayoutDocument, GatewayError>;

    /// Store a new layout; the returned document carries the assigned id
    fn create(&self, document: &LayoutDocument) -> Result<LayoutDocument, GatewayError>;

    fn update(&self, id: &str, document: &LayoutDocument) -> Result<LayoutDocument, GatewayError>;

    fn remove(&self, id: &str) -> Result<(), GatewayError>;

    /// Hand a layout to another owner
    fn assign(&self, id: &str, owner_id: &str) -> Result<LayoutDocument, GatewayError>;
}

/// Gateway errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server responded with status {code}")]
    Status { code: u16 },
    #[error("Layout not found")]
    NotFound,
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
}
