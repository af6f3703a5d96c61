//! Shelfplan Editor
//!
//! Editing components, the layout store and persistence for the store
//! layout designer, driven from a line console.

pub mod actions;
pub mod components;
pub mod config;
pub mod console;
pub mod gateway;
pub mod persistence;
pub mod session;
pub mod state;
pub mod store;

// Re-exports for convenience
pub use config::{ConfigManager, EditorConfig};
pub use console::Console;
pub use gateway::{GatewayError, HttpGateway, LayoutGateway, MemoryGateway};
pub use persistence::{Persistence, PersistenceError};
pub use session::{Role, Session};
pub use state::{EditorAction, EditorState, SharedEditorState, create_shared_state};
pub use store::LayoutStore;
