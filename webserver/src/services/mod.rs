//! Service implementations
//!
//! Real implementations of the service traits for production use

pub mod editor_store;

// Re-export service implementations
pub use editor_store::RealEditorStore;
