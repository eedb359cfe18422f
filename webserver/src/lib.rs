//! Query/Edit API for the EIN names editor
//!
//! Exposes the working-store over a small REST surface: paginated EIN
//! listing, per-EIN detail and save, aggregate stats, and a health probe.
//! Store access goes through the `EditorStore` trait so handlers can be
//! tested against mocks.

pub mod error;
pub mod server;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use server::EditorServer;
pub use services::RealEditorStore;
pub use state::ServerState;
pub use traits::EditorStore;
pub use types::*;
