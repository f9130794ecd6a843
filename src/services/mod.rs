//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod export_service;
pub mod gallery_service;
pub mod window_state_service;

pub use export_service::ExportService;
pub use gallery_service::GalleryService;
pub use window_state_service::{ManagedWindow, WindowStateStore};
