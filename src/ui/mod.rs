//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: async work that must stay on the main thread (file and message dialogs)
//! - `rayon::spawn`: CPU and disk heavy work (directory scan, decoding, PNG export)
//! - `slint::invoke_from_event_loop`: hands results from rayon back to the UI thread
//! - `slint::Timer`: the delayed window state write, which already runs on the UI thread

pub mod gallery_view;
pub mod handlers;
pub mod window_state;

pub use handlers::setup_handlers;
