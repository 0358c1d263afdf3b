//! Web UI module.
//!
//! Provides a single page for entering connection details and asking questions.

mod handlers;
mod static_files;

pub use handlers::*;
pub use static_files::*;
