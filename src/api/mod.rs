//! HTTP API module.
//!
//! Exposes connection testing and natural language queries as JSON endpoints
//! for the embedded web page and other clients.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
