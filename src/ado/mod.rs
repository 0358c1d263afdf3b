//! Azure DevOps integration.
//!
//! This module provides:
//! - Per-request session credentials
//! - A REST client for WIQL, work item, pull request and build endpoints
//! - WIQL query rendering
//! - Connection validation with categorized failures

pub mod client;
pub mod types;
pub mod validate;
pub mod wiql;

pub use client::*;
pub use types::*;
pub use validate::*;
pub use wiql::{SortDirection, WiqlQuery};
