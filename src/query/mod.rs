//! Natural Language Query Interface.
//!
//! This module provides:
//! - Intent classification for natural language queries
//! - Optional language-model assist for text the rules cannot place
//! - Translation of intents to WIQL queries or REST list calls
//! - Query execution and result normalization

pub mod answer;
pub mod assist;
pub mod classifier;
pub mod executor;
pub mod plan;
pub mod types;

pub use assist::*;
pub use classifier::*;
pub use executor::*;
pub use plan::*;
pub use types::*;
