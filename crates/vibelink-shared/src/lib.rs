//! # vibelink-shared
//!
//! Types shared by every VibeLink crate: domain entities, the REST wire
//! schemas with their boundary validation, the error taxonomy, and the
//! client-side matching engine.

pub mod constants;
pub mod error;
pub mod matching;
pub mod models;
pub mod protocol;
pub mod types;
