//! # vibelink-store
//!
//! Durable local state for the VibeLink client, backed by SQLite.
//!
//! Only two things outlive a process: the session token pair, kept under the
//! fixed keys `accessToken` / `refreshToken`, and the last settings snapshot.
//! Everything else is re-fetched from the REST backend.

pub mod credentials;
pub mod database;
pub mod migrations;
pub mod settings;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use settings::SettingsSnapshot;
