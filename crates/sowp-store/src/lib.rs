//! # sowp-store
//!
//! Local storage for the SOWP course platform, backed by SQLite (SQLCipher
//! with the `sqlcipher` feature).
//!
//! The crate exposes a synchronous [`Database`] handle with typed CRUD
//! helpers for chat messages, courses, topics, users and settings, and an
//! async [`StoreClient`] that serialises access to it, broadcasts change
//! events and implements the [`traits`] consumed by the client policies.

pub mod client;
pub mod courses;
pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod settings;
pub mod topics;
pub mod traits;
pub mod users;

mod error;

pub use client::{ImportSummary, StoreClient, StoreEvent};
pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
pub use traits::{Cursored, MessageStore, PageSource};
