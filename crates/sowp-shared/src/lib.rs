//! # sowp-shared
//!
//! Types and text utilities shared by the SOWP store, client and admin
//! crates: policy constants, validation errors, the chat formatter and the
//! profanity filter.

pub mod constants;
pub mod error;
pub mod formatter;
pub mod profanity;
pub mod time;

pub use error::ValidationError;
