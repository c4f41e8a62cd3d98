//! # sowp-client
//!
//! Client-side policies of the SOWP course platform:
//!
//! - [`retention`]: the chat retention sweeper (7-day horizon, 24-hour
//!   cooldown, batched deletions joined before reporting)
//! - [`listing`]: the in-memory paginated list controller used by every
//!   course, topic and user screen
//! - [`scroll`]: the cursor-based incremental loader for long lists
//! - [`chat`]: group chat operations on top of the store
//!
//! [`state::AppState`] is the composition root that wires them to one
//! [`sowp_store::StoreClient`].

pub mod catalog;
pub mod chat;
pub mod config;
pub mod listing;
pub mod retention;
pub mod scroll;
pub mod state;

mod error;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use listing::{EmptyState, ListView, Listable, PageInfo, PaginatedList};
pub use retention::{RetentionPolicy, RetentionSweeper, SweepOutcome, SweepReport};
pub use scroll::{FetchOutcome, FetchTicket, ScrollPager};
pub use state::AppState;
