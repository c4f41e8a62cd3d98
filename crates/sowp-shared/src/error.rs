use thiserror::Error;

/// Reasons an outgoing chat message is refused before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Author is required")]
    EmptyAuthor,

    #[error("Message is empty")]
    EmptyBody,

    #[error("Message too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },
}
