use sowp_shared::ValidationError;
use sowp_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid message: {0}")]
    Validation(#[from] ValidationError),

    /// The chat is closed and the sender's role is muted.
    #[error("Group chat is closed")]
    ChatClosed,

    /// A page jump past the last page; the list is left unchanged.
    #[error("Page {requested} out of range (0..{total})")]
    PageOutOfRange { requested: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, ClientError>;
