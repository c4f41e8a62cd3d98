//! Group chat on top of the store.

use serde::Serialize;
use sowp_shared::constants::{MAX_MESSAGE_CHARS, PLAIN_USER_ROLE};
use sowp_shared::formatter::{format_message, FormattedMessage};
use sowp_shared::profanity::ProfanityFilter;
use sowp_shared::time::now_millis;
use sowp_shared::ValidationError;
use sowp_store::{Message, MessageStore, StoreClient, StoreEvent};
use tokio::sync::broadcast;

use crate::error::{ClientError, Result};

/// A message together with its rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatLine {
    pub message: Message,
    pub formatted: FormattedMessage,
}

/// Posting, reading and moderating the group chat.
#[derive(Clone)]
pub struct ChatService {
    store: StoreClient,
    profanity: ProfanityFilter,
}

impl ChatService {
    pub fn new(store: StoreClient) -> Self {
        Self::with_filter(store, ProfanityFilter::default())
    }

    pub fn with_filter(store: StoreClient, profanity: ProfanityFilter) -> Self {
        Self { store, profanity }
    }

    /// Post a message stamped with the current time.
    pub async fn send(&self, author: &str, role: &str, body: &str) -> Result<Message> {
        self.send_at(author, role, body, now_millis()).await
    }

    /// Post a message with an explicit timestamp.
    ///
    /// The body is trimmed and profanity is masked before storing.  While
    /// the chat is closed only senders whose `role` passes
    /// [`may_post_when_closed`] get through.
    pub async fn send_at(
        &self,
        author: &str,
        role: &str,
        body: &str,
        timestamp: i64,
    ) -> Result<Message> {
        let (author, body) = validate(author, body)?;

        if !may_post_when_closed(role) && !self.store.chat_mode().await? {
            tracing::debug!(author, role, "message refused, chat is closed");
            return Err(ClientError::ChatClosed);
        }

        let body = self.profanity.filter(body);
        Ok(self.store.insert_message(author, &body, timestamp).await?)
    }

    /// Messages `viewer` can see, oldest first.
    pub async fn visible_messages(&self, viewer: &str) -> Result<Vec<Message>> {
        Ok(self.store.messages_visible_to(viewer).await?)
    }

    /// Like [`visible_messages`](Self::visible_messages), with formatting
    /// applied.
    pub async fn visible_lines(&self, viewer: &str) -> Result<Vec<ChatLine>> {
        let messages = self.visible_messages(viewer).await?;
        Ok(messages
            .into_iter()
            .map(|message| {
                let formatted = format_message(&message.body);
                ChatLine { message, formatted }
            })
            .collect())
    }

    /// Hide a message for one viewer only.  Hiding twice is a no-op.
    pub async fn hide_for(&self, key: &str, viewer: &str) -> Result<()> {
        let changed = self.store.hide_message_for(key, viewer).await?;
        if !changed {
            tracing::debug!(key, viewer, "message already hidden");
        }
        Ok(())
    }

    /// Remove a message for everyone.  Returns `false` if it was already gone.
    pub async fn delete_for_everyone(&self, key: &str) -> Result<bool> {
        Ok(self.store.delete_message(key).await?)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    pub async fn chat_mode(&self) -> Result<bool> {
        Ok(self.store.chat_mode().await?)
    }

    pub async fn set_chat_mode(&self, open: bool) -> Result<()> {
        Ok(self.store.set_chat_mode(open).await?)
    }
}

/// Whether a sender with `role` may post while the chat is closed.
///
/// Closing the chat mutes plain users only; admins and staff keep posting.
pub fn may_post_when_closed(role: &str) -> bool {
    !role.trim().eq_ignore_ascii_case(PLAIN_USER_ROLE)
}

/// Trimmed author and body, or the reason they are refused.
fn validate<'a>(author: &'a str, body: &'a str) -> std::result::Result<(&'a str, &'a str), ValidationError> {
    let author = author.trim();
    if author.is_empty() {
        return Err(ValidationError::EmptyAuthor);
    }

    let body = body.trim();
    if body.is_empty() {
        return Err(ValidationError::EmptyBody);
    }

    let len = body.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_MESSAGE_CHARS,
        });
    }

    Ok((author, body))
}
