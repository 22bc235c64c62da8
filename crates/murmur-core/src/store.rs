use murmur_types::{Account, Message};

use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Account as handed to [`Store::save_account`]. `account_id` is `None` for
/// a new row.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account_id: Option<i64>,
    pub username: String,
    pub password_hash: String,
}

/// Message as handed to [`Store::save_message`]. `message_id` is `None` for
/// a new row; otherwise the existing row is overwritten.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub message_id: Option<i64>,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: Option<i64>,
}

impl From<Message> for MessageRecord {
    fn from(m: Message) -> Self {
        Self {
            message_id: Some(m.message_id),
            posted_by: m.posted_by,
            message_text: m.message_text,
            time_posted_epoch: m.time_posted_epoch,
        }
    }
}

/// Persistence consumed by the rules.
///
/// Implementations should enforce username uniqueness and the author
/// reference themselves, reporting violations as
/// [`StoreError::DuplicateUsername`] and [`StoreError::UnknownAccount`].
pub trait Store: Send + Sync {
    // -- Accounts --

    fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    fn account_exists_by_id(&self, id: i64) -> StoreResult<bool>;

    fn save_account(&self, account: &AccountRecord) -> StoreResult<Account>;

    // -- Messages --

    fn find_message_by_id(&self, id: i64) -> StoreResult<Option<Message>>;

    /// Part of the store contract for boundary callers. The rules themselves
    /// go by the row count of [`Store::delete_message_by_id`].
    fn message_exists_by_id(&self, id: i64) -> StoreResult<bool>;

    fn save_message(&self, message: &MessageRecord) -> StoreResult<Message>;

    /// Returns `true` if a row was removed.
    fn delete_message_by_id(&self, id: i64) -> StoreResult<bool>;

    fn find_all_messages(&self) -> StoreResult<Vec<Message>>;

    fn find_messages_by_author(&self, account_id: i64) -> StoreResult<Vec<Message>>;
}
