use tracing::{debug, info};

use murmur_types::Message;

use crate::error::{RuleError, RuleResult, UNKNOWN_AUTHOR};
use crate::store::{MessageRecord, Store};

pub const MAX_MESSAGE_LEN: usize = 255;

const BAD_TEXT: &str = "Message text cannot be blank and must be under 255 characters";

/// Unvalidated message payload.
#[derive(Debug, Default, Clone)]
pub struct NewMessage {
    pub posted_by: Option<i64>,
    pub message_text: Option<String>,
    pub time_posted_epoch: Option<i64>,
}

/// Message text must be non-blank and at most [`MAX_MESSAGE_LEN`] characters.
fn checked_text(text: Option<String>) -> RuleResult<String> {
    match text {
        Some(t) if !t.trim().is_empty() && t.chars().count() <= MAX_MESSAGE_LEN => Ok(t),
        _ => Err(RuleError::validation(BAD_TEXT)),
    }
}

/// Message validation and author integrity rules.
pub struct MessageRules<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> MessageRules<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn create(&self, candidate: NewMessage) -> RuleResult<Message> {
        let posted_by = candidate
            .posted_by
            .ok_or_else(|| RuleError::validation(BAD_TEXT))?;
        let message_text = checked_text(candidate.message_text)?;

        if !self.store.account_exists_by_id(posted_by)? {
            return Err(RuleError::validation(UNKNOWN_AUTHOR));
        }

        let message = self.store.save_message(&MessageRecord {
            message_id: None,
            posted_by,
            message_text,
            time_posted_epoch: candidate.time_posted_epoch,
        })?;

        info!(message_id = message.message_id, posted_by, "Message created");
        Ok(message)
    }

    pub fn get_all(&self) -> RuleResult<Vec<Message>> {
        Ok(self.store.find_all_messages()?)
    }

    pub fn get_by_id(&self, id: i64) -> RuleResult<Option<Message>> {
        Ok(self.store.find_message_by_id(id)?)
    }

    /// Returns `false` when there was nothing to delete.
    pub fn delete_by_id(&self, id: i64) -> RuleResult<bool> {
        let deleted = self.store.delete_message_by_id(id)?;
        if deleted {
            info!(message_id = id, "Message deleted");
        }
        Ok(deleted)
    }

    /// Text is validated before the lookup, so a bad edit to a missing
    /// message is a validation error rather than `None`.
    pub fn update(&self, id: i64, new_text: Option<String>) -> RuleResult<Option<Message>> {
        let message_text = checked_text(new_text)?;

        let Some(existing) = self.store.find_message_by_id(id)? else {
            debug!(message_id = id, "Update of missing message");
            return Ok(None);
        };

        let mut record = MessageRecord::from(existing);
        record.message_text = message_text;
        let updated = self.store.save_message(&record)?;

        info!(message_id = id, "Message updated");
        Ok(Some(updated))
    }

    pub fn get_by_author(&self, account_id: i64) -> RuleResult<Vec<Message>> {
        Ok(self.store.find_messages_by_author(account_id)?)
    }
}
