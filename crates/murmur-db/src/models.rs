//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the murmur-types models so the DB layer stays independent.

use murmur_types::{Account, Message};
use rusqlite::Row;

pub struct AccountRow {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

impl AccountRow {
    pub const COLUMNS: &'static str = "account_id, username, password";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            account_id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
        })
    }
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            account_id: row.account_id,
            username: row.username,
            password_hash: row.password,
        }
    }
}

pub struct MessageRow {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: Option<i64>,
}

impl MessageRow {
    pub const COLUMNS: &'static str = "message_id, posted_by, message_text, time_posted_epoch";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            message_id: row.get(0)?,
            posted_by: row.get(1)?,
            message_text: row.get(2)?,
            time_posted_epoch: row.get(3)?,
        })
    }
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            message_id: row.message_id,
            posted_by: row.posted_by,
            message_text: row.message_text,
            time_posted_epoch: row.time_posted_epoch,
        }
    }
}
