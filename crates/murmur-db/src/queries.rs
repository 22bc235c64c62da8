use rusqlite::{Connection, ErrorCode, OptionalExtension, ffi};

use murmur_core::{AccountRecord, MessageRecord, Store, StoreError, StoreResult};
use murmur_types::{Account, Message};

use crate::Database;
use crate::models::{AccountRow, MessageRow};

impl Store for Database {
    // -- Accounts --

    fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        self.with_conn(|conn| query_account_by_username(conn, username).map_err(backend))
    }

    fn account_exists_by_id(&self, id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            exists(conn, "SELECT EXISTS(SELECT 1 FROM accounts WHERE account_id = ?1)", id)
                .map_err(backend)
        })
    }

    fn save_account(&self, account: &AccountRecord) -> StoreResult<Account> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (account_id, username, password) VALUES (?1, ?2, ?3)
                 ON CONFLICT(account_id) DO UPDATE
                 SET username = excluded.username, password = excluded.password",
                rusqlite::params![account.account_id, account.username, account.password_hash],
            )
            .map_err(|e| match constraint(&e) {
                Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => StoreError::DuplicateUsername,
                _ => backend(e),
            })?;

            Ok(Account {
                account_id: account.account_id.unwrap_or_else(|| conn.last_insert_rowid()),
                username: account.username.clone(),
                password_hash: account.password_hash.clone(),
            })
        })
    }

    // -- Messages --

    fn find_message_by_id(&self, id: i64) -> StoreResult<Option<Message>> {
        self.with_conn(|conn| query_message_by_id(conn, id).map_err(backend))
    }

    fn message_exists_by_id(&self, id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            exists(conn, "SELECT EXISTS(SELECT 1 FROM messages WHERE message_id = ?1)", id)
                .map_err(backend)
        })
    }

    fn save_message(&self, message: &MessageRecord) -> StoreResult<Message> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (message_id, posted_by, message_text, time_posted_epoch)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(message_id) DO UPDATE
                 SET posted_by = excluded.posted_by,
                     message_text = excluded.message_text,
                     time_posted_epoch = excluded.time_posted_epoch",
                rusqlite::params![
                    message.message_id,
                    message.posted_by,
                    message.message_text,
                    message.time_posted_epoch
                ],
            )
            .map_err(|e| match constraint(&e) {
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    StoreError::UnknownAccount(message.posted_by)
                }
                _ => backend(e),
            })?;

            Ok(Message {
                message_id: message.message_id.unwrap_or_else(|| conn.last_insert_rowid()),
                posted_by: message.posted_by,
                message_text: message.message_text.clone(),
                time_posted_epoch: message.time_posted_epoch,
            })
        })
    }

    fn delete_message_by_id(&self, id: i64) -> StoreResult<bool> {
        self.with_conn(|conn| {
            let removed = conn
                .execute("DELETE FROM messages WHERE message_id = ?1", [id])
                .map_err(backend)?;
            Ok(removed > 0)
        })
    }

    fn find_all_messages(&self) -> StoreResult<Vec<Message>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                &format!("SELECT {} FROM messages ORDER BY message_id", MessageRow::COLUMNS),
                [],
            )
            .map_err(backend)
        })
    }

    fn find_messages_by_author(&self, account_id: i64) -> StoreResult<Vec<Message>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                &format!(
                    "SELECT {} FROM messages WHERE posted_by = ?1 ORDER BY message_id",
                    MessageRow::COLUMNS
                ),
                [account_id],
            )
            .map_err(backend)
        })
    }
}

fn query_account_by_username(conn: &Connection, username: &str) -> rusqlite::Result<Option<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE username = ?1",
        AccountRow::COLUMNS
    ))?;

    let row = stmt.query_row([username], AccountRow::from_row).optional()?;
    Ok(row.map(Account::from))
}

fn query_message_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Message>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM messages WHERE message_id = ?1",
        MessageRow::COLUMNS
    ))?;

    let row = stmt.query_row([id], MessageRow::from_row).optional()?;
    Ok(row.map(Message::from))
}

fn query_messages<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<Message>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, MessageRow::from_row)?
        .map(|r| r.map(Message::from))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn exists(conn: &Connection, sql: &str, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(sql, [id], |row| row.get(0))
}

/// Extended result code of a constraint violation, if `err` is one.
fn constraint(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str) -> AccountRecord {
        AccountRecord {
            account_id: None,
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    fn message(posted_by: i64, text: &str) -> MessageRecord {
        MessageRecord {
            message_id: None,
            posted_by,
            message_text: text.into(),
            time_posted_epoch: Some(1_669_947_792),
        }
    }

    #[test]
    fn accounts_get_sequential_ids_and_are_found_by_username() {
        let db = Database::open_in_memory().unwrap();
        let alice = db.save_account(&account("alice")).unwrap();
        let bob = db.save_account(&account("bob")).unwrap();
        assert!(bob.account_id > alice.account_id);

        assert_eq!(db.find_account_by_username("alice").unwrap(), Some(alice.clone()));
        assert_eq!(db.find_account_by_username("carol").unwrap(), None);
        assert!(db.account_exists_by_id(alice.account_id).unwrap());
        assert!(!db.account_exists_by_id(999).unwrap());
    }

    #[test]
    fn duplicate_username_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.save_account(&account("alice")).unwrap();
        let err = db.save_account(&account("alice")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[test]
    fn message_with_unknown_author_is_reported() {
        let db = Database::open_in_memory().unwrap();
        let err = db.save_message(&message(42, "hello")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownAccount(42)));
        assert!(db.find_all_messages().unwrap().is_empty());
    }

    #[test]
    fn save_message_inserts_then_updates_in_place() {
        let db = Database::open_in_memory().unwrap();
        let alice = db.save_account(&account("alice")).unwrap();

        let created = db.save_message(&message(alice.account_id, "draft")).unwrap();
        assert_eq!(db.find_message_by_id(created.message_id).unwrap(), Some(created.clone()));

        let mut record = MessageRecord::from(created.clone());
        record.message_text = "final".into();
        let updated = db.save_message(&record).unwrap();
        assert_eq!(updated.message_id, created.message_id);

        let stored = db.find_message_by_id(created.message_id).unwrap().unwrap();
        assert_eq!(stored.message_text, "final");
        assert_eq!(stored.time_posted_epoch, Some(1_669_947_792));
        assert_eq!(db.find_all_messages().unwrap().len(), 1);
    }

    #[test]
    fn null_timestamp_survives_storage() {
        let db = Database::open_in_memory().unwrap();
        let alice = db.save_account(&account("alice")).unwrap();
        let mut record = message(alice.account_id, "no clock");
        record.time_posted_epoch = None;

        let created = db.save_message(&record).unwrap();
        let stored = db.find_message_by_id(created.message_id).unwrap().unwrap();
        assert_eq!(stored.time_posted_epoch, None);
    }

    #[test]
    fn delete_reports_whether_a_row_went_away() {
        let db = Database::open_in_memory().unwrap();
        let alice = db.save_account(&account("alice")).unwrap();
        let msg = db.save_message(&message(alice.account_id, "bye")).unwrap();

        assert!(db.message_exists_by_id(msg.message_id).unwrap());
        assert!(db.delete_message_by_id(msg.message_id).unwrap());
        assert!(!db.delete_message_by_id(msg.message_id).unwrap());
        assert!(!db.message_exists_by_id(msg.message_id).unwrap());
    }

    #[test]
    fn listing_is_in_id_order_and_filters_by_author() {
        let db = Database::open_in_memory().unwrap();
        let alice = db.save_account(&account("alice")).unwrap().account_id;
        let bob = db.save_account(&account("bob")).unwrap().account_id;

        let a1 = db.save_message(&message(alice, "a1")).unwrap();
        let b1 = db.save_message(&message(bob, "b1")).unwrap();
        let a2 = db.save_message(&message(alice, "a2")).unwrap();

        assert_eq!(db.find_all_messages().unwrap(), vec![a1.clone(), b1, a2.clone()]);
        assert_eq!(db.find_messages_by_author(alice).unwrap(), vec![a1, a2]);
        assert!(db.find_messages_by_author(777).unwrap().is_empty());
    }

    #[test]
    fn data_survives_reopen() {
        let path = std::env::temp_dir().join(format!("murmur_reopen_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let db = Database::open(&path).unwrap();
            db.save_account(&account("alice")).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(db.find_account_by_username("alice").unwrap().is_some());
        drop(db);

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
