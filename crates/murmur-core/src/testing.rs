//! In-memory [`Store`] used by the rule tests. Enforces the same constraints
//! as the SQLite schema.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use argon2::{Algorithm, Argon2, Params, Version};
use murmur_types::{Account, Message};

use crate::error::StoreError;
use crate::store::{AccountRecord, MessageRecord, Store, StoreResult};

/// Minimal-cost Argon2id so tests don't spend seconds hashing.
pub fn cheap_argon2() -> Argon2<'static> {
    let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
        .expect("valid argon2 params");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    messages: BTreeMap<i64, Message>,
    next_account_id: i64,
    next_message_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    hide_usernames: AtomicBool,
    claim_accounts_exist: AtomicBool,
}

impl MemoryStore {
    /// Insert an account directly, bypassing the rules.
    pub fn add_account(&self, username: &str) -> i64 {
        self.save_account(&AccountRecord {
            account_id: None,
            username: username.into(),
            password_hash: String::new(),
        })
        .expect("fresh username")
        .account_id
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.tables.lock().unwrap().accounts.values().cloned().collect()
    }

    /// Make `find_account_by_username` always miss, simulating a concurrent
    /// registration that lands between lookup and insert.
    pub fn hide_usernames_from_lookup(&self) {
        self.hide_usernames.store(true, Ordering::SeqCst);
    }

    /// Make `account_exists_by_id` always answer `true`, so only the insert
    /// constraint can catch an unknown author.
    pub fn claim_all_accounts_exist(&self) {
        self.claim_accounts_exist.store(true, Ordering::SeqCst);
    }
}

impl Store for MemoryStore {
    fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        if self.hide_usernames.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    fn account_exists_by_id(&self, id: i64) -> StoreResult<bool> {
        if self.claim_accounts_exist.load(Ordering::SeqCst) {
            return Ok(true);
        }
        Ok(self.tables.lock().unwrap().accounts.contains_key(&id))
    }

    fn save_account(&self, account: &AccountRecord) -> StoreResult<Account> {
        let mut tables = self.tables.lock().unwrap();
        let id = match account.account_id {
            Some(id) => id,
            None => {
                tables.next_account_id += 1;
                tables.next_account_id
            }
        };
        if tables
            .accounts
            .values()
            .any(|a| a.username == account.username && a.account_id != id)
        {
            return Err(StoreError::DuplicateUsername);
        }
        let saved = Account {
            account_id: id,
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
        };
        tables.accounts.insert(id, saved.clone());
        Ok(saved)
    }

    fn find_message_by_id(&self, id: i64) -> StoreResult<Option<Message>> {
        Ok(self.tables.lock().unwrap().messages.get(&id).cloned())
    }

    fn message_exists_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.lock().unwrap().messages.contains_key(&id))
    }

    fn save_message(&self, message: &MessageRecord) -> StoreResult<Message> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.accounts.contains_key(&message.posted_by) {
            return Err(StoreError::UnknownAccount(message.posted_by));
        }
        let id = match message.message_id {
            Some(id) => id,
            None => {
                tables.next_message_id += 1;
                tables.next_message_id
            }
        };
        let saved = Message {
            message_id: id,
            posted_by: message.posted_by,
            message_text: message.message_text.clone(),
            time_posted_epoch: message.time_posted_epoch,
        };
        tables.messages.insert(id, saved.clone());
        Ok(saved)
    }

    fn delete_message_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.lock().unwrap().messages.remove(&id).is_some())
    }

    fn find_all_messages(&self) -> StoreResult<Vec<Message>> {
        Ok(self.tables.lock().unwrap().messages.values().cloned().collect())
    }

    fn find_messages_by_author(&self, account_id: i64) -> StoreResult<Vec<Message>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .messages
            .values()
            .filter(|m| m.posted_by == account_id)
            .cloned()
            .collect())
    }
}
