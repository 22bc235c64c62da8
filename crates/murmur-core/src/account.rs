use argon2::Argon2;
use tracing::{debug, info};

use murmur_types::Account;

use crate::error::{RuleError, RuleResult, USERNAME_TAKEN};
use crate::password::{hash_password, verify_dummy, verify_password};
use crate::store::{AccountRecord, Store};

pub const MIN_PASSWORD_LEN: usize = 4;

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Unvalidated registration payload.
#[derive(Debug, Default, Clone)]
pub struct NewAccount {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Registration and login rules.
pub struct AccountRules<'a, S: Store + ?Sized> {
    store: &'a S,
    argon2: Argon2<'static>,
}

impl<'a, S: Store + ?Sized> AccountRules<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_hasher(store, Argon2::default())
    }

    pub fn with_hasher(store: &'a S, argon2: Argon2<'static>) -> Self {
        Self { store, argon2 }
    }

    pub fn register(&self, candidate: NewAccount) -> RuleResult<Account> {
        let username = match candidate.username {
            Some(u) if !u.trim().is_empty() => u,
            _ => return Err(RuleError::validation("Username cannot be blank")),
        };
        let password = match candidate.password {
            Some(p) if p.chars().count() >= MIN_PASSWORD_LEN => p,
            _ => {
                return Err(RuleError::validation(format!(
                    "Password must be at least {} characters long",
                    MIN_PASSWORD_LEN
                )));
            }
        };

        if self.store.find_account_by_username(&username)?.is_some() {
            return Err(RuleError::conflict(USERNAME_TAKEN));
        }

        let password_hash = hash_password(&self.argon2, &password).map_err(RuleError::Store)?;

        // The store's unique index still catches a concurrent registration
        // that slipped past the lookup above.
        let account = self.store.save_account(&AccountRecord {
            account_id: None,
            username,
            password_hash,
        })?;

        info!(account_id = account.account_id, username = %account.username, "Account registered");
        Ok(account)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> RuleResult<Account> {
        let Some(account) = self.store.find_account_by_username(username)? else {
            // Same hashing cost as a wrong password, so timing does not reveal
            // which usernames exist.
            verify_dummy(&self.argon2, password).map_err(RuleError::Store)?;
            debug!(%username, "Login for unknown username");
            return Err(RuleError::validation(BAD_CREDENTIALS));
        };

        if !verify_password(&self.argon2, password, &account.password_hash)
            .map_err(RuleError::Store)?
        {
            debug!(%username, "Login with wrong password");
            return Err(RuleError::validation(BAD_CREDENTIALS));
        }

        Ok(account)
    }
}
