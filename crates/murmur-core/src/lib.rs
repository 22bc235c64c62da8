//! Account and message rules for Murmur.
//!
//! The rules hold no state of their own. Each one borrows a [`Store`] and
//! runs to completion on the calling thread.

pub mod account;
pub mod error;
pub mod message;
pub mod password;
pub mod store;

#[cfg(test)]
mod testing;

pub use account::{AccountRules, NewAccount};
pub use error::{RuleError, RuleResult, StoreError};
pub use message::{MessageRules, NewMessage};
pub use store::{AccountRecord, MessageRecord, Store, StoreResult};
