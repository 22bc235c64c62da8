use std::sync::Mutex;

use anyhow::anyhow;
use argon2::{
    Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// One throwaway hash per parameter set, made on first use.
static DUMMY_HASHES: Mutex<Vec<(Params, String)>> = Mutex::new(Vec::new());

const DUMMY_PASSWORD: &str = "murmur-no-such-account";

/// Hash a password with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(argon2: &Argon2<'_>, password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. A malformed stored hash is
/// an error; a mismatch is `Ok(false)`.
pub fn verify_password(argon2: &Argon2<'_>, password: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("corrupt password hash: {}", e))?;
    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("password verification failed: {}", e)),
    }
}

/// Run a full verification against a throwaway hash built with `argon2`'s
/// parameters. A login for a missing account then costs the same as one
/// with a wrong password.
pub fn verify_dummy(argon2: &Argon2<'_>, password: &str) -> anyhow::Result<()> {
    let dummy = dummy_hash(argon2)?;
    verify_password(argon2, password, &dummy)?;
    Ok(())
}

fn dummy_hash(argon2: &Argon2<'_>) -> anyhow::Result<String> {
    let params = argon2.params();
    if let Some(hash) = cached_dummy(params)? {
        return Ok(hash);
    }

    // Hash outside the lock; a racing thread at worst computes it twice.
    let hash = hash_password(argon2, DUMMY_PASSWORD)?;
    let mut cache = DUMMY_HASHES
        .lock()
        .map_err(|e| anyhow!("dummy hash lock poisoned: {}", e))?;
    if !cache.iter().any(|(p, _)| p == params) {
        cache.push((params.clone(), hash.clone()));
    }
    Ok(hash)
}

pub(crate) fn cached_dummy(params: &Params) -> anyhow::Result<Option<String>> {
    let cache = DUMMY_HASHES
        .lock()
        .map_err(|e| anyhow!("dummy hash lock poisoned: {}", e))?;
    Ok(cache.iter().find(|(p, _)| p == params).map(|(_, h)| h.clone()))
}
