use std::sync::Arc;

use argon2::Argon2;
use axum::{Json, extract::State};

use murmur_core::{AccountRules, NewAccount};
use murmur_db::Database;
use murmur_types::Account;
use murmur_types::api::{LoginRequest, RegisterRequest};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::run_blocking;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Password hashing parameters. `Argon2::default()` outside of tests.
    pub argon2: Argon2<'static>,
}

impl AppStateInner {
    pub fn new(db: Database) -> Self {
        Self::with_hasher(db, Argon2::default())
    }

    pub fn with_hasher(db: Database, argon2: Argon2<'static>) -> Self {
        Self { db, argon2 }
    }

    pub fn accounts(&self) -> AccountRules<'_, Database> {
        AccountRules::with_hasher(&self.db, self.argon2.clone())
    }
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<Account>> {
    let account = run_blocking(&state, move |s| {
        s.accounts().register(NewAccount {
            username: req.username,
            password: req.password,
        })
    })
    .await?;

    Ok(Json(account))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<Account>> {
    // Missing or null credentials fail like wrong ones.
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let account = run_blocking(&state, move |s| {
        s.accounts().authenticate(&username, &password)
    })
    .await
    .map_err(|e| match e {
        ApiError::Validation(msg) => ApiError::Unauthorized(msg),
        other => other,
    })?;

    Ok(Json(account))
}
