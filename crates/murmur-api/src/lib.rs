pub mod auth;
pub mod error;
pub mod extract;
pub mod messages;
pub mod routes;

use tracing::error;

use murmur_core::RuleResult;

use crate::auth::{AppState, AppStateInner};
use crate::error::{ApiError, ApiResult};

pub use routes::router;

/// Run a rule call on the blocking pool. SQLite access and password hashing
/// both block.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&AppStateInner) -> RuleResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
        .map_err(ApiError::from)
}
