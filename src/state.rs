//! Shared application state.

use crate::config::Config;
use crate::db::DbPool;

/// State shared with all handlers and middleware via axum's `State` extractor.
///
/// Cloning is cheap: the pool is internally reference-counted and the config
/// is a handful of small strings.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
}
