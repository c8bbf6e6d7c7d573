//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::CustomerRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub customer_repository: CustomerRepository,
}
