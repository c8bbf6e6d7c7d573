use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{DatabaseConfig, init_pool};
use common::error::DatabaseError;

use crate::{repositories::CustomerRepository, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting rentals service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply schema migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // Initialize repositories
    let customer_repository = CustomerRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        customer_repository,
    };

    info!("Rentals service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Rentals service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
