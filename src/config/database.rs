use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

pub async fn connect(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .inspect_err(|e| tracing::error!("Failed to connect to database: {}", e))?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
