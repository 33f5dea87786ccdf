pub mod models;
pub mod repository;

pub use repository::{ContentRepository, MemoryRepository, PgRepository};

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/agency_site".to_string()),
            max_connections: std::env::var("DB_POOL_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: std::env::var("DB_POOL_MIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            connect_timeout_secs: std::env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }
}

/// Replace the password in the URL's userinfo with `****` for logging.
/// URLs without a password come back unchanged.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some(at) = rest.rfind('@') else {
        return url.to_string();
    };
    let (userinfo, host) = rest.split_at(at);
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:****{}", scheme, user, host),
        None => url.to_string(),
    }
}

pub async fn init_pool(config: Option<DbConfig>) -> Result<PgPool, sqlx::Error> {
    let config = config.unwrap_or_default();

    tracing::info!("Initializing database connection pool...");
    tracing::debug!("Database URL: {}", redact_url(&config.url));

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");
    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> Result<Duration, sqlx::Error> {
    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(start.elapsed())
}

/// Create the content tables. Every list table carries a `position` column;
/// reads order by it so list order survives a round trip.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_settings (
            id SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
            logo TEXT NOT NULL DEFAULT '',
            site_name TEXT NOT NULL DEFAULT '',
            admin_password TEXT NOT NULL DEFAULT '',
            facebook TEXT NOT NULL DEFAULT '',
            instagram TEXT NOT NULL DEFAULT '',
            twitter TEXT NOT NULL DEFAULT '',
            linkedin TEXT NOT NULL DEFAULT '',
            tiktok TEXT NOT NULL DEFAULT '',
            hero_title_part1 TEXT NOT NULL DEFAULT '',
            hero_title_accent TEXT NOT NULL DEFAULT '',
            hero_subtitle TEXT NOT NULL DEFAULT '',
            hero_button_primary TEXT NOT NULL DEFAULT '',
            hero_button_secondary TEXT NOT NULL DEFAULT '',
            hero_image TEXT NOT NULL DEFAULT '',
            services_title TEXT NOT NULL DEFAULT '',
            services_subtitle TEXT NOT NULL DEFAULT '',
            plans_title TEXT NOT NULL DEFAULT '',
            plans_subtitle TEXT NOT NULL DEFAULT '',
            about_title TEXT NOT NULL DEFAULT '',
            cta_title TEXT NOT NULL DEFAULT '',
            cta_text TEXT NOT NULL DEFAULT '',
            cta_button_text TEXT NOT NULL DEFAULT '',
            cta_whatsapp_number TEXT NOT NULL DEFAULT '',
            cta_background_image TEXT NOT NULL DEFAULT '',
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#,
    )
    .execute(pool)
    .await?;

    for table in ["service_items", "about_items"] {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                position INTEGER PRIMARY KEY,
                id BIGINT NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT ''
            )
        "#
        ))
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pricing_plans (
            position INTEGER PRIMARY KEY,
            id BIGINT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            price TEXT NOT NULL DEFAULT '',
            period TEXT NOT NULL DEFAULT '',
            button_text TEXT NOT NULL DEFAULT '',
            is_popular BOOLEAN NOT NULL DEFAULT false
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS plan_features (
            plan_position INTEGER NOT NULL REFERENCES pricing_plans(position) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            feature TEXT NOT NULL,
            PRIMARY KEY (plan_position, position)
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            position INTEGER PRIMARY KEY,
            id BIGINT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            media_type TEXT NOT NULL DEFAULT 'image',
            media TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            tech TEXT NOT NULL DEFAULT ''
        )
    "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}
