//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::ipnetwork::IpNetwork;

use crate::clicks::ClickContext;
use crate::clicks::ClickEvent;
use crate::links::Link;

use super::Error;
use super::Result;
use super::Storage;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Migrations will be run
    ///
    /// # Errors
    ///
    /// When no connection can be made or the migrations fail
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .map_err(connection_error)?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    ///
    /// # Errors
    ///
    /// When the migrations fail
    pub async fn new_with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(Self { connection_pool })
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_link_by_short_code(&self, short_code: &str) -> Result<Option<Link>> {
        sqlx::query_as::<_, Link>(
            r"
            SELECT id, short_code, url, user_id, created_at
            FROM links
            WHERE short_code = $1
            LIMIT 1
            ",
        )
        .bind(short_code)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)
    }

    async fn save_click(&self, link: &Link, context: &ClickContext) -> Result<ClickEvent> {
        let click = ClickEvent::new(link, context);

        sqlx::query(
            r"
            INSERT INTO link_clicks (id, link_id, referrer, user_agent, ip_address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(click.id)
        .bind(click.link_id)
        .bind(click.referrer.as_deref())
        .bind(click.user_agent.as_deref())
        .bind(click.ip_address.map(IpNetwork::from))
        .bind(click.created_at)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(click)
    }

    async fn count_clicks_by_link(&self, link: &Link) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM link_clicks
            WHERE link_id = $1
            ",
        )
        .bind(link.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)
    }
}

/// Utility function for mapping any error into a connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
