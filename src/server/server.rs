use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_postgres::*;
use crate::logger::*;
use crate::settings::{Database, Settings};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub struct Server {
    pub user_service: Arc<dyn UserService>,
    pool: Option<PgPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (user_repo, pool): (Arc<dyn UserRepo>, Option<PgPool>) =
            match settings.repo.backend.as_str() {
                "postgres" => {
                    let pool = connect(&settings.database).await?;
                    if settings.database.ensure_schema {
                        ensure_schema(&pool).await?;
                    }
                    (Arc::new(PgUserRepo::new(pool.clone())), Some(pool))
                }
                "memory" => {
                    warn!("memory backend selected, data is lost on shutdown");
                    (Arc::new(InMemoryUserRepo::new()), None)
                }
                other => return Err(anyhow::anyhow!("Unknown repo backend: {}", other)),
            };

        let server = Self::with_repo(user_repo);
        info!(backend = %settings.repo.backend, "server started");

        Ok(Self { pool, ..server })
    }

    /// Wires the service on top of an already built repository.
    pub fn with_repo(user_repo: Arc<dyn UserRepo>) -> Self {
        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(user_repo));
        Self {
            user_service,
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("database pool closed");
        }
    }
}

async fn connect(database: &Database) -> anyhow::Result<PgPool> {
    let options = PgConnectOptions::from_str(&database.url)?
        .options([("statement_timeout", database.statement_timeout_ms)]);

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    let value: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
    debug!(value, "database reachable");

    Ok(pool)
}
