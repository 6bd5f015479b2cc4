use std::{str::FromStr, time::Duration};

use sea_orm::{
    DatabaseConnection, DbErr as SeaDbErr, SqlxSqliteConnector,
    sqlx::sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
    },
};
use sea_orm_migration::MigratorTrait;
use utils::assets::asset_dir;

pub mod entities;
pub mod models;
pub mod types;

pub use sea_orm::{ConnectionTrait, DbErr, TransactionTrait};

const DATABASE_URL_ENV: &str = "ACCENT_DATABASE_URL";

#[derive(Clone)]
pub struct DBService {
    pub pool: DatabaseConnection,
}

impl DBService {
    pub async fn new() -> Result<DBService, SeaDbErr> {
        let database_url = std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| {
            format!(
                "sqlite://{}",
                asset_dir().join("db.sqlite").to_string_lossy()
            )
        });

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|err| SeaDbErr::Custom(err.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let sqlx_pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|err| SeaDbErr::Custom(err.to_string()))?;
        let pool = SqlxSqliteConnector::from_sqlx_sqlite_pool(sqlx_pool);

        db_migration::Migrator::up(&pool, None).await?;

        Ok(DBService { pool })
    }
}
