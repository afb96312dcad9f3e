use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

use crate::config::Config;

const PRAGMAS: [&str; 2] = ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

pub async fn connect_and_migrate(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let database_url = config.database_url.as_str();
    let in_memory = database_url.contains(":memory:");

    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    if in_memory {
        // every pooled connection would otherwise see its own empty database
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;

    if !in_memory {
        for pragma in PRAGMAS {
            db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string()))
                .await?;
        }
    }

    Migrator::up(&db, None).await?;
    tracing::debug!(in_memory, "database ready");
    Ok(db)
}
