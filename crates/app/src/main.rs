use migration::{Migrator, MigratorTrait};
use server::ServerOptions;

mod error;
mod settings;

#[tokio::main]
async fn main() -> error::Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let timezone = settings.server.timezone()?;
    let db = connect_database(&settings.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let addr = settings.server.address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };

    let options = ServerOptions {
        cors_origins: settings.server.cors_origins,
        timezone,
    };
    server::run_with_listener(engine, options, listener).await?;

    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> error::Result<sea_orm::DatabaseConnection> {
    let database = sea_orm::Database::connect(&config.url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
