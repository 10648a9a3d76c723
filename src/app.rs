//! Process bootstrap: connect, migrate, start modules, serve, shut down.

use std::sync::Arc;

use anyhow::Context;
use bookly_db::Database;
use bookly_kernel::settings::Settings;
use bookly_kernel::{InitCtx, ModuleRegistry};

use crate::modules;
use crate::modules::books::repository::PgBookRepository;

/// Registry with every module backed by Postgres
pub fn build_registry(db: &Database) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, Arc::new(PgBookRepository::new(db.clone())));
    registry
}

/// Ensure every module's tables exist
pub async fn initialize(db: &Database, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = db
        .run_migrations(&migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(
        applied,
        known = migrations.len(),
        "database schema is up to date"
    );
    Ok(applied)
}

/// Apply pending migrations and exit
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let db = Database::connect(&settings.database)
        .await
        .context("failed to connect to database")?;
    let registry = build_registry(&db);

    let applied = initialize(&db, &registry).await;
    db.close().await;
    applied
}

/// Run the service until a shutdown signal arrives
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let db = Database::connect(&settings.database)
        .await
        .context("failed to connect to database")?;
    let registry = build_registry(&db);

    initialize(&db, &registry).await?;

    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served =
        bookly_http::start_server(&registry, settings, bookly_http::shutdown_signal()).await;

    tracing::info!("server is stopping");
    registry.stop_all().await?;
    db.close().await;

    served
}
