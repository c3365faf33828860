use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use codepool::config::CodepoolConfig;
use codepool::router::build_router;
use codepool::state::AppState;
use codepool::usecase::seed::{SeedInput, SeedUseCase};
use codepool_core::config::Config as _;
use codepool_core::tracing::init_tracing;
use codepool_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,codepool=debug");

    let config = CodepoolConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    info!(?config, "configuration loaded");

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    let state = AppState {
        db,
        session: config.session_settings(),
    };

    if config.uses_default_admin_password() {
        warn!("DEFAULT_ADMIN_PASSWORD is not set; the built-in admin password is in use");
    }
    let seed = SeedUseCase {
        pool: state.code_pool_repo(),
        admins: state.admin_repo(),
        hasher: state.hasher(),
    };
    seed.execute(SeedInput {
        admin_username: config.default_admin_username.clone(),
        admin_password: config.default_admin_password.clone(),
    })
    .await
    .context("startup seeding failed")?;

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.codepool_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("codepool service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
