mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rusqlite::Connection;
use tokio::net::TcpListener;

use cli::Cli;
use taskd::repo::SqliteTaskRepository;
use taskd::service::TaskManager;
use taskd::{db, server};

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}

fn ensure_db_dir(db_path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn open_store(db_path: &str) -> Result<Connection> {
    if db_path == ":memory:" {
        warn!("using an in-memory database; tasks are lost on exit");
        return db::open_memory();
    }
    ensure_db_dir(db_path)?;
    let conn = db::open(db_path).with_context(|| format!("failed to open {db_path}"))?;
    db::init(&conn)?;
    Ok(conn)
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // A missing .env is normal outside development.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    setup_logging();

    let db_path = cli.db_path()?;
    let conn = open_store(&db_path)?;
    info!("opened database {db_path}");

    let repo = Arc::new(SqliteTaskRepository::new(conn));
    let service = Arc::new(TaskManager::new(repo.clone()));
    let app = server::router(service, server::cors_layer(&cli.cors_origin)?);

    let addr = cli.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");
    server::serve(listener, app).await?;

    match Arc::try_unwrap(repo) {
        Ok(repo) => {
            db::close(repo.into_inner());
            info!("database closed");
        }
        Err(_) => warn!("database still referenced at shutdown; dropping without explicit close"),
    }
    Ok(())
}
