use std::path::Path;
use std::sync::Arc;

use facultydir_api::{FacultyStore, router};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_DATA_PATH: &str = "data/raw_data.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .write_style(env_logger::WriteStyle::Never)
        .init();

    let data_path = std::env::var("FACULTY_DATA").unwrap_or_else(|_| DEFAULT_DATA_PATH.into());
    let store = FacultyStore::load(Path::new(&data_path))
        .inspect_err(|e| log::error!("Failed to load {}: {}", data_path, e))?;
    log::info!("Loaded {} faculty record(s) from {}", store.len(), data_path);

    let address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.into());
    let tcp_listener = tokio::net::TcpListener::bind(&address).await?;

    log::info!("Starting faculty lookup service on address: {}", address);

    axum::serve(tcp_listener, router(Arc::new(store)))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {e:?}");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
