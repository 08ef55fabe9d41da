use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use lawd_table::DistrictTable;
use pnu_server::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_TABLE: &str = "data/pnu10.tsv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let (host, port, table_path) = load_config();
    info!("binding to {}:{}", host, port);
    info!("using district table at {}", table_path.display());

    let start = Instant::now();
    let table = DistrictTable::shared(&table_path)?;
    let elapsed = start.elapsed();
    info!("{} district rows loaded in {} ms", table.len(), elapsed.as_millis());

    let state = AppState { table };

    // The conversion endpoint is called from browsers anywhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("invalid listen address");
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_config() -> (String, u16, PathBuf) {
    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let table_path = env::var("TABLE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_TABLE));
    (host, port, table_path)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(Level::INFO)
        .init();
}
