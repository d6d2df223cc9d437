//! Codetree JSON-lines server binary.
//!
//! Reads one filter request per line from stdin and writes one reply per
//! line to stdout. Logs go to stderr.

use codetree_engine::{LoaderConfig, OntologyStore};
use codetree_service::TreeService;
use tokio::io::{stdin, stdout, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATA_PATH: &str = "./data";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Get data path from env or use default
    let data_path = std::env::var("CODETREE_DATA_PATH")
        .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

    tracing::info!("Loading ontologies from: {}", data_path);

    let store = tokio::task::spawn_blocking(move || {
        let mut store = OntologyStore::new();
        store
            .load_dir_parallel(&data_path, &LoaderConfig::default())
            .map(|loaded| (store, loaded))
    })
    .await?;

    let (store, loaded) = store?;
    if loaded == 0 {
        tracing::warn!("No ontologies loaded; every request will fail");
    }
    tracing::info!("Available ontologies: {:?}", store.names());

    let service = TreeService::new(store);

    tracing::info!("Serving filter requests on stdin");
    let answered = service.serve(BufReader::new(stdin()), stdout()).await?;
    tracing::info!("Input closed after {} requests", answered);

    Ok(())
}
