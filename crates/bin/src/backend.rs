//! Backend creation.

use std::sync::Arc;

use banter::backend::{InMemory, JsonFile, KeyValueStore};

use crate::cli::{Backend, Cli};

/// File name of the JSON store inside the data directory.
pub const STORE_FILE: &str = "banter.json";

/// Create the appropriate backend based on configuration.
///
/// A JSON store that exists but cannot be decoded is set aside: the session
/// starts empty and the first write replaces it.
pub async fn create_backend(
    cli: &Cli,
) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    match cli.backend {
        Backend::Inmemory => {
            tracing::info!("Using in-memory backend; nothing will be saved");
            Ok(Arc::new(InMemory::new()))
        }
        Backend::Jsonfile => {
            let data_dir = cli.data_dir();
            tokio::fs::create_dir_all(&data_dir).await?;
            let path = data_dir.join(STORE_FILE);

            match JsonFile::open(&path).await {
                Ok(store) => {
                    tracing::info!("Loaded store from {}", path.display());
                    Ok(Arc::new(store))
                }
                Err(e) if e.is_serialization_error() => {
                    tracing::warn!(
                        "Store at {} is unreadable ({e}); starting with an empty one",
                        path.display()
                    );
                    Ok(Arc::new(JsonFile::empty(&path)))
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
