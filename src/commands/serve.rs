use std::path::PathBuf;

use taskboard::config::StoreConfig;
use taskboard::store;

pub async fn run(db: Option<PathBuf>, port: u16, read_only: bool) -> Result<(), String> {
    let db_path = match db {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("cannot determine current directory: {e}"))?;
            StoreConfig::default_db_path(&cwd)
        }
    };
    let config = StoreConfig {
        db_path,
        port,
        read_only,
    };
    store::serve(&config).await
}
