//! CLI command handlers
//!
//! Every handler returns the process exit code. Failures are logged
//! through `tracing` and mapped with [`crate::error::exit_code_for_error`].

pub mod add;
pub mod compare;
pub mod fingerprint;
pub mod query;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use image::DynamicImage;
use tracing::{error, info, warn};

use simian_core::{ImageIndex, SimianConfig};
use simian_storage::{RocksDbConfig, RocksDbIndexStore};

use crate::error::{exit_code_for_error, CliExitCode};

/// Decode an image file, naming the file on failure.
pub fn load_image(path: &Path) -> anyhow::Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to read image {}", path.display()))
}

/// Open the index database at `db`, or at `storage.path` when `db` is None.
///
/// Index parameters recorded in the database win over the configured ones,
/// since the existing trie was shaped by them. A fresh database records the
/// configured parameters.
pub fn open_index(
    db: Option<&Path>,
    config: &SimianConfig,
) -> anyhow::Result<ImageIndex<RocksDbIndexStore>> {
    if db.is_none() && config.storage.backend != "rocksdb" {
        bail!(
            "storage backend \"{}\" does not persist between invocations; pass --db",
            config.storage.backend
        );
    }
    let path = db
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.storage.path));

    let store = RocksDbIndexStore::open_with_config(&path, RocksDbConfig::from(&config.storage))
        .with_context(|| format!("Failed to open index at {}", path.display()))?;

    let index_config = match store.load_index_config()? {
        Some(stored) => {
            if stored != config.index {
                warn!(
                    ?stored,
                    configured = ?config.index,
                    "Using index parameters recorded in the database"
                );
            }
            stored
        }
        None => {
            store.save_index_config(&config.index)?;
            info!(path = %path.display(), "Initialised new index");
            config.index
        }
    };

    Ok(ImageIndex::new(store, index_config)?)
}

/// Log `result`'s error, if any, and turn it into an exit code.
pub fn finish(command: &str, result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => CliExitCode::Success.into(),
        Err(e) => {
            error!("{} failed: {:#}", command, e);
            exit_code_for_error(&e).into()
        }
    }
}
