//! # IO Utilities
//!
//! Location of the `.pokedex` runtime directory that holds the database.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Get the runtime directory path (.pokedex)
pub fn get_runtime_path() -> PathBuf {
    // Check for environment variable override
    if let Ok(path) = std::env::var("POKEDEX_RUNTIME_PATH") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".pokedex")
}

/// Ensure the parent directory of `path` exists
pub async fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    Ok(())
}
