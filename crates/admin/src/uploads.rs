//! Product image storage on the local filesystem.
//!
//! Every upload gets its own file, `{uuid}-{sanitized name}`, so products
//! that upload the same file name never share or overwrite an image.

use std::path::Path;

use tracing::instrument;
use uuid::Uuid;

use crate::forms::ImageUpload;

/// Write a validated upload into `dir`, creating the directory if needed.
///
/// Returns the stored file name, which is what the product record keeps.
///
/// # Errors
///
/// Returns `std::io::Error` if the directory cannot be created or the file
/// cannot be written.
#[instrument(skip(dir, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
pub async fn save_image(dir: &Path, upload: &ImageUpload) -> std::io::Result<String> {
    let stored = format!("{}-{}", Uuid::new_v4(), upload.file_name);

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(&stored), &upload.bytes).await?;

    tracing::debug!(stored = %stored, "Product image stored");
    Ok(stored)
}

/// Delete a stored image, ignoring names that are empty or already gone.
///
/// Failures are logged, never returned: a leftover file must not fail the
/// request that replaced or deleted it.
pub async fn remove_image(dir: &Path, stored: &str) {
    if stored.is_empty() || Path::new(stored).file_name() != Some(std::ffi::OsStr::new(stored)) {
        return;
    }

    match tokio::fs::remove_file(dir.join(stored)).await {
        Ok(()) => tracing::debug!(stored = %stored, "Product image removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(stored = %stored, error = %e, "Failed to remove product image"),
    }
}
