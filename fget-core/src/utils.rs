use std::path::Path;

use tokio::fs;

/// Checks if a file exists at the given path.
pub async fn file_exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

/// Creates an empty file at the given path, creating any missing parent
/// directories first. Truncates an existing file.
pub async fn create_empty_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::File::create(path).await?;
    Ok(())
}
