//! Input image discovery.

use std::path::{Path, PathBuf};

/// Extensions recognized as input images (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "png", "tiff", "tif"];

/// List the images directly inside `directory`, sorted by path.
///
/// Only direct children are considered. A missing or unreadable directory
/// yields an empty list.
pub fn find_images(directory: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", directory.display(), e);
            return Vec::new();
        }
    };

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    images.sort();

    tracing::info!(
        "Found {} images in directory {}",
        images.len(),
        directory.display()
    );
    images
}

/// Case-insensitive check against [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
