//! Moving exchange bundles to and from directories on disk.

use std::path::{Path, PathBuf};

use pinboard_core::{PinboardError, PinboardResult};
use pinboard_domain::exchange::{ExportBundle, ImportBundle, CSV_FILES, IMAGES_DIR};
use tokio::fs;

/// Write `bundle` into `parent/<bundle name>/` and return that directory.
pub async fn write_export(parent: &Path, bundle: &ExportBundle) -> PinboardResult<PathBuf> {
    let dir = parent.join(&bundle.name);
    fs::create_dir_all(&dir).await?;
    for (name, text) in &bundle.files {
        fs::write(dir.join(name), text).await?;
    }
    if !bundle.images.is_empty() {
        let images = dir.join(IMAGES_DIR);
        fs::create_dir_all(&images).await?;
        for (name, bytes) in &bundle.images {
            fs::write(images.join(name), bytes).await?;
        }
    }
    tracing::info!(dir = %dir.display(), "wrote export");
    Ok(dir)
}

/// Read the exchange files under `dir`. Missing files are left out so that
/// validation can name them.
pub async fn read_import(dir: &Path) -> PinboardResult<ImportBundle> {
    if !fs::metadata(dir).await?.is_dir() {
        return Err(PinboardError::Validation(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let mut bundle = ImportBundle {
        name: dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };

    for name in CSV_FILES {
        let path = dir.join(name);
        if fs::try_exists(&path).await? {
            let bytes = fs::read(&path).await?;
            let text = String::from_utf8(bytes)
                .map_err(|_| PinboardError::import(name, 0, "File is not valid UTF-8"))?;
            bundle.files.insert(name.to_string(), text);
        }
    }

    let images = dir.join(IMAGES_DIR);
    if fs::try_exists(&images).await? {
        let mut entries = fs::read_dir(&images).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            bundle.images.insert(name, fs::read(entry.path()).await?);
        }
    }
    tracing::debug!(
        dir = %dir.display(),
        files = bundle.files.len(),
        images = bundle.images.len(),
        "read import"
    );
    Ok(bundle)
}
