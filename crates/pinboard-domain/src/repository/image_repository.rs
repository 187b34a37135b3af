use pinboard_core::PinboardResult;

use super::Repository;
use crate::{image::content_hash, Image, ImageHash};

impl Repository<Image> {
    /// Store `bytes` under their content hash.
    ///
    /// Saving bytes that are already stored returns the existing hash and
    /// writes nothing.
    pub async fn save(
        &self,
        bytes: Vec<u8>,
        content_type: impl Into<String>,
        original_filename: impl Into<String>,
    ) -> PinboardResult<ImageHash> {
        let hash = content_hash(&bytes);
        if self.exists(&hash).await? {
            tracing::debug!(%hash, "image already stored");
            return Ok(hash);
        }
        let image = Image {
            hash: hash.clone(),
            data: bytes,
            content_type: content_type.into(),
            original_filename: original_filename.into(),
        };
        self.put(&image).await?;
        tracing::info!(%hash, size = image.data.len(), "stored image");
        Ok(hash)
    }

    pub async fn hashes(&self) -> PinboardResult<Vec<ImageHash>> {
        let mut hashes: Vec<ImageHash> = self.all().await?.into_iter().map(|i| i.hash).collect();
        hashes.sort();
        Ok(hashes)
    }
}
