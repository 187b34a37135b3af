use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the image bytes.
pub type ImageHash = String;

/// Content-addressed image blob. Bytes travel through JSON rows as base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub hash: ImageHash,
    #[serde(with = "bytes_base64")]
    pub data: Vec<u8>,
    pub content_type: String,
    pub original_filename: String,
}

impl Image {
    pub fn new(data: Vec<u8>, content_type: String, original_filename: String) -> Self {
        Self {
            hash: content_hash(&data),
            data,
            content_type,
            original_filename,
        }
    }

    /// File extension for this image, from the original name or the content type.
    pub fn extension(&self) -> &str {
        if let Some((_, ext)) = self.original_filename.rsplit_once('.') {
            if !ext.is_empty() && ext.len() <= 5 {
                return ext;
            }
        }
        extension_for_content_type(&self.content_type)
    }
}

pub fn content_hash(bytes: &[u8]) -> ImageHash {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = std::fmt::Write::write_fmt(&mut hex, format_args!("{:02x}", byte));
    }
    hex
}

pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}

mod bytes_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_data_serializes_as_base64() {
        let image = Image::new(vec![0, 1, 2, 255], "image/png".into(), "dot.png".into());
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "AAEC/w==");

        let back: Image = serde_json::from_value(json).unwrap();
        assert_eq!(back.data, vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        let named = Image::new(vec![1], "image/jpeg".into(), "holiday.JPEG".into());
        assert_eq!(named.extension(), "JPEG");
        let unnamed = Image::new(vec![1], "image/webp".into(), "clipboard".into());
        assert_eq!(unnamed.extension(), "webp");
    }
}
