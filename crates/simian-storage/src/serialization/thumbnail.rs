//! Thumbnails are stored as PNG.

use std::io::Cursor;

use image::{ImageFormat, ImageOutputFormat, RgbaImage};

use super::error::SerializationError;

pub fn serialize_thumbnail(thumbnail: &RgbaImage) -> Result<Vec<u8>, SerializationError> {
    let mut buffer = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

pub fn deserialize_thumbnail(bytes: &[u8]) -> Result<RgbaImage, SerializationError> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(|image| image.to_rgba8())
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
