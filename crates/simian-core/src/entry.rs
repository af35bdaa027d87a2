//! Index entries: a fingerprint plus whatever the caller wants back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FingerprintError;
use crate::fingerprint::Fingerprint;

/// Caller-supplied metadata carried by an entry.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// One indexed image.
///
/// Entries are immutable once built. The thumbnail is not part of the
/// serialized record; stores that persist it do so separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    id: Uuid,
    fingerprint: Fingerprint,
    #[serde(default)]
    attributes: Attributes,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    thumbnail: Option<RgbaImage>,
}

impl IndexEntry {
    /// New entry with a random id and the current timestamp.
    pub fn new(fingerprint: Fingerprint, attributes: Attributes) -> Self {
        Self {
            id: Uuid::new_v4(),
            fingerprint,
            attributes,
            created_at: Utc::now(),
            thumbnail: None,
        }
    }

    /// Fingerprint `image` and, if `thumbnail_size > 0`, keep a thumbnail of it.
    pub fn from_image(
        image: &DynamicImage,
        attributes: Attributes,
        thumbnail_size: u32,
    ) -> Result<Self, FingerprintError> {
        let fingerprint = Fingerprint::from_image(image)?;
        let entry = Self::new(fingerprint, attributes);
        Ok(if thumbnail_size > 0 {
            entry.with_thumbnail(make_thumbnail(image, thumbnail_size))
        } else {
            entry
        })
    }

    /// Rebuild an entry read back from a store.
    pub fn restore(
        id: Uuid,
        fingerprint: Fingerprint,
        attributes: Attributes,
        created_at: DateTime<Utc>,
        thumbnail: Option<RgbaImage>,
    ) -> Self {
        Self {
            id,
            fingerprint,
            attributes,
            created_at,
            thumbnail,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: RgbaImage) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn thumbnail(&self) -> Option<&RgbaImage> {
        self.thumbnail.as_ref()
    }
}

/// Bilinear thumbnail whose shorter side is `short_side`, keeping the aspect ratio.
///
/// Images already smaller than that are copied unchanged.
pub fn make_thumbnail(image: &DynamicImage, short_side: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let shortest = width.min(height);
    if shortest <= short_side || shortest == 0 {
        return image.to_rgba8();
    }

    let scale = f64::from(short_side) / f64::from(shortest);
    let new_width = ((f64::from(width) * scale).round() as u32).max(1);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);

    imageops::resize(&image.to_rgba8(), new_width, new_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        }))
    }

    #[test]
    fn test_new_entries_get_distinct_ids() {
        let a = IndexEntry::new(Fingerprint::from_samples(vec![0; 64]), Attributes::new());
        let b = IndexEntry::new(Fingerprint::from_samples(vec![0; 64]), Attributes::new());
        assert_ne!(a.id(), b.id());
        assert!(a.thumbnail().is_none());
    }

    #[test]
    fn test_from_image_keeps_attributes_and_thumbnail() {
        let mut attributes = Attributes::new();
        attributes.insert("path".into(), serde_json::json!("/tmp/cat.png"));

        let entry = IndexEntry::from_image(&sample_image(200, 100), attributes, 16).unwrap();
        assert_eq!(entry.fingerprint().len(), 64);
        assert_eq!(entry.attributes()["path"], "/tmp/cat.png");

        let thumbnail = entry.thumbnail().unwrap();
        assert_eq!(thumbnail.dimensions(), (32, 16));
    }

    #[test]
    fn test_thumbnail_disabled() {
        let entry = IndexEntry::from_image(&sample_image(50, 50), Attributes::new(), 0).unwrap();
        assert!(entry.thumbnail().is_none());
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let thumbnail = make_thumbnail(&sample_image(10, 30), 16);
        assert_eq!(thumbnail.dimensions(), (10, 30));
    }

    #[test]
    fn test_serialized_entry_omits_thumbnail() {
        let entry = IndexEntry::from_image(&sample_image(64, 64), Attributes::new(), 16).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("thumbnail").is_none());

        let back: IndexEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), entry.id());
        assert_eq!(back.fingerprint(), entry.fingerprint());
        assert_eq!(back.created_at(), entry.created_at());
        assert!(back.thumbnail().is_none());
    }
}
