//! Key formatting.
//!
//! Entry keys are `node_id (16) | created_at micros (8, BE) | entry_id (16)`,
//! so a prefix scan over a node returns its entries in insertion order and
//! an entry keeps its position when a split moves it.

use uuid::Uuid;

use simian_core::{IndexEntry, NodeId};

use crate::serialization::SerializationError;

pub const ENTRY_KEY_LEN: usize = NodeId::LEN + 8 + 16;

/// System CF keys.
pub const FORMAT_VERSION_KEY: &[u8] = b"format_version";
pub const INDEX_CONFIG_KEY: &[u8] = b"index_config";

/// Current on-disk format.
pub const FORMAT_VERSION: u32 = 1;

pub fn format_entry_key(node: NodeId, entry: &IndexEntry) -> [u8; ENTRY_KEY_LEN] {
    let micros = entry.created_at().timestamp_micros().max(0) as u64;

    let mut key = [0u8; ENTRY_KEY_LEN];
    key[..NodeId::LEN].copy_from_slice(node.as_bytes());
    key[NodeId::LEN..NodeId::LEN + 8].copy_from_slice(&micros.to_be_bytes());
    key[NodeId::LEN + 8..].copy_from_slice(entry.id().as_bytes());
    key
}

/// Split an entry key into owning node and entry id.
pub fn parse_entry_key(key: &[u8]) -> Result<(NodeId, Uuid), SerializationError> {
    if key.len() != ENTRY_KEY_LEN {
        return Err(SerializationError::InvalidKeySize {
            expected: ENTRY_KEY_LEN,
            actual: key.len(),
        });
    }
    let node = NodeId::from_bytes(&key[..NodeId::LEN]).ok_or(
        SerializationError::InvalidKeySize {
            expected: NodeId::LEN,
            actual: key.len(),
        },
    )?;
    let id = Uuid::from_slice(&key[NodeId::LEN + 8..])
        .map_err(|e| SerializationError::DeserializeFailed(e.to_string()))?;
    Ok((node, id))
}

pub fn format_thumbnail_key(entry_id: Uuid) -> [u8; 16] {
    *entry_id.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use simian_core::{Attributes, Fingerprint};

    #[test]
    fn test_entry_key_layout() {
        let entry = IndexEntry::new(Fingerprint::from_samples(vec![0; 64]), Attributes::new());
        let node = NodeId::ROOT.child(&Fingerprint::from_samples(vec![0]));
        let key = format_entry_key(node, &entry);

        assert_eq!(&key[..16], node.as_bytes());
        assert_eq!(parse_entry_key(&key).unwrap(), (node, entry.id()));
    }

    #[test]
    fn test_entry_keys_sort_by_creation() {
        let node = NodeId::ROOT;
        let first = IndexEntry::new(Fingerprint::default(), Attributes::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = IndexEntry::new(Fingerprint::default(), Attributes::new());
        assert!(format_entry_key(node, &first) < format_entry_key(node, &second));
    }

    #[test]
    fn test_parse_rejects_wrong_width() {
        assert_eq!(
            parse_entry_key(&[0u8; 16]),
            Err(SerializationError::InvalidKeySize {
                expected: ENTRY_KEY_LEN,
                actual: 16
            })
        );
    }
}
