//! Binary serialization for stored records.
//!
//! | Type | Format | Rationale |
//! |------|--------|-----------|
//! | `NodeRecord` | bincode | Fixed layout, smallest encoding |
//! | `IndexEntry` | MessagePack (named) | Attributes are free-form JSON values |
//! | Thumbnail | PNG | Compact, readable by any tool |

mod entry;
mod error;
mod node;
mod thumbnail;

pub use self::entry::{deserialize_entry, serialize_entry};
pub use self::error::SerializationError;
pub use self::node::{deserialize_node_record, serialize_node_record, NodeRecord};
pub use self::thumbnail::{deserialize_thumbnail, serialize_thumbnail};
