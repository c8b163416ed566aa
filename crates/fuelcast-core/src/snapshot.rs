//! Versioned binary snapshots of a value store.
//!
//! Serializes the value ledger via `bitcode` behind a small header (magic
//! number, format version) so decoding can reject foreign or stale data with
//! a typed error before touching the payload. Entries are sorted by key, so
//! equal stores always produce identical bytes.
//!
//! Driver definitions are not part of a snapshot; they carry calculations
//! that cannot be serialized. Restore into a model built from the same
//! definition catalog.

use crate::fixed::Fixed64;
use crate::store::{ValueKey, ValueStore};
use serde::{Deserialize, Serialize};

/// Magic number identifying a fuelcast value snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xFCA5_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur while encoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotEncodeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur while decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotDecodeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

/// Header prepended to every snapshot. Enables format detection and version
/// checking before the payload is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Number of value entries in the payload.
    pub entry_count: u64,
}

impl SnapshotHeader {
    pub fn new(entry_count: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            entry_count,
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotDecodeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(SnapshotDecodeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(SnapshotDecodeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(SnapshotDecodeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    header: SnapshotHeader,
    /// Sorted by key for byte-for-byte determinism.
    entries: Vec<(ValueKey, Fixed64)>,
}

/// Serialize a value store to a binary blob.
pub fn encode(store: &ValueStore) -> Result<Vec<u8>, SnapshotEncodeError> {
    let mut entries: Vec<(ValueKey, Fixed64)> =
        store.entries().map(|(k, v)| (k.clone(), v)).collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let snapshot = StoreSnapshot {
        header: SnapshotHeader::new(entries.len() as u64),
        entries,
    };
    bitcode::serialize(&snapshot).map_err(|e| SnapshotEncodeError::Encode(e.to_string()))
}

/// Deserialize a value store from a binary blob. Validates the header
/// before rebuilding the store.
pub fn decode(data: &[u8]) -> Result<ValueStore, SnapshotDecodeError> {
    let snapshot: StoreSnapshot =
        bitcode::deserialize(data).map_err(|e| SnapshotDecodeError::Decode(e.to_string()))?;
    snapshot.header.validate()?;
    Ok(ValueStore::from_entries(snapshot.entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64 as fx;
    use crate::id::PlantId;

    fn populated_store() -> ValueStore {
        let mut store = ValueStore::new();
        store.set("coal_price_eastern", 2025, None, fx(55.0), None);
        store.set("coal_price_eastern", 2025, Some(3), fx(58.0), None);
        store.set("heat_rate_baseline", 2025, None, fx(9900.0), Some(PlantId(2)));
        store.set("use_factor", 2025, Some(7), fx(90.0), Some(PlantId(1)));
        store
    }

    #[test]
    fn encode_decode_round_trip() {
        let store = populated_store();
        let data = encode(&store).unwrap();
        let restored = decode(&data).unwrap();

        assert_eq!(restored.len(), store.len());
        assert_eq!(
            restored.get("coal_price_eastern", 2025, 3, None, fx(0.0)),
            fx(58.0)
        );
        assert_eq!(
            restored.get("coal_price_eastern", 2025, 6, None, fx(0.0)),
            fx(55.0)
        );
        assert_eq!(
            restored.get("heat_rate_baseline", 2025, 1, Some(PlantId(2)), fx(0.0)),
            fx(9900.0)
        );
    }

    #[test]
    fn equal_stores_encode_identically() {
        // Same entries inserted in different orders must still produce the
        // same bytes (entries are sorted before encoding).
        let a = populated_store();

        let mut b = ValueStore::new();
        b.set("use_factor", 2025, Some(7), fx(90.0), Some(PlantId(1)));
        b.set("heat_rate_baseline", 2025, None, fx(9900.0), Some(PlantId(2)));
        b.set("coal_price_eastern", 2025, Some(3), fx(58.0), None);
        b.set("coal_price_eastern", 2025, None, fx(55.0), None);

        assert_eq!(encode(&a).unwrap(), encode(&b).unwrap());
    }

    #[test]
    fn empty_store_round_trips() {
        let data = encode(&ValueStore::new()).unwrap();
        let restored = decode(&data).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn garbage_fails_with_decode_error() {
        let garbage = vec![0u8; 10];
        assert!(matches!(
            decode(&garbage),
            Err(SnapshotDecodeError::Decode(_))
        ));
    }

    #[test]
    fn header_validation() {
        let good = SnapshotHeader::new(4);
        assert!(good.validate().is_ok());

        let bad_magic = SnapshotHeader {
            magic: 0xDEAD_BEEF,
            version: FORMAT_VERSION,
            entry_count: 0,
        };
        assert!(matches!(
            bad_magic.validate(),
            Err(SnapshotDecodeError::InvalidMagic(0xDEAD_BEEF))
        ));

        let future = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION + 1,
            entry_count: 0,
        };
        assert!(matches!(
            future.validate(),
            Err(SnapshotDecodeError::FutureVersion(_))
        ));

        let stale = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: 0,
            entry_count: 0,
        };
        assert!(matches!(
            stale.validate(),
            Err(SnapshotDecodeError::UnsupportedVersion(0))
        ));
    }
}
