use serde::{Deserialize, Serialize};

/// Identifies a generating plant. Externally assigned; the engine treats it
/// as an opaque key. `None` in value-store keys means system-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlantId(pub u32);

/// Dense handle for a driver inside a registry: its insertion index.
/// Stable across overwrites of the same name. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverId(pub u32);

impl DriverId {
    /// The handle's position in the registry's definition table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
