//! The value store: a flat numeric ledger of driver values by period.
//!
//! One map, keyed by a composite [`ValueKey`] of driver name, optional
//! plant, and period. Resolution walks fixed probes from most to least
//! specific:
//!
//! 1. plant + month
//! 2. plant + annual
//! 3. system + month
//! 4. system + annual
//! 5. caller-supplied default
//!
//! That precedence is the store's core contract. Writes are unconditional
//! upserts (last write wins); the store keeps no history and never range-
//! checks months. It knows nothing about driver definitions — unknown
//! names are the facade's concern.

use crate::fixed::Fixed64;
use crate::id::PlantId;
use crate::period::Period;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Full key for one stored value.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ValueKey {
    pub driver: String,
    /// `None` is a system-wide value.
    pub plant: Option<PlantId>,
    pub period: Period,
}

impl ValueKey {
    pub fn new(driver: &str, plant: Option<PlantId>, period: Period) -> Self {
        Self {
            driver: driver.to_string(),
            plant,
            period,
        }
    }
}

/// Mutable ledger of concrete driver values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueStore {
    values: HashMap<ValueKey, Fixed64>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from raw entries (snapshot restore, imports).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ValueKey, Fixed64)>,
    {
        Self {
            values: entries.into_iter().collect(),
        }
    }

    /// Upsert one value. `month == None` stores an annual value.
    pub fn set(
        &mut self,
        driver: &str,
        year: i32,
        month: Option<u8>,
        value: Fixed64,
        plant: Option<PlantId>,
    ) {
        let period = match month {
            Some(m) => Period::month(year, m),
            None => Period::annual(year),
        };
        self.values.insert(ValueKey::new(driver, plant, period), value);
    }

    /// Resolve a value for one month with the 5-step fallback.
    /// Never fails; `default` is the final step.
    pub fn get(
        &self,
        driver: &str,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
        default: Fixed64,
    ) -> Fixed64 {
        // One key, four probes, most specific first.
        let mut probe = ValueKey::new(driver, plant, Period::month(year, month));

        if probe.plant.is_some() {
            if let Some(&v) = self.values.get(&probe) {
                return v;
            }
            probe.period = Period::annual(year);
            if let Some(&v) = self.values.get(&probe) {
                return v;
            }
            probe.plant = None;
            probe.period = Period::month(year, month);
        }

        if let Some(&v) = self.values.get(&probe) {
            return v;
        }
        probe.period = Period::annual(year);
        if let Some(&v) = self.values.get(&probe) {
            return v;
        }

        default
    }

    /// Resolve all twelve months of a year, applying the fallback to each
    /// month independently. Index 0 is January.
    pub fn get_all_months(
        &self,
        driver: &str,
        year: i32,
        plant: Option<PlantId>,
        default: Fixed64,
    ) -> [Fixed64; 12] {
        std::array::from_fn(|i| self.get(driver, year, i as u8 + 1, plant, default))
    }

    /// Exact-key probe with no fallback. Used by save/audit collaborators
    /// that need to distinguish create from update.
    pub fn get_exact(&self, key: &ValueKey) -> Option<Fixed64> {
        self.values.get(key).copied()
    }

    /// Remove values for one driver, or everything when `None`.
    pub fn clear(&mut self, driver: Option<&str>) {
        match driver {
            Some(name) => self.values.retain(|k, _| k.driver != name),
            None => self.values.clear(),
        }
    }

    /// Names with at least one stored value, sorted. Scopes export/save:
    /// drivers never written are not persisted.
    pub fn stored_drivers(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.values.keys().map(|k| k.driver.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Raw entries, unordered. Callers needing determinism sort by key.
    pub fn entries(&self) -> impl Iterator<Item = (&ValueKey, Fixed64)> {
        self.values.iter().map(|(k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
