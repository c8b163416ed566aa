//! Scenario driver sets: the bridge between the forecasting engine and
//! scenario persistence.
//!
//! A [`ScenarioDriverSet`] is the portable form of one scenario's driver
//! overrides for one year: per driver, an optional annual value, monthly
//! overrides, and plant-specific values. It serializes to JSON for storage
//! and transport, exports from a populated [`FuelModel`], and applies back
//! onto a model with a create/update audit trail.
//!
//! Values cross this boundary as `f64`; the engine converts to fixed-point
//! when they land in the store.

use fuelcast_core::fixed::{f64_to_fixed64, fixed64_to_f64};
use fuelcast_core::id::PlantId;
use fuelcast_core::model::FuelModel;
use fuelcast_core::period::Period;
use fuelcast_core::store::ValueKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors from serializing or deserializing scenario sets.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Values for one driver at one plant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub monthly: BTreeMap<u8, f64>,
}

impl PlantValues {
    pub fn is_empty(&self) -> bool {
        self.annual.is_none() && self.monthly.is_empty()
    }
}

/// All stored values for one driver: system-wide annual and monthly slots
/// plus per-plant overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub monthly: BTreeMap<u8, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plant_specific: BTreeMap<u32, PlantValues>,
}

impl DriverValues {
    pub fn is_empty(&self) -> bool {
        self.annual.is_none() && self.monthly.is_empty() && self.plant_specific.is_empty()
    }
}

/// Whether applying a slot created a new stored value or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Create,
    Update,
}

/// One applied slot, with the prior stored value when there was one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    pub driver: String,
    pub plant: Option<u32>,
    pub period: Period,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<f64>,
    pub new: f64,
}

/// Result of applying a set to a model: the audit trail plus drivers the
/// model doesn't know (their slots are not applied).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    pub changes: Vec<ValueChange>,
    pub unknown_drivers: Vec<String>,
}

/// How two sets differ for one driver present in both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDifference {
    pub driver: String,
    pub a: DriverValues,
    pub b: DriverValues,
}

/// Driver-by-driver comparison of two sets. All lists are sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub same: Vec<String>,
    pub differences: Vec<ValueDifference>,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
}

impl ComparisonReport {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty() && self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    /// Distinct drivers across both sets.
    pub fn total(&self) -> usize {
        self.same.len() + self.differences.len() + self.only_in_a.len() + self.only_in_b.len()
    }
}

/// One scenario's driver overrides for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDriverSet {
    pub scenario_id: String,
    pub year: i32,
    #[serde(default)]
    pub driver_values: BTreeMap<String, DriverValues>,
}

impl ScenarioDriverSet {
    pub fn new(scenario_id: &str, year: i32) -> Self {
        Self {
            scenario_id: scenario_id.to_string(),
            year,
            driver_values: BTreeMap::new(),
        }
    }

    /// Set a driver's system-wide annual value.
    pub fn set_annual(&mut self, driver: &str, value: f64) {
        self.driver_values.entry(driver.to_string()).or_default().annual = Some(value);
    }

    /// Set a driver's system-wide value for one month.
    pub fn set_monthly(&mut self, driver: &str, month: u8, value: f64) {
        self.driver_values
            .entry(driver.to_string())
            .or_default()
            .monthly
            .insert(month, value);
    }

    /// Set a driver's annual value for one plant.
    pub fn set_plant_annual(&mut self, driver: &str, plant: u32, value: f64) {
        self.driver_values
            .entry(driver.to_string())
            .or_default()
            .plant_specific
            .entry(plant)
            .or_default()
            .annual = Some(value);
    }

    /// Set a driver's monthly value for one plant.
    pub fn set_plant_monthly(&mut self, driver: &str, plant: u32, month: u8, value: f64) {
        self.driver_values
            .entry(driver.to_string())
            .or_default()
            .plant_specific
            .entry(plant)
            .or_default()
            .monthly
            .insert(month, value);
    }

    pub fn driver_count(&self) -> usize {
        self.driver_values.len()
    }

    /// Capture every value stored in the model for `year` as a set.
    /// Drivers with no stored values for the year do not appear; a model
    /// resolving purely from defaults exports an empty set.
    pub fn export_model(model: &FuelModel, scenario_id: &str, year: i32) -> Self {
        let mut set = Self::new(scenario_id, year);

        for (key, value) in model.store().entries() {
            if key.period.year != year {
                continue;
            }
            let value = fixed64_to_f64(value);
            match (key.plant, key.period.month) {
                (None, None) => set.set_annual(&key.driver, value),
                (None, Some(m)) => set.set_monthly(&key.driver, m, value),
                (Some(p), None) => set.set_plant_annual(&key.driver, p.0, value),
                (Some(p), Some(m)) => set.set_plant_monthly(&key.driver, p.0, m, value),
            }
        }

        set
    }

    /// Write every slot of this set into the model's store, returning the
    /// create/update audit trail. Slots for drivers the model doesn't have
    /// registered are collected in `unknown_drivers` and left unapplied.
    pub fn apply(&self, model: &mut FuelModel) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        for (driver, values) in &self.driver_values {
            if model.driver(driver).is_err() {
                outcome.unknown_drivers.push(driver.clone());
                continue;
            }

            let mut slots: Vec<(Option<u32>, Option<u8>, f64)> = Vec::new();
            if let Some(v) = values.annual {
                slots.push((None, None, v));
            }
            for (&m, &v) in &values.monthly {
                slots.push((None, Some(m), v));
            }
            for (&plant, pv) in &values.plant_specific {
                if let Some(v) = pv.annual {
                    slots.push((Some(plant), None, v));
                }
                for (&m, &v) in &pv.monthly {
                    slots.push((Some(plant), Some(m), v));
                }
            }

            for (plant, month, new) in slots {
                let period = match month {
                    Some(m) => Period::month(self.year, m),
                    None => Period::annual(self.year),
                };
                let key = ValueKey::new(driver, plant.map(PlantId), period);
                let old = model.store().get_exact(&key).map(fixed64_to_f64);

                // Registration was checked above, so this cannot fail.
                let _ = model.set_value(
                    driver,
                    self.year,
                    month,
                    f64_to_fixed64(new),
                    plant.map(PlantId),
                );

                outcome.changes.push(ValueChange {
                    driver: driver.clone(),
                    plant,
                    period,
                    kind: if old.is_some() {
                        ChangeKind::Update
                    } else {
                        ChangeKind::Create
                    },
                    old,
                    new,
                });
            }
        }

        outcome
    }

    /// Merge this set's values into `target`, slot by slot. With
    /// `overwrite` false, only slots the target doesn't already have are
    /// copied; with it true, this set's slots win.
    pub fn copy_into(&self, target: &mut ScenarioDriverSet, overwrite: bool) {
        for (driver, source) in &self.driver_values {
            let dest = target.driver_values.entry(driver.clone()).or_default();

            if source.annual.is_some() && (overwrite || dest.annual.is_none()) {
                dest.annual = source.annual;
            }
            for (&m, &v) in &source.monthly {
                if overwrite || !dest.monthly.contains_key(&m) {
                    dest.monthly.insert(m, v);
                }
            }
            for (&plant, pv) in &source.plant_specific {
                let dest_pv = dest.plant_specific.entry(plant).or_default();
                if pv.annual.is_some() && (overwrite || dest_pv.annual.is_none()) {
                    dest_pv.annual = pv.annual;
                }
                for (&m, &v) in &pv.monthly {
                    if overwrite || !dest_pv.monthly.contains_key(&m) {
                        dest_pv.monthly.insert(m, v);
                    }
                }
            }
        }
    }

    /// Driver-by-driver comparison against another set.
    pub fn compare(&self, other: &ScenarioDriverSet) -> ComparisonReport {
        let mut report = ComparisonReport::default();

        for (driver, a) in &self.driver_values {
            match other.driver_values.get(driver) {
                Some(b) if a == b => report.same.push(driver.clone()),
                Some(b) => report.differences.push(ValueDifference {
                    driver: driver.clone(),
                    a: a.clone(),
                    b: b.clone(),
                }),
                None => report.only_in_a.push(driver.clone()),
            }
        }
        for driver in other.driver_values.keys() {
            if !self.driver_values.contains_key(driver) {
                report.only_in_b.push(driver.clone());
            }
        }

        // BTreeMap iteration already yields names sorted.
        report
    }

    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelcast_core::test_utils::{fixed, input};

    fn sample_model() -> FuelModel {
        let mut model = FuelModel::new();
        model.register_driver(input("coal_price", 55.0));
        model.register_driver(input("use_factor", 85.0));
        model
    }

    // -----------------------------------------------------------------
    // Building and serialization
    // -----------------------------------------------------------------

    #[test]
    fn builders_fill_the_right_slots() {
        let mut set = ScenarioDriverSet::new("base_case", 2025);
        set.set_annual("coal_price", 60.0);
        set.set_monthly("coal_price", 3, 62.0);
        set.set_plant_annual("use_factor", 1, 90.0);
        set.set_plant_monthly("use_factor", 1, 7, 95.0);

        assert_eq!(set.driver_count(), 2);
        let cp = &set.driver_values["coal_price"];
        assert_eq!(cp.annual, Some(60.0));
        assert_eq!(cp.monthly[&3], 62.0);
        let uf = &set.driver_values["use_factor"];
        assert_eq!(uf.plant_specific[&1].annual, Some(90.0));
        assert_eq!(uf.plant_specific[&1].monthly[&7], 95.0);
    }

    #[test]
    fn json_round_trip() {
        let mut set = ScenarioDriverSet::new("high_coal", 2026);
        set.set_annual("coal_price", 75.0);
        set.set_plant_monthly("coal_price", 2, 6, 80.0);

        let json = set.to_json().unwrap();
        let restored = ScenarioDriverSet::from_json(&json).unwrap();
        assert_eq!(restored, set);
    }

    #[test]
    fn json_shape_is_stable() {
        let mut set = ScenarioDriverSet::new("s", 2025);
        set.set_monthly("coal_price", 3, 62.0);

        let json: serde_json::Value =
            serde_json::from_str(&set.to_json().unwrap()).unwrap();
        assert_eq!(json["scenario_id"], "s");
        assert_eq!(json["year"], 2025);
        // Integer map keys serialize as strings.
        assert_eq!(json["driver_values"]["coal_price"]["monthly"]["3"], 62.0);
        // Empty slots are omitted entirely.
        assert!(json["driver_values"]["coal_price"].get("annual").is_none());
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            ScenarioDriverSet::from_json("not json"),
            Err(ScenarioError::Json(_))
        ));
    }

    // -----------------------------------------------------------------
    // Export and apply
    // -----------------------------------------------------------------

    #[test]
    fn export_captures_all_slot_shapes() {
        let mut model = sample_model();
        model.set_value("coal_price", 2025, None, fixed(60.0), None).unwrap();
        model.set_value("coal_price", 2025, Some(3), fixed(62.0), None).unwrap();
        model
            .set_value("use_factor", 2025, None, fixed(90.0), Some(PlantId(1)))
            .unwrap();
        model
            .set_value("use_factor", 2025, Some(7), fixed(95.0), Some(PlantId(1)))
            .unwrap();

        let set = ScenarioDriverSet::export_model(&model, "exported", 2025);

        assert_eq!(set.driver_count(), 2);
        assert_eq!(set.driver_values["coal_price"].annual, Some(60.0));
        assert_eq!(set.driver_values["coal_price"].monthly[&3], 62.0);
        let uf = &set.driver_values["use_factor"].plant_specific[&1];
        assert_eq!(uf.annual, Some(90.0));
        assert_eq!(uf.monthly[&7], 95.0);
    }

    #[test]
    fn export_ignores_other_years() {
        let mut model = sample_model();
        model.set_value("coal_price", 2025, None, fixed(60.0), None).unwrap();
        model.set_value("coal_price", 2026, None, fixed(65.0), None).unwrap();

        let set = ScenarioDriverSet::export_model(&model, "exported", 2025);
        assert_eq!(set.driver_values["coal_price"].annual, Some(60.0));
        assert_eq!(set.driver_count(), 1);
    }

    #[test]
    fn export_of_untouched_model_is_empty() {
        let model = sample_model();
        let set = ScenarioDriverSet::export_model(&model, "empty", 2025);
        assert_eq!(set.driver_count(), 0);
    }

    #[test]
    fn apply_writes_values_and_audits_creates() {
        let mut model = sample_model();
        let mut set = ScenarioDriverSet::new("s", 2025);
        set.set_annual("coal_price", 60.0);
        set.set_plant_monthly("use_factor", 1, 7, 95.0);

        let outcome = set.apply(&mut model);

        assert_eq!(outcome.changes.len(), 2);
        assert!(outcome.unknown_drivers.is_empty());
        assert!(outcome.changes.iter().all(|c| c.kind == ChangeKind::Create));
        assert!(outcome.changes.iter().all(|c| c.old.is_none()));

        assert_eq!(model.value("coal_price", 2025, 1, None).unwrap(), fixed(60.0));
        assert_eq!(
            model.value("use_factor", 2025, 7, Some(PlantId(1))).unwrap(),
            fixed(95.0)
        );
    }

    #[test]
    fn apply_audits_updates_with_old_value() {
        let mut model = sample_model();
        model.set_value("coal_price", 2025, None, fixed(55.0), None).unwrap();

        let mut set = ScenarioDriverSet::new("s", 2025);
        set.set_annual("coal_price", 60.0);

        let outcome = set.apply(&mut model);

        assert_eq!(outcome.changes.len(), 1);
        let change = &outcome.changes[0];
        assert_eq!(change.kind, ChangeKind::Update);
        assert_eq!(change.old, Some(55.0));
        assert_eq!(change.new, 60.0);
    }

    #[test]
    fn apply_skips_unknown_drivers() {
        let mut model = sample_model();
        let mut set = ScenarioDriverSet::new("s", 2025);
        set.set_annual("coal_price", 60.0);
        set.set_annual("ghost_driver", 1.0);

        let outcome = set.apply(&mut model);

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.unknown_drivers, vec!["ghost_driver".to_string()]);
    }

    #[test]
    fn export_apply_round_trip_restores_resolution() {
        let mut model = sample_model();
        model.set_value("coal_price", 2025, Some(3), fixed(62.0), None).unwrap();
        model
            .set_value("use_factor", 2025, None, fixed(90.0), Some(PlantId(2)))
            .unwrap();

        let set = ScenarioDriverSet::export_model(&model, "s", 2025);
        let json = set.to_json().unwrap();

        let mut fresh = sample_model();
        ScenarioDriverSet::from_json(&json).unwrap().apply(&mut fresh);

        assert_eq!(
            fresh.value("coal_price", 2025, 3, None).unwrap(),
            model.value("coal_price", 2025, 3, None).unwrap()
        );
        assert_eq!(
            fresh.value("use_factor", 2025, 5, Some(PlantId(2))).unwrap(),
            model.value("use_factor", 2025, 5, Some(PlantId(2))).unwrap()
        );
    }

    // -----------------------------------------------------------------
    // Copy
    // -----------------------------------------------------------------

    #[test]
    fn copy_without_overwrite_fills_gaps_only() {
        let mut source = ScenarioDriverSet::new("a", 2025);
        source.set_annual("coal_price", 60.0);
        source.set_monthly("coal_price", 3, 62.0);
        source.set_annual("use_factor", 90.0);

        let mut target = ScenarioDriverSet::new("b", 2025);
        target.set_annual("coal_price", 70.0);

        source.copy_into(&mut target, false);

        // Existing annual kept, missing slots filled.
        assert_eq!(target.driver_values["coal_price"].annual, Some(70.0));
        assert_eq!(target.driver_values["coal_price"].monthly[&3], 62.0);
        assert_eq!(target.driver_values["use_factor"].annual, Some(90.0));
    }

    #[test]
    fn copy_with_overwrite_replaces_slots() {
        let mut source = ScenarioDriverSet::new("a", 2025);
        source.set_annual("coal_price", 60.0);

        let mut target = ScenarioDriverSet::new("b", 2025);
        target.set_annual("coal_price", 70.0);
        target.set_monthly("coal_price", 5, 71.0);

        source.copy_into(&mut target, true);

        assert_eq!(target.driver_values["coal_price"].annual, Some(60.0));
        // Slots the source doesn't carry are untouched.
        assert_eq!(target.driver_values["coal_price"].monthly[&5], 71.0);
    }

    #[test]
    fn copy_merges_plant_slots() {
        let mut source = ScenarioDriverSet::new("a", 2025);
        source.set_plant_annual("use_factor", 1, 90.0);
        source.set_plant_monthly("use_factor", 2, 6, 88.0);

        let mut target = ScenarioDriverSet::new("b", 2025);
        target.set_plant_annual("use_factor", 1, 80.0);

        source.copy_into(&mut target, false);

        let uf = &target.driver_values["use_factor"];
        assert_eq!(uf.plant_specific[&1].annual, Some(80.0));
        assert_eq!(uf.plant_specific[&2].monthly[&6], 88.0);
    }

    // -----------------------------------------------------------------
    // Compare
    // -----------------------------------------------------------------

    #[test]
    fn compare_partitions_drivers() {
        let mut a = ScenarioDriverSet::new("a", 2025);
        a.set_annual("coal_price", 60.0);
        a.set_annual("use_factor", 85.0);
        a.set_annual("only_a", 1.0);

        let mut b = ScenarioDriverSet::new("b", 2025);
        b.set_annual("coal_price", 60.0);
        b.set_annual("use_factor", 90.0);
        b.set_annual("only_b", 2.0);

        let report = a.compare(&b);

        assert_eq!(report.same, vec!["coal_price".to_string()]);
        assert_eq!(report.differences.len(), 1);
        assert_eq!(report.differences[0].driver, "use_factor");
        assert_eq!(report.differences[0].a.annual, Some(85.0));
        assert_eq!(report.differences[0].b.annual, Some(90.0));
        assert_eq!(report.only_in_a, vec!["only_a".to_string()]);
        assert_eq!(report.only_in_b, vec!["only_b".to_string()]);
        assert_eq!(report.total(), 4);
        assert!(!report.is_identical());
    }

    #[test]
    fn compare_identical_sets() {
        let mut a = ScenarioDriverSet::new("a", 2025);
        a.set_annual("coal_price", 60.0);
        let b = a.clone();

        let report = a.compare(&b);
        assert!(report.is_identical());
        assert_eq!(report.same, vec!["coal_price".to_string()]);
    }

    #[test]
    fn compare_treats_monthly_differences_as_differences() {
        let mut a = ScenarioDriverSet::new("a", 2025);
        a.set_annual("coal_price", 60.0);
        a.set_monthly("coal_price", 3, 62.0);

        let mut b = ScenarioDriverSet::new("b", 2025);
        b.set_annual("coal_price", 60.0);

        let report = a.compare(&b);
        assert_eq!(report.differences.len(), 1);
        assert!(report.same.is_empty());
    }
}
