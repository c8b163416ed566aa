//! The fuel model: the engine facade composing registry, store, and orderer.
//!
//! Answers "what is the value of driver D for plant P in period (Y, M)".
//! Input drivers resolve through the value store with the definition's
//! default as the final fallback; calculated drivers invoke their
//! [`Calculation`](crate::calc::Calculation), which reads its dependencies
//! back through this facade.
//!
//! # Cycle safety
//!
//! Evaluating a calculated driver first ensures the dependency graph is
//! acyclic. With a fresh order cache that is a flag read; on a dirty cache
//! a throwaway sort runs, so a cyclic registry always fails with
//! [`EngineError::CircularDependency`] instead of recursing unboundedly,
//! even if the calculation order was never requested.
//!
//! # Sharing
//!
//! A model is built per scenario-evaluation unit and not shared mutably.
//! Evaluation itself takes `&self`; bulk helpers take `&mut self` only to
//! refresh the order cache up front.

use crate::driver::{Driver, DriverCategory, DriverType};
use crate::error::EngineError;
use crate::fixed::{fixed64_to_f64, Fixed64};
use crate::id::{DriverId, PlantId};
use crate::order;
use crate::registry::{DependencyIssue, DriverRegistry, RegistrationWarning};
use crate::store::ValueStore;
use serde::{Deserialize, Serialize};

/// Driver-based forecasting model: one registry plus one value store.
#[derive(Debug, Clone, Default)]
pub struct FuelModel {
    registry: DriverRegistry,
    values: ValueStore,
}

/// One resolved driver in a [`ModelSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSummary {
    pub name: String,
    pub value: f64,
    pub driver_type: DriverType,
    pub category: DriverCategory,
    pub unit: String,
}

/// Every driver resolved for one period, with display metadata. The
/// reporting boundary's serializable snapshot of model state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub year: i32,
    pub month: u8,
    pub plant: Option<PlantId>,
    pub drivers: Vec<DriverSummary>,
}

impl FuelModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Read access to the raw value ledger (persistence/export boundary).
    /// Writes go through [`FuelModel::set_value`] so names are validated.
    pub fn store(&self) -> &ValueStore {
        &self.values
    }

    /// Register one driver definition. Returns configuration warnings.
    pub fn register_driver(&mut self, driver: Driver) -> Vec<RegistrationWarning> {
        self.registry.register(driver)
    }

    /// Register several definitions, accumulating warnings.
    pub fn register_drivers<I>(&mut self, drivers: I) -> Vec<RegistrationWarning>
    where
        I: IntoIterator<Item = Driver>,
    {
        self.registry.register_many(drivers)
    }

    /// Look up a definition by name.
    pub fn driver(&self, name: &str) -> Result<&Driver, EngineError> {
        self.registry.get(name)
    }

    /// Store a value for a registered driver. `month == None` is annual.
    pub fn set_value(
        &mut self,
        name: &str,
        year: i32,
        month: Option<u8>,
        value: Fixed64,
        plant: Option<PlantId>,
    ) -> Result<(), EngineError> {
        if !self.registry.contains(name) {
            return Err(EngineError::UnknownDriver(name.to_string()));
        }
        self.values.set(name, year, month, value, plant);
        Ok(())
    }

    /// Resolve one driver for one month.
    ///
    /// Calculated drivers are evaluated through their calculation after the
    /// cycle check; everything else reads the store with the definition's
    /// default as the final fallback. A calculated driver with no
    /// calculation falls back to the store like an input.
    pub fn value(
        &self,
        name: &str,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
    ) -> Result<Fixed64, EngineError> {
        let driver = self.registry.get(name)?;

        if driver.is_calculated() {
            if let Some(calc) = driver.calculation.clone() {
                self.ensure_acyclic()?;
                return calc.evaluate(self, year, month, plant);
            }
        }

        Ok(self
            .values
            .get(name, year, month, plant, driver.default_value))
    }

    /// Resolve all twelve months of a year for one driver. Index 0 is
    /// January.
    pub fn monthly_values(
        &self,
        name: &str,
        year: i32,
        plant: Option<PlantId>,
    ) -> Result<[Fixed64; 12], EngineError> {
        let mut months = [Fixed64::ZERO; 12];
        for (i, slot) in months.iter_mut().enumerate() {
            *slot = self.value(name, year, i as u8 + 1, plant)?;
        }
        Ok(months)
    }

    /// Resolve every registered driver for one period, in calculation
    /// order: a flat snapshot of model state.
    pub fn all_values(
        &mut self,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
    ) -> Result<Vec<(String, Fixed64)>, EngineError> {
        let order = self.registry.calculation_order()?.to_vec();

        let mut result = Vec::with_capacity(order.len());
        for id in order {
            let name = self.registry.name_of(id).to_string();
            let value = self.value(&name, year, month, plant)?;
            result.push((name, value));
        }
        Ok(result)
    }

    /// Full year table: one row per driver in calculation order, twelve
    /// resolved values per row. With the `parallel` feature the rows are
    /// resolved with rayon; results are identical to the serial path.
    pub fn all_monthly_values(
        &mut self,
        year: i32,
        plant: Option<PlantId>,
    ) -> Result<Vec<(String, [Fixed64; 12])>, EngineError> {
        let order = self.registry.calculation_order()?.to_vec();
        self.resolve_rows(&order, year, plant)
    }

    #[cfg(not(feature = "parallel"))]
    fn resolve_rows(
        &self,
        order: &[DriverId],
        year: i32,
        plant: Option<PlantId>,
    ) -> Result<Vec<(String, [Fixed64; 12])>, EngineError> {
        order
            .iter()
            .map(|&id| {
                let name = self.registry.name_of(id).to_string();
                let row = self.monthly_values(&name, year, plant)?;
                Ok((name, row))
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn resolve_rows(
        &self,
        order: &[DriverId],
        year: i32,
        plant: Option<PlantId>,
    ) -> Result<Vec<(String, [Fixed64; 12])>, EngineError> {
        use rayon::prelude::*;

        order
            .par_iter()
            .map(|&id| {
                let name = self.registry.name_of(id).to_string();
                let row = self.monthly_values(&name, year, plant)?;
                Ok((name, row))
            })
            .collect()
    }

    /// Every driver resolved for one period plus its display metadata,
    /// in registration order.
    pub fn summary(
        &mut self,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
    ) -> Result<ModelSummary, EngineError> {
        // Refresh the cache once so per-driver cycle checks are flag reads.
        self.registry.calculation_order()?;

        let mut drivers = Vec::with_capacity(self.registry.len());
        for driver in self.registry.iter() {
            drivers.push(DriverSummary {
                name: driver.name.clone(),
                value: fixed64_to_f64(self.value(&driver.name, year, month, plant)?),
                driver_type: driver.driver_type,
                category: driver.category,
                unit: driver.unit.clone(),
            });
        }

        Ok(ModelSummary {
            year,
            month,
            plant,
            drivers,
        })
    }

    /// Driver names in calculation order.
    pub fn calculation_order(&mut self) -> Result<Vec<String>, EngineError> {
        let order = self.registry.calculation_order()?.to_vec();
        Ok(order
            .iter()
            .map(|&id| self.registry.name_of(id).to_string())
            .collect())
    }

    pub fn by_category(&self, category: DriverCategory) -> Vec<&Driver> {
        self.registry.by_category(category)
    }

    /// Every non-calculated driver (the user-facing inputs).
    pub fn input_drivers(&self) -> Vec<&Driver> {
        self.registry.inputs()
    }

    pub fn calculated_drivers(&self) -> Vec<&Driver> {
        self.registry.calculated()
    }

    /// Dependencies referencing unregistered drivers. Run this at startup;
    /// empty means the configuration is structurally sound.
    pub fn validate_dependencies(&self) -> Vec<DependencyIssue> {
        self.registry.validate_dependencies()
    }

    /// A new model sharing these driver definitions with an empty store.
    /// The way to build clean per-scenario models without re-declaring the
    /// default driver set.
    pub fn copy(&self) -> FuelModel {
        FuelModel {
            registry: self.registry.clone(),
            values: ValueStore::new(),
        }
    }

    fn ensure_acyclic(&self) -> Result<(), EngineError> {
        if self.registry.is_order_dirty() {
            order::sort(&self.registry)?;
        }
        Ok(())
    }
}
