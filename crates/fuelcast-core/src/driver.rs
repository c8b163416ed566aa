//! Driver definitions: the named, typed variables of the forecasting model.
//!
//! A driver is either an input (its value comes from the value store, with
//! a default fallback) or calculated (its value is derived from other
//! drivers through a [`Calculation`]). Identity is the name alone: two
//! drivers with the same name are the same driver for equality and hashing,
//! whatever their other fields say. That is what makes re-registration safe.

use crate::calc::Calculation;
use crate::fixed::Fixed64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// How a driver's value is produced and what it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverType {
    /// User-provided input value.
    Input,
    /// Market price index (coal, gas, etc.).
    PriceIndex,
    /// Rate per unit ($/ton, BTU/kWh).
    Rate,
    /// Quantity (tons, MWh, hours).
    Volume,
    /// Percentage value (0-100).
    Percentage,
    /// Derived from other drivers.
    Calculated,
    /// Boolean on/off flag.
    Toggle,
}

impl DriverType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverType::Input => "input",
            DriverType::PriceIndex => "price_index",
            DriverType::Rate => "rate",
            DriverType::Volume => "volume",
            DriverType::Percentage => "percentage",
            DriverType::Calculated => "calculated",
            DriverType::Toggle => "toggle",
        }
    }
}

/// Grouping tag for display and filtering. No evaluation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverCategory {
    CoalPrice,
    Transportation,
    HeatRate,
    Generation,
    Inventory,
    Escalation,
    Consumables,
    Byproducts,
    #[default]
    Other,
}

impl DriverCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverCategory::CoalPrice => "coal_price",
            DriverCategory::Transportation => "transportation",
            DriverCategory::HeatRate => "heat_rate",
            DriverCategory::Generation => "generation",
            DriverCategory::Inventory => "inventory",
            DriverCategory::Escalation => "escalation",
            DriverCategory::Consumables => "consumables",
            DriverCategory::Byproducts => "byproducts",
            DriverCategory::Other => "other",
        }
    }
}

/// A driver definition.
///
/// Bounds and step are UI hints only; the engine never enforces them.
/// `depends_on` and `calculation` matter only for `Calculated` drivers;
/// mismatches are reported as registration warnings, not errors.
#[derive(Clone)]
pub struct Driver {
    pub name: String,
    pub driver_type: DriverType,
    pub unit: String,
    pub default_value: Fixed64,
    pub category: DriverCategory,
    pub description: String,

    /// Names of the drivers this driver's formula reads, in declared order.
    pub depends_on: Vec<String>,
    /// Evaluation capability, present iff the driver is `Calculated`.
    pub calculation: Option<Arc<dyn Calculation>>,

    /// Display hints.
    pub display_order: i32,
    pub min_value: Option<Fixed64>,
    pub max_value: Option<Fixed64>,
    pub step: Fixed64,

    /// Whether values are expected per plant rather than system-wide.
    pub is_plant_specific: bool,
}

impl Driver {
    pub fn new(name: &str, driver_type: DriverType, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            driver_type,
            unit: unit.to_string(),
            default_value: Fixed64::ZERO,
            category: DriverCategory::Other,
            description: String::new(),
            depends_on: Vec::new(),
            calculation: None,
            display_order: 0,
            min_value: None,
            max_value: None,
            step: Fixed64::ONE,
            is_plant_specific: false,
        }
    }

    pub fn with_default_value(mut self, value: Fixed64) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_category(mut self, category: DriverCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = order;
        self
    }

    pub fn with_bounds(mut self, min: Fixed64, max: Fixed64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    pub fn with_min(mut self, min: Fixed64) -> Self {
        self.min_value = Some(min);
        self
    }

    pub fn with_step(mut self, step: Fixed64) -> Self {
        self.step = step;
        self
    }

    pub fn plant_specific(mut self) -> Self {
        self.is_plant_specific = true;
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_calculation<C: Calculation + 'static>(mut self, calculation: C) -> Self {
        self.calculation = Some(Arc::new(calculation));
        self
    }

    pub fn is_calculated(&self) -> bool {
        self.driver_type == DriverType::Calculated
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .field("driver_type", &self.driver_type)
            .field("unit", &self.unit)
            .field("default_value", &self.default_value)
            .field("category", &self.category)
            .field("depends_on", &self.depends_on)
            .field("has_calculation", &self.calculation.is_some())
            .field("is_plant_specific", &self.is_plant_specific)
            .finish()
    }
}

// Identity is the name alone.
impl PartialEq for Driver {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Driver {}

impl Hash for Driver {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
