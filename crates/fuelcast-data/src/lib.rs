//! Fuelcast Data -- the production driver catalog and file-based loading.
//!
//! Two halves:
//!
//! - [`catalog`] defines the complete default driver set for the coal-fired
//!   forecasting model: coal prices and blend percentages, transportation
//!   rates, heat rate parameters, generation factors, inventory management,
//!   and escalation, including every calculated driver's formula.
//!   [`catalog::default_fuel_model`] builds a ready-to-use model from it.
//! - [`loader`] reads driver definitions and value rows from RON, TOML, or
//!   JSON files (format detected by extension) and applies them to a model.

pub mod catalog;
pub mod loader;

pub use catalog::{all_drivers, default_fuel_model, driver_by_name};
pub use loader::{apply_values, load_driver_defs, load_value_rows, DataLoadError, ValueRow};
