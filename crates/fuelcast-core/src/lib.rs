//! Fuelcast Core -- the driver-based forecasting engine.
//!
//! This crate provides the dependency-graph evaluation system that computes
//! derived forecast quantities (coal blend prices, effective heat rates,
//! generation costs) from a network of named, typed "driver" values that may
//! be period-specific, plant-specific, or defaulted, and that may depend on
//! each other through declared formulas requiring cycle-safe ordering.
//!
//! # Resolving a value
//!
//! [`model::FuelModel::value`] answers "what is the value of driver D for
//! plant P in period (Y, M)":
//!
//! 1. Look up the driver definition; unknown names are hard errors.
//! 2. Calculated drivers evaluate their [`calc::Calculation`], which reads
//!    its dependencies back through the facade. The dependency graph is
//!    cycle-checked before any calculation runs.
//! 3. Everything else reads the [`store::ValueStore`] with a fixed
//!    most-specific-first fallback: plant+month, plant+annual, system+month,
//!    system+annual, then the definition's default.
//!
//! # Key Types
//!
//! - [`model::FuelModel`] -- engine facade composing registry, store, and
//!   orderer; one instance per scenario-evaluation unit.
//! - [`driver::Driver`] -- immutable driver definition, identity by name.
//! - [`registry::DriverRegistry`] -- definitions keyed by name with a cached
//!   calculation order.
//! - [`store::ValueStore`] -- flat value ledger keyed by
//!   (driver, plant, period).
//! - [`calc::Formula`] -- pure function over an ordered dependency list.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`snapshot`] -- versioned binary value-store snapshots via bitcode.

pub mod calc;
pub mod driver;
pub mod error;
pub mod fixed;
pub mod id;
pub mod model;
pub mod order;
pub mod period;
pub mod registry;
pub mod snapshot;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
