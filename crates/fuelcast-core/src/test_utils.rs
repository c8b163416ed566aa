//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::calc::Formula;
use crate::driver::{Driver, DriverType};
use crate::fixed::Fixed64;
use crate::model::FuelModel;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Driver constructors
// ===========================================================================

pub fn input(name: &str, default: f64) -> Driver {
    Driver::new(name, DriverType::Input, "").with_default_value(fixed(default))
}

/// A calculated driver summing its dependencies.
pub fn sum_of(name: &str, deps: &[&str]) -> Driver {
    let dep_names: Vec<String> = deps.iter().map(|s| s.to_string()).collect();
    Driver::new(name, DriverType::Calculated, "")
        .with_dependencies(dep_names.clone())
        .with_calculation(Formula::new(dep_names, |v| {
            v.iter().copied().fold(Fixed64::ZERO, |acc, x| acc + x)
        }))
}

// ===========================================================================
// Model builders
// ===========================================================================

/// price (50) and quantity (100) inputs with a calculated total_cost.
pub fn price_quantity_model() -> FuelModel {
    let mut model = FuelModel::new();
    model.register_driver(input("price", 50.0));
    model.register_driver(input("quantity", 100.0));
    model.register_driver(
        Driver::new("total_cost", DriverType::Calculated, "$")
            .with_dependencies(["price", "quantity"])
            .with_calculation(Formula::new(["price", "quantity"], |v| v[0] * v[1])),
    );
    model
}

/// Two calculated drivers depending on each other. Any order request or
/// calculated evaluation must fail with a circular-dependency error.
pub fn cyclic_model() -> FuelModel {
    let mut model = FuelModel::new();
    model.register_driver(
        Driver::new("a", DriverType::Calculated, "")
            .with_dependencies(["b"])
            .with_calculation(Formula::new(["b"], |v| v[0])),
    );
    model.register_driver(
        Driver::new("b", DriverType::Calculated, "")
            .with_dependencies(["a"])
            .with_calculation(Formula::new(["a"], |v| v[0])),
    );
    model
}

/// A linear chain: one input `base` plus `length` calculated drivers, each
/// adding 1 to its predecessor. `chain_{length}` resolves to
/// `base + length`. Deep graph, one driver per dependency level.
pub fn chain_model(length: usize) -> FuelModel {
    let mut model = FuelModel::new();
    model.register_driver(input("base", 1.0));

    let mut prev = "base".to_string();
    for i in 1..=length {
        let name = format!("chain_{i}");
        model.register_driver(
            Driver::new(&name, DriverType::Calculated, "")
                .with_dependencies([prev.clone()])
                .with_calculation(Formula::new([prev.clone()], |v| v[0] + Fixed64::ONE)),
        );
        prev = name;
    }
    model
}

/// A wide model: `fan_out` inputs all feeding one calculated sum. Two
/// dependency levels, best case for bulk resolution.
pub fn wide_model(fan_out: usize) -> FuelModel {
    let mut model = FuelModel::new();
    let names: Vec<String> = (0..fan_out).map(|i| format!("input_{i}")).collect();
    for name in &names {
        model.register_driver(input(name, 2.0));
    }
    model.register_driver(
        Driver::new("total", DriverType::Calculated, "")
            .with_dependencies(names.clone())
            .with_calculation(Formula::new(names, |v| {
                v.iter().copied().fold(Fixed64::ZERO, |acc, x| acc + x)
            })),
    );
    model
}
