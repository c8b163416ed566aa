//! Property-based tests for the fuelcast core engine.
//!
//! Uses proptest to generate random value layouts and dependency graphs,
//! then verifies the store's fallback precedence and the orderer's
//! structural invariants hold.

use fuelcast_core::fixed::Fixed64;
use fuelcast_core::id::PlantId;
use fuelcast_core::registry::DriverRegistry;
use fuelcast_core::store::ValueStore;
use fuelcast_core::test_utils::*;
use fuelcast_core::{order, snapshot};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Which of the four store slots a resolution can hit, plus their values.
/// Values are generated as small integers so fixed-point comparison is exact.
#[derive(Debug, Clone)]
struct ValueLayout {
    plant_month: Option<i32>,
    plant_annual: Option<i32>,
    system_month: Option<i32>,
    system_annual: Option<i32>,
    default: i32,
}

fn arb_layout() -> impl Strategy<Value = ValueLayout> {
    (
        proptest::option::of(0..1000i32),
        proptest::option::of(0..1000i32),
        proptest::option::of(0..1000i32),
        proptest::option::of(0..1000i32),
        0..1000i32,
    )
        .prop_map(
            |(plant_month, plant_annual, system_month, system_annual, default)| ValueLayout {
                plant_month,
                plant_annual,
                system_month,
                system_annual,
                default,
            },
        )
}

/// Build a registry of `input_count` inputs followed by calculated drivers
/// whose dependencies only point at earlier registrations. Acyclic by
/// construction.
fn arb_acyclic_registry() -> impl Strategy<Value = DriverRegistry> {
    (1..8usize, 0..8usize)
        .prop_flat_map(|(input_count, calc_count)| {
            // For each calculated driver, a bitmask over the drivers
            // registered before it.
            proptest::collection::vec(0u32..u32::MAX, calc_count)
                .prop_map(move |masks| (input_count, masks))
        })
        .prop_map(|(input_count, masks)| {
            let mut registry = DriverRegistry::new();
            let mut names: Vec<String> = Vec::new();

            for i in 0..input_count {
                let name = format!("input_{i}");
                registry.register(input(&name, i as f64));
                names.push(name);
            }

            for (c, mask) in masks.iter().enumerate() {
                let deps: Vec<String> = names
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << (i % 32)) != 0)
                    .map(|(_, n)| n.clone())
                    .collect();
                let name = format!("calc_{c}");
                let dep_refs: Vec<&str> = deps.iter().map(String::as_str).collect();
                registry.register(sum_of(&name, &dep_refs));
                names.push(name);
            }

            registry
        })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The store's resolution must equal the first present slot in the
    /// fixed precedence: plant+month, plant+annual, system+month,
    /// system+annual, default.
    #[test]
    fn store_resolution_follows_precedence(layout in arb_layout(), month in 1..=12u8) {
        let plant = PlantId(1);
        let mut store = ValueStore::new();

        if let Some(v) = layout.plant_month {
            store.set("d", 2025, Some(month), fixed(v as f64), Some(plant));
        }
        if let Some(v) = layout.plant_annual {
            store.set("d", 2025, None, fixed(v as f64), Some(plant));
        }
        if let Some(v) = layout.system_month {
            store.set("d", 2025, Some(month), fixed(v as f64), None);
        }
        if let Some(v) = layout.system_annual {
            store.set("d", 2025, None, fixed(v as f64), None);
        }

        let expected = layout
            .plant_month
            .or(layout.plant_annual)
            .or(layout.system_month)
            .or(layout.system_annual)
            .unwrap_or(layout.default);

        let got = store.get("d", 2025, month, Some(plant), fixed(layout.default as f64));
        prop_assert_eq!(got, fixed(expected as f64));
    }

    /// System-wide reads never see plant-specific entries.
    #[test]
    fn system_read_ignores_plant_entries(layout in arb_layout(), month in 1..=12u8) {
        let mut store = ValueStore::new();

        if let Some(v) = layout.plant_month {
            store.set("d", 2025, Some(month), fixed(v as f64), Some(PlantId(1)));
        }
        if let Some(v) = layout.plant_annual {
            store.set("d", 2025, None, fixed(v as f64), Some(PlantId(1)));
        }
        if let Some(v) = layout.system_month {
            store.set("d", 2025, Some(month), fixed(v as f64), None);
        }
        if let Some(v) = layout.system_annual {
            store.set("d", 2025, None, fixed(v as f64), None);
        }

        let expected = layout
            .system_month
            .or(layout.system_annual)
            .unwrap_or(layout.default);

        let got = store.get("d", 2025, month, None, fixed(layout.default as f64));
        prop_assert_eq!(got, fixed(expected as f64));
    }

    /// get_all_months agrees with twelve independent gets.
    #[test]
    fn get_all_months_matches_per_month_gets(layout in arb_layout()) {
        let mut store = ValueStore::new();
        if let Some(v) = layout.system_month {
            store.set("d", 2025, Some(4), fixed(v as f64), None);
        }
        if let Some(v) = layout.system_annual {
            store.set("d", 2025, None, fixed(v as f64), None);
        }

        let default = fixed(layout.default as f64);
        let months = store.get_all_months("d", 2025, None, default);
        for (i, &resolved) in months.iter().enumerate() {
            prop_assert_eq!(resolved, store.get("d", 2025, i as u8 + 1, None, default));
        }
    }

    /// Every driver appears exactly once in the calculation order, strictly
    /// after all of its dependencies.
    #[test]
    fn order_places_dependencies_first(registry in arb_acyclic_registry()) {
        let sorted = order::sort(&registry).unwrap();
        prop_assert_eq!(sorted.len(), registry.len());

        let mut seen = std::collections::HashSet::new();
        for &id in &sorted {
            prop_assert!(seen.insert(id), "duplicate driver in order: {:?}", id);
        }

        let position = |name: &str| {
            let id = registry.id_of(name).unwrap();
            sorted.iter().position(|&o| o == id).unwrap()
        };

        for driver in registry.iter() {
            for dep in &driver.depends_on {
                prop_assert!(
                    position(&driver.name) > position(dep),
                    "'{}' must come after its dependency '{}'",
                    driver.name,
                    dep
                );
            }
        }
    }

    /// Evaluating a calculated chain terminates with the exact sum.
    #[test]
    fn chain_evaluation_is_exact(length in 1..40usize, base in 0..1000i32) {
        let mut model = chain_model(length);
        model
            .set_value("base", 2025, None, fixed(base as f64), None)
            .unwrap();

        let tip = format!("chain_{length}");
        let value = model.value(&tip, 2025, 1, None).unwrap();
        prop_assert_eq!(value, fixed((base + length as i32) as f64));
    }

    /// Snapshot round-trips preserve every resolution.
    #[test]
    fn snapshot_round_trip_preserves_resolution(
        entries in proptest::collection::vec(
            (0..5u8, 1..=12u8, 0..1000i32, proptest::option::of(1..4u32)),
            0..30,
        )
    ) {
        let mut store = ValueStore::new();
        for (d, month, v, plant) in &entries {
            store.set(
                &format!("driver_{d}"),
                2025,
                Some(*month),
                fixed(*v as f64),
                plant.map(PlantId),
            );
        }

        let restored = snapshot::decode(&snapshot::encode(&store).unwrap()).unwrap();
        prop_assert_eq!(restored.len(), store.len());
        for (d, month, _, plant) in &entries {
            let name = format!("driver_{d}");
            prop_assert_eq!(
                restored.get(&name, 2025, *month, plant.map(PlantId), Fixed64::ZERO),
                store.get(&name, 2025, *month, plant.map(PlantId), Fixed64::ZERO)
            );
        }
    }
}

// ===========================================================================
// Deterministic spot checks that anchor the generators
// ===========================================================================

#[test]
fn cyclic_model_fails_order_and_evaluation() {
    let mut model = cyclic_model();
    assert!(model.calculation_order().is_err());
    assert!(model.value("a", 2025, 1, None).is_err());
}

#[test]
fn diamond_dependencies_evaluate_once_per_read() {
    let mut model = fuelcast_core::model::FuelModel::new();
    model.register_driver(input("base", 3.0));
    model.register_driver(sum_of("left", &["base"]));
    model.register_driver(sum_of("right", &["base"]));
    model.register_driver(sum_of("top", &["left", "right"]));

    assert_eq!(model.value("top", 2025, 1, None).unwrap(), fixed(6.0));
    assert_eq!(model.calculation_order().unwrap().len(), 4);
}

#[test]
fn registering_drivers_in_any_order_yields_same_values() {
    let mut forward = fuelcast_core::model::FuelModel::new();
    forward.register_driver(input("a", 2.0));
    forward.register_driver(input("b", 5.0));
    forward.register_driver(sum_of("sum", &["a", "b"]));

    let mut reverse = fuelcast_core::model::FuelModel::new();
    reverse.register_driver(sum_of("sum", &["a", "b"]));
    reverse.register_driver(input("b", 5.0));
    reverse.register_driver(input("a", 2.0));

    assert_eq!(
        forward.value("sum", 2025, 1, None).unwrap(),
        reverse.value("sum", 2025, 1, None).unwrap()
    );
}
