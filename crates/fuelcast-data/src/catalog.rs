//! The default driver catalog for the coal-fired forecasting model.
//!
//! Forty-one drivers across six groups. Inputs carry the utility's planning
//! defaults with bounds and step hints for editing surfaces; calculated
//! drivers carry their formulas. [`default_fuel_model`] registers the whole
//! set into a fresh model.
//!
//! Percentage drivers hold values on a 0-100 scale; formulas divide by 100
//! where a fraction is needed.

use fuelcast_core::calc::Formula;
use fuelcast_core::driver::{Driver, DriverCategory, DriverType};
use fuelcast_core::error::EngineError;
use fuelcast_core::fixed::{f64_to_fixed64 as fx, Fixed64};
use fuelcast_core::id::PlantId;
use fuelcast_core::model::FuelModel;
use fuelcast_core::period::{days_in_month, hours_in_month};

// ---------------------------------------------------------------------------
// Coal price (11 drivers)
// ---------------------------------------------------------------------------

/// Regional coal prices, heat contents, blend percentages, and the blended
/// price and $/MMBtu conversions derived from them.
pub fn coal_price_drivers() -> Vec<Driver> {
    vec![
        Driver::new("coal_price_eastern", DriverType::PriceIndex, "$/ton")
            .with_default_value(fx(55.00))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Eastern coal price")
            .with_display_order(1)
            .with_bounds(fx(0.0), fx(200.0))
            .with_step(fx(0.50)),
        Driver::new("coal_price_ilb", DriverType::PriceIndex, "$/ton")
            .with_default_value(fx(45.00))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Illinois Basin coal price")
            .with_display_order(2)
            .with_bounds(fx(0.0), fx(200.0))
            .with_step(fx(0.50)),
        Driver::new("coal_price_prb", DriverType::PriceIndex, "$/ton")
            .with_default_value(fx(15.00))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Powder River Basin coal price")
            .with_display_order(3)
            .with_bounds(fx(0.0), fx(100.0))
            .with_step(fx(0.25)),
        Driver::new("coal_btu_eastern", DriverType::Rate, "BTU/lb")
            .with_default_value(fx(12600.0))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Heat content for Eastern coal")
            .with_display_order(4)
            .with_bounds(fx(10000.0), fx(15000.0))
            .with_step(fx(50.0)),
        Driver::new("coal_btu_ilb", DriverType::Rate, "BTU/lb")
            .with_default_value(fx(11400.0))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Heat content for Illinois Basin coal")
            .with_display_order(5)
            .with_bounds(fx(10000.0), fx(13000.0))
            .with_step(fx(50.0)),
        Driver::new("coal_blend_eastern_pct", DriverType::Percentage, "%")
            .with_default_value(fx(100.0))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Percentage of Eastern coal in blend")
            .with_display_order(6)
            .with_bounds(fx(0.0), fx(100.0))
            .with_step(fx(5.0)),
        Driver::new("coal_blend_ilb_pct", DriverType::Percentage, "%")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Percentage of Illinois Basin coal in blend")
            .with_display_order(7)
            .with_bounds(fx(0.0), fx(100.0))
            .with_step(fx(5.0)),
        Driver::new("coal_blend_prb_pct", DriverType::Percentage, "%")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Percentage of PRB coal in blend")
            .with_display_order(8)
            .with_bounds(fx(0.0), fx(100.0))
            .with_step(fx(5.0)),
        Driver::new("coal_price_blended", DriverType::Calculated, "$/ton")
            .with_default_value(fx(55.00))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Weighted average coal price based on blend")
            .with_display_order(9)
            .with_dependencies([
                "coal_price_eastern",
                "coal_price_ilb",
                "coal_price_prb",
                "coal_blend_eastern_pct",
                "coal_blend_ilb_pct",
                "coal_blend_prb_pct",
            ])
            .with_calculation(Formula::new(
                [
                    "coal_price_eastern",
                    "coal_price_ilb",
                    "coal_price_prb",
                    "coal_blend_eastern_pct",
                    "coal_blend_ilb_pct",
                    "coal_blend_prb_pct",
                ],
                |v| {
                    let hundred = fx(100.0);
                    let eastern_pct = v[3] / hundred;
                    let ilb_pct = v[4] / hundred;
                    let prb_pct = v[5] / hundred;
                    let total = eastern_pct + ilb_pct + prb_pct;
                    if total > Fixed64::ZERO {
                        (v[0] * eastern_pct + v[1] * ilb_pct + v[2] * prb_pct) / total
                    } else {
                        // No blend specified: fall back to the eastern price.
                        v[0]
                    }
                },
            )),
        Driver::new("coal_mmbtu_eastern", DriverType::Calculated, "$/MMBtu")
            .with_default_value(fx(2.20))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Eastern coal cost per MMBtu")
            .with_display_order(10)
            .with_dependencies(["coal_price_eastern", "coal_btu_eastern"])
            .with_calculation(Formula::new(
                ["coal_price_eastern", "coal_btu_eastern"],
                price_per_mmbtu,
            )),
        Driver::new("coal_mmbtu_ilb", DriverType::Calculated, "$/MMBtu")
            .with_default_value(fx(1.97))
            .with_category(DriverCategory::CoalPrice)
            .with_description("Illinois Basin coal cost per MMBtu")
            .with_display_order(11)
            .with_dependencies(["coal_price_ilb", "coal_btu_ilb"])
            .with_calculation(Formula::new(["coal_price_ilb", "coal_btu_ilb"], price_per_mmbtu)),
    ]
}

/// $/ton over MMBtu/ton, where MMBtu/ton = BTU/lb x 2000 lb/ton / 1e6.
/// Zero heat content yields zero rather than dividing by zero.
fn price_per_mmbtu(v: &[Fixed64]) -> Fixed64 {
    let mmbtu_per_ton = v[1] * fx(2000.0) / fx(1_000_000.0);
    if mmbtu_per_ton > Fixed64::ZERO {
        v[0] / mmbtu_per_ton
    } else {
        Fixed64::ZERO
    }
}

// ---------------------------------------------------------------------------
// Transportation (4 drivers)
// ---------------------------------------------------------------------------

pub fn transportation_drivers() -> Vec<Driver> {
    vec![
        Driver::new("barge_rate_ohio", DriverType::Rate, "$/ton")
            .with_default_value(fx(6.00))
            .with_category(DriverCategory::Transportation)
            .with_description("Ohio River barge transportation rate")
            .with_display_order(1)
            .with_bounds(fx(0.0), fx(20.0))
            .with_step(fx(0.25)),
        Driver::new("barge_rate_upper_ohio", DriverType::Rate, "$/ton")
            .with_default_value(fx(7.50))
            .with_category(DriverCategory::Transportation)
            .with_description("Upper Ohio River barge transportation rate")
            .with_display_order(2)
            .with_bounds(fx(0.0), fx(25.0))
            .with_step(fx(0.25)),
        Driver::new("rail_rate_prb", DriverType::Rate, "$/ton")
            .with_default_value(fx(30.00))
            .with_category(DriverCategory::Transportation)
            .with_description("Rail transportation rate for PRB coal")
            .with_display_order(3)
            .with_bounds(fx(0.0), fx(60.0))
            .with_step(fx(1.00)),
        Driver::new("delivered_cost", DriverType::Calculated, "$/ton")
            .with_default_value(fx(61.00))
            .with_category(DriverCategory::Transportation)
            .with_description("Total delivered coal cost (coal + transport)")
            .with_display_order(4)
            .with_dependencies(["coal_price_blended", "barge_rate_ohio"])
            .with_calculation(Formula::new(["coal_price_blended", "barge_rate_ohio"], |v| {
                v[0] + v[1]
            })),
    ]
}

// ---------------------------------------------------------------------------
// Heat rate (6 drivers)
// ---------------------------------------------------------------------------

pub fn heat_rate_drivers() -> Vec<Driver> {
    vec![
        Driver::new("heat_rate_baseline", DriverType::Rate, "BTU/kWh")
            .with_default_value(fx(9850.0))
            .with_category(DriverCategory::HeatRate)
            .with_description("Baseline heat rate")
            .with_display_order(1)
            .with_bounds(fx(8500.0), fx(12000.0))
            .with_step(fx(10.0))
            .plant_specific(),
        Driver::new("heat_rate_baseline_kc", DriverType::Rate, "BTU/kWh")
            .with_default_value(fx(9850.0))
            .with_category(DriverCategory::HeatRate)
            .with_description("Kyger Creek baseline heat rate")
            .with_display_order(2)
            .with_bounds(fx(8500.0), fx(12000.0))
            .with_step(fx(10.0)),
        Driver::new("heat_rate_baseline_cc", DriverType::Rate, "BTU/kWh")
            .with_default_value(fx(9900.0))
            .with_category(DriverCategory::HeatRate)
            .with_description("Clifty Creek baseline heat rate")
            .with_display_order(3)
            .with_bounds(fx(8500.0), fx(12000.0))
            .with_step(fx(10.0)),
        Driver::new("heat_rate_suf_correction", DriverType::Rate, "BTU/kWh")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::HeatRate)
            .with_description("Start-up fuel correction")
            .with_display_order(4)
            .with_bounds(fx(-500.0), fx(500.0))
            .with_step(fx(10.0)),
        Driver::new("heat_rate_prb_penalty", DriverType::Rate, "BTU/kWh per %PRB")
            .with_default_value(fx(100.0))
            .with_category(DriverCategory::HeatRate)
            .with_description("Heat rate penalty per percent PRB in blend")
            .with_display_order(5)
            .with_bounds(fx(0.0), fx(300.0))
            .with_step(fx(10.0)),
        Driver::new("heat_rate_effective", DriverType::Calculated, "BTU/kWh")
            .with_default_value(fx(9850.0))
            .with_category(DriverCategory::HeatRate)
            .with_description("Effective heat rate with all adjustments")
            .with_display_order(6)
            .with_dependencies([
                "heat_rate_baseline",
                "heat_rate_suf_correction",
                "coal_blend_prb_pct",
                "heat_rate_prb_penalty",
            ])
            .with_calculation(Formula::new(
                [
                    "heat_rate_baseline",
                    "heat_rate_suf_correction",
                    "coal_blend_prb_pct",
                    "heat_rate_prb_penalty",
                ],
                |v| v[0] + v[1] + (v[2] / fx(100.0)) * v[3],
            )),
    ]
}

// ---------------------------------------------------------------------------
// Generation (10 drivers)
// ---------------------------------------------------------------------------

pub fn generation_drivers() -> Vec<Driver> {
    vec![
        Driver::new("capacity_mw", DriverType::Volume, "MW")
            .with_default_value(fx(1025.0))
            .with_category(DriverCategory::Generation)
            .with_description("Available plant capacity")
            .with_display_order(1)
            .with_bounds(fx(0.0), fx(2000.0))
            .with_step(fx(5.0))
            .plant_specific(),
        Driver::new("use_factor", DriverType::Percentage, "%")
            .with_default_value(fx(85.0))
            .with_category(DriverCategory::Generation)
            .with_description("Plant use factor")
            .with_display_order(2)
            .with_bounds(fx(0.0), fx(100.0))
            .with_step(fx(1.0)),
        Driver::new("capacity_factor_target", DriverType::Percentage, "%")
            .with_default_value(fx(70.0))
            .with_category(DriverCategory::Generation)
            .with_description("Target capacity factor for planning")
            .with_display_order(3)
            .with_bounds(fx(0.0), fx(100.0))
            .with_step(fx(1.0)),
        Driver::new("outage_days_planned", DriverType::Volume, "days")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::Generation)
            .with_description("Planned outage days in the period")
            .with_display_order(4)
            .with_bounds(fx(0.0), fx(31.0))
            .with_step(fx(1.0)),
        Driver::new("outage_days_forced", DriverType::Volume, "days")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::Generation)
            .with_description("Forced outage days in the period")
            .with_display_order(5)
            .with_bounds(fx(0.0), fx(31.0))
            .with_step(fx(1.0)),
        Driver::new("fgd_aux_pct", DriverType::Percentage, "%")
            .with_default_value(fx(2.5))
            .with_category(DriverCategory::Generation)
            .with_description("FGD auxiliary load as % of generation")
            .with_display_order(6)
            .with_bounds(fx(0.0), fx(10.0))
            .with_step(fx(0.1)),
        Driver::new("gsu_loss_pct", DriverType::Percentage, "%")
            .with_default_value(fx(0.5545))
            .with_category(DriverCategory::Generation)
            .with_description("GSU transformer losses as % of generation")
            .with_display_order(7)
            .with_bounds(fx(0.0), fx(2.0))
            .with_step(fx(0.01)),
        Driver::new("reserve_mw", DriverType::Volume, "MW")
            .with_default_value(fx(10.0))
            .with_category(DriverCategory::Generation)
            .with_description("System regulating reserve")
            .with_display_order(8)
            .with_bounds(fx(0.0), fx(50.0))
            .with_step(fx(1.0)),
        Driver::new("generation_mwh", DriverType::Calculated, "MWh")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::Generation)
            .with_description("Gross generation MWh for the period")
            .with_display_order(9)
            .with_dependencies(["capacity_mw", "use_factor"])
            .with_calculation(
                |m: &FuelModel, year: i32, month: u8, plant: Option<PlantId>| {
                    let capacity = m.value("capacity_mw", year, month, plant)?;
                    let use_factor = m.value("use_factor", year, month, plant)? / fx(100.0);
                    let hours = Fixed64::from_num(hours_in_month(year, month));
                    Ok(capacity * hours * use_factor)
                },
            ),
        Driver::new("net_delivered_mwh", DriverType::Calculated, "MWh")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::Generation)
            .with_description("Net delivered MWh after losses and reserve")
            .with_display_order(10)
            .with_dependencies(["generation_mwh", "fgd_aux_pct", "gsu_loss_pct", "reserve_mw"])
            .with_calculation(
                |m: &FuelModel, year: i32, month: u8, plant: Option<PlantId>| {
                    let generation = m.value("generation_mwh", year, month, plant)?;
                    let fgd = m.value("fgd_aux_pct", year, month, plant)? / fx(100.0);
                    let gsu = m.value("gsu_loss_pct", year, month, plant)? / fx(100.0);
                    let reserve = m.value("reserve_mw", year, month, plant)?;
                    let hours = Fixed64::from_num(hours_in_month(year, month));

                    let net =
                        generation * (Fixed64::ONE - fgd) * (Fixed64::ONE - gsu) - reserve * hours;
                    Ok(net.max(Fixed64::ZERO))
                },
            ),
    ]
}

// ---------------------------------------------------------------------------
// Inventory (7 drivers)
// ---------------------------------------------------------------------------

pub fn inventory_drivers() -> Vec<Driver> {
    vec![
        Driver::new("inventory_target_days", DriverType::Volume, "days")
            .with_default_value(fx(50.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Target coal inventory in days of supply")
            .with_display_order(1)
            .with_bounds(fx(0.0), fx(120.0))
            .with_step(fx(5.0)),
        Driver::new("inventory_beginning_tons", DriverType::Volume, "tons")
            .with_default_value(fx(150000.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Beginning coal inventory")
            .with_display_order(2)
            .with_min(fx(0.0))
            .with_step(fx(1000.0))
            .plant_specific(),
        Driver::new("coal_deliveries_tons", DriverType::Volume, "tons")
            .with_default_value(fx(80000.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Total coal deliveries for the period")
            .with_display_order(3)
            .with_min(fx(0.0))
            .with_step(fx(1000.0)),
        Driver::new("contracted_deliveries_tons", DriverType::Volume, "tons")
            .with_default_value(fx(75000.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Contracted coal deliveries for the period")
            .with_display_order(4)
            .with_min(fx(0.0))
            .with_step(fx(1000.0)),
        Driver::new("coal_consumption_tons", DriverType::Volume, "tons")
            .with_default_value(fx(80000.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Coal consumption for the period")
            .with_display_order(5)
            .with_min(fx(0.0))
            .with_step(fx(1000.0)),
        Driver::new("inventory_ending_tons", DriverType::Calculated, "tons")
            .with_default_value(fx(150000.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Ending coal inventory")
            .with_display_order(6)
            .with_dependencies([
                "inventory_beginning_tons",
                "coal_deliveries_tons",
                "coal_consumption_tons",
            ])
            .with_calculation(Formula::new(
                [
                    "inventory_beginning_tons",
                    "coal_deliveries_tons",
                    "coal_consumption_tons",
                ],
                |v| v[0] + v[1] - v[2],
            )),
        Driver::new("uncommitted_tons_needed", DriverType::Calculated, "tons")
            .with_default_value(fx(0.0))
            .with_category(DriverCategory::Inventory)
            .with_description("Uncommitted coal needed to meet inventory target")
            .with_display_order(7)
            .with_dependencies([
                "inventory_target_days",
                "coal_consumption_tons",
                "inventory_beginning_tons",
                "contracted_deliveries_tons",
            ])
            .with_calculation(
                |m: &FuelModel, year: i32, month: u8, plant: Option<PlantId>| {
                    let target_days = m.value("inventory_target_days", year, month, plant)?;
                    let consumption = m.value("coal_consumption_tons", year, month, plant)?;
                    let beginning = m.value("inventory_beginning_tons", year, month, plant)?;
                    let contracted = m.value("contracted_deliveries_tons", year, month, plant)?;

                    let days = Fixed64::from_num(days_in_month(year, month));
                    let target_inventory = target_days * (consumption / days);
                    // Inventory expected after contracted deliveries only.
                    let expected = beginning + contracted - consumption;

                    Ok((target_inventory - expected).max(Fixed64::ZERO))
                },
            ),
    ]
}

// ---------------------------------------------------------------------------
// Escalation (3 drivers)
// ---------------------------------------------------------------------------

pub fn escalation_drivers() -> Vec<Driver> {
    vec![
        Driver::new("escalation_coal_annual", DriverType::Percentage, "%")
            .with_default_value(fx(2.0))
            .with_category(DriverCategory::Escalation)
            .with_description("Annual coal price escalation rate")
            .with_display_order(1)
            .with_bounds(fx(-10.0), fx(20.0))
            .with_step(fx(0.5)),
        Driver::new("escalation_transport_annual", DriverType::Percentage, "%")
            .with_default_value(fx(2.5))
            .with_category(DriverCategory::Escalation)
            .with_description("Annual transportation cost escalation rate")
            .with_display_order(2)
            .with_bounds(fx(-10.0), fx(20.0))
            .with_step(fx(0.5)),
        Driver::new("escalation_reagent_annual", DriverType::Percentage, "%")
            .with_default_value(fx(2.0))
            .with_category(DriverCategory::Escalation)
            .with_description("Annual reagent/consumables cost escalation rate")
            .with_display_order(3)
            .with_bounds(fx(-10.0), fx(20.0))
            .with_step(fx(0.5)),
    ]
}

// ---------------------------------------------------------------------------
// The combined catalog
// ---------------------------------------------------------------------------

/// Every default driver, grouped order: coal price, transportation,
/// heat rate, generation, inventory, escalation.
pub fn all_drivers() -> Vec<Driver> {
    let mut drivers = coal_price_drivers();
    drivers.extend(transportation_drivers());
    drivers.extend(heat_rate_drivers());
    drivers.extend(generation_drivers());
    drivers.extend(inventory_drivers());
    drivers.extend(escalation_drivers());
    drivers
}

/// A fuel model with the full default catalog registered.
pub fn default_fuel_model() -> FuelModel {
    let mut model = FuelModel::new();
    model.register_drivers(all_drivers());
    model
}

/// Look up one catalog definition by name.
pub fn driver_by_name(name: &str) -> Result<Driver, EngineError> {
    all_drivers()
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| EngineError::UnknownDriver(name.to_string()))
}
