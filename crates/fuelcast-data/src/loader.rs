//! File-based loading of driver definitions and stored values.
//!
//! Provides format detection (RON/TOML/JSON), file discovery, and the DTOs
//! that carry drivers and value rows on disk. Calculated drivers loaded from
//! files have no formula; pair file definitions with
//! [`Driver::with_calculation`] in code, or load only inputs.

use fuelcast_core::driver::{Driver, DriverCategory, DriverType};
use fuelcast_core::fixed::f64_to_fixed64;
use fuelcast_core::id::PlantId;
use fuelcast_core::model::FuelModel;
use fuelcast_core::period::{Period, PeriodParseError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A value row carries a malformed period string.
    #[error(transparent)]
    Period(#[from] PeriodParseError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection and file discovery
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Scan a directory for a data file with the given base name (without
/// extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Json => serde_json::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        }),
        Format::Toml => {
            let table: toml::Value =
                toml::from_str(&content).map_err(|e| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: e.to_string(),
                })?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: format!("missing key '{toml_key}' in TOML file"),
                })?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: e.to_string(),
                })
        }
    }
}

// ===========================================================================
// Driver definitions
// ===========================================================================

/// On-disk driver definition. Numeric fields are plain floats; conversion to
/// fixed-point happens when the definition becomes a [`Driver`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDef {
    pub name: String,
    pub driver_type: DriverType,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub default_value: f64,
    #[serde(default)]
    pub category: DriverCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub is_plant_specific: bool,
}

fn default_step() -> f64 {
    1.0
}

impl From<DriverDef> for Driver {
    fn from(def: DriverDef) -> Self {
        let mut driver = Driver::new(&def.name, def.driver_type, &def.unit)
            .with_default_value(f64_to_fixed64(def.default_value))
            .with_category(def.category)
            .with_description(&def.description)
            .with_display_order(def.display_order)
            .with_step(f64_to_fixed64(def.step))
            .with_dependencies(def.depends_on);
        if let Some(min) = def.min_value {
            driver = driver.with_min(f64_to_fixed64(min));
        }
        if let Some(max) = def.max_value {
            driver.max_value = Some(f64_to_fixed64(max));
        }
        if def.is_plant_specific {
            driver = driver.plant_specific();
        }
        driver
    }
}

/// Load driver definitions from a file. TOML files carry the list under a
/// top-level `drivers` key.
pub fn load_driver_defs(path: &Path) -> Result<Vec<Driver>, DataLoadError> {
    let defs: Vec<DriverDef> = deserialize_list(path, "drivers")?;
    Ok(defs.into_iter().map(Driver::from).collect())
}

// ===========================================================================
// Value rows
// ===========================================================================

/// One stored value on disk: driver name, optional plant, period string
/// (`YYYY` or `YYYYMM`), and the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRow {
    pub driver: String,
    #[serde(default)]
    pub plant: Option<u32>,
    pub period: String,
    pub value: f64,
}

/// Outcome of [`apply_values`]: how many rows landed in the store and the
/// names of rows skipped because their driver isn't registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: Vec<String>,
}

/// Load value rows from a file. TOML files carry the list under a top-level
/// `values` key.
pub fn load_value_rows(path: &Path) -> Result<Vec<ValueRow>, DataLoadError> {
    deserialize_list(path, "values")
}

/// Apply value rows to a model. Rows naming unregistered drivers are
/// skipped and reported; a malformed period string fails the whole batch.
pub fn apply_values(model: &mut FuelModel, rows: &[ValueRow]) -> Result<ApplyReport, DataLoadError> {
    let mut report = ApplyReport::default();

    for row in rows {
        let period = Period::parse(&row.period)?;
        let plant = row.plant.map(PlantId);
        let value = f64_to_fixed64(row.value);

        match model.set_value(&row.driver, period.year, period.month, value, plant) {
            Ok(()) => report.applied += 1,
            Err(_) => report.skipped.push(row.driver.clone()),
        }
    }

    Ok(report)
}

// ===========================================================================
// Tests
// ===========================================================================
