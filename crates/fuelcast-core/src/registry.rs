//! The driver registry: every definition the model knows about.
//!
//! Registration is permissive. Overwriting an existing name, declaring
//! dependencies on a non-calculated driver, or registering a calculated
//! driver without a calculation are all allowed; each returns a
//! [`RegistrationWarning`] instead of failing, because driver sets are
//! built incrementally during imports and tests. Only lookups of names
//! that were never registered are hard errors.
//!
//! The registry also owns the cached calculation order. Any registration
//! marks the cache dirty; it is recomputed lazily on the next request.

use crate::driver::{Driver, DriverCategory, DriverType};
use crate::error::EngineError;
use crate::id::DriverId;
use crate::order;
use std::collections::HashMap;

/// Non-fatal configuration findings returned from [`DriverRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationWarning {
    #[error("driver '{0}' replaced an existing registration")]
    ReplacedExisting(String),
    #[error("driver '{0}' is calculated but has no calculation")]
    MissingCalculation(String),
    #[error("driver '{0}' is calculated but declares no dependencies")]
    MissingDependencies(String),
    #[error("driver '{0}' declares dependencies but is not calculated")]
    UnexpectedDependencies(String),
}

/// A dependency naming a driver that is not registered. Reported by
/// [`DriverRegistry::validate_dependencies`], never thrown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("driver '{driver}' depends on unknown driver '{dependency}'")]
pub struct DependencyIssue {
    pub driver: String,
    pub dependency: String,
}

/// Registry of driver definitions, keyed by name.
///
/// Definitions live in a dense table in registration order; names map to
/// stable [`DriverId`] handles. Overwriting a name keeps its original
/// table position, so iteration order is reproducible across overwrites.
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    defs: Vec<Driver>,
    by_name: HashMap<String, DriverId>,

    /// Cached calculation order, recomputed lazily when `order_dirty`.
    order_cache: Vec<DriverId>,
    order_dirty: bool,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self {
            defs: Vec::new(),
            by_name: HashMap::new(),
            order_cache: Vec::new(),
            order_dirty: true,
        }
    }

    /// Insert or overwrite a definition. Returns configuration warnings;
    /// never fails. Invalidates the cached calculation order.
    pub fn register(&mut self, driver: Driver) -> Vec<RegistrationWarning> {
        let mut warnings = Vec::new();

        if driver.is_calculated() {
            if driver.calculation.is_none() {
                warnings.push(RegistrationWarning::MissingCalculation(driver.name.clone()));
            }
            if driver.depends_on.is_empty() {
                warnings.push(RegistrationWarning::MissingDependencies(driver.name.clone()));
            }
        } else if !driver.depends_on.is_empty() {
            warnings.push(RegistrationWarning::UnexpectedDependencies(
                driver.name.clone(),
            ));
        }

        match self.by_name.get(&driver.name) {
            Some(&id) => {
                warnings.push(RegistrationWarning::ReplacedExisting(driver.name.clone()));
                self.defs[id.index()] = driver;
            }
            None => {
                let id = DriverId(self.defs.len() as u32);
                self.by_name.insert(driver.name.clone(), id);
                self.defs.push(driver);
            }
        }

        self.order_dirty = true;
        warnings
    }

    /// Register several definitions, accumulating all warnings.
    pub fn register_many<I>(&mut self, drivers: I) -> Vec<RegistrationWarning>
    where
        I: IntoIterator<Item = Driver>,
    {
        let mut warnings = Vec::new();
        for driver in drivers {
            warnings.extend(self.register(driver));
        }
        warnings
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Result<&Driver, EngineError> {
        self.id_of(name)
            .map(|id| &self.defs[id.index()])
            .ok_or_else(|| EngineError::UnknownDriver(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<DriverId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: DriverId) -> &str {
        &self.defs[id.index()].name
    }

    /// Definition for a handle previously issued by this registry.
    pub(crate) fn def(&self, id: DriverId) -> &Driver {
        &self.defs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Driver> {
        self.defs.iter()
    }

    /// All handles in registration order.
    pub fn ids(&self) -> impl Iterator<Item = DriverId> {
        (0..self.defs.len() as u32).map(DriverId)
    }

    pub fn by_category(&self, category: DriverCategory) -> Vec<&Driver> {
        self.defs.iter().filter(|d| d.category == category).collect()
    }

    /// Every non-calculated driver (the user-facing inputs).
    pub fn inputs(&self) -> Vec<&Driver> {
        self.defs
            .iter()
            .filter(|d| d.driver_type != DriverType::Calculated)
            .collect()
    }

    pub fn calculated(&self) -> Vec<&Driver> {
        self.defs.iter().filter(|d| d.is_calculated()).collect()
    }

    /// Dependencies that reference names not present in the registry.
    /// Empty means the configuration is structurally sound.
    pub fn validate_dependencies(&self) -> Vec<DependencyIssue> {
        let mut issues = Vec::new();
        for driver in &self.defs {
            for dep in &driver.depends_on {
                if !self.by_name.contains_key(dep) {
                    issues.push(DependencyIssue {
                        driver: driver.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }
        issues
    }

    /// The cached calculation order, recomputing if dirty.
    pub fn calculation_order(&mut self) -> Result<&[DriverId], EngineError> {
        if self.order_dirty {
            self.order_cache = order::sort(self)?;
            self.order_dirty = false;
        }
        Ok(&self.order_cache)
    }

    /// Whether the next order request will recompute.
    pub fn is_order_dirty(&self) -> bool {
        self.order_dirty
    }
}
