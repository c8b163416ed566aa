//! The calculation capability for derived drivers.
//!
//! A calculated driver carries a [`Calculation`] that resolves its value
//! from other drivers through the model facade. Any matching closure
//! implements the trait directly; [`Formula`] covers the common case of a
//! pure function over a fixed list of dependency values.

use crate::error::EngineError;
use crate::fixed::Fixed64;
use crate::id::PlantId;
use crate::model::FuelModel;

/// Evaluates one calculated driver for one period.
///
/// Implementations read their dependencies back through the facade, which
/// guarantees the dependency graph was cycle-checked before this runs.
pub trait Calculation: Send + Sync {
    fn evaluate(
        &self,
        model: &FuelModel,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
    ) -> Result<Fixed64, EngineError>;
}

impl<F> Calculation for F
where
    F: Fn(&FuelModel, i32, u8, Option<PlantId>) -> Result<Fixed64, EngineError> + Send + Sync,
{
    fn evaluate(
        &self,
        model: &FuelModel,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
    ) -> Result<Fixed64, EngineError> {
        self(model, year, month, plant)
    }
}

/// A calculation built from an ordered dependency list and a pure combiner.
///
/// Dependency values are resolved through the facade and handed to the
/// combiner as a slice in declared order, so combiners never do fallible
/// name lookups:
///
/// ```rust,ignore
/// let total = Formula::new(["price", "quantity"], |v| v[0] * v[1]);
/// ```
pub struct Formula {
    dependencies: Vec<String>,
    combine: Box<dyn Fn(&[Fixed64]) -> Fixed64 + Send + Sync>,
}

impl Formula {
    pub fn new<I, S, F>(dependencies: I, combine: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Fixed64]) -> Fixed64 + Send + Sync + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            combine: Box::new(combine),
        }
    }

    /// The dependency names, in the order the combiner receives them.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl Calculation for Formula {
    fn evaluate(
        &self,
        model: &FuelModel,
        year: i32,
        month: u8,
        plant: Option<PlantId>,
    ) -> Result<Fixed64, EngineError> {
        let mut resolved = Vec::with_capacity(self.dependencies.len());
        for dep in &self.dependencies {
            resolved.push(model.value(dep, year, month, plant)?);
        }
        Ok((self.combine)(&resolved))
    }
}
