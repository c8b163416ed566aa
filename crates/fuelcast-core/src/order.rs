//! Dependency ordering for driver evaluation.
//!
//! Produces a linear order over all registered drivers in which every
//! driver appears after everything in its `depends_on` list, so calculated
//! drivers can be evaluated front to back. Depth-first with an on-path
//! marker: re-encountering a driver that is still on the active visitation
//! path is a cycle and fails with [`EngineError::CircularDependency`]
//! naming that driver. Fully visited drivers are appended exactly once, so
//! diamond-shaped graphs are safe.
//!
//! Dependencies naming unregistered drivers are skipped here; they are a
//! configuration concern surfaced by `DriverRegistry::validate_dependencies`.
//! Ties between independent drivers break by registration order, keeping
//! the result deterministic.

use crate::error::EngineError;
use crate::id::DriverId;
use crate::registry::DriverRegistry;

/// Topologically sort every driver in `registry`.
pub fn sort(registry: &DriverRegistry) -> Result<Vec<DriverId>, EngineError> {
    let count = registry.len();
    let mut visited = vec![false; count];
    let mut on_path = vec![false; count];
    let mut order = Vec::with_capacity(count);

    for id in registry.ids() {
        if !visited[id.index()] {
            visit(registry, id, &mut visited, &mut on_path, &mut order)?;
        }
    }

    Ok(order)
}

fn visit(
    registry: &DriverRegistry,
    id: DriverId,
    visited: &mut [bool],
    on_path: &mut [bool],
    order: &mut Vec<DriverId>,
) -> Result<(), EngineError> {
    if on_path[id.index()] {
        return Err(EngineError::CircularDependency(
            registry.name_of(id).to_string(),
        ));
    }
    if visited[id.index()] {
        return Ok(());
    }

    on_path[id.index()] = true;
    for dep in &registry.def(id).depends_on {
        if let Some(dep_id) = registry.id_of(dep) {
            visit(registry, dep_id, visited, on_path, order)?;
        }
    }
    on_path[id.index()] = false;

    visited[id.index()] = true;
    order.push(id);
    Ok(())
}
