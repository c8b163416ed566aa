/// Errors surfaced by the engine during registration lookups and evaluation.
///
/// Both variants are programmer/configuration errors, not transient faults:
/// they propagate to the caller and are never retried or swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A driver name was read or written without being registered first.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// The dependency graph contains a cycle through the named driver.
    /// Fatal to order building and to evaluation of calculated drivers.
    #[error("circular dependency detected involving: {0}")]
    CircularDependency(String),
}
