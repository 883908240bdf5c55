//! System registry error types.

use crate::registry::SystemId;

/// Errors returned by [`SystemRegistry`](crate::SystemRegistry) lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    /// No system with this ID is registered.
    #[error("no system registered with id {0}")]
    UnknownSystem(SystemId),
}
