use async_trait::async_trait;
use thiserror::Error;

/// Infrastructure failure while resolving a principal.
///
/// "Not found" is not an error; lookups report it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct LookupError(pub String);

/// Capability the gate needs from the storage layer.
#[async_trait]
pub trait PrincipalLookup: Send + Sync + 'static {
    /// Principal record returned by the store.
    type Principal: Send;

    /// Resolve a principal by its canonical string identifier.
    ///
    /// # Arguments
    /// * `id` - Token subject
    ///
    /// # Returns
    /// `Some(principal)` when it exists, `None` otherwise
    ///
    /// # Errors
    /// * `LookupError` - The store could not answer
    async fn find_by_id(&self, id: &str) -> Result<Option<Self::Principal>, LookupError>;
}
