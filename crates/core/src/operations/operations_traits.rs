use crate::errors::Result;
use crate::operations::Operation;

/// Source of a user's operation history (the hosted backend in production).
///
/// Implementations return every operation for one user, already validated.
pub trait OperationRepositoryTrait: Send + Sync {
    fn list_operations(&self) -> Result<Vec<Operation>>;
}
