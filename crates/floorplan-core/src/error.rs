//! Error types for world queries.

use crate::objects::EntityId;
use thiserror::Error;

/// Errors returned by checked world queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FloorplanError {
    #[error("no entity {0} in the world")]
    UnknownEntity(EntityId),
    #[error("entity {0} is not a wall")]
    NotAWall(EntityId),
    #[error("entity {0} is not a room")]
    NotARoom(EntityId),
}

/// Result type for world operations.
pub type FloorplanResult<T> = Result<T, FloorplanError>;
