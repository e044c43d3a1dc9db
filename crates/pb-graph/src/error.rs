//! Graph-specific error types.

use pb_core::BlockId;
use thiserror::Error;

use crate::model::PortSide;

/// Result type for graph store operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Catalog lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No definition matches the requested type string.
    #[error("Block type not found: {block_type}")]
    NotFound { block_type: String },
}

/// Graph mutation errors.
///
/// Every variant is recoverable: the store is left exactly as it was before
/// the failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The requested block type is not in the catalog.
    #[error("Unknown block type: {block_type}")]
    UnknownType { block_type: String },

    /// A referenced block or connection does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    /// The port name is not on the expected side of the block.
    #[error("Block {block} has no {side} port named '{port}'")]
    InvalidPort {
        block: BlockId,
        port: String,
        side: PortSide,
    },

    /// Source and target are the same block.
    #[error("Block {block} cannot be connected to itself")]
    SelfLoop { block: BlockId },

    /// The target input already has an incoming connection.
    #[error("Port already connected: {block}.{port}")]
    PortOccupied { block: BlockId, port: String },

    /// Store contents break a structural rule.
    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}

impl GraphError {
    pub(crate) fn block_not_found(id: BlockId) -> Self {
        GraphError::NotFound {
            what: "Block",
            id: id.to_string(),
        }
    }
}

impl From<CatalogError> for GraphError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { block_type } => GraphError::UnknownType { block_type },
        }
    }
}
