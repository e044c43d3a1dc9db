use pb_graph::GraphError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no connection is being drawn")]
    NoPendingConnection,

    #[error("connections must end on an input port")]
    NotAnInput,
}
