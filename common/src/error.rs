use thiserror::Error;

use crate::map::maker::Cell;

pub type BoxedStoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("grid size must be at least 1, got {0}")]
    InvalidSize(i64),

    #[error("{rooms} rooms cannot be laid out as a square grid")]
    InvalidTopology { rooms: usize },

    #[error("{0} was never registered in the disjoint set")]
    UnknownElement(Cell),

    #[error("edge pool ran out after accepting {accepted} of {target} tree edges")]
    DisconnectedGraph { accepted: usize, target: usize },

    #[error("room store failed: {0}")]
    Store(#[source] BoxedStoreError),
}

impl MapError {
    pub fn store<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MapError::Store(Box::new(error))
    }
}
