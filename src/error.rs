use thiserror::Error;

use crate::model::ClassId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown class: {0}")]
    UnknownClass(ClassId),

    #[error("Can't find route from class {from} to unconnected class {to}")]
    UnreachableClass { from: ClassId, to: ClassId },

    #[error("Duplicate stat id: {0}")]
    DuplicateStat(String),

    #[error("Model read error: {0}")]
    ModelRead(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stat worker disconnected before signalling completion")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, Error>;
