#[derive(Debug, thiserror::Error)]
pub enum FalconError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Types(#[from] falcon_types::TypesError),
    #[error(transparent)]
    Uuid(#[from] falcon_uuid::UuidError),

    #[error("unknown surveillance module: '{0}' (expected VAE, CLABSI, CAUTI, SSI or DE)")]
    UnknownModule(String),
    #[error("unknown population: '{0}' (expected Adults or NICU)")]
    UnknownPopulation(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write store file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read store file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize value: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize value: {0}")]
    Deserialization(serde_json::Error),

    #[error("Incorrect passcode. Please try again.")]
    IncorrectPasscode,
}

pub type FalconResult<T> = std::result::Result<T, FalconError>;
