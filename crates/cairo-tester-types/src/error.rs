use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),
    #[error(transparent)]
    JsonError(#[from] JsonError),
    #[error("Artifact contains no ABI")]
    MissingAbi,
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Invalid internal structure: {0}")]
    InvalidInternalStructure(String),
    #[error("Value is out of range: {0}")]
    OutOfRangeError(String),
    #[error("Error converting from hex string: {0}")]
    CustomFromHexError(String),
    #[error("Error converting from decimal string: {0}")]
    CustomFromDecError(String),
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(JsonError::SerdeJsonError(value))
    }
}

pub type TypesResult<T, E = Error> = Result<T, E>;
