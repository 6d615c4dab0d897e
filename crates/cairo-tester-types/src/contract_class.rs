use serde::Deserialize;

use crate::abi::AbiEntry;
use crate::error::{Error, JsonError, TypesResult};
use crate::serde_helpers::sierra_abi::deserialize_abi;

/// The parts of a compiled Sierra contract class this crate cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SierraArtifact {
    #[serde(default, deserialize_with = "deserialize_abi")]
    pub abi: Vec<AbiEntry>,
    #[serde(default)]
    pub contract_class_version: Option<String>,
}

impl SierraArtifact {
    /// Accepts a Sierra contract class or a bare ABI array.
    pub fn abi_from_json_str(json_str: &str) -> TypesResult<Vec<AbiEntry>> {
        let json_value: serde_json::Value =
            serde_json::from_str(json_str).map_err(JsonError::SerdeJsonError)?;

        if json_value.is_array() {
            return Ok(serde_json::from_value(json_value).map_err(JsonError::SerdeJsonError)?);
        }

        if json_value.get("abi").is_none() {
            return Err(Error::MissingAbi);
        }

        let artifact: SierraArtifact =
            serde_json::from_value(json_value).map_err(JsonError::SerdeJsonError)?;
        Ok(artifact.abi)
    }
}
