use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use tester_core::ContractAbi;

/// A contract ABI loaded from a Sierra artifact or a bare ABI file.
#[derive(Debug, Clone)]
pub(crate) struct ArtifactWrapper {
    pub path: String,
    pub abi: Arc<ContractAbi>,
}

impl FromStr for ArtifactWrapper {
    type Err = anyhow::Error;

    fn from_str(path_candidate: &str) -> Result<Self, Self::Err> {
        let json_str = std::fs::read_to_string(path_candidate)
            .map_err(|err| anyhow::anyhow!("Cannot read artifact {path_candidate}: {err}"))?;
        let abi = ContractAbi::from_json_str(&json_str)?;

        Ok(Self { path: path_candidate.to_string(), abi: Arc::new(abi) })
    }
}

impl Display for ArtifactWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
