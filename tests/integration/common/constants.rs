pub const VAULT_ARTIFACT_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/vault.contract_class.json");

pub const CONTRACT_ADDRESS: &str = "core::starknet::contract_address::ContractAddress";
pub const U256: &str = "core::integer::u256";

pub const OWNER_ADDRESS: &str =
    "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";
