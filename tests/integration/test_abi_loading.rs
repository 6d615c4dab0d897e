use tester_core::contract::TypeDescriptor;
use tester_core::error::Error;
use tester_core::ContractAbi;
use tester_types::abi::StateMutability;
use tester_types::cairo_type::CairoType;

use crate::common::constants::{CONTRACT_ADDRESS, U256, VAULT_ARTIFACT_PATH};
use crate::common::utils::load_vault_abi;

#[test]
fn artifact_with_abi_as_string_and_bare_abi_agree() {
    let artifact: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(VAULT_ARTIFACT_PATH).unwrap()).unwrap();
    let bare_abi = artifact["abi"].as_str().unwrap();

    let from_artifact = load_vault_abi();
    let from_bare = ContractAbi::from_json_str(bare_abi).unwrap();
    assert_eq!(from_artifact.entries(), from_bare.entries());
}

#[test]
fn functions_by_state_mutability() {
    let abi = load_vault_abi();

    let views: Vec<&str> = abi
        .functions_by_state_mutability(StateMutability::View)
        .iter()
        .map(|function| function.name.as_str())
        .collect();
    assert_eq!(
        views,
        [
            "balance_of",
            "position",
            "tier_of",
            "name",
            "description",
            "history",
            "unlock_at",
            "stats"
        ]
    );

    let externals: Vec<&str> = abi
        .functions_by_state_mutability(StateMutability::External)
        .iter()
        .map(|function| function.name.as_str())
        .collect();
    assert_eq!(
        externals,
        ["deposit", "schedule", "set_limits", "batch", "set_description", "split"]
    );
}

#[test]
fn constructor_is_callable_by_name() {
    let abi = load_vault_abi();

    let callable = abi.callable("constructor").unwrap();
    assert_eq!(callable.inputs.len(), 2);
    assert_eq!(callable.inputs[0].r#type, CONTRACT_ADDRESS);
    assert!(callable.outputs.is_empty());
    assert_eq!(callable.state_mutability, None);

    match abi.callable("withdraw") {
        Err(Error::FunctionNotFound { name }) => assert_eq!(name, "withdraw"),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn core_types_declared_in_the_abi_stay_base_types() {
    let abi = load_vault_abi();

    // the artifact declares u256, bool and ByteArray as a struct or an enum
    assert_eq!(abi.resolve(U256), TypeDescriptor::Base(U256));
    assert_eq!(abi.resolve("core::bool"), TypeDescriptor::Base("core::bool"));
    assert_eq!(abi.classify("core::bool"), CairoType::Bool);
    assert_eq!(abi.classify("core::byte_array::ByteArray"), CairoType::ByteArray);

    assert!(matches!(abi.resolve("vault::Position"), TypeDescriptor::Struct(_)));
    assert!(matches!(abi.resolve("vault::Tier"), TypeDescriptor::Enum(_)));
    assert_eq!(abi.resolve("vault::Missing"), TypeDescriptor::Unknown("vault::Missing"));
}

#[test]
fn artifact_without_abi_is_rejected() {
    let artifact = r#"{ "sierra_program": [], "contract_class_version": "0.1.0" }"#;
    match ContractAbi::from_json_str(artifact) {
        Err(Error::TypesError(tester_types::error::Error::MissingAbi)) => (),
        other => panic!("Unexpected result: {other:?}"),
    }
}
