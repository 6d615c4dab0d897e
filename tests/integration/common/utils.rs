use tester_core::decoder::ResponseValue;
use tester_core::form::{initial_form_state, FlatForm, FormValue};
use tester_core::ContractAbi;

use super::constants::VAULT_ARTIFACT_PATH;

pub fn load_vault_abi() -> ContractAbi {
    let json_str = std::fs::read_to_string(VAULT_ARTIFACT_PATH).unwrap();
    ContractAbi::from_json_str(&json_str).unwrap()
}

/// The initial form of `function` with the named inputs filled in.
pub fn filled_form(abi: &ContractAbi, function: &str, values: &[(&str, FormValue)]) -> FlatForm {
    let callable = abi.callable(function).unwrap();
    let mut form = initial_form_state(&callable);
    for (name, value) in values {
        let key = form.key_by_name(name).unwrap().clone();
        form.set(&key, value.clone()).unwrap();
    }
    form
}

pub fn response(json: serde_json::Value) -> ResponseValue {
    ResponseValue::from(json)
}

pub fn enum_form(json: serde_json::Value) -> FormValue {
    serde_json::from_value(json).unwrap()
}
