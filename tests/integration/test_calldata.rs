use starknet_types_core::felt::Felt;
use tester_core::calldata::CalldataCompiler;
use tester_core::encoder::EncodedValue;
use tester_core::error::{CalldataError, Error, FormError};
use tester_core::form::{validate_submission, FormValue};

use crate::common::constants::OWNER_ADDRESS;
use crate::common::utils::{enum_form, filled_form, load_vault_abi};

fn felts(values: &[u64]) -> Vec<Felt> {
    values.iter().copied().map(Felt::from).collect()
}

#[test]
fn deposit_serializes_u256_and_enum() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "deposit",
        &[
            ("amount", FormValue::from("340282366920938463463374607431768211457")),
            (
                "tier",
                enum_form(serde_json::json!({
                    "variant": {
                        "Bronze": { "type": "()" },
                        "Silver": { "type": "()" },
                        "Gold": { "type": "core::integer::u8", "value": "3" }
                    }
                })),
            ),
        ],
    );

    // 2^128 + 1 is [low, high], then the variant index and its payload
    assert_eq!(CalldataCompiler::new(&abi).compile_form(&form).unwrap(), felts(&[1, 1, 2, 3]));
}

#[test]
fn constructor_reads_text_felts_as_short_strings() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "constructor",
        &[("owner", FormValue::from(OWNER_ADDRESS)), ("name", FormValue::from("vault"))],
    );

    assert_eq!(
        CalldataCompiler::new(&abi).compile_form(&form).unwrap(),
        vec![Felt::from_hex(OWNER_ADDRESS).unwrap(), Felt::from(0x7661756c74u64)]
    );
}

#[test]
fn batch_prefixes_arrays_with_their_length() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "batch",
        &[
            ("owners", FormValue::Array(vec![FormValue::from(OWNER_ADDRESS)])),
            ("amounts", FormValue::Array(vec![FormValue::from("1"), FormValue::from("0x10")])),
        ],
    );

    let owner = Felt::from_hex(OWNER_ADDRESS).unwrap();
    assert_eq!(
        CalldataCompiler::new(&abi).compile_form(&form).unwrap(),
        vec![Felt::ONE, owner, Felt::TWO, Felt::ONE, Felt::from(16u64)]
    );
}

#[test]
fn nested_tuple_is_flattened() {
    let abi = load_vault_abi();
    let form = filled_form(&abi, "set_limits", &[("limits", FormValue::from("(7,(3,true))"))]);

    assert_eq!(CalldataCompiler::new(&abi).compile_form(&form).unwrap(), felts(&[7, 3, 1]));
}

#[test]
fn option_is_tagged_some_zero_none_one() {
    let abi = load_vault_abi();
    let compiler = CalldataCompiler::new(&abi);
    let inputs = abi.callable("schedule").unwrap().inputs;

    let some = EncodedValue::Option(Some(Box::new(EncodedValue::int(5))));
    assert_eq!(compiler.compile(inputs, &[some]).unwrap(), felts(&[0, 5]));
    assert_eq!(compiler.compile(inputs, &[EncodedValue::Option(None)]).unwrap(), felts(&[1]));

    let form = filled_form(
        &abi,
        "schedule",
        &[(
            "at",
            enum_form(serde_json::json!({
                "variant": {
                    "Some": { "type": "core::integer::u64" },
                    "None": { "type": "()", "value": "" }
                }
            })),
        )],
    );
    assert_eq!(compiler.compile_form(&form).unwrap(), felts(&[1]));
}

#[test]
fn byte_array_layout() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "set_description",
        &[("description", FormValue::from("hello")), ("lock", FormValue::from("false"))],
    );

    assert_eq!(
        CalldataCompiler::new(&abi).compile_form(&form).unwrap(),
        vec![Felt::ZERO, Felt::from(0x68656c6c6fu64), Felt::from(5u64), Felt::ZERO]
    );

    let long = "a".repeat(33);
    let form = filled_form(
        &abi,
        "set_description",
        &[("description", FormValue::from(long.as_str())), ("lock", FormValue::from("1"))],
    );
    let calldata = CalldataCompiler::new(&abi).compile_form(&form).unwrap();
    assert_eq!(calldata.len(), 5);
    assert_eq!(calldata[0], Felt::ONE);
    assert_eq!(calldata[2], Felt::from(0x6161u64));
    assert_eq!(calldata[3], Felt::TWO);
    assert_eq!(calldata[4], Felt::ONE);
}

#[test]
fn out_of_range_and_mismatched_values_are_rejected() {
    let abi = load_vault_abi();
    let compiler = CalldataCompiler::new(&abi);

    let batch = abi.callable("batch").unwrap().inputs;
    let amounts = EncodedValue::Array(vec![EncodedValue::int(-1)]);
    let owners = EncodedValue::Array(vec![]);
    assert!(matches!(
        compiler.compile(batch, &[owners.clone(), amounts]),
        Err(CalldataError::OutOfRange { .. })
    ));
    assert_eq!(
        compiler.compile(batch, &[owners]),
        Err(CalldataError::ArgumentCount { expected: 2, got: 1 })
    );

    let deposit = abi.callable("deposit").unwrap().inputs;
    let unknown_variant = EncodedValue::Enum { variant: "Platinum".to_string(), value: None };
    assert_eq!(
        compiler.compile(deposit, &[EncodedValue::int(1), unknown_variant]),
        Err(CalldataError::UnknownVariant {
            ty: "vault::Tier".to_string(),
            variant: "Platinum".to_string()
        })
    );

    let form = filled_form(&abi, "set_limits", &[("limits", FormValue::from("(7,3)"))]);
    assert!(matches!(compiler.compile_form(&form), Err(Error::EncodeError(_))));

    let form = filled_form(&abi, "set_limits", &[("limits", FormValue::from("(7,(256,true))"))]);
    assert!(matches!(
        compiler.compile_form(&form),
        Err(Error::CalldataError(CalldataError::OutOfRange { .. }))
    ));
}

#[test]
fn non_zero_u256_is_validated_and_split_like_u256() {
    let abi = load_vault_abi();
    let callable = abi.callable("split").unwrap();
    let compiler = CalldataCompiler::new(&abi);

    // 2^128 + 5
    let shares = "0x100000000000000000000000000000005";
    let form = filled_form(&abi, "split", &[("shares", FormValue::from(shares))]);
    assert_eq!(validate_submission(&abi, &callable, &form), Ok(()));
    assert_eq!(compiler.compile_form(&form).unwrap(), felts(&[5, 1]));

    let overflow = (num_bigint::BigInt::from(1) << 256_u32).to_string();
    let form = filled_form(&abi, "split", &[("shares", FormValue::from(overflow))]);
    assert!(matches!(
        validate_submission(&abi, &callable, &form),
        Err(FormError::InvalidInteger { .. })
    ));
    assert!(matches!(
        compiler.compile_form(&form),
        Err(Error::CalldataError(CalldataError::OutOfRange { .. }))
    ));
}
