use num_bigint::BigInt;
use tester_core::decoder::{DecodedValue, ResponseDecoder};
use tester_core::encoder::{encode_field, encode_form, EncodedValue};
use tester_core::error::EncodeError;
use tester_core::form::FormValue;
use tester_core::DecodeOptions;

use crate::common::constants::OWNER_ADDRESS;
use crate::common::utils::{enum_form, filled_form, load_vault_abi, response};

#[test]
fn address_argument_is_encoded_as_integer() {
    let abi = load_vault_abi();
    let form = filled_form(&abi, "balance_of", &[("owner", FormValue::from("0x01"))]);

    assert_eq!(encode_form(&abi, &form).unwrap(), vec![EncodedValue::int(1)]);
}

#[test]
fn deposit_with_enum_payload() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "deposit",
        &[
            ("amount", FormValue::from("1e18")),
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

    let encoded = encode_form(&abi, &form).unwrap();
    assert_eq!(
        encoded,
        vec![
            EncodedValue::int(1_000_000_000_000_000_000u64),
            EncodedValue::Enum {
                variant: "Gold".to_string(),
                value: Some(Box::new(EncodedValue::int(3)))
            },
        ]
    );
    assert_eq!(
        serde_json::to_value(&encoded).unwrap(),
        serde_json::json!(["1000000000000000000", { "Gold": "3" }])
    );
}

#[test]
fn unit_variant_carries_no_payload() {
    let abi = load_vault_abi();
    let tier = enum_form(serde_json::json!({
        "variant": {
            "Bronze": { "type": "()" },
            "Silver": { "type": "()", "value": "" },
            "Gold": { "type": "core::integer::u8" }
        }
    }));

    assert_eq!(
        encode_field(&abi, "vault::Tier", &tier, "tier").unwrap(),
        EncodedValue::Enum { variant: "Silver".to_string(), value: None }
    );

    let nothing_selected = enum_form(serde_json::json!({
        "variant": { "Bronze": { "type": "()" }, "Gold": { "type": "core::integer::u8" } }
    }));
    assert_eq!(
        encode_field(&abi, "vault::Tier", &nothing_selected, "tier"),
        Err(EncodeError::NoActiveVariant { field: "tier".to_string() })
    );
}

#[test]
fn option_is_encoded_as_some_or_none_but_decoded_unchanged() {
    let abi = load_vault_abi();
    let some = enum_form(serde_json::json!({
        "variant": {
            "Some": { "type": "core::integer::u64", "value": "5" },
            "None": { "type": "()" }
        }
    }));
    let form = filled_form(&abi, "schedule", &[("at", some)]);

    let encoded = encode_form(&abi, &form).unwrap();
    assert_eq!(encoded, vec![EncodedValue::Option(Some(Box::new(EncodedValue::int(5))))]);
    assert_eq!(serde_json::to_value(&encoded).unwrap(), serde_json::json!([{ "Some": "5" }]));

    let none = enum_form(serde_json::json!({
        "variant": {
            "Some": { "type": "core::integer::u64" },
            "None": { "type": "()", "value": "" }
        }
    }));
    assert_eq!(
        encode_field(&abi, "core::option::Option::<core::integer::u64>", &none, "at").unwrap(),
        EncodedValue::Option(None)
    );

    // the call result of an option is passed through as is
    let raw = response(serde_json::json!({ "Some": 5 }));
    let decoded = ResponseDecoder::new(&abi, DecodeOptions::default())
        .decode_field(&raw, "core::option::Option::<core::integer::u64>")
        .unwrap();
    assert_eq!(decoded, DecodedValue::Raw(raw));
}

#[test]
fn nested_tuple_argument() {
    let abi = load_vault_abi();
    let form = filled_form(&abi, "set_limits", &[("limits", FormValue::from("(7,(3,true))"))]);

    assert_eq!(
        encode_form(&abi, &form).unwrap(),
        vec![EncodedValue::Tuple(vec![
            EncodedValue::int(7),
            EncodedValue::Tuple(vec![EncodedValue::int(3), EncodedValue::Bool(true)]),
        ])]
    );

    let short = filled_form(&abi, "set_limits", &[("limits", FormValue::from("(7)"))]);
    assert!(matches!(
        encode_form(&abi, &short),
        Err(EncodeError::TupleArity { expected: 2, got: 1, .. })
    ));
}

#[test]
fn arrays_of_addresses_and_integers() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "batch",
        &[
            ("owners", FormValue::Array(vec![FormValue::from(OWNER_ADDRESS)])),
            ("amounts", FormValue::Array(vec![FormValue::from("1"), FormValue::from("0x10")])),
        ],
    );

    let owner = BigInt::parse_bytes(&OWNER_ADDRESS.as_bytes()[2..], 16).unwrap();
    assert_eq!(
        encode_form(&abi, &form).unwrap(),
        vec![
            EncodedValue::Array(vec![EncodedValue::Int(owner)]),
            EncodedValue::Array(vec![EncodedValue::int(1), EncodedValue::int(16)]),
        ]
    );

    let not_a_list = filled_form(&abi, "batch", &[("owners", FormValue::from(OWNER_ADDRESS))]);
    assert!(matches!(
        encode_form(&abi, &not_a_list),
        Err(EncodeError::UnexpectedValue { expected: "array", got: "text", .. })
    ));
}

#[test]
fn struct_value_is_encoded_member_by_member() {
    let abi = load_vault_abi();
    let position: FormValue = serde_json::from_value(serde_json::json!({
        "owner": {
            "type": "core::starknet::contract_address::ContractAddress",
            "value": "0x2"
        },
        "amount": { "type": "core::integer::u256", "value": "10" },
        "locked": { "type": "core::bool", "value": "0x0" }
    }))
    .unwrap();

    let EncodedValue::Struct(members) =
        encode_field(&abi, "vault::Position", &position, "position").unwrap()
    else {
        panic!("Expected a struct");
    };
    assert_eq!(members.keys().collect::<Vec<_>>(), ["owner", "amount", "locked"]);
    assert_eq!(members["owner"], EncodedValue::int(2));
    assert_eq!(members["locked"], EncodedValue::Bool(false));
}

#[test]
fn byte_array_and_boolean_arguments() {
    let abi = load_vault_abi();
    let form = filled_form(
        &abi,
        "set_description",
        &[("description", FormValue::from("hello vault")), ("lock", FormValue::from("0x01"))],
    );
    assert_eq!(
        encode_form(&abi, &form).unwrap(),
        vec![EncodedValue::Str("hello vault".to_string()), EncodedValue::Bool(true)]
    );

    let form = filled_form(
        &abi,
        "set_description",
        &[("description", FormValue::from("x")), ("lock", FormValue::from("2"))],
    );
    match encode_form(&abi, &form) {
        Err(EncodeError::InvalidBool { field, value }) => {
            assert_eq!(field, "set_description_lock_core::bool");
            assert_eq!(value, "2");
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn integers_survive_encoding_and_decoding_at_every_width() {
    let abi = load_vault_abi();
    let decoder = ResponseDecoder::new(&abi, DecodeOptions::default());

    let cases = [
        ("core::integer::u8", "255"),
        ("core::integer::u16", "65535"),
        ("core::integer::u32", "4294967295"),
        ("core::integer::u64", "9007199254740991"),
        ("core::integer::u64", "18446744073709551615"),
        ("core::integer::u128", "340282366920938463463374607431768211455"),
        ("core::integer::i8", "-128"),
        ("core::integer::i64", "-9223372036854775808"),
        ("core::integer::u256", "0"),
    ];

    for (ty, literal) in cases {
        let EncodedValue::Int(integer) =
            encode_field(&abi, ty, &FormValue::from(literal), "value").unwrap()
        else {
            panic!("{ty} {literal} was not encoded as an integer");
        };

        let decoded = decoder.decode_field(&response(serde_json::json!(integer.to_string())), ty);
        assert_eq!(decoded.unwrap().to_display_string(), literal, "{ty}");
    }
}
