use indexmap::IndexMap;
use tester_core::decoder::{
    decode_contract_response, DecodeOptions, DecodedResponse, DecodedValue, ResponseDecoder,
};
use tester_core::error::{DecodeError, ValueKind};
use tester_core::ContractAbi;

use crate::common::constants::OWNER_ADDRESS;
use crate::common::utils::{load_vault_abi, response};

fn decode(
    abi: &ContractAbi,
    function: &str,
    json: serde_json::Value,
    options: DecodeOptions,
) -> DecodedResponse {
    let callable = abi.callable(function).unwrap();
    decode_contract_response(abi, callable.outputs, &response(json), options)
}

fn value(decoded: DecodedResponse) -> DecodedValue {
    match decoded {
        DecodedResponse::Value(value) => value,
        DecodedResponse::Text(text) => panic!("Expected a value, got text {text:?}"),
    }
}

#[test]
fn u256_balance_is_a_number() {
    let abi = load_vault_abi();

    let decoded = decode(&abi, "balance_of", serde_json::json!(500), DecodeOptions::default());
    assert_eq!(decoded, DecodedResponse::Value(DecodedValue::Number(500)));
    assert_eq!(decoded.to_string(), "500");

    let as_text = DecodeOptions { as_text: true, ..Default::default() };
    assert_eq!(
        decode(&abi, "balance_of", serde_json::json!("0x1f4"), as_text),
        DecodedResponse::Text("500".to_string())
    );
}

#[test]
fn integers_beyond_safe_range_are_text() {
    let abi = load_vault_abi();
    let big = "340282366920938463463374607431768211456";

    let decoded = decode(&abi, "balance_of", serde_json::json!(big), DecodeOptions::default());
    assert_eq!(decoded, DecodedResponse::Value(DecodedValue::Text(big.to_string())));

    let history = decode(
        &abi,
        "history",
        serde_json::json!([1, "9007199254740992", 3]),
        DecodeOptions::default(),
    );
    assert_eq!(
        value(history),
        DecodedValue::List(vec![
            DecodedValue::Number(1),
            DecodedValue::Text("9007199254740992".to_string()),
            DecodedValue::Number(3),
        ])
    );
}

#[test]
fn position_struct_is_decoded_member_by_member() {
    let abi = load_vault_abi();
    let decoded = decode(
        &abi,
        "position",
        serde_json::json!({
            "owner": OWNER_ADDRESS,
            "amount": 1000,
            "locked": true,
            "unknown": 1
        }),
        DecodeOptions::default(),
    );

    let DecodedValue::Record(members) = value(decoded) else {
        panic!("Expected a record");
    };
    assert_eq!(members.keys().collect::<Vec<_>>(), ["owner", "amount", "locked"]);
    let DecodedValue::Text(owner) = &members["owner"] else {
        panic!("Expected the owner address as text");
    };
    assert_eq!(owner.to_lowercase(), OWNER_ADDRESS);
    assert_eq!(members["amount"], DecodedValue::Number(1000));
    assert_eq!(members["locked"], DecodedValue::Bool(true));
}

#[test]
fn option_result_is_passed_through() {
    let abi = load_vault_abi();

    let raw = serde_json::json!({ "Some": 12 });
    let decoded = decode(&abi, "unlock_at", raw.clone(), DecodeOptions::default());
    assert_eq!(decoded, DecodedResponse::Value(DecodedValue::Raw(response(raw))));
    // integers are rendered as decimal strings
    assert_eq!(decoded.to_string(), r#"{"Some":"12"}"#);
}

#[test]
fn enum_from_index_or_object() {
    let abi = load_vault_abi();
    let options = DecodeOptions::default();

    assert_eq!(
        value(decode(&abi, "tier_of", serde_json::json!(1), options)),
        DecodedValue::Text("Silver".to_string())
    );
    assert_eq!(
        value(decode(&abi, "tier_of", serde_json::json!(7), options)),
        DecodedValue::Number(7)
    );
    assert_eq!(
        value(decode(&abi, "tier_of", serde_json::json!({ "Gold": "0x3" }), options)),
        DecodedValue::Record(IndexMap::from([("Gold".to_string(), DecodedValue::Number(3))]))
    );
    assert_eq!(
        value(decode(
            &abi,
            "tier_of",
            serde_json::json!({ "variant": { "Bronze": null, "Silver": {}, "Gold": null } }),
            options
        )),
        DecodedValue::Text("Silver".to_string())
    );
}

#[test]
fn tuple_result_is_display_text() {
    let abi = load_vault_abi();

    assert_eq!(
        value(decode(&abi, "stats", serde_json::json!([4, false]), DecodeOptions::default())),
        DecodedValue::Text("(4,false)".to_string())
    );
    assert_eq!(
        value(decode(
            &abi,
            "stats",
            serde_json::json!({ "0": "0x10", "1": true }),
            DecodeOptions::default()
        )),
        DecodedValue::Text("(16,true)".to_string())
    );
}

#[test]
fn functions_without_single_output_render_raw_json() {
    let abi = load_vault_abi();
    let decoded = decode(&abi, "deposit", serde_json::json!([1, 2]), DecodeOptions::default());

    assert_eq!(decoded, DecodedResponse::Text("[\n  \"1\",\n  \"2\"\n]".to_string()));
}

#[test]
fn felt_and_byte_array_as_string() {
    let abi = load_vault_abi();
    let show = DecodeOptions { show_as_string: true, ..Default::default() };

    assert_eq!(
        value(decode(&abi, "name", serde_json::json!("0x7661756c74"), DecodeOptions::default())),
        DecodedValue::Text("0x7661756c74".to_string())
    );
    assert_eq!(
        value(decode(&abi, "name", serde_json::json!("0x7661756c74"), show)),
        DecodedValue::Text("vault".to_string())
    );
    // nothing printable stays hex
    assert_eq!(
        value(decode(&abi, "name", serde_json::json!("0x0102"), show)),
        DecodedValue::Text("0x102".to_string())
    );

    assert_eq!(
        value(decode(&abi, "description", serde_json::json!("0x6869"), show)),
        DecodedValue::Text("hi".to_string())
    );
    assert_eq!(
        decode(
            &abi,
            "description",
            serde_json::json!("0x6869"),
            DecodeOptions { as_text: true, show_as_string: true }
        ),
        DecodedResponse::Text("hi".to_string())
    );
}

#[test]
fn lenient_decoding_falls_back_and_strict_decoding_fails() {
    let abi = load_vault_abi();
    let callable = abi.callable("history").unwrap();
    let malformed = response(serde_json::json!("not a list"));

    let lenient = ResponseDecoder::new(&abi, DecodeOptions::default());
    assert_eq!(
        lenient.decode(callable.outputs, &malformed),
        Ok(DecodedResponse::Value(DecodedValue::List(vec![])))
    );

    let strict = ResponseDecoder::new(&abi, DecodeOptions::default()).strict();
    assert!(matches!(
        strict.decode(callable.outputs, &malformed),
        Err(DecodeError::UnexpectedShape { expected: ValueKind::List, .. })
    ));

    let position = abi.callable("position").unwrap();
    assert!(matches!(
        strict.decode(position.outputs, &response(serde_json::json!(null))),
        Err(DecodeError::Missing { .. })
    ));
    assert_eq!(
        lenient.decode(position.outputs, &response(serde_json::json!([1]))),
        Ok(DecodedResponse::Value(DecodedValue::Record(IndexMap::new())))
    );
}
