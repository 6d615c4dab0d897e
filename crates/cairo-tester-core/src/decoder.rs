//! Conversion of raw call results into display values, guided by the ABI output types.
//!
//! Decoding is lenient by default: a value that does not have the shape its type asks for is
//! replaced by the fallback of its [`DecodeError`] at that depth, so one malformed member never
//! hides the rest of a response. [`ResponseDecoder::strict`] surfaces the first error instead.

use indexmap::IndexMap;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use tester_types::abi::{AbiEnum, AbiOutput, AbiParameter, AbiStruct};
use tester_types::cairo_type::CairoType;
use tester_types::constants::MAX_SAFE_INTEGER;
use tester_types::contract_address::ContractAddress;
use tester_types::felt::{biguint_to_hex, hex_to_ascii};
use tester_types::serde_helpers::bigint_string;
use tracing::debug;

use crate::contract::{ContractAbi, TypeDescriptor};
use crate::error::{DecodeError, ValueKind};
use crate::type_parser::{parse_generic_type, tuple_types};
use crate::utils::parse_integer_literal;

/// A raw call result as returned by a node or an SDK, before any ABI interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum ResponseValue {
    Null,
    Bool(bool),
    Int(BigInt),
    Str(String),
    List(Vec<ResponseValue>),
    Object(IndexMap<String, ResponseValue>),
}

impl From<serde_json::Value> for ResponseValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ResponseValue::Null,
            serde_json::Value::Bool(boolean) => ResponseValue::Bool(boolean),
            serde_json::Value::Number(number) => {
                let text = number.to_string();
                match text.parse::<BigInt>() {
                    Ok(integer) => ResponseValue::Int(integer),
                    Err(_) => ResponseValue::Str(text),
                }
            }
            serde_json::Value::String(text) => ResponseValue::Str(text),
            serde_json::Value::Array(items) => {
                ResponseValue::List(items.into_iter().map(ResponseValue::from).collect())
            }
            serde_json::Value::Object(entries) => ResponseValue::Object(
                entries.into_iter().map(|(key, value)| (key, ResponseValue::from(value))).collect(),
            ),
        }
    }
}

impl Serialize for ResponseValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ResponseValue::Null => serializer.serialize_unit(),
            ResponseValue::Bool(boolean) => serializer.serialize_bool(*boolean),
            ResponseValue::Int(integer) => bigint_string::serialize(integer, serializer),
            ResponseValue::Str(text) => serializer.serialize_str(text),
            ResponseValue::List(items) => items.serialize(serializer),
            ResponseValue::Object(entries) => entries.serialize(serializer),
        }
    }
}

impl ResponseValue {
    /// The value as plain text: strings as they are, integers in decimal, containers as JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            ResponseValue::Null => String::new(),
            ResponseValue::Bool(boolean) => boolean.to_string(),
            ResponseValue::Int(integer) => integer.to_string(),
            ResponseValue::Str(text) => text.clone(),
            ResponseValue::List(_) | ResponseValue::Object(_) => to_compact_json(self),
        }
    }

    fn as_integer(&self) -> Option<BigInt> {
        match self {
            ResponseValue::Int(integer) => Some(integer.clone()),
            ResponseValue::Bool(boolean) => Some(BigInt::from(u8::from(*boolean))),
            ResponseValue::Str(text) => parse_integer_literal(text),
            _ => None,
        }
    }
}

impl From<BigInt> for ResponseValue {
    fn from(value: BigInt) -> Self {
        ResponseValue::Int(value)
    }
}

/// A decoded value. Numbers that fit a double exactly stay numbers, bigger ones become text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Number(i64),
    Text(String),
    Bool(bool),
    List(Vec<DecodedValue>),
    Record(IndexMap<String, DecodedValue>),
    /// Passed through without interpretation.
    Raw(ResponseValue),
}

impl DecodedValue {
    pub fn to_display_string(&self) -> String {
        match self {
            DecodedValue::Number(number) => number.to_string(),
            DecodedValue::Text(text) => text.clone(),
            DecodedValue::Bool(boolean) => boolean.to_string(),
            DecodedValue::Raw(raw) => raw.to_display_string(),
            DecodedValue::List(_) | DecodedValue::Record(_) => to_compact_json(self),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodedResponse {
    Text(String),
    Value(DecodedValue),
}

impl std::fmt::Display for DecodedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodedResponse::Text(text) => f.write_str(text),
            DecodedResponse::Value(value) => f.write_str(&to_compact_json(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Render the result as a string, JSON for anything that is not text already.
    pub as_text: bool,
    /// Try to show felts and byte arrays as ASCII.
    pub show_as_string: bool,
}

fn to_compact_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

pub struct ResponseDecoder<'a> {
    abi: &'a ContractAbi,
    options: DecodeOptions,
    strict: bool,
}

impl<'a> ResponseDecoder<'a> {
    pub fn new(abi: &'a ContractAbi, options: DecodeOptions) -> Self {
        Self { abi, options, strict: false }
    }

    /// Fail on the first malformed value instead of substituting its fallback.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Decodes the response of a function with the given outputs. Anything but exactly one output
    /// is rendered as pretty printed JSON of the raw response.
    pub fn decode(
        &self,
        outputs: &[AbiOutput],
        response: &ResponseValue,
    ) -> Result<DecodedResponse, DecodeError> {
        let [output] = outputs else {
            debug!("Response of {} outputs rendered as JSON", outputs.len());
            let pretty = serde_json::to_string_pretty(response).unwrap_or_default();
            return Ok(DecodedResponse::Text(pretty));
        };

        let decoded = self.decode_field(response, &output.r#type)?;
        if !self.options.as_text {
            return Ok(DecodedResponse::Value(decoded));
        }

        Ok(DecodedResponse::Text(match decoded {
            DecodedValue::Text(text) => text,
            other => to_compact_json(&other),
        }))
    }

    pub fn decode_field(
        &self,
        value: &ResponseValue,
        type_str: &str,
    ) -> Result<DecodedValue, DecodeError> {
        match self.decode_value(value, type_str) {
            Ok(decoded) => Ok(decoded),
            Err(err) if self.strict => Err(err),
            Err(err) => {
                debug!("Falling back while decoding {type_str}: {err}");
                Ok(err.fallback())
            }
        }
    }

    fn decode_value(
        &self,
        value: &ResponseValue,
        type_str: &str,
    ) -> Result<DecodedValue, DecodeError> {
        if *value == ResponseValue::Null {
            return Err(DecodeError::Missing { ty: type_str.to_string() });
        }

        match self.abi.classify(type_str) {
            CairoType::Integer(_) => {
                let integer = expect_integer(value, type_str, ValueKind::Number)?;
                Ok(number_or_text(integer))
            }
            CairoType::ContractAddress => {
                let integer = expect_integer(value, type_str, ValueKind::Text)?;
                ContractAddress::from_biguint(integer.magnitude())
                    .ok()
                    .filter(|_| integer.sign() != Sign::Minus)
                    .map(|address| DecodedValue::Text(address.to_checksum_string()))
                    .ok_or_else(|| shape_error(type_str, ValueKind::Text, value))
            }
            CairoType::Felt => {
                let integer = expect_integer(value, type_str, ValueKind::Text)?;
                if integer.sign() == Sign::Minus {
                    return Err(shape_error(type_str, ValueKind::Text, value));
                }
                let hex = biguint_to_hex(integer.magnitude());
                Ok(DecodedValue::Text(self.ascii_or(&hex, &hex)))
            }
            CairoType::ByteArray => match value {
                ResponseValue::Str(text) => Ok(DecodedValue::Text(self.ascii_or(text, text))),
                other => Ok(DecodedValue::Raw(other.clone())),
            },
            CairoType::Bool => match value {
                ResponseValue::Bool(boolean) => Ok(DecodedValue::Bool(*boolean)),
                other => Ok(DecodedValue::Raw(other.clone())),
            },
            CairoType::Tuple => self.decode_tuple(value, type_str),
            CairoType::Array | CairoType::Span => {
                let ResponseValue::List(items) = value else {
                    return Err(shape_error(type_str, ValueKind::List, value));
                };
                let element_type = parse_generic_type(type_str);
                items
                    .iter()
                    .map(|item| self.decode_field(item, element_type.first()))
                    .collect::<Result<Vec<_>, _>>()
                    .map(DecodedValue::List)
            }
            // Their two variant shape is left to the caller.
            CairoType::Option | CairoType::Result => Ok(DecodedValue::Raw(value.clone())),
            CairoType::Named => match self.abi.resolve(type_str) {
                TypeDescriptor::Struct(abi_struct) => self.decode_struct(value, abi_struct),
                TypeDescriptor::Enum(abi_enum) => self.decode_enum(value, abi_enum),
                TypeDescriptor::Base(_) | TypeDescriptor::Unknown(_) => {
                    Err(DecodeError::UnknownType { ty: type_str.to_string() })
                }
            },
            _ => Ok(DecodedValue::Raw(value.clone())),
        }
    }

    /// Elements come from a list, or from an object keyed by position. The result is the display
    /// text `(a,b)`.
    fn decode_tuple(
        &self,
        value: &ResponseValue,
        type_str: &str,
    ) -> Result<DecodedValue, DecodeError> {
        let types = tuple_types(type_str);
        let items: Vec<&ResponseValue> = match value {
            ResponseValue::List(items) => items.iter().collect(),
            ResponseValue::Object(entries) => {
                if entries.len() != types.len() {
                    return Err(tuple_arity(type_str, types.len(), entries.len()));
                }
                (0..types.len())
                    .map(|index| entries.get(&index.to_string()).unwrap_or(&ResponseValue::Null))
                    .collect()
            }
            other => return Err(shape_error(type_str, ValueKind::Tuple, other)),
        };
        if items.len() != types.len() {
            return Err(tuple_arity(type_str, types.len(), items.len()));
        }

        let decoded = types
            .iter()
            .zip(items)
            .map(|(ty, item)| self.decode_field(item, ty).map(|item| item.to_display_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedValue::Text(format!("({})", decoded.join(","))))
    }

    /// Members missing from the declaration are dropped.
    fn decode_struct(
        &self,
        value: &ResponseValue,
        abi_struct: &AbiStruct,
    ) -> Result<DecodedValue, DecodeError> {
        let ResponseValue::Object(entries) = value else {
            return Err(shape_error(&abi_struct.name, ValueKind::Record, value));
        };

        let mut decoded = IndexMap::new();
        for (name, member_value) in entries {
            let Some(member) = abi_struct.members.iter().find(|member| &member.name == name) else {
                continue;
            };
            decoded.insert(name.clone(), self.decode_field(member_value, &member.r#type)?);
        }

        Ok(DecodedValue::Record(decoded))
    }

    /// Accepts a variant index, `{"variant": {name: payload, ...}}` where the first non-null
    /// payload is the active one, or a single entry `{name: payload}`.
    fn decode_enum(
        &self,
        value: &ResponseValue,
        abi_enum: &AbiEnum,
    ) -> Result<DecodedValue, DecodeError> {
        let find_variant =
            |name: &str| abi_enum.variants.iter().find(|variant| variant.name == name);

        match value {
            ResponseValue::Int(index) => Ok(index
                .to_usize()
                .and_then(|index| abi_enum.variants.get(index))
                .map(|variant| DecodedValue::Text(variant.name.clone()))
                .unwrap_or_else(|| number_or_text(index.clone()))),
            ResponseValue::Object(entries) => {
                if let Some(ResponseValue::Object(variants)) = entries.get("variant") {
                    let active = variants
                        .iter()
                        .filter(|(_, payload)| **payload != ResponseValue::Null)
                        .find_map(|(name, payload)| find_variant(name).map(|def| (def, payload)));
                    if let Some((variant, payload)) = active {
                        return self.decode_variant(variant, payload);
                    }
                }

                match entries.first() {
                    Some((name, payload)) if entries.len() == 1 => match find_variant(name) {
                        Some(variant) => self.decode_variant(variant, payload),
                        None => Ok(DecodedValue::Record(IndexMap::from([(
                            name.clone(),
                            DecodedValue::Raw(payload.clone()),
                        )]))),
                    },
                    _ => Ok(DecodedValue::Text(value.to_display_string())),
                }
            }
            other => Ok(DecodedValue::Text(other.to_display_string())),
        }
    }

    /// A unit variant decodes to its name, any other to `{name: payload}`.
    fn decode_variant(
        &self,
        variant: &AbiParameter,
        payload: &ResponseValue,
    ) -> Result<DecodedValue, DecodeError> {
        if self.abi.classify(&variant.r#type) == CairoType::Void {
            return Ok(DecodedValue::Text(variant.name.clone()));
        }

        let decoded = self.decode_field(payload, &variant.r#type)?;
        Ok(DecodedValue::Record(IndexMap::from([(variant.name.clone(), decoded)])))
    }

    fn ascii_or(&self, hex: &str, fallback: &str) -> String {
        if !self.options.show_as_string {
            return fallback.to_string();
        }

        let ascii = hex_to_ascii(hex);
        if ascii.chars().any(|c| !c.is_control()) { ascii } else { fallback.to_string() }
    }
}

/// Lenient decoding of a call result; never fails.
pub fn decode_contract_response(
    abi: &ContractAbi,
    outputs: &[AbiOutput],
    response: &ResponseValue,
    options: DecodeOptions,
) -> DecodedResponse {
    ResponseDecoder::new(abi, options)
        .decode(outputs, response)
        .unwrap_or_else(|err| DecodedResponse::Value(err.fallback()))
}

fn number_or_text(integer: BigInt) -> DecodedValue {
    match integer.to_i64() {
        Some(number) if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&number) => {
            DecodedValue::Number(number)
        }
        _ => DecodedValue::Text(integer.to_string()),
    }
}

fn expect_integer(
    value: &ResponseValue,
    type_str: &str,
    expected: ValueKind,
) -> Result<BigInt, DecodeError> {
    value.as_integer().ok_or_else(|| shape_error(type_str, expected, value))
}

fn shape_error(type_str: &str, expected: ValueKind, value: &ResponseValue) -> DecodeError {
    DecodeError::UnexpectedShape {
        ty: type_str.to_string(),
        expected,
        got: value.to_display_string(),
    }
}

fn tuple_arity(type_str: &str, expected: usize, got: usize) -> DecodeError {
    DecodeError::TupleArity { ty: type_str.to_string(), expected, got }
}
