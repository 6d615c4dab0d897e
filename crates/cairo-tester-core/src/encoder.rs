//! Conversion of form state into typed call arguments.

use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tester_types::cairo_type::CairoType;
use tester_types::serde_helpers::bigint_string;
use tracing::debug;

use crate::contract::ContractAbi;
use crate::error::EncodeError;
use crate::form::{EnumForm, FlatForm, FormSlot, FormValue};
use crate::type_parser::{parse_generic_type, parse_tuple, tuple_types};
use crate::utils::parse_integer_literal;

/// A typed call argument, ready for calldata serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedValue {
    Int(BigInt),
    Bool(bool),
    /// Text passed on unchanged, e.g. a byte array.
    Str(String),
    Tuple(Vec<EncodedValue>),
    Struct(IndexMap<String, EncodedValue>),
    Array(Vec<EncodedValue>),
    Enum { variant: String, value: Option<Box<EncodedValue>> },
    Option(Option<Box<EncodedValue>>),
    Result(Result<Box<EncodedValue>, Box<EncodedValue>>),
}

impl EncodedValue {
    pub fn int(value: impl Into<BigInt>) -> Self {
        EncodedValue::Int(value.into())
    }
}

/// Integers serialize as decimal strings; enums, options and results as `{variant: payload}`.
impl Serialize for EncodedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EncodedValue::Int(integer) => bigint_string::serialize(integer, serializer),
            EncodedValue::Bool(boolean) => serializer.serialize_bool(*boolean),
            EncodedValue::Str(text) => serializer.serialize_str(text),
            EncodedValue::Tuple(items) | EncodedValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            EncodedValue::Struct(members) => members.serialize(serializer),
            EncodedValue::Enum { variant, value } => {
                single_entry(serializer, variant, value.as_deref())
            }
            EncodedValue::Option(Some(value)) => single_entry(serializer, "Some", Some(&**value)),
            EncodedValue::Option(None) => single_entry(serializer, "None", None),
            EncodedValue::Result(Ok(value)) => single_entry(serializer, "Ok", Some(&**value)),
            EncodedValue::Result(Err(value)) => single_entry(serializer, "Err", Some(&**value)),
        }
    }
}

fn single_entry<S>(
    serializer: S,
    key: &str,
    value: Option<&EncodedValue>,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, &value)?;
    map.end()
}

const TRUE_LITERALS: [&str; 5] = ["true", "1", "0x1", "0x01", "0x001"];
const FALSE_LITERALS: [&str; 5] = ["false", "0", "0x0", "0x00", "0x000"];

/// Encodes every value of `form`, in form order. The form must be ordered like the inputs of its
/// owner, which [`FlatForm`] built from the ABI guarantees.
pub fn encode_form(abi: &ContractAbi, form: &FlatForm) -> Result<Vec<EncodedValue>, EncodeError> {
    debug!("Encoding {} form values", form.len());
    form.iter()
        .map(|(key, value)| encode_field(abi, key.ty(), value, &key.to_string()))
        .collect()
}

/// Encodes one value of type `type_str`. `field` names the value in errors.
pub fn encode_field(
    abi: &ContractAbi,
    type_str: &str,
    value: &FormValue,
    field: &str,
) -> Result<EncodedValue, EncodeError> {
    match abi.classify(type_str) {
        CairoType::Array | CairoType::Span => {
            let FormValue::Array(items) = value else {
                return Err(unexpected(field, "array", value));
            };
            let element_type = parse_generic_type(type_str);
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    encode_field(abi, element_type.first(), item, &format!("{field}[{index}]"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(EncodedValue::Array)
        }
        CairoType::Option => {
            let enum_form = expect_enum(value, field)?;
            match enum_form.slot("Some") {
                Some(FormSlot { r#type, value: Some(inner) }) => {
                    let encoded = encode_field(abi, r#type, inner, &format!("{field}.Some"))?;
                    Ok(EncodedValue::Option(Some(Box::new(encoded))))
                }
                _ => Ok(EncodedValue::Option(None)),
            }
        }
        CairoType::Result => {
            let enum_form = expect_enum(value, field)?;
            match (enum_form.slot("Ok"), enum_form.slot("Err")) {
                (Some(FormSlot { r#type, value: Some(inner) }), _) => {
                    let encoded = encode_field(abi, r#type, inner, &format!("{field}.Ok"))?;
                    Ok(EncodedValue::Result(Ok(Box::new(encoded))))
                }
                (_, Some(FormSlot { r#type, value: Some(inner) })) => {
                    let encoded = encode_field(abi, r#type, inner, &format!("{field}.Err"))?;
                    Ok(EncodedValue::Result(Err(Box::new(encoded))))
                }
                _ => Err(EncodeError::NoActiveVariant { field: field.to_string() }),
            }
        }
        CairoType::Named => match value {
            FormValue::Enum(enum_form) => encode_enum(abi, enum_form, field),
            FormValue::Struct(members) => members
                .iter()
                .map(|(name, slot)| {
                    let member_field = format!("{field}.{name}");
                    let Some(member_value) = &slot.value else {
                        return Err(EncodeError::UnexpectedValue {
                            field: member_field,
                            expected: "a value",
                            got: "nothing",
                        });
                    };
                    let encoded = encode_field(abi, &slot.r#type, member_value, &member_field)?;
                    Ok((name.clone(), encoded))
                })
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(EncodedValue::Struct),
            _ => Err(unexpected(field, "struct or enum", value)),
        },
        CairoType::Tuple => {
            let text = expect_leaf(value, field)?;
            let types = tuple_types(type_str);
            let values = parse_tuple(text);
            if types.len() != values.len() {
                return Err(EncodeError::TupleArity {
                    field: field.to_string(),
                    expected: types.len(),
                    got: values.len(),
                });
            }

            types
                .iter()
                .zip(values)
                .enumerate()
                .map(|(index, (ty, item))| {
                    encode_field(abi, ty, &FormValue::Leaf(item), &format!("{field}.{index}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(EncodedValue::Tuple)
        }
        CairoType::Bool => {
            let text = expect_leaf(value, field)?;
            if TRUE_LITERALS.contains(&text) {
                Ok(EncodedValue::Bool(true))
            } else if FALSE_LITERALS.contains(&text) {
                Ok(EncodedValue::Bool(false))
            } else {
                Err(EncodeError::InvalidBool { field: field.to_string(), value: text.to_string() })
            }
        }
        cairo_type if cairo_type.is_numeric() || cairo_type.is_address_like() => {
            let text = expect_leaf(value, field)?;
            Ok(parse_integer_literal(text)
                .map(EncodedValue::Int)
                .unwrap_or_else(|| EncodedValue::Str(text.to_string())))
        }
        _ => expect_leaf(value, field).map(|text| EncodedValue::Str(text.to_string())),
    }
}

/// Encodes the first variant holding a value; a unit variant carries no payload.
fn encode_enum(
    abi: &ContractAbi,
    enum_form: &EnumForm,
    field: &str,
) -> Result<EncodedValue, EncodeError> {
    let Some((variant, slot)) = enum_form.active() else {
        return Err(EncodeError::NoActiveVariant { field: field.to_string() });
    };

    let payload = match (&slot.value, abi.classify(&slot.r#type)) {
        (_, CairoType::Void) | (None, _) => None,
        (Some(inner), _) => Some(Box::new(encode_field(
            abi,
            &slot.r#type,
            inner,
            &format!("{field}.{variant}"),
        )?)),
    };

    Ok(EncodedValue::Enum { variant: variant.to_string(), value: payload })
}

fn expect_leaf<'a>(value: &'a FormValue, field: &str) -> Result<&'a str, EncodeError> {
    value.as_leaf().ok_or_else(|| unexpected(field, "text", value))
}

fn expect_enum<'a>(value: &'a FormValue, field: &str) -> Result<&'a EnumForm, EncodeError> {
    match value {
        FormValue::Enum(enum_form) => Ok(enum_form),
        _ => Err(unexpected(field, "enum", value)),
    }
}

fn unexpected(field: &str, expected: &'static str, value: &FormValue) -> EncodeError {
    EncodeError::UnexpectedValue { field: field.to_string(), expected, got: value.kind_name() }
}
