//! Cairo serialization of encoded call arguments into felts.

use num_bigint::{BigInt, Sign};
use starknet_rs_core::utils::cairo_short_string_to_felt;
use starknet_types_core::felt::Felt;
use tester_types::abi::{AbiEnum, AbiParameter, AbiStruct};
use tester_types::cairo_type::{CairoType, IntegerType};
use tester_types::felt::{byte_array_to_felts, felt_from_bigint, split_biguint, split_u512};
use tracing::debug;

use crate::contract::{ContractAbi, TypeDescriptor};
use crate::encoder::{encode_form, EncodedValue};
use crate::error::{CalldataError, TesterResult};
use crate::form::FlatForm;
use crate::type_parser::{parse_generic_type, tuple_types};
use crate::utils::parse_integer_literal;
use crate::validation::is_valid_integer_value;

/// Eth addresses are 160 bit values.
const ETH_ADDRESS_BITS: u64 = 160;
/// A `bytes31` holds at most 248 bits.
const BYTES31_BITS: u64 = 248;

pub struct CalldataCompiler<'a> {
    abi: &'a ContractAbi,
}

impl<'a> CalldataCompiler<'a> {
    pub fn new(abi: &'a ContractAbi) -> Self {
        Self { abi }
    }

    /// Serializes one value per input, in input order.
    pub fn compile(
        &self,
        inputs: &[AbiParameter],
        values: &[EncodedValue],
    ) -> Result<Vec<Felt>, CalldataError> {
        let types: Vec<&str> = inputs.iter().map(|input| input.r#type.as_str()).collect();
        self.compile_types(&types, values)
    }

    /// Encodes a submitted form and serializes the result; the types come from the form keys.
    pub fn compile_form(&self, form: &FlatForm) -> TesterResult<Vec<Felt>> {
        let values = encode_form(self.abi, form)?;
        let types: Vec<&str> = form.keys().map(|key| key.ty()).collect();
        Ok(self.compile_types(&types, &values)?)
    }

    fn compile_types(
        &self,
        types: &[&str],
        values: &[EncodedValue],
    ) -> Result<Vec<Felt>, CalldataError> {
        if types.len() != values.len() {
            return Err(CalldataError::ArgumentCount { expected: types.len(), got: values.len() });
        }

        debug!("Compiling calldata for {} arguments", values.len());
        let mut calldata = Vec::new();
        for (ty, value) in types.iter().zip(values) {
            self.serialize(ty, value, &mut calldata)?;
        }

        Ok(calldata)
    }

    fn serialize(
        &self,
        ty: &str,
        value: &EncodedValue,
        out: &mut Vec<Felt>,
    ) -> Result<(), CalldataError> {
        match self.abi.classify(ty) {
            CairoType::Integer(integer_type) => {
                let integer = integer_of(ty, value)?;
                serialize_integer(ty, integer_type, &integer, out)
            }
            CairoType::Felt | CairoType::ContractAddress | CairoType::ClassHash => {
                out.push(felt_of(ty, value)?);
                Ok(())
            }
            CairoType::EthAddress => {
                let felt = felt_of(ty, value)?;
                if felt.to_biguint().bits() > ETH_ADDRESS_BITS {
                    return Err(out_of_range(ty, value));
                }
                out.push(felt);
                Ok(())
            }
            CairoType::Bytes31 => {
                let felt = felt_of(ty, value)?;
                if felt.to_biguint().bits() > BYTES31_BITS {
                    return Err(out_of_range(ty, value));
                }
                out.push(felt);
                Ok(())
            }
            CairoType::Bool => {
                let flag = match value {
                    EncodedValue::Bool(flag) => *flag,
                    EncodedValue::Int(integer) if *integer == BigInt::from(0) => false,
                    EncodedValue::Int(integer) if *integer == BigInt::from(1) => true,
                    _ => return Err(mismatch(ty, value)),
                };
                out.push(Felt::from(u8::from(flag)));
                Ok(())
            }
            CairoType::ByteArray => {
                let EncodedValue::Str(text) = value else {
                    return Err(mismatch(ty, value));
                };
                out.extend(byte_array_to_felts(text));
                Ok(())
            }
            CairoType::Void => Ok(()),
            CairoType::Secp256k1Point | CairoType::Function => {
                Err(CalldataError::Unsupported { ty: ty.to_string() })
            }
            CairoType::Tuple => {
                let EncodedValue::Tuple(items) = value else {
                    return Err(mismatch(ty, value));
                };
                let types = tuple_types(ty);
                if types.len() != items.len() {
                    return Err(mismatch(ty, value));
                }
                types.iter().zip(items).try_for_each(|(ty, item)| self.serialize(ty, item, out))
            }
            CairoType::Array | CairoType::Span => {
                let EncodedValue::Array(items) = value else {
                    return Err(mismatch(ty, value));
                };
                let args = parse_generic_type(ty);
                out.push(Felt::from(items.len() as u64));
                items.iter().try_for_each(|item| self.serialize(args.first(), item, out))
            }
            CairoType::Option => {
                let EncodedValue::Option(inner) = value else {
                    return Err(mismatch(ty, value));
                };
                match inner {
                    Some(inner) => {
                        out.push(Felt::ZERO);
                        self.serialize(parse_generic_type(ty).first(), inner, out)
                    }
                    None => {
                        out.push(Felt::ONE);
                        Ok(())
                    }
                }
            }
            CairoType::Result => {
                let EncodedValue::Result(outcome) = value else {
                    return Err(mismatch(ty, value));
                };
                let args = parse_generic_type(ty);
                let (tag, index, inner) = match outcome {
                    Ok(inner) => (Felt::ZERO, 0, inner),
                    Err(inner) => (Felt::ONE, 1, inner),
                };
                let inner_type = args
                    .get(index)
                    .ok_or_else(|| CalldataError::UnknownType { ty: ty.to_string() })?;
                out.push(tag);
                self.serialize(inner_type, inner, out)
            }
            CairoType::Named => match self.abi.resolve(ty) {
                TypeDescriptor::Struct(abi_struct) => self.serialize_struct(abi_struct, value, out),
                TypeDescriptor::Enum(abi_enum) => self.serialize_enum(abi_enum, value, out),
                TypeDescriptor::Base(_) | TypeDescriptor::Unknown(_) => {
                    Err(CalldataError::UnknownType { ty: ty.to_string() })
                }
            },
        }
    }

    /// Members in declaration order.
    fn serialize_struct(
        &self,
        abi_struct: &AbiStruct,
        value: &EncodedValue,
        out: &mut Vec<Felt>,
    ) -> Result<(), CalldataError> {
        let EncodedValue::Struct(members) = value else {
            return Err(mismatch(&abi_struct.name, value));
        };

        for member in &abi_struct.members {
            let member_value =
                members.get(&member.name).ok_or_else(|| CalldataError::MissingMember {
                    ty: abi_struct.name.clone(),
                    member: member.name.clone(),
                })?;
            self.serialize(&member.r#type, member_value, out)?;
        }

        Ok(())
    }

    /// `[variant_index, payload...]`
    fn serialize_enum(
        &self,
        abi_enum: &AbiEnum,
        value: &EncodedValue,
        out: &mut Vec<Felt>,
    ) -> Result<(), CalldataError> {
        let EncodedValue::Enum { variant, value: payload } = value else {
            return Err(mismatch(&abi_enum.name, value));
        };
        let index = abi_enum.variant_index(variant).ok_or_else(|| {
            CalldataError::UnknownVariant { ty: abi_enum.name.clone(), variant: variant.clone() }
        })?;
        let variant_type = abi_enum
            .variants
            .get(index)
            .map(|variant| variant.r#type.as_str())
            .ok_or_else(|| CalldataError::UnknownType { ty: abi_enum.name.clone() })?;

        out.push(Felt::from(index as u64));
        match payload {
            Some(payload) => self.serialize(variant_type, payload, out),
            None if self.abi.classify(variant_type) == CairoType::Void => Ok(()),
            None => Err(mismatch(&abi_enum.name, value)),
        }
    }
}

fn serialize_integer(
    ty: &str,
    integer_type: IntegerType,
    integer: &BigInt,
    out: &mut Vec<Felt>,
) -> Result<(), CalldataError> {
    let out_of_range =
        || CalldataError::OutOfRange { ty: ty.to_string(), value: integer.to_string() };
    if integer_type.signed && integer_type.bits > 128 {
        return Err(CalldataError::Unsupported { ty: ty.to_string() });
    }
    if !is_valid_integer_value(ty, integer) {
        return Err(out_of_range());
    }

    match integer_type.bits {
        256 => {
            let (high, low) = split_biguint(integer.magnitude().clone());
            out.extend([low, high]);
        }
        512 => out.extend(split_u512(integer.magnitude())),
        _ => out.push(felt_from_bigint(integer).map_err(|_| out_of_range())?),
    }

    Ok(())
}

fn integer_of(ty: &str, value: &EncodedValue) -> Result<BigInt, CalldataError> {
    match value {
        EncodedValue::Int(integer) => Ok(integer.clone()),
        EncodedValue::Bool(flag) => Ok(BigInt::from(u8::from(*flag))),
        EncodedValue::Str(text) => parse_integer_literal(text).ok_or_else(|| {
            CalldataError::InvalidLiteral { ty: ty.to_string(), value: text.clone() }
        }),
        _ => Err(mismatch(ty, value)),
    }
}

/// Numbers must lie in `[0, P)`; text that is not a number is read as a Cairo short string.
fn felt_of(ty: &str, value: &EncodedValue) -> Result<Felt, CalldataError> {
    let integer = match value {
        EncodedValue::Int(integer) => integer.clone(),
        EncodedValue::Str(text) => match parse_integer_literal(text) {
            Some(integer) => integer,
            None => {
                return cairo_short_string_to_felt(text).map_err(|_| {
                    CalldataError::InvalidLiteral { ty: ty.to_string(), value: text.clone() }
                });
            }
        },
        _ => return Err(mismatch(ty, value)),
    };

    if integer.sign() == Sign::Minus {
        return Err(out_of_range(ty, value));
    }
    felt_from_bigint(&integer).map_err(|_| out_of_range(ty, value))
}

fn value_text(value: &EncodedValue) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn mismatch(ty: &str, value: &EncodedValue) -> CalldataError {
    CalldataError::ValueMismatch { ty: ty.to_string(), value: value_text(value) }
}

fn out_of_range(ty: &str, value: &EncodedValue) -> CalldataError {
    CalldataError::OutOfRange { ty: ty.to_string(), value: value_text(value) }
}
