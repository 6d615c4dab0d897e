//! Human readable labels for ABI types and values.

use starknet_types_core::felt::Felt;
use tester_types::cairo_type::CairoType;
use tester_types::felt::biguint_to_hex;

use crate::type_parser::{parse_generic_type, GenericArgs};

/// Which input a field is edited with, checked in this order: arrays, tuples (typed as text),
/// integers, void (no input), other core types (text), and everything else as a nested form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Array,
    TupleText,
    Integer,
    Text,
    Hidden,
    Composite,
}

pub fn input_kind(type_str: &str) -> InputKind {
    match CairoType::classify(type_str) {
        CairoType::Array | CairoType::Span => InputKind::Array,
        CairoType::Tuple => InputKind::TupleText,
        CairoType::Integer(_) => InputKind::Integer,
        CairoType::Void => InputKind::Hidden,
        CairoType::Option | CairoType::Result | CairoType::Named => InputKind::Composite,
        _ => InputKind::Text,
    }
}

/// `core::array::Array::<core::felt252>` becomes `Array<felt252>`, tuples lose their path
/// prefixes and plain paths keep their last segment.
pub fn display_type(type_str: &str) -> String {
    if type_str.starts_with('(') {
        return display_tuple(type_str);
    }

    match CairoType::classify(type_str) {
        CairoType::Array | CairoType::Span | CairoType::Option | CairoType::Result => {
            let kind = type_str.split("::").nth(2).unwrap_or(type_str);
            let args = match parse_generic_type(type_str) {
                GenericArgs::Types(types) => {
                    types.iter().map(|ty| display_type(ty)).collect::<Vec<_>>().join(", ")
                }
                GenericArgs::Tuple(tuple) => display_tuple(&tuple),
                GenericArgs::Plain(_) => return last_segment(type_str).to_string(),
            };
            format!("{kind}<{args}>")
        }
        _ => last_segment(type_str).to_string(),
    }
}

/// Strips every `identifier::` prefix, e.g. `(core::felt252, core::bool)` becomes
/// `(felt252, bool)`.
pub fn display_tuple(tuple_str: &str) -> String {
    let mut display = String::with_capacity(tuple_str.len());
    let mut word = String::new();
    let mut chars = tuple_str.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if c == ':' && chars.peek() == Some(&':') && !word.is_empty() {
            chars.next();
            word.clear();
            continue;
        }
        display.push_str(&word);
        word.clear();
        display.push(c);
    }
    display.push_str(&word);

    display
}

fn last_segment(type_str: &str) -> &str {
    type_str.rsplit("::").next().unwrap_or(type_str)
}

pub fn felt_to_hex(felt: &Felt) -> String {
    biguint_to_hex(&felt.to_biguint())
}

/// `0x1234...abcd`
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
