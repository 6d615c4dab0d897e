use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// Decimal exponents beyond this are rejected instead of materialized.
const MAX_DECIMAL_EXPONENT: i64 = 1024;

/// `0x` (or `0X`) followed by at least one hex digit.
pub fn is_valid_hex_number(input: &str) -> bool {
    match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Hex literal, or decimal literal with optional sign, fraction and exponent (`-1.5e3`, `.5`).
pub fn is_valid_number(input: &str) -> bool {
    is_valid_hex_number(input) || DecimalLiteral::parse(input).is_some()
}

/// Parses a hex or decimal/scientific literal into an integer. Fractions are truncated toward zero.
pub fn parse_integer_literal(input: &str) -> Option<BigInt> {
    if is_valid_hex_number(input) {
        return BigInt::parse_bytes(input[2..].as_bytes(), 16);
    }

    DecimalLiteral::parse(input)?.truncate()
}

/// Pieces of `[-+]?(\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?`.
#[derive(Debug, PartialEq, Eq)]
struct DecimalLiteral<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    exponent: i64,
}

impl<'a> DecimalLiteral<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let (negative, unsigned) = match input.as_bytes().first()? {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(position) => {
                let exponent_str = &unsigned[position + 1..];
                let digits = exponent_str.trim_start_matches(['-', '+']);
                if digits.is_empty()
                    || exponent_str.len() - digits.len() > 1
                    || !digits.chars().all(|c| c.is_ascii_digit())
                {
                    return None;
                }
                (&unsigned[..position], exponent_str.parse::<i64>().ok()?)
            }
            None => (unsigned, 0),
        };

        let (integer, fraction) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (mantissa, ""),
        };
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(integer) || !all_digits(fraction) {
            return None;
        }
        // `5.` is fine, `.` alone is not
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        if integer.is_empty() && !mantissa.starts_with('.') {
            return None;
        }

        Some(Self { negative, integer, fraction, exponent })
    }

    fn truncate(&self) -> Option<BigInt> {
        if self.exponent > MAX_DECIMAL_EXPONENT {
            return None;
        }

        let digits = format!("{}{}", self.integer, self.fraction);
        let mut unscaled = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        if self.negative {
            unscaled = -unscaled;
        }

        let scale = (self.fraction.len() as i64).checked_sub(self.exponent)?;
        if scale >= digits.len() as i64 {
            return Some(BigInt::from(0));
        }
        let (truncated, _) =
            BigDecimal::new(unscaled, scale).with_scale(0).into_bigint_and_exponent();
        Some(truncated)
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod exported_test_utils {
    use crate::contract::ContractAbi;

    /// A contract exercising every kind of input the form engine supports.
    pub const DUMMY_ABI_JSON: &str = r#"[
        {
            "type": "impl",
            "name": "BalanceImpl",
            "interface_name": "demo::IBalance"
        },
        {
            "type": "struct",
            "name": "core::integer::u256",
            "members": [
                { "name": "low", "type": "core::integer::u128" },
                { "name": "high", "type": "core::integer::u128" }
            ]
        },
        {
            "type": "struct",
            "name": "demo::Point",
            "members": [
                { "name": "x", "type": "core::felt252" },
                { "name": "y", "type": "core::integer::i32" }
            ]
        },
        {
            "type": "struct",
            "name": "demo::Segment",
            "members": [
                { "name": "start", "type": "demo::Point" },
                { "name": "end", "type": "demo::Point" },
                { "name": "label", "type": "core::byte_array::ByteArray" }
            ]
        },
        {
            "type": "enum",
            "name": "demo::Direction",
            "variants": [
                { "name": "Up", "type": "()" },
                { "name": "Down", "type": "()" },
                { "name": "Jump", "type": "core::integer::u8" },
                { "name": "Goto", "type": "demo::Point" }
            ]
        },
        {
            "type": "enum",
            "name": "core::option::Option::<core::felt252>",
            "variants": [
                { "name": "Some", "type": "core::felt252" },
                { "name": "None", "type": "()" }
            ]
        },
        {
            "type": "enum",
            "name": "core::result::Result::<core::integer::u8, core::felt252>",
            "variants": [
                { "name": "Ok", "type": "core::integer::u8" },
                { "name": "Err", "type": "core::felt252" }
            ]
        },
        {
            "type": "interface",
            "name": "demo::IBalance",
            "items": [
                {
                    "type": "function",
                    "name": "get_balance",
                    "inputs": [
                        {
                            "name": "owner",
                            "type": "core::starknet::contract_address::ContractAddress"
                        }
                    ],
                    "outputs": [{ "type": "core::integer::u256" }],
                    "state_mutability": "view"
                },
                {
                    "type": "function",
                    "name": "set_balance",
                    "inputs": [
                        {
                            "name": "owner",
                            "type": "core::starknet::contract_address::ContractAddress"
                        },
                        { "name": "amount", "type": "core::integer::u256" }
                    ],
                    "outputs": [],
                    "state_mutability": "external"
                }
            ]
        },
        {
            "type": "function",
            "name": "get_owner",
            "inputs": [],
            "outputs": [{ "type": "core::starknet::contract_address::ContractAddress" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_name",
            "inputs": [],
            "outputs": [{ "type": "core::felt252" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_point",
            "inputs": [],
            "outputs": [{ "type": "demo::Point" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_segment",
            "inputs": [],
            "outputs": [{ "type": "demo::Segment" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_direction",
            "inputs": [],
            "outputs": [{ "type": "demo::Direction" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_pair",
            "inputs": [],
            "outputs": [{ "type": "(core::integer::u8, core::bool)" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_values",
            "inputs": [],
            "outputs": [{ "type": "core::array::Array::<core::integer::u32>" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_points",
            "inputs": [],
            "outputs": [{ "type": "core::array::Span::<demo::Point>" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_maybe",
            "inputs": [],
            "outputs": [{ "type": "core::option::Option::<core::felt252>" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "get_two",
            "inputs": [],
            "outputs": [{ "type": "core::felt252" }, { "type": "core::felt252" }],
            "state_mutability": "view"
        },
        {
            "type": "function",
            "name": "move_point",
            "inputs": [
                { "name": "point", "type": "demo::Point" },
                { "name": "direction", "type": "demo::Direction" },
                { "name": "steps", "type": "core::array::Array::<core::integer::u8>" },
                { "name": "pair", "type": "(core::integer::u8, core::bool)" },
                { "name": "flag", "type": "core::bool" },
                { "name": "memo", "type": "core::option::Option::<core::felt252>" },
                { "name": "outcome", "type": "core::result::Result::<core::integer::u8, core::felt252>" },
                { "name": "tag", "type": "core::bytes_31::bytes31" },
                { "name": "note", "type": "core::byte_array::ByteArray" },
                { "type": "core::integer::i8" }
            ],
            "outputs": [],
            "state_mutability": "external"
        },
        {
            "type": "constructor",
            "name": "constructor",
            "inputs": [
                { "name": "initial_owner", "type": "core::starknet::contract_address::ContractAddress" },
                { "name": "supply", "type": "core::integer::u256" }
            ]
        },
        {
            "type": "event",
            "name": "demo::Event",
            "kind": "enum",
            "variants": []
        }
    ]"#;

    pub fn dummy_contract_abi() -> ContractAbi {
        ContractAbi::from_json_str(DUMMY_ABI_JSON).unwrap()
    }
}
