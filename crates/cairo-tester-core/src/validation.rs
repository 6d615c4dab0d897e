use num_bigint::{BigInt, Sign};
use tester_types::cairo_type::CairoType;
use tester_types::felt::felt_prime;

use crate::utils::{is_valid_hex_number, parse_integer_literal};

/// Range a numeric type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Width { bits: u32, signed: bool },
    /// `[0, P)`
    Felt,
}

/// Checks that `value` is an integer literal fitting the type `type_str`, e.g.
/// `core::integer::i8` or `core::zeroable::NonZero::<core::integer::u256>`. Decimal literals may
/// carry a fraction, which is truncated; hex literals are accepted as well. Felts take any value
/// below the field prime.
pub fn is_valid_integer(type_str: &str, value: &str) -> bool {
    let Some(bound) = bound_of(type_str) else {
        return false;
    };
    let signed = matches!(bound, Bound::Width { signed: true, .. });

    let parsed = if is_valid_hex_number(value) {
        parse_integer_literal(value)
    } else if has_integer_format(value, signed) {
        parse_integer_part(value)
    } else {
        None
    };

    parsed.is_some_and(|integer| fits(&integer, bound))
}

/// Same as [`is_valid_integer`] for a value that is already an integer.
pub fn is_valid_integer_value(type_str: &str, value: &BigInt) -> bool {
    bound_of(type_str).is_some_and(|bound| fits(value, bound))
}

fn bound_of(type_str: &str) -> Option<Bound> {
    match CairoType::classify(type_str) {
        CairoType::Integer(integer) => {
            Some(Bound::Width { bits: u32::from(integer.bits), signed: integer.signed })
        }
        CairoType::Felt => Some(Bound::Felt),
        _ => None,
    }
}

fn fits(value: &BigInt, bound: Bound) -> bool {
    match bound {
        Bound::Width { bits, signed } => fits_within_bit_count(value, bits, signed),
        Bound::Felt => value.sign() != Sign::Minus && value.magnitude() < &felt_prime(),
    }
}

/// `^-?\d*\.?\d*$` for signed types, `^\d*\.?\d*$` for unsigned ones.
fn has_integer_format(value: &str, signed: bool) -> bool {
    let unsigned = if signed { value.strip_prefix('-').unwrap_or(value) } else { value };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    integer.chars().all(|c| c.is_ascii_digit()) && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Drops the fraction; an empty integer part is zero, a lone sign is not a number.
fn parse_integer_part(value: &str) -> Option<BigInt> {
    let integer = value.split('.').next().unwrap_or_default();
    match integer {
        "" => Some(BigInt::from(0)),
        "-" => None,
        _ => integer.parse().ok(),
    }
}

fn fits_within_bit_count(value: &BigInt, bits: u32, signed: bool) -> bool {
    if !signed && value.sign() == Sign::Minus {
        return false;
    }

    let significant_hex_digits = value.magnitude().to_str_radix(16);
    let used_bits = significant_hex_digits.len() as u64 * 4;
    if used_bits > u64::from(bits) {
        return false;
    }

    // At the full width the top bit is the sign bit; only the most negative value may set it.
    if signed && used_bits == u64::from(bits) {
        let most_significant_digit = significant_hex_digits
            .chars()
            .next()
            .and_then(|digit| digit.to_digit(16))
            .unwrap_or_default();
        if most_significant_digit >= 8 {
            let minimum_magnitude = BigInt::from(1) << (bits - 1);
            return value.sign() == Sign::Minus
                && value.magnitude() == minimum_magnitude.magnitude();
        }
    }

    true
}
